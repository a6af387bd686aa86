//! 紫微斗数命盘模型

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 十二宫，按固定顺序
pub const PALACE_NAMES: [&str; 12] = [
    "命宫", "兄弟", "夫妻", "子女", "财帛", "疾厄", "迁移", "奴仆", "官禄", "田宅", "福德", "父母",
];

/// 未知描述字段的占位值
pub const UNKNOWN: &str = "未知";

/// 默认昵称
pub const DEFAULT_NAME: &str = "用户";

/// 默认出生地
pub const DEFAULT_LOCATION: &str = "北京";

/// 性别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// 解析请求中的性别
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "男" => Some(Gender::Male),
            "女" => Some(Gender::Female),
            v if v.eq_ignore_ascii_case("male") || v.eq_ignore_ascii_case("m") => {
                Some(Gender::Male)
            }
            v if v.eq_ignore_ascii_case("female") || v.eq_ignore_ascii_case("f") => {
                Some(Gender::Female)
            }
            _ => None,
        }
    }

    /// 展示用标签
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "男",
            Gender::Female => "女",
        }
    }

    /// 传给排盘库的性别参数
    pub fn token(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// 出生时间（公历）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthData {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl BirthData {
    /// `YYYY-MM-DD`
    pub fn solar_date(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// 排盘对象：经过校验的出生信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSubject {
    pub name: String,
    pub gender: Gender,
    pub birth: BirthData,
    pub location: String,
}

/// 用户描述信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInfo {
    pub name: String,
    pub gender: String,
    pub solar_date: String,
    pub lunar_date: String,
    pub chinese_date: String,
    pub zodiac: String,
    /// 命主
    pub soul: String,
    /// 身主
    pub body: String,
    /// 五行局
    pub five_elements_class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_hour: Option<u32>,
    pub location: String,
}

impl Default for UserInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.into(),
            gender: String::new(),
            solar_date: String::new(),
            lunar_date: UNKNOWN.into(),
            chinese_date: UNKNOWN.into(),
            zodiac: UNKNOWN.into(),
            soul: UNKNOWN.into(),
            body: UNKNOWN.into(),
            five_elements_class: UNKNOWN.into(),
            birth_hour: None,
            location: DEFAULT_LOCATION.into(),
        }
    }
}

impl UserInfo {
    /// 只含请求自带信息的描述，命盘字段均为“未知”
    pub fn from_subject(subject: &ChartSubject) -> Self {
        Self {
            name: subject.name.clone(),
            gender: subject.gender.label().into(),
            solar_date: subject.birth.solar_date(),
            birth_hour: Some(subject.birth.hour),
            location: subject.location.clone(),
            ..Self::default()
        }
    }
}

/// 主星
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorStar {
    pub name: String,
    pub brightness: String,
    #[serde(default)]
    pub mutagen: Option<String>,
}

/// 辅星
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinorStar {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub mutagen: Option<String>,
}

/// 宫位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palace {
    #[serde(default)]
    pub name: String,
    /// 地支
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub major_stars: Vec<MajorStar>,
    #[serde(default)]
    pub minor_stars: Vec<MinorStar>,
}

impl Palace {
    /// 无星曜的占位宫位
    pub fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            position: String::new(),
            major_stars: Vec::new(),
            minor_stars: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.major_stars.is_empty() && self.minor_stars.is_empty()
    }
}

/// 十二宫
///
/// 始终恰好包含 [`PALACE_NAMES`] 中的十二个宫位，顺序固定。
/// 序列化为以宫名为键的对象。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palaces(Vec<Palace>);

impl Palaces {
    /// 按宫名逐个构造
    pub fn from_fn(mut build: impl FnMut(&'static str) -> Palace) -> Self {
        Self(
            PALACE_NAMES
                .iter()
                .map(|&name| {
                    let mut palace = build(name);
                    palace.name = name.to_string();
                    palace
                })
                .collect(),
        )
    }

    /// 十二个空宫
    pub fn empty() -> Self {
        Self::from_fn(Palace::placeholder)
    }

    pub fn get(&self, name: &str) -> Option<&Palace> {
        self.0.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Palace> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Palaces {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for Palaces {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for palace in &self.0 {
            map.serialize_entry(&palace.name, palace)?;
        }
        map.end()
    }
}

/// 缺失的宫位补为空宫，未知的键忽略
impl<'de> Deserialize<'de> for Palaces {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PalacesVisitor;

        impl<'de> Visitor<'de> for PalacesVisitor {
            type Value = Palaces;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object keyed by palace name")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Palaces, A::Error> {
                let mut found: HashMap<String, Palace> = HashMap::new();
                while let Some((name, palace)) = access.next_entry::<String, Palace>()? {
                    found.insert(name, palace);
                }
                Ok(Palaces::from_fn(|name| {
                    found
                        .remove(name)
                        .unwrap_or_else(|| Palace::placeholder(name))
                }))
            }
        }

        deserializer.deserialize_map(PalacesVisitor)
    }
}

/// 标准化后的命盘
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRecord {
    #[serde(default)]
    pub user_info: UserInfo,
    #[serde(default)]
    pub palaces: Palaces,
    /// 读取失败、以空宫替代的宫位
    #[serde(skip)]
    pub degraded_palaces: Vec<&'static str>,
    /// 排盘服务不可用时生成的占位命盘
    #[serde(skip)]
    pub placeholder: bool,
}

impl ChartRecord {
    /// 排盘服务不可用时的占位命盘：仅有用户描述和十二个空宫
    pub fn placeholder(subject: &ChartSubject) -> Self {
        Self {
            user_info: UserInfo::from_subject(subject),
            palaces: Palaces::empty(),
            degraded_palaces: Vec::new(),
            placeholder: true,
        }
    }

    /// 命宫
    pub fn life_palace(&self) -> Option<&Palace> {
        self.palaces.get(PALACE_NAMES[0])
    }
}
