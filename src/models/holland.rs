//! 霍兰德 (RIASEC) 模型
//!
//! 六个维度的声明顺序 R, I, A, S, E, C 是排序时的平局规则，不可调整。

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// 霍兰德类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum HollandType {
    R,
    I,
    A,
    S,
    E,
    C,
}

impl HollandType {
    /// 声明顺序
    pub const ALL: [HollandType; 6] = [
        HollandType::R,
        HollandType::I,
        HollandType::A,
        HollandType::S,
        HollandType::E,
        HollandType::C,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn code(self) -> char {
        match self {
            HollandType::R => 'R',
            HollandType::I => 'I',
            HollandType::A => 'A',
            HollandType::S => 'S',
            HollandType::E => 'E',
            HollandType::C => 'C',
        }
    }

    /// 中文名称
    pub fn name(self) -> &'static str {
        self.profile().name
    }

    /// 静态参考资料
    pub fn profile(self) -> &'static TypeProfile {
        &TYPE_PROFILES[self.index()]
    }
}

impl fmt::Display for HollandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// 六维得分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DimensionScores([u32; 6]);

impl DimensionScores {
    pub fn new(values: [u32; 6]) -> Self {
        Self(values)
    }

    pub fn get(&self, kind: HollandType) -> u32 {
        self.0[kind.index()]
    }

    /// 按声明顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = (HollandType, u32)> + '_ {
        HollandType::ALL.iter().map(|&kind| (kind, self.get(kind)))
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }
}

/// 序列化为 `{"R": n, "I": n, ...}`，保持声明顺序
impl Serialize for DimensionScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(HollandType::ALL.len()))?;
        for (kind, score) in self.iter() {
            map.serialize_entry(&kind, &score)?;
        }
        map.end()
    }
}

/// 排序后的单个类型
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TypeScore {
    #[serde(rename = "type")]
    pub kind: HollandType,
    pub score: u32,
    pub name: &'static str,
}

/// 前三类型及其百分比
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TopType {
    #[serde(rename = "type")]
    pub kind: HollandType,
    pub name: &'static str,
    pub score: u32,
    pub percentage: u32,
}

/// 推荐专业
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MajorRecommendation {
    pub name: &'static str,
    #[serde(rename = "match")]
    pub match_percent: u8,
    pub reason: &'static str,
}

/// 霍兰德分析结果
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedProfile {
    pub primary_type: HollandType,
    pub primary_type_name: &'static str,
    pub primary_score: u32,
    pub holland_code: String,
    pub scores: DimensionScores,
    pub sorted_types: Vec<TypeScore>,
    pub top_three_types: Vec<TopType>,
    pub characteristics: &'static [&'static str],
    pub work_environment: &'static str,
    pub development_suggestion: &'static str,
    pub major_recommendations: &'static [MajorRecommendation],
}

/// 按类型索引的静态参考资料
#[derive(Debug)]
pub struct TypeProfile {
    pub name: &'static str,
    /// 用于提示词的一句话描述
    pub description: &'static str,
    /// 模板文本中的特征概述
    pub traits: &'static str,
    /// 模板文本中的代表职业
    pub careers: &'static str,
    pub characteristics: &'static [&'static str],
    pub work_environment: &'static str,
    pub development_suggestion: &'static str,
    pub majors: &'static [MajorRecommendation],
}

const fn major(name: &'static str, match_percent: u8, reason: &'static str) -> MajorRecommendation {
    MajorRecommendation {
        name,
        match_percent,
        reason,
    }
}

static TYPE_PROFILES: [TypeProfile; 6] = [
    TypeProfile {
        name: "现实型",
        description: "喜欢动手操作、使用工具、机械设备",
        traits: "动手能力强、注重实际、喜欢机械操作",
        careers: "工程师、技师、建筑师",
        characteristics: &["动手能力强", "喜欢使用工具", "务实稳重", "偏好具体工作"],
        work_environment: "技术性、实用性强的工作环境",
        development_suggestion: "发展实际操作技能，关注新技术应用",
        majors: &[
            major("机械工程", 95, "与动手能力和技术思维高度匹配"),
            major("土木工程", 90, "实用性强，注重实际应用"),
            major("电气工程", 88, "技术性强，有明确的实用价值"),
        ],
    },
    TypeProfile {
        name: "研究型",
        description: "喜欢思考、分析、研究复杂问题",
        traits: "逻辑思维强、喜欢分析、追求真理",
        careers: "科研人员、医生、分析师",
        characteristics: &["逻辑思维强", "喜欢研究分析", "独立思考", "追求真理"],
        work_environment: "研究性、学术性的工作环境",
        development_suggestion: "加强理论学习，培养研究方法论",
        majors: &[
            major("计算机科学", 95, "逻辑思维和研究能力的完美结合"),
            major("数学", 90, "纯理论研究，符合研究型特质"),
            major("物理学", 88, "基础科学研究，追求真理"),
        ],
    },
    TypeProfile {
        name: "艺术型",
        description: "喜欢创作、想象、表达艺术想法",
        traits: "创造力强、想象丰富、重视美感",
        careers: "设计师、艺术家、作家",
        characteristics: &["创造力强", "想象力丰富", "表达能力好", "追求美感"],
        work_environment: "创意性、自由度高的工作环境",
        development_suggestion: "发挥创意潜能，培养审美素养",
        majors: &[
            major("艺术设计", 95, "创造力和美感的直接体现"),
            major("广告学", 90, "创意表达与商业结合"),
            major("建筑学", 88, "艺术性与实用性并重"),
        ],
    },
    TypeProfile {
        name: "社会型",
        description: "喜欢帮助他人、与人交往沟通",
        traits: "人际能力强、喜欢帮助他人、有同理心",
        careers: "教师、心理咨询师、社工",
        characteristics: &["人际交往好", "乐于助人", "有同理心", "关注他人需求"],
        work_environment: "社交性、服务性的工作环境",
        development_suggestion: "提升沟通技巧，发展服务意识",
        majors: &[
            major("心理学", 95, "帮助他人，深入理解人性"),
            major("教育学", 90, "服务社会，培养人才"),
            major("社会工作", 88, "直接服务社会弱势群体"),
        ],
    },
    TypeProfile {
        name: "企业型",
        description: "喜欢领导、组织、追求成就",
        traits: "领导能力强、善于组织、追求成就",
        careers: "管理者、销售员、企业家",
        characteristics: &["领导能力强", "善于影响他人", "目标导向", "勇于冒险"],
        work_environment: "竞争性、管理性的工作环境",
        development_suggestion: "培养领导能力，学习商业思维",
        majors: &[
            major("工商管理", 95, "领导能力和商业思维的结合"),
            major("市场营销", 90, "影响他人，推动商业发展"),
            major("国际贸易", 88, "全球视野，商业冒险精神"),
        ],
    },
    TypeProfile {
        name: "常规型",
        description: "喜欢有序、规范、按规则做事",
        traits: "做事有条理、细心负责、喜欢稳定",
        careers: "会计师、秘书、图书管理员",
        characteristics: &["组织能力强", "注重细节", "喜欢规则", "追求秩序"],
        work_environment: "结构化、规范性的工作环境",
        development_suggestion: "强化组织能力，提高工作效率",
        majors: &[
            major("会计学", 95, "规范性强，注重细节和准确性"),
            major("法学", 90, "规则导向，逻辑严密"),
            major("行政管理", 88, "组织协调，规范管理"),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_reference_data() {
        for kind in HollandType::ALL {
            let profile = kind.profile();
            assert!(!profile.name.is_empty());
            assert_eq!(profile.characteristics.len(), 4);
            assert_eq!(profile.majors.len(), 3);
        }
        assert_eq!(HollandType::S.name(), "社会型");
    }

    #[test]
    fn test_scores_serialize_in_declaration_order() {
        let scores = DimensionScores::new([1, 2, 3, 4, 5, 6]);
        let json = serde_json::to_string(&scores).unwrap();
        assert_eq!(json, r#"{"R":1,"I":2,"A":3,"S":4,"E":5,"C":6}"#);
    }

    #[test]
    fn test_major_serializes_match_key() {
        let value = serde_json::to_value(&HollandType::C.profile().majors[0]).unwrap();
        assert_eq!(value["name"], "会计学");
        assert_eq!(value["match"], 95);
    }
}
