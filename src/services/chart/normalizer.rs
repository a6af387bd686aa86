//! 命盘标准化
//!
//! 逐宫读取排盘库的原始输出。单个宫位读取失败只影响该宫，以空宫代替。

use tracing::warn;

use crate::models::chart::{
    ChartRecord, ChartSubject, MajorStar, MinorStar, Palace, Palaces, UNKNOWN, UserInfo,
};
use crate::services::chart::{RawChart, RawStar};

/// 主星缺省亮度
const DEFAULT_BRIGHTNESS: &str = "平";

/// 出生时刻 → 时辰序号
///
/// 子时 [23:00, 01:00) 为 0，之后每两小时一个时辰，亥时 [21:00, 23:00) 为 11。
pub fn time_slot(hour: u32, minute: u32) -> u8 {
    let total_minutes = (hour % 24) * 60 + minute.min(59);
    // 平移一小时后，子时落在 [0, 120)
    let shifted = (total_minutes + 60) % (24 * 60);
    (shifted / 120) as u8
}

/// 原始命盘 → 标准命盘
pub fn normalize(raw: &RawChart, subject: &ChartSubject) -> ChartRecord {
    let describe = |key: &str| raw.descriptor(key).unwrap_or_else(|| UNKNOWN.to_string());

    let user_info = UserInfo {
        name: subject.name.clone(),
        gender: subject.gender.label().to_string(),
        solar_date: raw
            .descriptor("solarDate")
            .unwrap_or_else(|| subject.birth.solar_date()),
        lunar_date: describe("lunarDate"),
        chinese_date: describe("chineseDate"),
        zodiac: describe("zodiac"),
        soul: describe("soul"),
        body: describe("body"),
        five_elements_class: describe("fiveElementsClass"),
        birth_hour: Some(subject.birth.hour),
        location: subject.location.clone(),
    };

    let mut degraded_palaces = Vec::new();
    let palaces = Palaces::from_fn(|name| match raw.palace(name) {
        Ok(palace) => Palace {
            name: name.to_string(),
            position: palace.earthly_branch.unwrap_or_default(),
            major_stars: palace
                .major_stars
                .unwrap_or_default()
                .into_iter()
                .map(major_star)
                .collect(),
            minor_stars: palace
                .minor_stars
                .unwrap_or_default()
                .into_iter()
                .map(minor_star)
                .collect(),
        },
        Err(e) => {
            warn!(palace = name, error = %e, "palace unreadable, using empty placeholder");
            degraded_palaces.push(name);
            Palace::placeholder(name)
        }
    });

    ChartRecord {
        user_info,
        palaces,
        degraded_palaces,
        placeholder: false,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn major_star(star: RawStar) -> MajorStar {
    MajorStar {
        name: star.name,
        brightness: non_empty(star.brightness).unwrap_or_else(|| DEFAULT_BRIGHTNESS.to_string()),
        mutagen: non_empty(star.mutagen),
    }
}

fn minor_star(star: RawStar) -> MinorStar {
    MinorStar {
        name: star.name,
        kind: non_empty(star.kind),
        mutagen: non_empty(star.mutagen),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chart::{BirthData, Gender, PALACE_NAMES};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn subject() -> ChartSubject {
        ChartSubject {
            name: "王五".into(),
            gender: Gender::Male,
            birth: BirthData {
                year: 2006,
                month: 8,
                day: 15,
                hour: 9,
                minute: 0,
            },
            location: "杭州".into(),
        }
    }

    fn raw_palace(name: &str) -> Value {
        json!({
            "name": name,
            "earthlyBranch": "子",
            "heavenlyStem": "甲",
            "majorStars": [{"name": "紫微", "brightness": "", "mutagen": ""}],
            "minorStars": [{"name": "文昌", "type": "soft", "mutagen": "科"}]
        })
    }

    fn raw_chart(provided: usize) -> RawChart {
        let palaces: Vec<Value> = PALACE_NAMES[..provided].iter().map(|n| raw_palace(n)).collect();
        RawChart::from_value(json!({
            "solarDate": "2006-8-15",
            "lunarDate": "二〇〇六年七月廿二",
            "chineseDate": "丙戌 丙申 壬子 乙巳",
            "zodiac": "狗",
            "soul": "廉贞",
            "body": "天同",
            "fiveElementsClass": "金四局",
            "palaces": palaces
        }))
        .unwrap()
    }

    #[rstest]
    #[case(23, 0, 0)]
    #[case(23, 59, 0)]
    #[case(0, 0, 0)]
    #[case(0, 59, 0)]
    #[case(1, 0, 1)]
    #[case(2, 59, 1)]
    #[case(3, 0, 2)]
    #[case(5, 0, 3)]
    #[case(7, 0, 4)]
    #[case(9, 0, 5)]
    #[case(11, 0, 6)]
    #[case(12, 30, 6)]
    #[case(13, 0, 7)]
    #[case(15, 0, 8)]
    #[case(17, 0, 9)]
    #[case(19, 0, 10)]
    #[case(20, 59, 10)]
    #[case(21, 0, 11)]
    #[case(22, 59, 11)]
    fn test_time_slot_boundaries(#[case] hour: u32, #[case] minute: u32, #[case] expected: u8) {
        assert_eq!(time_slot(hour, minute), expected);
    }

    #[test]
    fn test_time_slot_matches_interval_table_for_every_minute() {
        let boundaries = [60, 180, 300, 420, 540, 660, 780, 900, 1020, 1140, 1260, 1380];
        for total in 0..24 * 60 {
            let expected = if !(60..1380).contains(&total) {
                0
            } else {
                boundaries.iter().rposition(|&b| total >= b).unwrap() as u8 + 1
            };
            assert_eq!(time_slot(total / 60, total % 60), expected, "minute {}", total);
        }
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(7)]
    #[case(12)]
    fn test_always_twelve_palaces(#[case] provided: usize) {
        let chart = normalize(&raw_chart(provided), &subject());
        assert_eq!(chart.palaces.len(), 12);
        assert_eq!(chart.degraded_palaces.len(), 12 - provided);
        for (palace, name) in chart.palaces.iter().zip(PALACE_NAMES) {
            assert_eq!(palace.name, name);
        }
        for name in &PALACE_NAMES[provided..] {
            assert!(chart.palaces.get(name).unwrap().is_empty());
        }
    }

    #[test]
    fn test_star_defaults_and_descriptors() {
        let chart = normalize(&raw_chart(12), &subject());
        let life = chart.life_palace().unwrap();
        assert_eq!(life.position, "子");
        assert_eq!(life.major_stars[0].brightness, "平");
        assert_eq!(life.major_stars[0].mutagen, None);
        assert_eq!(life.minor_stars[0].kind.as_deref(), Some("soft"));
        assert_eq!(life.minor_stars[0].mutagen.as_deref(), Some("科"));

        assert_eq!(chart.user_info.soul, "廉贞");
        assert_eq!(chart.user_info.five_elements_class, "金四局");
        assert_eq!(chart.user_info.location, "杭州");
        assert!(!chart.placeholder);
    }

    #[test]
    fn test_one_malformed_palace_does_not_affect_others() {
        let mut palaces: Vec<Value> = PALACE_NAMES.iter().map(|n| raw_palace(n)).collect();
        palaces[3] = json!({"name": "子女", "majorStars": 42});
        let raw = RawChart::from_value(json!({ "palaces": palaces })).unwrap();

        let chart = normalize(&raw, &subject());
        assert_eq!(chart.degraded_palaces, vec!["子女"]);
        assert!(chart.palaces.get("子女").unwrap().is_empty());
        assert_eq!(
            chart.palaces.iter().filter(|p| !p.is_empty()).count(),
            11
        );
        assert_eq!(chart.user_info.soul, UNKNOWN);
        assert_eq!(chart.user_info.solar_date, "2006-08-15");
    }
}
