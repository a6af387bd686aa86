//! 霍兰德计分服务

use crate::models::holland::{
    DimensionScores, HollandType, RankedProfile, TopType, TypeScore,
};
use crate::models::inventory::{InventoryAnswer, MAX_RATING};

/// 每个维度对应的题号，六组恰好覆盖 0..24
pub const QUESTION_MAPPING: [(HollandType, [usize; 4]); 6] = [
    (HollandType::R, [0, 1, 2, 3]),
    (HollandType::I, [4, 5, 6, 7]),
    (HollandType::A, [8, 9, 10, 11]),
    (HollandType::S, [12, 13, 14, 15]),
    (HollandType::E, [16, 17, 18, 19]),
    (HollandType::C, [20, 21, 22, 23]),
];

/// 单维度满分：4 题 × 5 分
pub const MAX_DIMENSION_SCORE: u32 = 4 * MAX_RATING as u32;

/// 计算六维得分
pub fn score(answers: &InventoryAnswer) -> DimensionScores {
    let mut values = [0u32; 6];
    for (kind, indices) in QUESTION_MAPPING {
        values[kind.index()] = indices
            .iter()
            .map(|&i| u32::from(answers.rating(i)))
            .sum();
    }
    DimensionScores::new(values)
}

/// `round(score / 20 × 100)`
pub fn percentage(score: u32) -> u32 {
    (f64::from(score) / f64::from(MAX_DIMENSION_SCORE) * 100.0).round() as u32
}

/// 排序并附上主类型的参考资料
///
/// 稳定排序：同分时保持 R, I, A, S, E, C 的声明顺序。
pub fn rank(scores: &DimensionScores) -> RankedProfile {
    let mut sorted: Vec<TypeScore> = scores
        .iter()
        .map(|(kind, score)| TypeScore {
            kind,
            score,
            name: kind.name(),
        })
        .collect();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));

    let primary = &sorted[0];
    let primary_type = primary.kind;
    let primary_score = primary.score;
    let reference = primary_type.profile();

    let top_three_types = sorted
        .iter()
        .take(3)
        .map(|t| TopType {
            kind: t.kind,
            name: t.name,
            score: t.score,
            percentage: percentage(t.score),
        })
        .collect::<Vec<_>>();
    let holland_code = top_three_types.iter().map(|t| t.kind.code()).collect();

    RankedProfile {
        primary_type,
        primary_type_name: reference.name,
        primary_score,
        holland_code,
        scores: *scores,
        sorted_types: sorted,
        top_three_types,
        characteristics: reference.characteristics,
        work_environment: reference.work_environment,
        development_suggestion: reference.development_suggestion,
        major_recommendations: reference.majors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inventory::ANSWER_COUNT;

    fn answers(ratings: [u8; ANSWER_COUNT]) -> InventoryAnswer {
        InventoryAnswer::new(ratings)
    }

    /// 简单的线性同余序列，保证用例可复现
    fn pseudo_random_answers(seed: u64) -> InventoryAnswer {
        let mut state = seed;
        let mut ratings = [0u8; ANSWER_COUNT];
        for r in ratings.iter_mut() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            *r = ((state >> 33) % 6) as u8;
        }
        answers(ratings)
    }

    #[test]
    fn test_mapping_partitions_all_questions() {
        let mut seen = [false; ANSWER_COUNT];
        for (_, indices) in QUESTION_MAPPING {
            for i in indices {
                assert!(!seen[i], "question {} mapped twice", i);
                seen[i] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_partition_completeness_and_bounds() {
        for seed in 0..200 {
            let answers = pseudo_random_answers(seed);
            let scores = score(&answers);
            assert_eq!(scores.total(), answers.total());
            for (_, value) in scores.iter() {
                assert!(value <= MAX_DIMENSION_SCORE);
                assert!(percentage(value) <= 100);
            }
        }
    }

    #[test]
    fn test_score_is_idempotent() {
        let answers = pseudo_random_answers(42);
        assert_eq!(score(&answers), score(&answers));
        assert_eq!(rank(&score(&answers)), rank(&score(&answers)));
    }

    #[test]
    fn test_realistic_maxed() {
        let mut ratings = [0u8; ANSWER_COUNT];
        ratings[..4].copy_from_slice(&[5, 5, 5, 5]);
        let scores = score(&answers(ratings));
        assert_eq!(scores.get(HollandType::R), 20);

        let profile = rank(&scores);
        assert_eq!(profile.primary_type, HollandType::R);
        assert_eq!(profile.primary_type_name, "现实型");
        assert_eq!(profile.top_three_types[0].percentage, 100);
        assert_eq!(profile.major_recommendations[0].name, "机械工程");
    }

    #[test]
    fn test_all_zero_ties_follow_declaration_order() {
        let profile = rank(&score(&answers([0; ANSWER_COUNT])));
        assert_eq!(profile.holland_code, "RIA");
        let order: Vec<HollandType> = profile.sorted_types.iter().map(|t| t.kind).collect();
        assert_eq!(order, HollandType::ALL.to_vec());
    }

    #[test]
    fn test_partial_ties_keep_declaration_order() {
        // C and S tie at 12, E at 16, rest 0.
        let scores = DimensionScores::new([0, 0, 0, 12, 16, 12]);
        let profile = rank(&scores);
        assert_eq!(profile.holland_code, "ESC");
        assert_eq!(profile.primary_type, HollandType::E);
    }

    #[test]
    fn test_holland_code_shape() {
        for seed in 0..200 {
            let profile = rank(&score(&pseudo_random_answers(seed)));
            let code: Vec<char> = profile.holland_code.chars().collect();
            assert_eq!(code.len(), 3);
            for c in &code {
                assert!("RIASEC".contains(*c));
            }
            assert!(code[0] != code[1] && code[1] != code[2] && code[0] != code[2]);
        }
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(0), 0);
        assert_eq!(percentage(13), 65);
        assert_eq!(percentage(20), 100);
    }
}
