//! 提示词构建
//!
//! 纯字符串模板，每个分析阶段一个构建函数，生成预算随请求一起给出。

use std::fmt::Write;

use crate::models::chart::ChartRecord;
use crate::models::holland::{DimensionScores, HollandType, RankedProfile};
use crate::models::inventory::Respondent;
use crate::models::narrative::NarrativeResult;
use crate::services::narrative::{GenerationBudget, NarrativeRequest};

pub const INVENTORY_BUDGET: GenerationBudget = GenerationBudget {
    max_tokens: 2000,
    temperature: 0.7,
};

pub const CHART_BUDGET: GenerationBudget = GenerationBudget {
    max_tokens: 1000,
    temperature: 0.3,
};

pub const CHART_STAGE_BUDGET: GenerationBudget = GenerationBudget {
    max_tokens: 500,
    temperature: 0.4,
};

pub const COMBINED_STAGE_BUDGET: GenerationBudget = GenerationBudget {
    max_tokens: 1500,
    temperature: 0.4,
};

pub const CHART_STAGE_SYSTEM: &str = "你是一位资深的紫微斗数专家，请基于排盘信息提供专业的分析。";

pub const COMBINED_STAGE_SYSTEM: &str = "你是一位资深的国学易经术数领域专家，请综合紫微斗数和霍兰德职业兴趣测试结果，为用户提供全面的专业选择建议。";

/// 辅星在提示词中最多列出的数量
const MINOR_STARS_IN_PROMPT: usize = 5;

fn type_description(kind: HollandType) -> String {
    let profile = kind.profile();
    format!("{} - {}", profile.name, profile.description)
}

/// 单独霍兰德测试
pub fn inventory_request(
    scores: &DimensionScores,
    profile: &RankedProfile,
    respondent: Option<&Respondent>,
) -> NarrativeRequest {
    let mut prompt = String::from(
        "作为专业的职业规划师，请基于以下霍兰德职业兴趣测试结果，为用户提供详细的职业兴趣分析和专业推荐：\n\n",
    );
    let _ = writeln!(prompt, "【测试结果】");
    let _ = writeln!(prompt, "霍兰德代码：{}", profile.holland_code);
    let _ = writeln!(prompt, "各维度得分：");
    for (kind, score) in scores.iter() {
        let _ = writeln!(prompt, "{} ({}): {}分", kind, type_description(kind), score);
    }
    let _ = writeln!(prompt, "\n主要类型排序：");
    for (i, top) in profile.top_three_types.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "{}. {} ({}) - {}分",
            i + 1,
            top.kind,
            type_description(top.kind),
            top.score
        );
    }

    let ziwei_info = respondent.and_then(|r| r.ziwei_info.as_ref());
    if let Some(respondent) = respondent {
        let _ = writeln!(prompt, "\n【个人信息】");
        let _ = writeln!(prompt, "姓名：{}", respondent.name);
        let _ = writeln!(
            prompt,
            "性别：{}",
            respondent.gender.as_deref().unwrap_or("未知")
        );
        if let Some(info) = ziwei_info {
            let _ = writeln!(prompt, "紫微斗数信息：{}", info);
        }
    }

    prompt.push_str(
        "
请从以下方面进行分析：

## 1. 职业兴趣特质分析
- 分析主导的职业兴趣类型特征
- 解释各维度分数的含义
- 分析兴趣组合的独特性

## 2. 适合的专业领域
- 基于霍兰德代码推荐5-8个具体专业
- 每个专业要说明匹配的理由
- 按照匹配度排序

## 3. 职业发展路径
- 推荐相关的职业方向
- 分析在这些领域的发展优势
- 提供职业发展建议

## 4. 学习建议
- 提供具体的学习发展建议
- 指出需要培养的核心能力
- 给出实用的行动指导
",
    );
    if ziwei_info.is_some() {
        prompt.push_str("\n请结合紫微斗数分析结果，提供更个性化的建议。\n");
    }
    prompt.push_str("\n请用通俗易懂的语言，重点关注实用性和可操作性。");

    NarrativeRequest {
        system: None,
        prompt,
        budget: INVENTORY_BUDGET,
    }
}

fn write_basic_info(prompt: &mut String, chart: &ChartRecord) {
    let info = &chart.user_info;
    let _ = writeln!(prompt, "【基本信息】");
    let _ = writeln!(prompt, "姓名：{}", info.name);
    let _ = writeln!(prompt, "性别：{}", info.gender);
    let _ = writeln!(prompt, "出生日期：{}（{}）", info.solar_date, info.lunar_date);
    let _ = writeln!(prompt, "生辰八字：{}", info.chinese_date);
    let _ = writeln!(prompt, "生肖：{}", info.zodiac);
    let _ = writeln!(prompt, "命主：{}", info.soul);
    let _ = writeln!(prompt, "身主：{}", info.body);
    let _ = writeln!(prompt, "五行局：{}", info.five_elements_class);
}

fn write_palaces(prompt: &mut String, chart: &ChartRecord) {
    let _ = writeln!(prompt, "【宫位星曜分布】");
    for palace in chart.palaces.iter() {
        let major = palace
            .major_stars
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join("、");
        let minor = palace
            .minor_stars
            .iter()
            .take(MINOR_STARS_IN_PROMPT)
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join("、");
        let _ = writeln!(prompt, "{}：{}", palace.name, palace.position);
        let _ = writeln!(
            prompt,
            "    主星：{}",
            if major.is_empty() { "无主星" } else { major.as_str() }
        );
        let _ = writeln!(prompt, "    辅星：{}\n", minor);
    }
}

/// 单独紫微分析
pub fn chart_request(chart: &ChartRecord) -> NarrativeRequest {
    let mut prompt = String::from(
        "作为一名专业的紫微斗数分析师，请基于以下紫微斗数排盘信息，为用户提供详细的性格特质分析和专业方向建议：\n\n",
    );
    write_basic_info(&mut prompt, chart);
    prompt.push('\n');
    write_palaces(&mut prompt, chart);

    prompt.push_str(
        "请从以下几个方面进行分析：

## 1. 性格特质分析
- 基于命宫主星分析核心性格
- 基于身宫特质分析行为模式
- 基于三方四正分析性格的完整面貌

## 2. 天赋能力分析
- 基于官禄宫分析适合的职业类型
- 基于财帛宫分析财富获取方式
- 基于福德宫分析内在驱动力

## 3. 学习方向建议
- 推荐3-5个最适合的专业领域
- 说明每个专业选择的紫微依据
- 分析在这些领域的发展潜力

## 4. 发展建议
- 提供具体的学习和发展路径
- 指出需要注意的挑战和机遇
- 给出实用的建议

请用专业而易懂的语言，避免过于深奥的术语，重点关注实用性和指导性。",
    );

    NarrativeRequest {
        system: None,
        prompt,
        budget: CHART_BUDGET,
    }
}

/// 综合分析中的命盘阶段
pub fn chart_stage_request(chart: &ChartRecord) -> NarrativeRequest {
    let info = &chart.user_info;
    let mut prompt = format!(
        "请基于以下紫微斗数排盘信息，为{}（{}）提供专业的性格分析和专业选择建议：\n\n",
        info.name, info.gender
    );
    write_basic_info(&mut prompt, chart);
    prompt.push('\n');
    write_palaces(&mut prompt, chart);

    prompt.push_str(
        "请从以下维度进行分析：
1. **性格特质分析**：基于命宫配置
2. **天赋才能分析**：结合各宫位特点
3. **适合的专业领域**：基于星曜特质
4. **具体专业推荐**：提供3-5个最适合的大学专业
5. **学习发展建议**：针对性的能力培养建议

请提供专业、详细的分析报告。",
    );

    NarrativeRequest {
        system: Some(CHART_STAGE_SYSTEM.to_string()),
        prompt,
        budget: CHART_STAGE_BUDGET,
    }
}

/// 综合分析阶段：嵌入命盘分析文本与霍兰德结果
pub fn combined_request(
    chart: &ChartRecord,
    chart_narrative: &NarrativeResult,
    profile: &RankedProfile,
) -> NarrativeRequest {
    let info = &chart.user_info;
    let mut prompt = format!(
        "请综合以下紫微斗数和霍兰德职业兴趣测试结果，为{}（{}）提供全面的专业选择建议：\n\n",
        info.name, info.gender
    );

    let _ = writeln!(prompt, "【紫微斗数分析】");
    let _ = writeln!(
        prompt,
        "命主：{}，身主：{}，五行局：{}",
        info.soul, info.body, info.five_elements_class
    );
    let _ = writeln!(prompt, "{}\n", chart_narrative.text());

    let _ = writeln!(prompt, "【霍兰德测试结果】");
    let _ = writeln!(
        prompt,
        "- 主要类型：{}（{}型）",
        profile.primary_type_name, profile.primary_type
    );
    let _ = writeln!(prompt, "- 霍兰德代码：{}", profile.holland_code);
    let _ = writeln!(prompt, "- 主要得分：{}分", profile.primary_score);
    let _ = writeln!(
        prompt,
        "- 类型特征：{}",
        profile.characteristics.join("、")
    );
    let tops = profile
        .top_three_types
        .iter()
        .map(|t| format!("{}{}%", t.name, t.percentage))
        .collect::<Vec<_>>()
        .join("、");
    let _ = writeln!(prompt, "- 前三类型：{}", tops);

    prompt.push_str(
        "
请提供：
1. **双重验证分析**：紫微斗数与霍兰德测试结果的一致性分析
2. **性格特质综合**：结合两种分析方法的性格特点总结
3. **专业推荐整合**：基于两种分析的专业推荐，并说明匹配度
4. **发展路径建议**：结合传统智慧与现代心理学的发展建议

请提供专业、全面的综合分析报告。",
    );

    NarrativeRequest {
        system: Some(COMBINED_STAGE_SYSTEM.to_string()),
        prompt,
        budget: COMBINED_STAGE_BUDGET,
    }
}
