//! 本地模板分析
//!
//! 生成服务不可用时的确定性文本。不做任何网络调用，输出永不为空。

use std::fmt::Write;

use crate::models::chart::{ChartRecord, UNKNOWN};
use crate::models::holland::{DimensionScores, RankedProfile};

/// 排盘服务不可用时的命盘分析
pub const CHART_UNAVAILABLE_TEXT: &str =
    "由于技术原因，紫微斗数排盘暂时不可用。建议您稍后重试或联系技术支持。";

/// 命盘分析模板
pub fn chart_analysis(chart: &ChartRecord) -> String {
    if chart.placeholder {
        return CHART_UNAVAILABLE_TEXT.to_string();
    }

    let info = &chart.user_info;
    let (position, major_stars) = match chart.life_palace() {
        Some(palace) => {
            let stars = palace
                .major_stars
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join("、");
            (palace.position.clone(), stars)
        }
        None => (String::new(), String::new()),
    };
    let position = if position.is_empty() {
        UNKNOWN.to_string()
    } else {
        position
    };
    let major_stars = if major_stars.is_empty() {
        "无主星".to_string()
    } else {
        major_stars
    };

    format!(
        "## 紫微斗数分析报告

### 基本信息
您的命宫位于{position}，主星为{major_stars}，五行局为{five}。

### 性格特质
基于您的紫微斗数排盘，您具有以下特质：
- 命主{soul}，身主{body}，体现了您的核心性格特征
- {five}的特质影响着您的思维模式和行为方式

### 学习方向建议
根据您的星盘配置，建议考虑以下专业方向：

1. **理工科方向**: 适合逻辑思维强、喜欢解决问题的特质
2. **人文社科**: 适合感性思维、关注人文关怀的特点
3. **艺术创作**: 发挥创意和想象力的优势
4. **商业管理**: 培养领导能力和组织协调技能

### 发展建议
- 重视基础学科的学习，打好扎实的知识基础
- 培养多元化的兴趣爱好，开拓视野
- 注重实践能力的培养，理论与实践相结合
- 建立良好的人际关系，学会团队合作

*注：本分析基于传统紫微斗数理论，仅供参考。实际发展还需结合个人努力和社会环境因素。*",
        five = info.five_elements_class,
        soul = info.soul,
        body = info.body,
    )
}

/// 霍兰德测试分析模板
pub fn inventory_analysis(scores: &DimensionScores, profile: &RankedProfile) -> String {
    let primary = profile.primary_type.profile();

    let mut dimension_lines = String::new();
    for (kind, score) in scores.iter() {
        let _ = writeln!(dimension_lines, "- {}({})：{}分", kind.name(), kind, score);
    }

    let mut career_lines = String::new();
    for top in &profile.top_three_types {
        let marker = if top.kind == profile.primary_type {
            "🌟"
        } else {
            "⭐"
        };
        let _ = writeln!(
            career_lines,
            "{} {}相关专业",
            marker,
            top.kind.profile().careers
        );
    }

    format!(
        "## 霍兰德职业兴趣测试分析报告

### 您的霍兰德代码：{code}

### 主要兴趣类型：{name}
您的主要职业兴趣倾向是{name}，得分为{score}分。
特征：{traits}

### 各维度得分分析
{dimension_lines}
### 推荐专业方向
基于您的兴趣特点，推荐以下专业：
{career_lines}
### 发展建议
1. **发挥优势**：重点发展{name}相关的技能和知识
2. **平衡发展**：适当培养其他维度的能力，形成复合型优势
3. **实践探索**：通过实习、志愿服务等方式验证职业兴趣
4. **持续学习**：保持对新知识和技能的学习热情

*注：本分析基于霍兰德职业兴趣理论，仅供参考。职业选择还需综合考虑个人能力、价值观和市场需求等因素。*",
        code = profile.holland_code,
        name = primary.name,
        score = profile.primary_score,
        traits = primary.traits,
    )
}

/// 综合分析模板
pub fn combined_analysis(name: &str, chart: &ChartRecord, profile: &RankedProfile) -> String {
    let info = &chart.user_info;

    let traits = profile
        .characteristics
        .iter()
        .map(|t| format!("- {}", t))
        .collect::<Vec<_>>()
        .join("\n");

    let majors = profile
        .major_recommendations
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, m)| {
            format!(
                "{}. {}（匹配度：{}%）- {}",
                i + 1,
                m.name,
                m.match_percent,
                m.reason
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{name}的综合分析报告：

## 双重验证分析
紫微斗数显示您的命主为{soul}，身主为{body}，五行局为{five}。
霍兰德测试显示您的主要类型为{type_name}（{code}），得分{score}分。

## 性格特质综合
结合两种分析方法，您的主要特征包括：
{traits}

## 专业推荐整合
基于综合分析，为您推荐以下专业方向：
{majors}

## 发展建议
{suggestion}

## 工作环境
适合的工作环境：{environment}",
        soul = info.soul,
        body = info.body,
        five = info.five_elements_class,
        type_name = profile.primary_type_name,
        code = profile.holland_code,
        score = profile.primary_score,
        suggestion = profile.development_suggestion,
        environment = profile.work_environment,
    )
}
