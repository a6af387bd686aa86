//! Zhixiang - 志向分析服务
//!
//! 霍兰德职业兴趣测试计分、紫微斗数命盘整理，以及借助外部文本生成服务
//! 给出的综合专业选择建议。生成服务不可用时使用本地模板，分析总能完成。

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod security;
pub mod services;
