//! 数据模型模块
//!
//! 所有实体都只存在于单个请求内，组装完成后只读。

pub mod chart;
pub mod envelope;
pub mod holland;
pub mod inventory;
pub mod narrative;

pub use chart::{BirthData, ChartRecord, ChartSubject, Gender, Palace, Palaces, UserInfo};
pub use envelope::{AnalysisEnvelope, ChartReport, InventoryReport};
pub use holland::{DimensionScores, HollandType, RankedProfile};
pub use inventory::{InventoryAnswer, Respondent};
pub use narrative::{NarrativeResult, TokenUsage};
