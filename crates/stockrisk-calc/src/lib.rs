//! # StockRisk Calculation Engine
//!
//! 覆蓋指標、風險分類、補貨建議、優先級、彙總與 ABC 分析

pub mod abc;
pub mod action_list;
pub mod aggregation;
pub mod analyzer;
pub mod assessment;
pub mod enrichment;
pub mod export;
pub mod metrics;
pub mod priority;
pub mod replenishment;
pub mod risk;

// Re-export 主要類型
pub use abc::{AbcBucket, AbcClassifier, AbcEntry, AbcReport, AbcThresholds};
pub use action_list::{ActionItem, ActionList, ActionOrdering};
pub use aggregation::{
    normalize_key, AggregatedItem, Aggregator, ByCollection, ByName, ByNameAndVariant,
    ByProductType, BySku, GroupKey,
};
pub use analyzer::{AnalysisOptions, AssessedSku, CoverageAnalyzer};
pub use assessment::Assessment;
pub use enrichment::{apply_categories, enrich_all, EnrichedSku, Enricher};
pub use export::{CategoryBucket, CategorySummary, ExportRow, StatusSummary, SummaryBucket};
pub use metrics::{CoverageMetrics, MetricsCalculator, Quantities};
pub use priority::{PriorityAssessment, PriorityEngine, PriorityReason};
pub use replenishment::{Replenishment, ReplenishmentSizer};
pub use risk::RiskClassifier;

/// 覆蓋分析結果
#[derive(Debug, Clone)]
pub struct AnalysisReport<'a> {
    /// 使用的策略名稱
    pub policy_name: String,

    /// 已排序的彙總項目
    pub items: ActionList<AggregatedItem<'a>>,

    /// ABC 分類
    pub abc: AbcReport<'a>,

    pub status_summary: StatusSummary,
    pub category_summary: CategorySummary,

    /// 警告信息
    pub warnings: Vec<AnalysisWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl AnalysisReport<'_> {
    /// 全部項目的匯出列（已排序）
    pub fn export_rows(&self) -> Vec<ExportRow> {
        ExportRow::from_items(self.items.all())
    }

    /// 前 N 項的匯出列
    pub fn top_rows(&self, limit: usize) -> Vec<ExportRow> {
        ExportRow::from_items(self.items.top(limit))
    }
}

/// 分析警告
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AnalysisWarning {
    pub sku_id: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl AnalysisWarning {
    pub fn new(sku_id: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            sku_id,
            message,
            severity,
        }
    }

    pub fn info(sku_id: String, message: String) -> Self {
        Self::new(sku_id, message, WarningSeverity::Info)
    }

    pub fn warning(sku_id: String, message: String) -> Self {
        Self::new(sku_id, message, WarningSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum WarningSeverity {
    Info,
    Warning,
}
