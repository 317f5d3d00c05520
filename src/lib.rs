//! # StockRisk
//!
//! 庫存覆蓋與補貨風險引擎
//!
//! 由 SKU 快照（庫存、近 30 天銷量、在途訂單）計算覆蓋天數、風險狀態、補貨建議與行動優先級，
//! 並支援彙總、ABC 分類與行動清單排序。

pub use stockrisk_calc as calc;
pub use stockrisk_core as model;

pub use stockrisk_calc::{
    ActionList, ActionOrdering, AnalysisOptions, AnalysisReport, AnalysisWarning, Assessment,
    CoverageAnalyzer, ExportRow, Quantities, WarningSeverity,
};
pub use stockrisk_core::{
    AbcCurve, BoundaryMode, Coverage, PolicyConfig, Priority, RiskStatus, SkuInput, SkuRecord,
    StockRiskError,
};
