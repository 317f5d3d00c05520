//! # StockRisk Core
//!
//! 庫存覆蓋與補貨風險引擎的核心資料模型與類型定義

pub mod coverage;
pub mod input;
pub mod policy;
pub mod sku;
pub mod status;

// Re-export 主要類型
pub use coverage::Coverage;
pub use input::{BoundaryMode, InputBatch, RawQuantity, SkuInput};
pub use policy::{PolicyConfig, StockBasis};
pub use sku::SkuRecord;
pub use status::{AbcCurve, Priority, RiskStatus};

/// 風險引擎錯誤類型
///
/// 引擎本身的計算永不失敗；只有資料邊界（輸入轉換、策略載入）與外部協作者會回傳錯誤。
#[derive(Debug, thiserror::Error)]
pub enum StockRiskError {
    #[error("SKU {sku_id} 的欄位 {field} 數值無效: {value}")]
    InvalidQuantity {
        sku_id: String,
        field: &'static str,
        value: String,
    },

    #[error("無效的策略配置: {0}")]
    InvalidPolicy(String),

    #[error("配置解析錯誤: {0}")]
    ConfigParse(String),

    #[error("SKU {sku_id} 補充資料失敗: {message}")]
    Enrichment { sku_id: String, message: String },
}

pub type Result<T> = std::result::Result<T, StockRiskError>;
