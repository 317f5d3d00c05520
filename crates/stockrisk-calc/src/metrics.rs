//! 覆蓋指標計算

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockrisk_core::{Coverage, PolicyConfig, SkuRecord};

/// 銷量統計窗口（天）
pub const SALES_WINDOW_DAYS: u32 = 30;

/// 覆蓋計算輸入數量（單一 SKU 或彙總）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quantities {
    /// 庫存（依策略選定的庫存池）
    pub stock: Decimal,
    /// 近 30 天銷量
    pub sales_30d: Decimal,
    /// 在途訂單
    pub open_orders: Decimal,
}

impl Quantities {
    pub fn new(stock: Decimal, sales_30d: Decimal, open_orders: Decimal) -> Self {
        Self {
            stock,
            sales_30d,
            open_orders,
        }
    }

    /// 依策略的庫存池取出 SKU 數量
    ///
    /// 負數以 0 計算，由分析器另行發出警告。
    pub fn from_sku(sku: &SkuRecord, policy: &PolicyConfig) -> Self {
        Self {
            stock: sku.stock_for(policy.stock_basis).max(Decimal::ZERO),
            sales_30d: sku.sales_30d.max(Decimal::ZERO),
            open_orders: sku.open_orders.max(Decimal::ZERO),
        }
    }
}

/// 覆蓋指標
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageMetrics {
    /// 日均銷量
    pub daily_average_sales: Decimal,
    /// 現有庫存覆蓋天數
    pub days_of_stock: Coverage,
    /// 含在途訂單覆蓋天數
    pub effective_coverage: Coverage,
}

/// 覆蓋指標計算器
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// 計算覆蓋指標
    pub fn calculate(quantities: &Quantities) -> CoverageMetrics {
        let daily_average_sales = Self::daily_average_sales(quantities.sales_30d);

        CoverageMetrics {
            daily_average_sales,
            days_of_stock: Coverage::from_sales(
                quantities.stock,
                quantities.sales_30d,
                SALES_WINDOW_DAYS,
            ),
            effective_coverage: Coverage::from_sales(
                quantities.stock + quantities.open_orders,
                quantities.sales_30d,
                SALES_WINDOW_DAYS,
            ),
        }
    }

    /// 日均銷量（固定 30 天窗口，不做月份修正）
    pub fn daily_average_sales(sales_30d: Decimal) -> Decimal {
        if sales_30d > Decimal::ZERO {
            sales_30d / Decimal::from(SALES_WINDOW_DAYS)
        } else {
            Decimal::ZERO
        }
    }

    /// 是否有可量測需求
    ///
    /// 日均銷量為零或低於策略的最小有效銷量時視為無需求。
    pub fn has_measurable_demand(daily_average_sales: Decimal, policy: &PolicyConfig) -> bool {
        daily_average_sales > Decimal::ZERO
            && daily_average_sales >= policy.min_significant_daily_sales
    }
}
