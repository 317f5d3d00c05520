//! 補貨建議量計算

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use stockrisk_core::PolicyConfig;

use crate::metrics::{MetricsCalculator, Quantities, SALES_WINDOW_DAYS};

/// 補貨建議
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Replenishment {
    /// 目標庫存（30 天銷量 × 目標覆蓋天數 ÷ 30）
    pub target_stock: Decimal,
    /// 建議補貨量（整數，非負）
    pub suggestion: Decimal,
}

/// 補貨建議計算器
pub struct ReplenishmentSizer;

impl ReplenishmentSizer {
    /// 目標庫存
    ///
    /// 先乘後除，不經過已捨入的日均銷量。
    pub fn target_stock(sales_30d: Decimal, policy: &PolicyConfig) -> Decimal {
        if sales_30d <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        sales_30d
            .checked_mul(policy.target_coverage_days)
            .and_then(|scaled| scaled.checked_div(Decimal::from(SALES_WINDOW_DAYS)))
            .unwrap_or(Decimal::MAX)
    }

    /// 計算補貨建議
    ///
    /// 無可量測需求時建議量一律為 0，不論庫存多低。
    pub fn size(
        quantities: &Quantities,
        daily_average_sales: Decimal,
        policy: &PolicyConfig,
    ) -> Replenishment {
        let target_stock = Self::target_stock(quantities.sales_30d, policy);

        let suggestion = if MetricsCalculator::has_measurable_demand(daily_average_sales, policy) {
            let gap = target_stock - quantities.stock - quantities.open_orders;
            gap.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .max(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };

        Replenishment {
            target_stock,
            suggestion,
        }
    }
}
