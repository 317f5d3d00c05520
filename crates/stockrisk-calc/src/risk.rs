//! 風險分類

use rust_decimal::Decimal;
use stockrisk_core::{PolicyConfig, RiskStatus};

use crate::metrics::{CoverageMetrics, MetricsCalculator, Quantities};

/// 風險分類器
///
/// 固定順序的規則表，第一條符合即回傳：
/// 1. 無可量測需求 → 有庫存為 `NoSales`，否則 `NotApplicable`
/// 2. 無庫存且無在途 → `Critical`
/// 3. 覆蓋低於嚴重門檻且含在途覆蓋低於偏低門檻 → `Critical`
/// 4. 覆蓋低於緊急門檻且 30 天銷量高於高銷量門檻 → `Urgent`
/// 5. 覆蓋低於偏低門檻 → `Low`
/// 6. 庫存 / 目標庫存 與覆蓋天數皆超過過剩倍數 → `Overstocked`
/// 7. 其他 → `Healthy`
///
/// 策略關閉 `open_orders_in_critical_check` 時，規則 2、3 不考慮在途訂單。
pub struct RiskClassifier;

impl RiskClassifier {
    /// 分類單一項目
    pub fn classify(
        quantities: &Quantities,
        metrics: &CoverageMetrics,
        target_stock: Decimal,
        policy: &PolicyConfig,
    ) -> RiskStatus {
        // 規則 1
        if !MetricsCalculator::has_measurable_demand(metrics.daily_average_sales, policy) {
            return if quantities.stock > Decimal::ZERO {
                RiskStatus::NoSales
            } else {
                RiskStatus::NotApplicable
            };
        }

        let count_open_orders = policy.open_orders_in_critical_check;

        // 規則 2
        let nothing_incoming = !count_open_orders || quantities.open_orders.is_zero();
        if quantities.stock.is_zero() && nothing_incoming {
            return RiskStatus::Critical;
        }

        // 規則 3
        let incoming_insufficient =
            !count_open_orders || metrics.effective_coverage.is_below(policy.low_days_threshold);
        if metrics.days_of_stock.is_below(policy.critical_days_threshold) && incoming_insufficient {
            return RiskStatus::Critical;
        }

        // 規則 4
        if metrics.days_of_stock.is_below(policy.urgent_days_threshold)
            && quantities.sales_30d > policy.high_sales_threshold
        {
            return RiskStatus::Urgent;
        }

        // 規則 5
        if metrics.days_of_stock.is_below(policy.low_days_threshold) {
            return RiskStatus::Low;
        }

        // 規則 6
        if Self::is_overstocked(quantities, metrics, target_stock, policy) {
            return RiskStatus::Overstocked;
        }

        RiskStatus::Healthy
    }

    fn is_overstocked(
        quantities: &Quantities,
        metrics: &CoverageMetrics,
        target_stock: Decimal,
        policy: &PolicyConfig,
    ) -> bool {
        if target_stock <= Decimal::ZERO {
            return false;
        }

        let stock_ratio_exceeded = quantities
            .stock
            .checked_div(target_stock)
            .map_or(true, |ratio| ratio > policy.overstock_factor);

        stock_ratio_exceeded
            && metrics
                .days_of_stock
                .is_above(policy.target_coverage_days * policy.overstock_factor)
    }
}
