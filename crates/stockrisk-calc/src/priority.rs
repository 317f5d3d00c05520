//! 行動優先級與說明文字

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockrisk_core::{PolicyConfig, Priority};

use crate::metrics::{CoverageMetrics, MetricsCalculator, Quantities};

/// 優先級判定分支
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityReason {
    /// 庫存為零或不足一天，在途也補不上
    StockoutImminent,
    /// 庫存不足一天，但在途訂單撐過短覆蓋門檻
    InsufficientButImproving,
    /// 含在途仍低於偏低門檻
    BelowLowThreshold,
    /// 現有庫存偏低，但在途訂單補足
    StabilizedByOpenOrders,
    /// 覆蓋穩定
    Stable,
    /// 無需求、有庫存（閒置）
    Parked,
    /// 無需求、無庫存
    Idle,
}

impl PriorityReason {
    /// 對應的優先級（無需求項目沒有優先級）
    pub fn priority(&self) -> Option<Priority> {
        match self {
            PriorityReason::StockoutImminent => Some(Priority::Immediate),
            PriorityReason::InsufficientButImproving | PriorityReason::BelowLowThreshold => {
                Some(Priority::Elevated)
            }
            PriorityReason::StabilizedByOpenOrders | PriorityReason::Stable => {
                Some(Priority::Routine)
            }
            PriorityReason::Parked | PriorityReason::Idle => None,
        }
    }
}

/// 優先級判定結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityAssessment {
    pub priority: Option<Priority>,
    pub reason: PriorityReason,
    /// 依分支模板產生的說明
    pub justification: String,
}

/// 優先級引擎
pub struct PriorityEngine;

impl PriorityEngine {
    /// 判定優先級並產生說明
    pub fn evaluate(
        quantities: &Quantities,
        metrics: &CoverageMetrics,
        policy: &PolicyConfig,
    ) -> PriorityAssessment {
        let reason = Self::reason(quantities, metrics, policy);

        PriorityAssessment {
            priority: reason.priority(),
            reason,
            justification: Self::justify(reason, quantities, metrics, policy),
        }
    }

    fn reason(
        quantities: &Quantities,
        metrics: &CoverageMetrics,
        policy: &PolicyConfig,
    ) -> PriorityReason {
        if !MetricsCalculator::has_measurable_demand(metrics.daily_average_sales, policy) {
            return if quantities.stock > Decimal::ZERO {
                PriorityReason::Parked
            } else {
                PriorityReason::Idle
            };
        }

        let under_one_day =
            quantities.stock.is_zero() || metrics.days_of_stock.is_below(Decimal::ONE);

        if under_one_day && metrics.daily_average_sales >= policy.priority_min_daily_sales {
            return if metrics
                .effective_coverage
                .is_above(policy.priority_short_coverage_days)
            {
                PriorityReason::InsufficientButImproving
            } else {
                PriorityReason::StockoutImminent
            };
        }

        if metrics.effective_coverage.is_below(policy.low_days_threshold) {
            PriorityReason::BelowLowThreshold
        } else if metrics.days_of_stock.is_below(policy.low_days_threshold) {
            PriorityReason::StabilizedByOpenOrders
        } else {
            PriorityReason::Stable
        }
    }

    /// 各分支固定模板：日均銷量、覆蓋天數、在途數量、含在途覆蓋
    fn justify(
        reason: PriorityReason,
        quantities: &Quantities,
        metrics: &CoverageMetrics,
        policy: &PolicyConfig,
    ) -> String {
        let velocity = metrics.daily_average_sales.round_dp(2).normalize();
        let days = metrics.days_of_stock;
        let open = quantities.open_orders.normalize();
        let effective = metrics.effective_coverage;

        match reason {
            PriorityReason::StockoutImminent => format!(
                "日均銷量 {}，覆蓋僅 {} 天，在途 {} 件，含在途 {} 天，須立即補貨",
                velocity, days, open, effective
            ),
            PriorityReason::InsufficientButImproving => format!(
                "日均銷量 {}，覆蓋僅 {} 天，在途 {} 件可撐至 {} 天，不足但改善中",
                velocity, days, open, effective
            ),
            PriorityReason::BelowLowThreshold => format!(
                "日均銷量 {}，覆蓋 {} 天，在途 {} 件，含在途 {} 天仍低於 {} 天門檻",
                velocity,
                days,
                open,
                effective,
                policy.low_days_threshold.normalize()
            ),
            PriorityReason::StabilizedByOpenOrders => format!(
                "日均銷量 {}，覆蓋 {} 天，在途 {} 件補足至 {} 天，已穩定",
                velocity, days, open, effective
            ),
            PriorityReason::Stable => format!(
                "日均銷量 {}，覆蓋 {} 天，在途 {} 件，含在途 {} 天，覆蓋穩定",
                velocity, days, open, effective
            ),
            PriorityReason::Parked => format!(
                "無有效銷量，庫存 {} 件閒置，在途 {} 件",
                quantities.stock.normalize(),
                open
            ),
            PriorityReason::Idle => format!("無有效銷量也無庫存，在途 {} 件", open),
        }
    }
}
