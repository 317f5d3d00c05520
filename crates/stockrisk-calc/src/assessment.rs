//! 單一項目的完整評估（指標 → 補貨 → 風險 → 優先級）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockrisk_core::{Coverage, PolicyConfig, Priority, RiskStatus};

use crate::metrics::{CoverageMetrics, MetricsCalculator, Quantities};
use crate::priority::{PriorityEngine, PriorityReason};
use crate::replenishment::ReplenishmentSizer;
use crate::risk::RiskClassifier;

/// 評估結果（每次分析重新計算，不單獨保存）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub quantities: Quantities,
    pub metrics: CoverageMetrics,
    pub target_stock: Decimal,
    pub replenishment_suggestion: Decimal,
    pub status: RiskStatus,
    pub priority: Option<Priority>,
    pub priority_reason: PriorityReason,
    pub justification: String,
}

impl Assessment {
    /// 依策略評估一組數量
    pub fn evaluate(quantities: Quantities, policy: &PolicyConfig) -> Self {
        let metrics = MetricsCalculator::calculate(&quantities);
        let replenishment =
            ReplenishmentSizer::size(&quantities, metrics.daily_average_sales, policy);
        let status =
            RiskClassifier::classify(&quantities, &metrics, replenishment.target_stock, policy);
        let priority = PriorityEngine::evaluate(&quantities, &metrics, policy);

        Self {
            quantities,
            metrics,
            target_stock: replenishment.target_stock,
            replenishment_suggestion: replenishment.suggestion,
            status,
            priority: priority.priority,
            priority_reason: priority.reason,
            justification: priority.justification,
        }
    }

    pub fn daily_average_sales(&self) -> Decimal {
        self.metrics.daily_average_sales
    }

    pub fn days_of_stock(&self) -> Coverage {
        self.metrics.days_of_stock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_assessment_stockout() {
        let quantities = Quantities::new(Decimal::ZERO, Decimal::from(300), Decimal::ZERO);
        let assessment = Assessment::evaluate(quantities, &PolicyConfig::collection());

        assert_eq!(assessment.status, RiskStatus::Critical);
        assert_eq!(assessment.priority, Some(Priority::Immediate));
        assert_eq!(assessment.days_of_stock(), Coverage::ZERO);
        assert_eq!(assessment.target_stock, Decimal::from(300));
        assert_eq!(assessment.replenishment_suggestion, Decimal::from(300));
    }

    #[test]
    fn test_full_assessment_parked() {
        let quantities = Quantities::new(Decimal::from(1000), Decimal::ZERO, Decimal::ZERO);
        let assessment = Assessment::evaluate(quantities, &PolicyConfig::collection());

        assert_eq!(assessment.status, RiskStatus::NoSales);
        assert_eq!(assessment.priority, None);
        assert_eq!(assessment.priority_reason, PriorityReason::Parked);
        assert_eq!(assessment.replenishment_suggestion, Decimal::ZERO);
        assert!(assessment.days_of_stock().is_unbounded());
    }
}
