//! 行動清單排序與截取

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use stockrisk_core::{Priority, RiskStatus};

use crate::aggregation::AggregatedItem;
use crate::analyzer::AssessedSku;
use crate::assessment::Assessment;

/// 可排入行動清單的項目
pub trait ActionItem {
    /// 識別鍵（SKU 代碼或分組鍵）
    fn key(&self) -> &str;
    fn display_name(&self) -> &str;
    fn product_type(&self) -> &str;
    fn assessment(&self) -> &Assessment;

    /// 涵蓋的 SKU 數量
    fn sku_count(&self) -> usize {
        1
    }
}

impl ActionItem for AggregatedItem<'_> {
    fn key(&self) -> &str {
        &self.group_key
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn product_type(&self) -> &str {
        &self.product_type
    }

    fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    fn sku_count(&self) -> usize {
        self.skus.len()
    }
}

impl ActionItem for AssessedSku<'_> {
    fn key(&self) -> &str {
        &self.sku.sku_id
    }

    fn display_name(&self) -> &str {
        &self.sku.name
    }

    fn product_type(&self) -> &str {
        &self.sku.product_type
    }

    fn assessment(&self) -> &Assessment {
        &self.assessment
    }
}

/// 主排序依據
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActionOrdering {
    /// 依風險狀態嚴重度
    #[default]
    Status,
    /// 依優先級（無優先級排最後），同級再依狀態
    Priority,
}

/// 已完整排序的行動清單
///
/// 排序：嚴重度 → 日均銷量（高到低）→ 覆蓋天數（低到高，無限永遠最後）。
/// 截取只在完整排序後進行。
#[derive(Debug, Clone, Serialize)]
pub struct ActionList<T> {
    items: Vec<T>,
}

impl<T: ActionItem> ActionList<T> {
    /// 建立並排序（穩定排序，完全相同的項目保持輸入順序）
    pub fn build(mut items: Vec<T>, ordering: ActionOrdering) -> Self {
        items.sort_by(|a, b| Self::compare(a.assessment(), b.assessment(), ordering));
        Self { items }
    }

    fn compare(a: &Assessment, b: &Assessment, ordering: ActionOrdering) -> Ordering {
        let primary = match ordering {
            ActionOrdering::Status => a.status.severity_rank().cmp(&b.status.severity_rank()),
            ActionOrdering::Priority => priority_rank(a.priority)
                .cmp(&priority_rank(b.priority))
                .then_with(|| a.status.severity_rank().cmp(&b.status.severity_rank())),
        };

        primary
            .then_with(|| b.daily_average_sales().cmp(&a.daily_average_sales()))
            .then_with(|| a.days_of_stock().cmp(&b.days_of_stock()))
    }

    /// 完整排序清單
    pub fn all(&self) -> &[T] {
        &self.items
    }

    /// 前 N 項
    pub fn top(&self, limit: usize) -> &[T] {
        &self.items[..limit.min(self.items.len())]
    }

    /// 需要補貨行動的項目（嚴重、緊急、偏低）
    pub fn actionable(&self) -> impl Iterator<Item = &T> {
        self.items
            .iter()
            .filter(|item| item.assessment().status.needs_replenishment())
    }

    /// 指定狀態的項目
    pub fn with_status(&self, status: RiskStatus) -> impl Iterator<Item = &T> {
        self.items
            .iter()
            .filter(move |item| item.assessment().status == status)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn priority_rank(priority: Option<Priority>) -> u8 {
    priority.map_or(u8::MAX, |p| p.level())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use stockrisk_core::{PolicyConfig, SkuRecord};

    fn skus() -> Vec<SkuRecord> {
        vec![
            SkuRecord::new("healthy", "A")
                .with_stock(Decimal::from(300))
                .with_sales_30d(Decimal::from(300)),
            SkuRecord::new("parked", "B").with_stock(Decimal::from(1000)),
            SkuRecord::new("critical-slow", "C").with_sales_30d(Decimal::from(60)),
            SkuRecord::new("critical-fast", "D").with_sales_30d(Decimal::from(600)),
            SkuRecord::new("low", "E")
                .with_stock(Decimal::from(40))
                .with_sales_30d(Decimal::from(90)),
        ]
    }

    fn assessed(skus: &[SkuRecord]) -> Vec<AssessedSku<'_>> {
        let policy = PolicyConfig::collection();
        skus.iter().map(|sku| AssessedSku::evaluate(sku, &policy)).collect()
    }

    fn keys<T: ActionItem>(items: &[T]) -> Vec<&str> {
        items.iter().map(|item| item.key()).collect()
    }

    #[test]
    fn test_sorted_by_severity_then_demand() {
        let skus = skus();
        let list = ActionList::build(assessed(&skus), ActionOrdering::Status);

        assert_eq!(
            keys(list.all()),
            vec!["critical-fast", "critical-slow", "low", "healthy", "parked"]
        );
    }

    #[test]
    fn test_coverage_ascending_with_unbounded_last() {
        let skus = vec![
            SkuRecord::new("parked-big", "A").with_stock(Decimal::from(5000)),
            SkuRecord::new("parked-small", "B").with_stock(Decimal::from(10)),
            SkuRecord::new("healthy-long", "C")
                .with_stock(Decimal::from(500))
                .with_sales_30d(Decimal::from(300)),
            SkuRecord::new("healthy-short", "D")
                .with_stock(Decimal::from(200))
                .with_sales_30d(Decimal::from(300)),
        ];
        let policy = PolicyConfig::collection().with_high_sales_threshold(Decimal::from(1000));
        let items: Vec<_> = skus.iter().map(|s| AssessedSku::evaluate(s, &policy)).collect();

        let list = ActionList::build(items, ActionOrdering::Status);
        assert_eq!(
            keys(list.all()),
            vec!["healthy-short", "healthy-long", "parked-big", "parked-small"]
        );
        assert!(list.all()[3].assessment.days_of_stock().is_unbounded());
    }

    #[test]
    fn test_priority_ordering_puts_unprioritized_last() {
        let skus = skus();
        let list = ActionList::build(assessed(&skus), ActionOrdering::Priority);
        let last = list.all().last().unwrap();

        assert_eq!(last.sku.sku_id, "parked");
        assert_eq!(list.all()[0].assessment.priority, Some(Priority::Immediate));
    }

    #[test]
    fn test_truncation_on_sorted_list() {
        let skus = skus();
        let list = ActionList::build(assessed(&skus), ActionOrdering::Status);

        assert_eq!(keys(list.top(2)), vec!["critical-fast", "critical-slow"]);
        assert_eq!(list.top(50).len(), 5);
        assert!(list.top(0).is_empty());
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn test_actionable_filter() {
        let skus = skus();
        let list = ActionList::build(assessed(&skus), ActionOrdering::Status);

        let actionable: Vec<&str> = list.actionable().map(|item| item.key()).collect();
        assert_eq!(actionable, vec!["critical-fast", "critical-slow", "low"]);
        assert_eq!(list.with_status(RiskStatus::NoSales).count(), 1);
    }

    #[test]
    fn test_empty_list() {
        let list: ActionList<AssessedSku<'_>> = ActionList::build(Vec::new(), ActionOrdering::Status);
        assert!(list.is_empty());
        assert!(list.top(5).is_empty());
    }
}
