//! 表格匯出與統計

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use stockrisk_core::{Coverage, Priority, RiskStatus};

use crate::action_list::ActionItem;

/// 無商品類型時的顯示值
pub const UNCATEGORIZED: &str = "N/A";

/// 匯出列（扁平結構）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub key: String,
    pub name: String,
    pub product_type: String,
    pub sku_count: usize,
    pub stock: Decimal,
    pub sales_30d: Decimal,
    pub open_orders: Decimal,
    /// 日均銷量（兩位小數）
    pub daily_average_sales: Decimal,
    /// 覆蓋天數（一位小數，None 表示無限）
    pub days_of_stock: Option<Decimal>,
    /// 含在途覆蓋天數（一位小數，None 表示無限）
    pub effective_coverage: Option<Decimal>,
    pub target_stock: Decimal,
    pub replenishment_suggestion: Decimal,
    pub status: RiskStatus,
    pub status_label: String,
    pub priority: Option<Priority>,
    pub justification: String,
}

impl ExportRow {
    pub fn from_item<T: ActionItem + ?Sized>(item: &T) -> Self {
        let assessment = item.assessment();
        let quantities = &assessment.quantities;

        Self {
            key: item.key().to_string(),
            name: item.display_name().to_string(),
            product_type: category_of(item.product_type()).to_string(),
            sku_count: item.sku_count(),
            stock: quantities.stock,
            sales_30d: quantities.sales_30d,
            open_orders: quantities.open_orders,
            daily_average_sales: assessment.daily_average_sales().round_dp(2),
            days_of_stock: rounded_days(assessment.metrics.days_of_stock),
            effective_coverage: rounded_days(assessment.metrics.effective_coverage),
            target_stock: assessment.target_stock.round_dp(2),
            replenishment_suggestion: assessment.replenishment_suggestion,
            status: assessment.status,
            status_label: assessment.status.label().to_string(),
            priority: assessment.priority,
            justification: assessment.justification.clone(),
        }
    }

    pub fn from_items<T: ActionItem>(items: &[T]) -> Vec<Self> {
        items.iter().map(Self::from_item).collect()
    }
}

fn rounded_days(coverage: Coverage) -> Option<Decimal> {
    coverage.days().map(|days| days.round_dp(1))
}

fn category_of(product_type: &str) -> &str {
    let trimmed = product_type.trim();
    if trimmed.is_empty() {
        UNCATEGORIZED
    } else {
        trimmed
    }
}

/// 統計桶
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryBucket {
    pub item_count: usize,
    pub stock: Decimal,
    pub sales_30d: Decimal,
    pub replenishment: Decimal,
}

impl SummaryBucket {
    fn add<T: ActionItem + ?Sized>(&mut self, item: &T) {
        let assessment = item.assessment();
        self.item_count += 1;
        self.stock += assessment.quantities.stock;
        self.sales_30d += assessment.quantities.sales_30d;
        self.replenishment += assessment.replenishment_suggestion;
    }
}

/// 依風險狀態統計
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusSummary {
    pub buckets: BTreeMap<RiskStatus, SummaryBucket>,
}

impl StatusSummary {
    pub fn from_items<T: ActionItem>(items: &[T]) -> Self {
        let mut buckets: BTreeMap<RiskStatus, SummaryBucket> = BTreeMap::new();
        for item in items {
            buckets
                .entry(item.assessment().status)
                .or_default()
                .add(item);
        }
        Self { buckets }
    }

    /// 指定狀態的統計（無項目時為零）
    pub fn get(&self, status: RiskStatus) -> SummaryBucket {
        self.buckets.get(&status).cloned().unwrap_or_default()
    }

    pub fn total_items(&self) -> usize {
        self.buckets.values().map(|b| b.item_count).sum()
    }

    /// 全部狀態的補貨建議合計
    pub fn total_replenishment(&self) -> Decimal {
        self.buckets.values().map(|b| b.replenishment).sum()
    }
}

/// 單一商品類型的統計
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryBucket {
    pub totals: SummaryBucket,
    pub by_status: BTreeMap<RiskStatus, usize>,
}

/// 依商品類型統計
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategorySummary {
    pub categories: BTreeMap<String, CategoryBucket>,
}

impl CategorySummary {
    pub fn from_items<T: ActionItem>(items: &[T]) -> Self {
        let mut categories: BTreeMap<String, CategoryBucket> = BTreeMap::new();
        for item in items {
            let bucket = categories
                .entry(category_of(item.product_type()).to_string())
                .or_default();
            bucket.totals.add(item);
            *bucket
                .by_status
                .entry(item.assessment().status)
                .or_insert(0) += 1;
        }
        Self { categories }
    }

    pub fn get(&self, product_type: &str) -> Option<&CategoryBucket> {
        self.categories.get(category_of(product_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AssessedSku;
    use stockrisk_core::{PolicyConfig, SkuRecord};

    fn skus() -> Vec<SkuRecord> {
        vec![
            SkuRecord::new("1", "Travesseiro")
                .with_product_type("Travesseiro")
                .with_sales_30d(Decimal::from(300)),
            SkuRecord::new("2", "Fronha")
                .with_product_type("Travesseiro")
                .with_stock(Decimal::from(40))
                .with_sales_30d(Decimal::from(90)),
            SkuRecord::new("3", "Manta").with_stock(Decimal::from(7)),
        ]
    }

    fn assessed(skus: &[SkuRecord]) -> Vec<AssessedSku<'_>> {
        let policy = PolicyConfig::collection();
        skus.iter().map(|s| AssessedSku::evaluate(s, &policy)).collect()
    }

    #[test]
    fn test_export_row_fields() {
        let skus = skus();
        let rows = ExportRow::from_items(&assessed(&skus));

        let low = &rows[1];
        assert_eq!(low.key, "2");
        assert_eq!(low.daily_average_sales, Decimal::from(3));
        assert_eq!(low.days_of_stock, Some(Decimal::new(133, 1)));
        assert_eq!(low.status, RiskStatus::Low);
        assert_eq!(low.replenishment_suggestion, Decimal::from(50));
        assert_eq!(low.sku_count, 1);

        let parked = &rows[2];
        assert_eq!(parked.days_of_stock, None);
        assert_eq!(parked.product_type, UNCATEGORIZED);
        assert_eq!(parked.priority, None);
    }

    #[test]
    fn test_export_row_serializes() {
        let skus = skus();
        let rows = ExportRow::from_items(&assessed(&skus));
        let json = serde_json::to_value(&rows[0]).unwrap();

        assert_eq!(json["status"], "Critical");
        assert_eq!(json["priority"], 1);
    }

    #[test]
    fn test_status_summary() {
        let skus = skus();
        let summary = StatusSummary::from_items(&assessed(&skus));

        assert_eq!(summary.total_items(), 3);
        let critical = summary.get(RiskStatus::Critical);
        assert_eq!(critical.item_count, 1);
        assert_eq!(critical.sales_30d, Decimal::from(300));
        assert_eq!(critical.replenishment, Decimal::from(300));
        assert_eq!(summary.get(RiskStatus::Overstocked), SummaryBucket::default());
        assert_eq!(summary.total_replenishment(), Decimal::from(350));
    }

    #[test]
    fn test_category_summary() {
        let skus = skus();
        let summary = CategorySummary::from_items(&assessed(&skus));

        let pillows = summary.get("Travesseiro").unwrap();
        assert_eq!(pillows.totals.item_count, 2);
        assert_eq!(pillows.by_status.get(&RiskStatus::Low), Some(&1));
        assert_eq!(summary.get("").map(|b| b.totals.item_count), Some(1));
    }
}
