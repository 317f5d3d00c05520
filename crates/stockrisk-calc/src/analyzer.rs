//! 覆蓋分析主流程

use serde::Serialize;
use std::collections::HashSet;
use stockrisk_core::{PolicyConfig, SkuRecord};

use crate::abc::{AbcClassifier, AbcThresholds};
use crate::action_list::{ActionList, ActionOrdering};
use crate::aggregation::{AggregatedItem, Aggregator, GroupKey};
use crate::assessment::Assessment;
use crate::export::{CategorySummary, StatusSummary};
use crate::metrics::Quantities;
use crate::{AnalysisReport, AnalysisWarning};

/// 單一 SKU 的評估結果
#[derive(Debug, Clone, Serialize)]
pub struct AssessedSku<'a> {
    pub sku: &'a SkuRecord,
    pub assessment: Assessment,
}

impl<'a> AssessedSku<'a> {
    pub fn evaluate(sku: &'a SkuRecord, policy: &PolicyConfig) -> Self {
        Self {
            sku,
            assessment: Assessment::evaluate(Quantities::from_sku(sku, policy), policy),
        }
    }
}

/// 分析選項
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisOptions {
    /// 只分析當季系列
    pub current_collection_only: bool,
    /// 行動清單主排序
    pub ordering: ActionOrdering,
}

/// 覆蓋分析器
///
/// 純函數式：同一份 SKU 快照與策略永遠得到相同結果，不保留任何跨次狀態。
#[derive(Debug, Clone)]
pub struct CoverageAnalyzer {
    policy: PolicyConfig,
    options: AnalysisOptions,
    abc: AbcClassifier,
}

impl CoverageAnalyzer {
    /// 創建分析器（策略先驗證）
    pub fn new(policy: PolicyConfig) -> stockrisk_core::Result<Self> {
        policy.validate()?;
        Ok(Self {
            policy,
            options: AnalysisOptions::default(),
            abc: AbcClassifier::default(),
        })
    }

    /// 建構器模式：設置分析選項
    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    /// 建構器模式：設置 ABC 邊界
    pub fn with_abc_thresholds(mut self, thresholds: AbcThresholds) -> Self {
        self.abc = AbcClassifier::new(thresholds);
        self
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// 評估一組數量
    pub fn assess(&self, quantities: Quantities) -> Assessment {
        Assessment::evaluate(quantities, &self.policy)
    }

    /// SKU 層級分析
    pub fn analyze_skus<'a>(&self, skus: &'a [SkuRecord]) -> ActionList<AssessedSku<'a>> {
        let items = self
            .in_scope(skus)
            .map(|sku| AssessedSku::evaluate(sku, &self.policy))
            .collect();
        ActionList::build(items, self.options.ordering)
    }

    /// 彙總層級分析
    pub fn analyze_groups<'a, K>(
        &self,
        skus: &'a [SkuRecord],
        key: &K,
    ) -> ActionList<AggregatedItem<'a>>
    where
        K: GroupKey + ?Sized,
    {
        let groups = Aggregator::aggregate(self.in_scope(skus), key, &self.policy);
        ActionList::build(groups, self.options.ordering)
    }

    /// 完整分析：彙總、排序、ABC、統計
    pub fn run<'a, K>(&self, skus: &'a [SkuRecord], key: &K) -> AnalysisReport<'a>
    where
        K: GroupKey + ?Sized,
    {
        tracing::info!(
            "開始覆蓋分析（策略 {}）：SKU {} 筆",
            self.policy.name,
            skus.len()
        );

        let start_time = std::time::Instant::now();

        // Step 1: 資料檢查
        tracing::debug!("Step 1: 資料檢查");
        let warnings = self.inspect(skus);

        // Step 2: 彙總與評估
        tracing::debug!("Step 2: 彙總與評估");
        let items = self.analyze_groups(skus, key);
        tracing::debug!("彙總項目數量: {}", items.len());

        // Step 3: ABC 分類
        tracing::debug!("Step 3: ABC 分類");
        let abc = self.abc.classify(self.in_scope(skus));

        // Step 4: 統計
        tracing::debug!("Step 4: 統計");
        let status_summary = StatusSummary::from_items(items.all());
        let category_summary = CategorySummary::from_items(items.all());

        let report = AnalysisReport {
            policy_name: self.policy.name.clone(),
            items,
            abc,
            status_summary,
            category_summary,
            warnings,
            calculation_time_ms: Some(start_time.elapsed().as_millis()),
        };

        tracing::info!("覆蓋分析完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "需行動項目: {}，警告: {}",
            report.items.actionable().count(),
            report.warnings.len()
        );

        report
    }

    fn in_scope<'a>(&self, skus: &'a [SkuRecord]) -> impl Iterator<Item = &'a SkuRecord> + 'a {
        let current_only = self.options.current_collection_only;
        skus.iter()
            .filter(move |sku| !current_only || sku.is_current_collection)
    }

    fn inspect(&self, skus: &[SkuRecord]) -> Vec<AnalysisWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for sku in skus {
            if !seen.insert(sku.sku_id.as_str()) {
                warnings.push(AnalysisWarning::warning(
                    sku.sku_id.clone(),
                    "SKU 代碼重複，將分別計入彙總".to_string(),
                ));
            }

            for (field, value) in sku.negative_fields() {
                warnings.push(AnalysisWarning::warning(
                    sku.sku_id.clone(),
                    format!("欄位 {} 為負數（{}），以 0 計算", field, value),
                ));
            }

            if sku.price.is_none() && sku.sales_30d > rust_decimal::Decimal::ZERO {
                warnings.push(AnalysisWarning::info(
                    sku.sku_id.clone(),
                    "缺少單價，不計入平均單價與 ABC 排名".to_string(),
                ));
            }
        }

        if self.options.current_collection_only {
            let excluded = skus.iter().filter(|s| !s.is_current_collection).count();
            if excluded > 0 {
                tracing::debug!("排除非當季系列 SKU: {}", excluded);
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{ByName, BySku};
    use crate::WarningSeverity;
    use rust_decimal::Decimal;
    use stockrisk_core::{AbcCurve, RiskStatus};

    fn catalog() -> Vec<SkuRecord> {
        vec![
            SkuRecord::new("1", "Travesseiro")
                .with_variant("50x70")
                .with_product_type("Travesseiro")
                .with_collection("Verão", true)
                .with_stock(Decimal::ZERO)
                .with_sales_30d(Decimal::from(300))
                .with_price(Decimal::from(2)),
            SkuRecord::new("2", "Travesseiro")
                .with_variant("60x80")
                .with_product_type("Travesseiro")
                .with_collection("Verão", true)
                .with_stock(Decimal::ZERO)
                .with_sales_30d(Decimal::from(0)),
            SkuRecord::new("3", "Edredom")
                .with_product_type("Cama")
                .with_collection("Inverno", false)
                .with_stock(Decimal::from(1000))
                .with_price(Decimal::from(300)),
        ]
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let policy = PolicyConfig::collection().with_target_coverage_days(Decimal::ZERO);
        assert!(CoverageAnalyzer::new(policy).is_err());
    }

    #[test]
    fn test_run_groups_and_sorts() {
        let skus = catalog();
        let analyzer = CoverageAnalyzer::new(PolicyConfig::collection()).unwrap();

        let report = analyzer.run(&skus, &ByName);

        assert_eq!(report.policy_name, "collection");
        assert_eq!(report.items.len(), 2);
        let first = &report.items.all()[0];
        assert_eq!(first.group_key, "travesseiro");
        assert_eq!(first.assessment.status, RiskStatus::Critical);
        assert_eq!(report.items.all()[1].assessment.status, RiskStatus::NoSales);
        assert_eq!(report.abc.entries[0].rank, Some(1));
        assert_eq!(report.abc.curve_of("3"), Some(AbcCurve::NotApplicable));
        assert_eq!(report.status_summary.get(RiskStatus::Critical).item_count, 1);
        assert!(report.calculation_time_ms.is_some());
    }

    #[test]
    fn test_current_collection_only() {
        let skus = catalog();
        let analyzer = CoverageAnalyzer::new(PolicyConfig::collection())
            .unwrap()
            .with_options(AnalysisOptions {
                current_collection_only: true,
                ..Default::default()
            });

        let list = analyzer.analyze_skus(&skus);
        assert_eq!(list.len(), 2);
        assert!(list.all().iter().all(|item| item.sku.is_current_collection));
    }

    #[test]
    fn test_warnings() {
        let mut skus = catalog();
        skus.push(
            SkuRecord::new("1", "Duplicado")
                .with_sales_30d(Decimal::from(5))
                .with_price(Decimal::ONE),
        );
        let analyzer = CoverageAnalyzer::new(PolicyConfig::collection()).unwrap();

        let report = analyzer.run(&skus, &BySku);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.severity == WarningSeverity::Warning && w.sku_id == "1"));
        assert!(report.warnings.iter().all(|w| w.sku_id != "3"));
    }

    #[test]
    fn test_negative_stock_counts_as_empty() {
        let skus = vec![SkuRecord::new("9", "Lençol")
            .with_stock(Decimal::from(-50))
            .with_sales_30d(Decimal::from(300))
            .with_price(Decimal::from(10))];
        let analyzer = CoverageAnalyzer::new(PolicyConfig::collection()).unwrap();

        let report = analyzer.run(&skus, &BySku);
        let item = &report.items.all()[0];
        assert_eq!(item.total_stock, Decimal::ZERO);
        assert_eq!(item.assessment.status, RiskStatus::Critical);
        assert_eq!(item.assessment.replenishment_suggestion, Decimal::from(300));
        assert!(!item.assessment.justification.contains('-'));

        let flagged: Vec<_> = report
            .warnings
            .iter()
            .filter(|w| w.sku_id == "9" && w.severity == WarningSeverity::Warning)
            .collect();
        assert_eq!(flagged.len(), 1);
        assert!(flagged[0].message.contains("stock_total"));
    }

    #[test]
    fn test_run_is_idempotent() {
        let skus = catalog();
        let analyzer = CoverageAnalyzer::new(PolicyConfig::pillow()).unwrap();

        let first = analyzer.run(&skus, &ByName).export_rows();
        let second = analyzer.run(&skus, &ByName).export_rows();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_snapshot() {
        let analyzer = CoverageAnalyzer::new(PolicyConfig::collection()).unwrap();
        let report = analyzer.run(&[], &ByName);

        assert!(report.items.is_empty());
        assert!(report.abc.entries.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.status_summary.total_items(), 0);
    }
}
