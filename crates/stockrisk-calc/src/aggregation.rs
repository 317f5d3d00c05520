//! SKU 彙總（依分組鍵合併規格、顏色等變體）

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use stockrisk_core::{PolicyConfig, SkuRecord};

use crate::assessment::Assessment;
use crate::metrics::Quantities;

/// 分組鍵
///
/// 任何 `Fn(&SkuRecord) -> String` 都可作為分組鍵。
pub trait GroupKey {
    fn key(&self, sku: &SkuRecord) -> String;
}

impl<F> GroupKey for F
where
    F: Fn(&SkuRecord) -> String,
{
    fn key(&self, sku: &SkuRecord) -> String {
        self(sku)
    }
}

/// 依商品名稱分組
#[derive(Debug, Clone, Copy, Default)]
pub struct ByName;

impl GroupKey for ByName {
    fn key(&self, sku: &SkuRecord) -> String {
        normalize_key(&sku.name)
    }
}

/// 依商品名稱 + 規格分組
#[derive(Debug, Clone, Copy, Default)]
pub struct ByNameAndVariant;

impl GroupKey for ByNameAndVariant {
    fn key(&self, sku: &SkuRecord) -> String {
        format!("{}|{}", normalize_key(&sku.name), normalize_key(&sku.variant_key))
    }
}

/// 依商品類型分組
#[derive(Debug, Clone, Copy, Default)]
pub struct ByProductType;

impl GroupKey for ByProductType {
    fn key(&self, sku: &SkuRecord) -> String {
        normalize_key(&sku.product_type)
    }
}

/// 依系列分組
#[derive(Debug, Clone, Copy, Default)]
pub struct ByCollection;

impl GroupKey for ByCollection {
    fn key(&self, sku: &SkuRecord) -> String {
        normalize_key(&sku.collection_name)
    }
}

/// 不合併，每個 SKU 自成一組
#[derive(Debug, Clone, Copy, Default)]
pub struct BySku;

impl GroupKey for BySku {
    fn key(&self, sku: &SkuRecord) -> String {
        sku.sku_id.trim().to_string()
    }
}

/// 正規化分組鍵：去除首尾空白、轉小寫、合併連續空白
pub fn normalize_key(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 彙總項目
///
/// 每次分析由當下的 SKU 快照重新建立，只借用 SKU 記錄。
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedItem<'a> {
    pub group_key: String,
    /// 顯示名稱（第一個 SKU 的名稱）
    pub name: String,
    pub product_type: String,
    pub skus: Vec<&'a SkuRecord>,
    pub total_stock: Decimal,
    pub total_sales_30d: Decimal,
    pub total_open_orders: Decimal,
    /// 有單價 SKU 的平均單價
    pub avg_price: Option<Decimal>,
    pub assessment: Assessment,
}

impl AggregatedItem<'_> {
    pub fn sku_count(&self) -> usize {
        self.skus.len()
    }

    pub fn variants(&self) -> Vec<&str> {
        self.skus.iter().map(|sku| sku.variant_key.as_str()).collect()
    }
}

#[derive(Default)]
struct GroupAccumulator<'a> {
    skus: Vec<&'a SkuRecord>,
    stock: Decimal,
    sales_30d: Decimal,
    open_orders: Decimal,
    price_sum: Decimal,
    priced_count: u32,
}

/// 彙總器
pub struct Aggregator;

impl Aggregator {
    /// 依分組鍵彙總 SKU，並在彙總層級重新計算所有指標
    ///
    /// 每個 SKU 恰好屬於一個彙總項目；輸出順序為各組第一次出現的順序。
    pub fn aggregate<'a, I, K>(skus: I, key: &K, policy: &PolicyConfig) -> Vec<AggregatedItem<'a>>
    where
        I: IntoIterator<Item = &'a SkuRecord>,
        K: GroupKey + ?Sized,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<(String, GroupAccumulator<'a>)> = Vec::new();

        for sku in skus {
            let group_key = key.key(sku);
            let slot = *index.entry(group_key.clone()).or_insert_with(|| {
                groups.push((group_key, GroupAccumulator::default()));
                groups.len() - 1
            });

            let acc = &mut groups[slot].1;
            let quantities = Quantities::from_sku(sku, policy);
            acc.stock += quantities.stock;
            acc.sales_30d += quantities.sales_30d;
            acc.open_orders += quantities.open_orders;
            if let Some(price) = sku.price {
                acc.price_sum += price;
                acc.priced_count += 1;
            }
            acc.skus.push(sku);
        }

        tracing::debug!("彙總完成：{} 組", groups.len());

        groups
            .into_iter()
            .map(|(group_key, acc)| Self::finish(group_key, acc, policy))
            .collect()
    }

    fn finish<'a>(
        group_key: String,
        acc: GroupAccumulator<'a>,
        policy: &PolicyConfig,
    ) -> AggregatedItem<'a> {
        let quantities = Quantities::new(acc.stock, acc.sales_30d, acc.open_orders);
        let avg_price = (acc.priced_count > 0)
            .then(|| acc.price_sum / Decimal::from(acc.priced_count));

        let name = acc
            .skus
            .first()
            .map(|sku| sku.name.clone())
            .unwrap_or_default();
        let product_type = acc
            .skus
            .iter()
            .map(|sku| sku.product_type.as_str())
            .find(|t| !t.is_empty())
            .unwrap_or_default()
            .to_string();

        AggregatedItem {
            group_key,
            name,
            product_type,
            skus: acc.skus,
            total_stock: quantities.stock,
            total_sales_30d: quantities.sales_30d,
            total_open_orders: quantities.open_orders,
            avg_price,
            assessment: Assessment::evaluate(quantities, policy),
        }
    }
}
