//! 外部協作者的並行資料補充（例如商品分類）

use rayon::prelude::*;
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use stockrisk_core::{SkuRecord, StockRiskError};

use crate::export::UNCATEGORIZED;

/// 外部資料補充者
///
/// 每個 SKU 一個獨立工作單元，可能失敗；失敗不影響其他 SKU。
pub trait Enricher: Sync {
    type Output: Send;

    fn enrich(&self, sku: &SkuRecord) -> stockrisk_core::Result<Self::Output>;
}

/// 補充結果
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedSku<'a, T> {
    pub sku: &'a SkuRecord,
    pub value: Option<T>,
    /// 失敗原因（成功時為 None）
    pub error: Option<String>,
}

impl<T> EnrichedSku<'_, T> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// 並行補充所有 SKU
///
/// 結果順序與輸入相同；個別失敗只記錄，不中止整批。
/// 補充者 panic 時同樣記為該 SKU 的錯誤。以 `panic = "abort"` 編譯時無法攔截，
/// 整個行程會直接結束。
pub fn enrich_all<'a, E>(enricher: &E, skus: &'a [SkuRecord]) -> Vec<EnrichedSku<'a, E::Output>>
where
    E: Enricher + ?Sized,
{
    tracing::debug!("並行補充資料：{} 筆 SKU", skus.len());

    let results: Vec<EnrichedSku<'a, E::Output>> = skus
        .par_iter()
        .map(|sku| match enrich_one(enricher, sku) {
            Ok(value) => EnrichedSku {
                sku,
                value: Some(value),
                error: None,
            },
            Err(e) => {
                tracing::warn!("SKU {} 補充資料失敗: {}", sku.sku_id, e);
                EnrichedSku {
                    sku,
                    value: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    let failed = results.iter().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        tracing::info!("補充資料完成，失敗 {} / {}", failed, results.len());
    }

    results
}

fn enrich_one<E>(enricher: &E, sku: &SkuRecord) -> stockrisk_core::Result<E::Output>
where
    E: Enricher + ?Sized,
{
    panic::catch_unwind(AssertUnwindSafe(|| enricher.enrich(sku))).unwrap_or_else(|payload| {
        Err(StockRiskError::Enrichment {
            sku_id: sku.sku_id.clone(),
            message: format!("補充者 panic: {}", panic_message(payload.as_ref())),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("未知原因")
}

/// 以分類者補上商品類型
///
/// 分類失敗或回傳空白時，商品類型設為 "N/A"。
pub fn apply_categories<E>(categorizer: &E, skus: &[SkuRecord]) -> Vec<SkuRecord>
where
    E: Enricher<Output = String> + ?Sized,
{
    enrich_all(categorizer, skus)
        .into_iter()
        .map(|enriched| {
            let category = enriched
                .value
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| UNCATEGORIZED.to_string());

            let mut sku = enriched.sku.clone();
            sku.product_type = category;
            sku
        })
        .collect()
}
