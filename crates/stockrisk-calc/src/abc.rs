//! ABC 曲線分類（營收帕累托）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockrisk_core::{AbcCurve, SkuRecord};

/// ABC 邊界（累計營收百分比，含邊界）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbcThresholds {
    /// 累計 ≤ 此值為 A
    pub a_max_percent: Decimal,
    /// 累計 ≤ 此值為 B，其餘為 C
    pub b_max_percent: Decimal,
}

impl Default for AbcThresholds {
    fn default() -> Self {
        Self {
            a_max_percent: Decimal::from(80),
            b_max_percent: Decimal::from(95),
        }
    }
}

/// 單一 SKU 的 ABC 分類
#[derive(Debug, Clone, Serialize)]
pub struct AbcEntry<'a> {
    pub sku: &'a SkuRecord,
    pub revenue_30d: Decimal,
    /// 排名（從 1 開始，未參與排名為 None）
    pub rank: Option<usize>,
    /// 含本項的累計營收百分比
    pub cumulative_percent: Option<Decimal>,
    pub curve: AbcCurve,
}

/// 各曲線統計
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcBucket {
    pub curve: AbcCurve,
    pub sku_count: usize,
    /// SKU 數量佔比（%）
    pub sku_percent: Decimal,
    pub revenue: Decimal,
    /// 營收佔比（%）
    pub revenue_percent: Decimal,
}

/// ABC 分類結果
#[derive(Debug, Clone, Serialize)]
pub struct AbcReport<'a> {
    /// 先依營收排名的項目，再接不適用項目（保持輸入順序）
    pub entries: Vec<AbcEntry<'a>>,
    pub total_revenue: Decimal,
    pub buckets: Vec<AbcBucket>,
}

impl<'a> AbcReport<'a> {
    pub fn curve_of(&self, sku_id: &str) -> Option<AbcCurve> {
        self.entries
            .iter()
            .find(|entry| entry.sku.sku_id == sku_id)
            .map(|entry| entry.curve)
    }

    pub fn bucket(&self, curve: AbcCurve) -> Option<&AbcBucket> {
        self.buckets.iter().find(|bucket| bucket.curve == curve)
    }
}

/// ABC 分類器
#[derive(Debug, Clone, Default)]
pub struct AbcClassifier {
    thresholds: AbcThresholds,
}

impl AbcClassifier {
    pub fn new(thresholds: AbcThresholds) -> Self {
        Self { thresholds }
    }

    /// 分類 SKU
    ///
    /// 營收 ≤ 0 的 SKU 不參與排名；同營收保持輸入順序（穩定排序）。
    pub fn classify<'a, I>(&self, skus: I) -> AbcReport<'a>
    where
        I: IntoIterator<Item = &'a SkuRecord>,
    {
        let (mut ranked, unranked): (Vec<_>, Vec<_>) = skus
            .into_iter()
            .map(|sku| (sku, sku.revenue_30d()))
            .partition(|(_, revenue)| *revenue > Decimal::ZERO);

        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let total_revenue: Decimal = ranked.iter().map(|(_, revenue)| *revenue).sum();
        let mut entries = Vec::with_capacity(ranked.len() + unranked.len());
        let mut cumulative = Decimal::ZERO;

        for (position, (sku, revenue)) in ranked.into_iter().enumerate() {
            cumulative += revenue;
            let percent = cumulative / total_revenue * Decimal::ONE_HUNDRED;

            entries.push(AbcEntry {
                sku,
                revenue_30d: revenue,
                rank: Some(position + 1),
                cumulative_percent: Some(percent),
                curve: self.curve_for(percent),
            });
        }

        entries.extend(unranked.into_iter().map(|(sku, revenue)| AbcEntry {
            sku,
            revenue_30d: revenue,
            rank: None,
            cumulative_percent: None,
            curve: AbcCurve::NotApplicable,
        }));

        let buckets = Self::summarize(&entries, total_revenue);

        AbcReport {
            entries,
            total_revenue,
            buckets,
        }
    }

    fn curve_for(&self, cumulative_percent: Decimal) -> AbcCurve {
        if cumulative_percent <= self.thresholds.a_max_percent {
            AbcCurve::A
        } else if cumulative_percent <= self.thresholds.b_max_percent {
            AbcCurve::B
        } else {
            AbcCurve::C
        }
    }

    fn summarize(entries: &[AbcEntry<'_>], total_revenue: Decimal) -> Vec<AbcBucket> {
        if entries.is_empty() {
            return Vec::new();
        }

        let total_count = Decimal::from(entries.len());

        AbcCurve::ALL
            .iter()
            .map(|&curve| {
                let members = entries.iter().filter(|entry| entry.curve == curve);
                let (sku_count, revenue) = members.fold((0usize, Decimal::ZERO), |(n, r), e| {
                    (n + 1, r + e.revenue_30d.max(Decimal::ZERO))
                });

                let revenue_percent = if total_revenue > Decimal::ZERO {
                    revenue / total_revenue * Decimal::ONE_HUNDRED
                } else {
                    Decimal::ZERO
                };

                AbcBucket {
                    curve,
                    sku_count,
                    sku_percent: Decimal::from(sku_count) / total_count * Decimal::ONE_HUNDRED,
                    revenue,
                    revenue_percent,
                }
            })
            .collect()
    }
}
