//! 覆蓋天數模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// 覆蓋天數（庫存可支撐的天數）
///
/// 有庫存但無可量測需求時為 `Unbounded`，排序時永遠在所有有限值之後。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coverage {
    /// 有限天數
    Days(Decimal),
    /// 無限（有庫存、無銷量）
    Unbounded,
}

impl Coverage {
    pub const ZERO: Coverage = Coverage::Days(Decimal::ZERO);

    /// 由數量與窗口期銷量計算覆蓋天數
    ///
    /// 以 `數量 × 窗口天數 ÷ 窗口銷量` 單次除法計算，不經過已捨入的日均銷量，
    /// 剛好落在門檻上的覆蓋不會因捨入偏離門檻。
    /// 銷量為零時不做除法：有數量則為 `Unbounded`，否則為零。
    pub fn from_sales(quantity: Decimal, window_sales: Decimal, window_days: u32) -> Self {
        if window_sales > Decimal::ZERO {
            quantity
                .checked_mul(Decimal::from(window_days))
                .and_then(|scaled| scaled.checked_div(window_sales))
                .map(Coverage::Days)
                .unwrap_or(Coverage::Unbounded)
        } else if quantity > Decimal::ZERO {
            Coverage::Unbounded
        } else {
            Coverage::ZERO
        }
    }

    /// 有限天數（無限時為 None）
    pub fn days(&self) -> Option<Decimal> {
        match self {
            Coverage::Days(days) => Some(*days),
            Coverage::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Coverage::Unbounded)
    }

    /// 嚴格小於門檻（無限永遠不小於）
    pub fn is_below(&self, threshold: Decimal) -> bool {
        match self {
            Coverage::Days(days) => *days < threshold,
            Coverage::Unbounded => false,
        }
    }

    /// 嚴格大於門檻（無限永遠大於）
    pub fn is_above(&self, threshold: Decimal) -> bool {
        match self {
            Coverage::Days(days) => *days > threshold,
            Coverage::Unbounded => true,
        }
    }
}

impl Default for Coverage {
    fn default() -> Self {
        Coverage::ZERO
    }
}

impl Ord for Coverage {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Coverage::Days(a), Coverage::Days(b)) => a.cmp(b),
            (Coverage::Days(_), Coverage::Unbounded) => Ordering::Less,
            (Coverage::Unbounded, Coverage::Days(_)) => Ordering::Greater,
            (Coverage::Unbounded, Coverage::Unbounded) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Coverage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coverage::Days(days) => write!(f, "{}", days.round_dp(1).normalize()),
            Coverage::Unbounded => write!(f, "∞"),
        }
    }
}
