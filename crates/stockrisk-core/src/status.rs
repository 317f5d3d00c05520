//! 風險狀態、行動優先級與 ABC 曲線

use serde::{Deserialize, Serialize};
use std::fmt;

/// 庫存風險狀態
///
/// 每次分析重新計算，不保存狀態轉移。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskStatus {
    /// 斷貨或即將斷貨
    Critical,
    /// 高銷量且覆蓋不足
    Urgent,
    /// 覆蓋偏低
    Low,
    /// 庫存過剩
    Overstocked,
    /// 健康
    Healthy,
    /// 有庫存但無銷量
    NoSales,
    /// 無庫存也無銷量，無法分類
    NotApplicable,
}

impl RiskStatus {
    /// 所有狀態（依嚴重度排序）
    pub const ALL: [RiskStatus; 7] = [
        RiskStatus::Critical,
        RiskStatus::Urgent,
        RiskStatus::Low,
        RiskStatus::Overstocked,
        RiskStatus::Healthy,
        RiskStatus::NoSales,
        RiskStatus::NotApplicable,
    ];

    /// 嚴重度排名（0 最嚴重）
    pub fn severity_rank(&self) -> u8 {
        match self {
            RiskStatus::Critical => 0,
            RiskStatus::Urgent => 1,
            RiskStatus::Low => 2,
            RiskStatus::Overstocked => 3,
            RiskStatus::Healthy => 4,
            RiskStatus::NoSales => 5,
            RiskStatus::NotApplicable => 6,
        }
    }

    /// 是否需要補貨行動
    pub fn needs_replenishment(&self) -> bool {
        matches!(
            self,
            RiskStatus::Critical | RiskStatus::Urgent | RiskStatus::Low
        )
    }

    /// 顯示標籤
    pub fn label(&self) -> &'static str {
        match self {
            RiskStatus::Critical => "嚴重",
            RiskStatus::Urgent => "緊急",
            RiskStatus::Low => "偏低",
            RiskStatus::Healthy => "健康",
            RiskStatus::Overstocked => "過剩",
            RiskStatus::NoSales => "無銷量",
            RiskStatus::NotApplicable => "不適用",
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 行動優先級（1 最緊急，3 最不緊急）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Priority {
    /// 1：立即處理
    Immediate,
    /// 2：優先處理
    Elevated,
    /// 3：例行監控
    Routine,
}

impl Priority {
    pub fn level(&self) -> u8 {
        match self {
            Priority::Immediate => 1,
            Priority::Elevated => 2,
            Priority::Routine => 3,
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.level()
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::Immediate),
            2 => Ok(Priority::Elevated),
            3 => Ok(Priority::Routine),
            other => Err(format!("無效的優先級: {}", other)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// ABC 曲線（營收帕累托分類）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbcCurve {
    A,
    B,
    C,
    /// 營收為零，不參與排名
    NotApplicable,
}

impl AbcCurve {
    pub const ALL: [AbcCurve; 4] = [AbcCurve::A, AbcCurve::B, AbcCurve::C, AbcCurve::NotApplicable];

    pub fn label(&self) -> &'static str {
        match self {
            AbcCurve::A => "A",
            AbcCurve::B => "B",
            AbcCurve::C => "C",
            AbcCurve::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for AbcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_rank_order() {
        let ranks: Vec<u8> = RiskStatus::ALL.iter().map(|s| s.severity_rank()).collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
        assert_eq!(RiskStatus::Critical.severity_rank(), 0);
    }

    #[test]
    fn test_priority_level_roundtrip() {
        assert_eq!(Priority::Immediate.level(), 1);
        assert_eq!(Priority::try_from(3u8), Ok(Priority::Routine));
        assert!(Priority::try_from(4u8).is_err());
        assert!(Priority::Immediate < Priority::Routine);
    }

    #[test]
    fn test_needs_replenishment() {
        assert!(RiskStatus::Critical.needs_replenishment());
        assert!(RiskStatus::Low.needs_replenishment());
        assert!(!RiskStatus::NoSales.needs_replenishment());
        assert!(!RiskStatus::Overstocked.needs_replenishment());
    }
}
