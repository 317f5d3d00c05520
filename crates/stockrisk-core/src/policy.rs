//! 風險策略配置模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Result, StockRiskError};

/// 覆蓋計算所依據的庫存池
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StockBasis {
    /// 總庫存（預設）
    #[default]
    Total,
    /// 僅可立即出貨庫存
    ReadyToShip,
    /// 可立即出貨 + 調節庫存
    ReadyToShipPlusRegulator,
}

/// 風險策略配置
///
/// 每個分析情境（系列、枕頭、白色家電…）各帶一份，不可變；
/// 分類器只讀取這裡的門檻，不使用任何內嵌常數。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// 策略名稱
    pub name: String,

    /// 目標覆蓋天數（補貨目標）
    pub target_coverage_days: Decimal,

    /// 嚴重門檻（天）
    pub critical_days_threshold: Decimal,

    /// 緊急門檻（天）
    pub urgent_days_threshold: Decimal,

    /// 偏低門檻（天）
    pub low_days_threshold: Decimal,

    /// 最小有效日均銷量（低於此值視為無需求）
    pub min_significant_daily_sales: Decimal,

    /// 過剩倍數（庫存 / 目標庫存 超過此值視為過剩）
    pub overstock_factor: Decimal,

    /// 高銷量門檻（30 天銷量超過此值時由偏低升級為緊急）
    pub high_sales_threshold: Decimal,

    /// 嚴重判定是否考慮在途訂單
    /// - true: 庫存為零且無在途才算嚴重；覆蓋不足時需含在途覆蓋也不足
    /// - false: 只看現有庫存
    pub open_orders_in_critical_check: bool,

    /// 覆蓋計算依據的庫存池
    pub stock_basis: StockBasis,

    /// 優先級 1 的短覆蓋門檻（含在途，天）
    pub priority_short_coverage_days: Decimal,

    /// 優先級 1 的最小日均銷量
    pub priority_min_daily_sales: Decimal,
}

impl PolicyConfig {
    /// 系列（collection）視圖策略
    pub fn collection() -> Self {
        Self {
            name: "collection".to_string(),
            target_coverage_days: Decimal::from(30),
            critical_days_threshold: Decimal::from(5),
            urgent_days_threshold: Decimal::from(10),
            low_days_threshold: Decimal::from(15),
            min_significant_daily_sales: Decimal::new(3, 2),
            overstock_factor: Decimal::from(2),
            high_sales_threshold: Decimal::from(100),
            open_orders_in_critical_check: true,
            stock_basis: StockBasis::Total,
            priority_short_coverage_days: Decimal::from(3),
            priority_min_daily_sales: Decimal::ONE,
        }
    }

    /// 枕頭庫存視圖策略（較長補貨週期）
    pub fn pillow() -> Self {
        Self {
            name: "pillow".to_string(),
            target_coverage_days: Decimal::from(45),
            critical_days_threshold: Decimal::from(7),
            urgent_days_threshold: Decimal::from(15),
            low_days_threshold: Decimal::from(21),
            high_sales_threshold: Decimal::from(60),
            ..Self::collection()
        }
    }

    /// 白色家電視圖策略（嚴重判定只看現有庫存）
    pub fn white_goods() -> Self {
        Self {
            name: "white_goods".to_string(),
            target_coverage_days: Decimal::from(21),
            critical_days_threshold: Decimal::from(3),
            urgent_days_threshold: Decimal::from(7),
            low_days_threshold: Decimal::from(15),
            overstock_factor: Decimal::from(3),
            high_sales_threshold: Decimal::from(30),
            open_orders_in_critical_check: false,
            ..Self::collection()
        }
    }

    /// 從 JSON 載入並驗證
    ///
    /// 缺少的欄位沿用系列視圖預設值。
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PolicyConfig =
            serde_json::from_str(json).map_err(|e| StockRiskError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置名稱
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 建構器模式：設置目標覆蓋天數
    pub fn with_target_coverage_days(mut self, days: Decimal) -> Self {
        self.target_coverage_days = days;
        self
    }

    /// 建構器模式：設置三段天數門檻（嚴重、緊急、偏低）
    pub fn with_day_thresholds(mut self, critical: Decimal, urgent: Decimal, low: Decimal) -> Self {
        self.critical_days_threshold = critical;
        self.urgent_days_threshold = urgent;
        self.low_days_threshold = low;
        self
    }

    /// 建構器模式：設置最小有效日均銷量
    pub fn with_min_significant_daily_sales(mut self, rate: Decimal) -> Self {
        self.min_significant_daily_sales = rate;
        self
    }

    /// 建構器模式：設置過剩倍數
    pub fn with_overstock_factor(mut self, factor: Decimal) -> Self {
        self.overstock_factor = factor;
        self
    }

    /// 建構器模式：設置高銷量門檻
    pub fn with_high_sales_threshold(mut self, sales_30d: Decimal) -> Self {
        self.high_sales_threshold = sales_30d;
        self
    }

    /// 建構器模式：設置嚴重判定是否考慮在途訂單
    pub fn with_open_orders_in_critical_check(mut self, enabled: bool) -> Self {
        self.open_orders_in_critical_check = enabled;
        self
    }

    /// 建構器模式：設置庫存池
    pub fn with_stock_basis(mut self, basis: StockBasis) -> Self {
        self.stock_basis = basis;
        self
    }

    /// 建構器模式：設置優先級 1 參數
    pub fn with_priority_thresholds(mut self, short_coverage_days: Decimal, min_daily_sales: Decimal) -> Self {
        self.priority_short_coverage_days = short_coverage_days;
        self.priority_min_daily_sales = min_daily_sales;
        self
    }

    /// 驗證門檻一致性
    pub fn validate(&self) -> Result<()> {
        if self.target_coverage_days <= Decimal::ZERO {
            return Err(StockRiskError::InvalidPolicy(format!(
                "{}: 目標覆蓋天數必須大於 0，實際為 {}",
                self.name, self.target_coverage_days
            )));
        }

        if self.critical_days_threshold < Decimal::ZERO
            || self.critical_days_threshold > self.urgent_days_threshold
            || self.urgent_days_threshold > self.low_days_threshold
        {
            return Err(StockRiskError::InvalidPolicy(format!(
                "{}: 天數門檻必須遞增（嚴重 {} ≤ 緊急 {} ≤ 偏低 {}）",
                self.name,
                self.critical_days_threshold,
                self.urgent_days_threshold,
                self.low_days_threshold
            )));
        }

        if self.overstock_factor < Decimal::ONE {
            return Err(StockRiskError::InvalidPolicy(format!(
                "{}: 過剩倍數不可小於 1，實際為 {}",
                self.name, self.overstock_factor
            )));
        }

        if self.min_significant_daily_sales < Decimal::ZERO
            || self.high_sales_threshold < Decimal::ZERO
            || self.priority_min_daily_sales < Decimal::ZERO
            || self.priority_short_coverage_days < Decimal::ZERO
        {
            return Err(StockRiskError::InvalidPolicy(format!(
                "{}: 銷量與優先級門檻不可為負",
                self.name
            )));
        }

        Ok(())
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::collection()
    }
}
