//! SKU 庫存記錄模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::policy::StockBasis;

/// 單一 SKU 庫存記錄
///
/// 所有數量在進入引擎前已驗證為非負（見 [`crate::SkuInput`]）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuRecord {
    /// SKU 代碼（可能是純數字字串）
    pub sku_id: String,

    /// 商品名稱
    pub name: String,

    /// 規格（尺寸、顏色等衍生鍵）
    pub variant_key: String,

    /// 商品類型
    pub product_type: String,

    /// 系列名稱
    pub collection_name: String,

    /// 總庫存
    pub stock_total: Decimal,

    /// 可立即出貨庫存
    pub stock_ready_to_ship: Decimal,

    /// 調節庫存
    pub stock_regulator: Decimal,

    /// 在途訂單（已採購未到貨）
    pub open_orders: Decimal,

    /// 近 30 天銷量
    pub sales_30d: Decimal,

    /// 單價（未知為 None）
    pub price: Option<Decimal>,

    /// 系列開始日期
    pub collection_start_date: Option<NaiveDate>,

    /// 系列結束日期
    pub collection_end_date: Option<NaiveDate>,

    /// 是否為當季系列
    pub is_current_collection: bool,
}

impl SkuRecord {
    /// 創建新的 SKU 記錄
    pub fn new(sku_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            sku_id: sku_id.into(),
            name: name.into(),
            variant_key: String::new(),
            product_type: String::new(),
            collection_name: String::new(),
            stock_total: Decimal::ZERO,
            stock_ready_to_ship: Decimal::ZERO,
            stock_regulator: Decimal::ZERO,
            open_orders: Decimal::ZERO,
            sales_30d: Decimal::ZERO,
            price: None,
            collection_start_date: None,
            collection_end_date: None,
            is_current_collection: false,
        }
    }

    /// 建構器模式：設置規格
    pub fn with_variant(mut self, variant_key: impl Into<String>) -> Self {
        self.variant_key = variant_key.into();
        self
    }

    /// 建構器模式：設置商品類型
    pub fn with_product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = product_type.into();
        self
    }

    /// 建構器模式：設置系列
    pub fn with_collection(mut self, collection_name: impl Into<String>, is_current: bool) -> Self {
        self.collection_name = collection_name.into();
        self.is_current_collection = is_current;
        self
    }

    /// 建構器模式：設置系列期間
    pub fn with_collection_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.collection_start_date = start;
        self.collection_end_date = end;
        self
    }

    /// 建構器模式：設置總庫存
    pub fn with_stock(mut self, stock_total: Decimal) -> Self {
        self.stock_total = stock_total;
        self
    }

    /// 建構器模式：設置分池庫存（可立即出貨、調節）
    pub fn with_stock_pools(mut self, ready_to_ship: Decimal, regulator: Decimal) -> Self {
        self.stock_ready_to_ship = ready_to_ship;
        self.stock_regulator = regulator;
        self
    }

    /// 建構器模式：設置在途訂單
    pub fn with_open_orders(mut self, open_orders: Decimal) -> Self {
        self.open_orders = open_orders;
        self
    }

    /// 建構器模式：設置 30 天銷量
    pub fn with_sales_30d(mut self, sales_30d: Decimal) -> Self {
        self.sales_30d = sales_30d;
        self
    }

    /// 建構器模式：設置單價
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// 依庫存池取得覆蓋計算用庫存
    pub fn stock_for(&self, basis: StockBasis) -> Decimal {
        match basis {
            StockBasis::Total => self.stock_total,
            StockBasis::ReadyToShip => self.stock_ready_to_ship,
            StockBasis::ReadyToShipPlusRegulator => self.stock_ready_to_ship + self.stock_regulator,
        }
    }

    /// 30 天營收（單價未知視為 0，負值以 0 計算）
    pub fn revenue_30d(&self) -> Decimal {
        let price = self.price.unwrap_or(Decimal::ZERO).max(Decimal::ZERO);
        price * self.sales_30d.max(Decimal::ZERO)
    }

    /// 列出為負數的數量欄位
    pub fn negative_fields(&self) -> Vec<(&'static str, Decimal)> {
        [
            ("stock_total", self.stock_total),
            ("stock_ready_to_ship", self.stock_ready_to_ship),
            ("stock_regulator", self.stock_regulator),
            ("sales_30d", self.sales_30d),
            ("open_orders", self.open_orders),
            ("price", self.price.unwrap_or(Decimal::ZERO)),
        ]
        .into_iter()
        .filter(|(_, value)| *value < Decimal::ZERO)
        .collect()
    }

    /// 檢查系列在指定日期是否仍在銷售期內
    pub fn is_collection_active(&self, as_of: NaiveDate) -> bool {
        let started = self.collection_start_date.map_or(true, |start| start <= as_of);
        let not_ended = self.collection_end_date.map_or(true, |end| as_of <= end);
        started && not_ended
    }

    /// 系列剩餘天數（無結束日期為 None，已結束為 0）
    pub fn collection_days_remaining(&self, as_of: NaiveDate) -> Option<i64> {
        self.collection_end_date
            .map(|end| (end - as_of).num_days().max(0))
    }
}
