//! 邊界輸入：將上游解析的原始資料轉為已驗證的 SKU 記錄

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::{Result, SkuRecord, StockRiskError};

/// 邊界處理模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryMode {
    /// 無效數值直接拒絕
    Reject,
    /// 無效數值視為 0 並記錄警告
    #[default]
    Coerce,
}

/// 原始數量（數字或文字）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawQuantity {
    Number(f64),
    Text(String),
}

impl RawQuantity {
    /// 解析為 Decimal；空字串視為缺值
    ///
    /// 文字接受兩種寫法：含 `,` 時視為巴西格式（`.` 為千分位、`,` 為小數點，
    /// 如 `1.234,56`）；不含 `,` 時以 `.` 為小數點（如 `1234.56`）。
    fn parse(&self) -> std::result::Result<Option<Decimal>, String> {
        match self {
            RawQuantity::Number(value) => Decimal::try_from(*value)
                .map(Some)
                .map_err(|_| value.to_string()),
            RawQuantity::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                let normalized = if trimmed.contains(',') {
                    trimmed.replace('.', "").replace(',', ".")
                } else {
                    trimmed.to_string()
                };
                Decimal::from_str(&normalized)
                    .map(Some)
                    .map_err(|_| text.clone())
            }
        }
    }
}

impl From<&str> for RawQuantity {
    fn from(value: &str) -> Self {
        RawQuantity::Text(value.to_string())
    }
}

/// 上游（試算表匯入、文件存儲）解析後的原始 SKU 資料
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkuInput {
    #[serde(deserialize_with = "text_or_number")]
    pub sku_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub variant_key: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub collection_name: String,
    pub stock_total: Option<RawQuantity>,
    pub stock_ready_to_ship: Option<RawQuantity>,
    pub stock_regulator: Option<RawQuantity>,
    pub open_orders: Option<RawQuantity>,
    pub sales_30d: Option<RawQuantity>,
    pub price: Option<RawQuantity>,
    pub collection_start_date: Option<NaiveDate>,
    pub collection_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current_collection: bool,
}

fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Ok(text),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "SKU 代碼必須是文字或數字: {}",
            other
        ))),
    }
}

/// 批量轉換結果
#[derive(Debug, Default)]
pub struct InputBatch {
    /// 通過驗證的記錄
    pub records: Vec<SkuRecord>,
    /// 被拒絕的記錄錯誤
    pub rejected: Vec<StockRiskError>,
}

impl SkuInput {
    /// 轉換為已驗證的 SKU 記錄
    ///
    /// 缺值一律為 0（單價缺值保留為 None）；負數、非數字依 `mode` 拒絕或歸零。
    pub fn into_record(self, mode: BoundaryMode) -> Result<SkuRecord> {
        let sku_id = self.sku_id.trim().to_string();

        let stock_total = resolve(&sku_id, "stock_total", self.stock_total.as_ref(), mode)?;
        let stock_ready_to_ship = resolve(
            &sku_id,
            "stock_ready_to_ship",
            self.stock_ready_to_ship.as_ref(),
            mode,
        )?;
        let stock_regulator =
            resolve(&sku_id, "stock_regulator", self.stock_regulator.as_ref(), mode)?;
        let open_orders = resolve(&sku_id, "open_orders", self.open_orders.as_ref(), mode)?;
        let sales_30d = resolve(&sku_id, "sales_30d", self.sales_30d.as_ref(), mode)?;
        let price = match self.price.as_ref() {
            Some(raw) if !matches!(raw.parse(), Ok(None)) => {
                Some(resolve(&sku_id, "price", Some(raw), mode)?)
            }
            _ => None,
        };

        Ok(SkuRecord {
            sku_id,
            name: self.name.trim().to_string(),
            variant_key: self.variant_key.trim().to_string(),
            product_type: self.product_type.trim().to_string(),
            collection_name: self.collection_name.trim().to_string(),
            stock_total,
            stock_ready_to_ship,
            stock_regulator,
            open_orders,
            sales_30d,
            price,
            collection_start_date: self.collection_start_date,
            collection_end_date: self.collection_end_date,
            is_current_collection: self.is_current_collection,
        })
    }

    /// 批量轉換；單筆失敗不影響其他記錄
    pub fn convert_all(inputs: Vec<SkuInput>, mode: BoundaryMode) -> InputBatch {
        let mut batch = InputBatch::default();
        for input in inputs {
            match input.into_record(mode) {
                Ok(record) => batch.records.push(record),
                Err(err) => {
                    tracing::warn!("拒絕輸入記錄: {}", err);
                    batch.rejected.push(err);
                }
            }
        }
        batch
    }
}

fn resolve(
    sku_id: &str,
    field: &'static str,
    raw: Option<&RawQuantity>,
    mode: BoundaryMode,
) -> Result<Decimal> {
    let Some(raw) = raw else {
        return Ok(Decimal::ZERO);
    };

    let invalid = match raw.parse() {
        Ok(None) => return Ok(Decimal::ZERO),
        Ok(Some(value)) if value >= Decimal::ZERO => return Ok(value),
        Ok(Some(value)) => value.to_string(),
        Err(text) => text,
    };

    match mode {
        BoundaryMode::Reject => Err(StockRiskError::InvalidQuantity {
            sku_id: sku_id.to_string(),
            field,
            value: invalid,
        }),
        BoundaryMode::Coerce => {
            tracing::warn!("SKU {} 欄位 {} 數值無效（{}），以 0 代替", sku_id, field, invalid);
            Ok(Decimal::ZERO)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn input(sku_id: &str) -> SkuInput {
        SkuInput {
            sku_id: sku_id.to_string(),
            name: "  Travesseiro Nasa ".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let record = input("2001").into_record(BoundaryMode::Reject).unwrap();

        assert_eq!(record.name, "Travesseiro Nasa");
        assert_eq!(record.stock_total, Decimal::ZERO);
        assert_eq!(record.open_orders, Decimal::ZERO);
        assert_eq!(record.stock_regulator, Decimal::ZERO);
        assert_eq!(record.price, None);
    }

    #[test]
    fn test_numeric_text_is_parsed() {
        let mut raw = input("2002");
        raw.stock_total = Some("120".into());
        raw.sales_30d = Some(" 12,5 ".into());
        raw.price = Some("89,90".into());

        let record = raw.into_record(BoundaryMode::Reject).unwrap();
        assert_eq!(record.stock_total, Decimal::from(120));
        assert_eq!(record.sales_30d, Decimal::new(125, 1));
        assert_eq!(record.price, Some(Decimal::new(899, 1)));
    }

    #[rstest]
    #[case::plain_integer("120", Decimal::from(120))]
    #[case::dot_decimal("1234.56", Decimal::new(123456, 2))]
    #[case::comma_decimal("89,90", Decimal::new(899, 1))]
    #[case::thousands_and_comma_decimal("1.234,56", Decimal::new(123456, 2))]
    #[case::millions("1.000.000,5", Decimal::new(10000005, 1))]
    fn test_text_formats(#[case] text: &str, #[case] expected: Decimal) {
        assert_eq!(RawQuantity::from(text).parse(), Ok(Some(expected)));
    }

    #[test]
    fn test_ambiguous_separators_rejected() {
        assert!(RawQuantity::from("1,234,56").parse().is_err());
    }

    #[test]
    fn test_negative_rejected() {
        let mut raw = input("2003");
        raw.stock_total = Some(RawQuantity::Number(-5.0));

        let err = raw.into_record(BoundaryMode::Reject).unwrap_err();
        match err {
            StockRiskError::InvalidQuantity { sku_id, field, .. } => {
                assert_eq!(sku_id, "2003");
                assert_eq!(field, "stock_total");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_coerced_to_zero() {
        let mut raw = input("2004");
        raw.stock_total = Some(RawQuantity::Number(-5.0));
        raw.sales_30d = Some("abc".into());
        raw.open_orders = Some(RawQuantity::Number(f64::NAN));

        let record = raw.into_record(BoundaryMode::Coerce).unwrap();
        assert_eq!(record.stock_total, Decimal::ZERO);
        assert_eq!(record.sales_30d, Decimal::ZERO);
        assert_eq!(record.open_orders, Decimal::ZERO);
    }

    #[test]
    fn test_blank_price_stays_unknown() {
        let mut raw = input("2005");
        raw.price = Some("  ".into());

        let record = raw.into_record(BoundaryMode::Reject).unwrap();
        assert_eq!(record.price, None);
    }

    #[test]
    fn test_deserialize_numeric_sku_id() {
        let json = r#"[
            { "sku_id": 123456, "name": "Lençol", "stock_total": "10", "sales_30d": 30 },
            { "sku_id": "A-1", "stock_total": -1 }
        ]"#;

        let inputs: Vec<SkuInput> = serde_json::from_str(json).unwrap();
        let batch = SkuInput::convert_all(inputs, BoundaryMode::Reject);

        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].sku_id, "123456");
        assert_eq!(batch.records[0].sales_30d, Decimal::from(30));
        assert_eq!(batch.rejected.len(), 1);
    }

    #[test]
    fn test_convert_empty_batch() {
        let batch = SkuInput::convert_all(Vec::new(), BoundaryMode::Coerce);
        assert!(batch.records.is_empty());
        assert!(batch.rejected.is_empty());
    }
}
