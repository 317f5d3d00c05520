//! # 庫存覆蓋報表範例
//!
//! 這個範例展示完整的覆蓋分析流程：
//! - 輸入：上游匯入的原始 SKU 資料（JSON）
//! - 策略：從 JSON 載入並驗證
//! - 分析：依名稱彙總、排序、ABC 分類
//! - 輸出：行動清單與 JSON 匯出

use anyhow::Context;
use stockrisk::calc::{ByName, CategorySummary};
use stockrisk::{BoundaryMode, CoverageAnalyzer, PolicyConfig, RiskStatus, SkuInput};

const SNAPSHOT: &str = r#"[
    {"sku_id": 1001, "name": "Travesseiro Nasa", "variant_key": "50x70", "product_type": "Travesseiro",
     "collection_name": "Verão 2025", "stock_total": 0, "sales_30d": 300, "price": "89,90", "is_current_collection": true},
    {"sku_id": 1002, "name": "Travesseiro Nasa", "variant_key": "60x80", "product_type": "Travesseiro",
     "collection_name": "Verão 2025", "stock_total": 12, "sales_30d": 30, "price": "99,90", "is_current_collection": true},
    {"sku_id": 2001, "name": "Lençol Percal", "variant_key": "Casal", "product_type": "Cama",
     "collection_name": "Verão 2025", "stock_total": 40, "sales_30d": 90, "open_orders": 20, "price": "159,00", "is_current_collection": true},
    {"sku_id": 3001, "name": "Edredom Queen", "product_type": "Cama",
     "collection_name": "Inverno 2024", "stock_total": 1000, "sales_30d": 0, "price": "349,00"},
    {"sku_id": 4001, "name": "Toalha Banho", "product_type": "Banho",
     "collection_name": "Verão 2025", "stock_total": "900", "sales_30d": "60", "price": "49,90", "is_current_collection": true},
    {"sku_id": 5001, "name": "Manta Sofá", "stock_total": "-4", "sales_30d": "n/d"}
]"#;

const POLICY: &str = r#"{
    "name": "collection-demo",
    "target_coverage_days": 30,
    "critical_days_threshold": 5,
    "urgent_days_threshold": 10,
    "low_days_threshold": 15
}"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("📦 ===== 庫存覆蓋報表範例 =====");
    println!();

    // ========== 1. 載入策略 ==========
    println!("⚙️  步驟 1: 載入策略");
    let policy = PolicyConfig::from_json_str(POLICY).context("策略配置無效")?;
    println!(
        "   ✓ {}：目標 {} 天，門檻 {}/{}/{} 天",
        policy.name,
        policy.target_coverage_days,
        policy.critical_days_threshold,
        policy.urgent_days_threshold,
        policy.low_days_threshold
    );
    println!();

    // ========== 2. 轉換輸入 ==========
    println!("📥 步驟 2: 轉換輸入資料");
    let inputs: Vec<SkuInput> = serde_json::from_str(SNAPSHOT).context("SKU 資料格式錯誤")?;
    let batch = SkuInput::convert_all(inputs, BoundaryMode::Coerce);
    println!("   ✓ 有效記錄: {}", batch.records.len());
    println!("   ✓ 拒絕記錄: {}", batch.rejected.len());
    println!();

    // ========== 3. 執行分析 ==========
    println!("🚀 步驟 3: 執行覆蓋分析");
    let analyzer = CoverageAnalyzer::new(policy)?;
    let report = analyzer.run(&batch.records, &ByName);
    println!("   ✓ 完成！耗時 {} ms", report.calculation_time_ms.unwrap_or(0));
    println!();

    // ========== 4. 行動清單 ==========
    println!("📋 步驟 4: 行動清單（前 5 項）");
    println!("----------------------------------------");
    for (row, item) in report.top_rows(5).into_iter().zip(report.items.top(5)) {
        let coverage = row
            .days_of_stock
            .map(|d| format!("{} 天", d))
            .unwrap_or_else(|| "∞".to_string());
        let priority = row
            .priority
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  [{}] {} | 覆蓋 {} | 優先級 {} | 建議補貨 {}",
            row.status_label, row.name, coverage, priority, row.replenishment_suggestion
        );
        println!("      {}", row.justification);
        let variants: Vec<&str> = item
            .variants()
            .into_iter()
            .filter(|v| !v.is_empty())
            .collect();
        if !variants.is_empty() {
            println!("      規格: {}", variants.join(", "));
        }
    }
    println!();

    // ========== 5. 統計 ==========
    println!("📊 步驟 5: 狀態統計");
    for status in RiskStatus::ALL {
        let bucket = report.status_summary.get(status);
        if bucket.item_count > 0 {
            println!(
                "  - {}: {} 項，庫存 {}，建議補貨 {}",
                status, bucket.item_count, bucket.stock, bucket.replenishment
            );
        }
    }
    print_categories(&report.category_summary);

    println!("🔤 ABC 分類");
    for bucket in &report.abc.buckets {
        println!(
            "  - {}: {} 個 SKU（{}%），營收佔比 {}%",
            bucket.curve.label(),
            bucket.sku_count,
            bucket.sku_percent.round_dp(1),
            bucket.revenue_percent.round_dp(1)
        );
    }
    println!();

    if !report.warnings.is_empty() {
        println!("⚠️  警告訊息:");
        for warning in &report.warnings {
            println!("  - [{}] {}", warning.sku_id, warning.message);
        }
        println!();
    }

    // ========== 6. 匯出 ==========
    println!("💾 步驟 6: JSON 匯出");
    let json = serde_json::to_string_pretty(&report.export_rows())?;
    println!("{}", json);
    println!();

    println!("✅ 覆蓋分析完成！");
    Ok(())
}

fn print_categories(summary: &CategorySummary) {
    println!("🏷️  商品類型統計");
    for (category, bucket) in &summary.categories {
        println!(
            "  - {}: {} 項，30 天銷量 {}",
            category, bucket.totals.item_count, bucket.totals.sales_30d
        );
    }
    println!();
}
