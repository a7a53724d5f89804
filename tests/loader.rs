use chrono::NaiveDate;
use order_stats::store::Store;
use order_stats::{analytics, loader};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const ORDERS_CSV: &str = "\
id,created_at,vendor_id,customer_id
1,2022-10-01 10:00:00,101,1
2,2022-10-01 11:00:00,102,2
3,2022-10-01 12:00:00,103,3
4,2022-10-01 13:00:00,104,1
";

const ORDER_LINES_CSV: &str = "\
order_id,product_id,product_description,product_price,product_vat_rate,discount_rate,quantity,full_price_amount,discounted_amount,vat_amount,total_amount
1,1,product_1,100,1.0,1.0,1,100,1.0,1.0,100
2,2,product_2,100,1.0,1.0,2,200,2.0,2.0,200
3,3,product_3,100,1.0,1.0,3,300,3.0,3.0,300
4,1,product_1,100,1.0,1.0,1,100,1.0,1.0,100
";

fn write_fixtures(dir: &Path) {
    fs::write(dir.join("orders.csv"), ORDERS_CSV).expect("write orders.csv");
    fs::write(dir.join("order_lines.csv"), ORDER_LINES_CSV).expect("write order_lines.csv");
}

async fn table_count(store: &Store, table: &'static str) -> i64 {
    store
        .with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!("SELECT COUNT(*) FROM {table}"))?;
            let mut rows = stmt.query([])?;
            let row = rows.next()?.expect("count row");
            Ok(row.get::<_, i64>(0)?)
        })
        .await
        .expect("count")
}

#[tokio::test]
async fn loads_csv_files_and_skips_missing_ones() {
    let dir = TempDir::new().expect("tempdir");
    write_fixtures(dir.path());

    let store = Arc::new(Store::open_in_memory().expect("open"));
    loader::load_dir(&store, dir.path()).await.expect("load");

    assert_eq!(table_count(&store, "orders").await, 4);
    assert_eq!(table_count(&store, "order_lines").await, 4);
    // Tables without a CSV still exist, just empty.
    assert_eq!(table_count(&store, "commissions").await, 0);
    assert_eq!(table_count(&store, "products").await, 0);
}

#[tokio::test]
async fn reloading_replaces_rows() {
    let dir = TempDir::new().expect("tempdir");
    write_fixtures(dir.path());

    let store = Arc::new(Store::open_in_memory().expect("open"));
    loader::load_dir(&store, dir.path()).await.expect("load");
    loader::load_dir(&store, dir.path()).await.expect("reload");

    assert_eq!(table_count(&store, "orders").await, 4);
    assert_eq!(table_count(&store, "order_lines").await, 4);
}

#[tokio::test]
async fn loaded_data_feeds_the_aggregator() {
    let dir = TempDir::new().expect("tempdir");
    write_fixtures(dir.path());

    let store = Arc::new(Store::open_in_memory().expect("open"));
    loader::load_dir(&store, dir.path()).await.expect("load");

    let report = analytics::run_analytics(&store, NaiveDate::from_ymd_opt(2022, 10, 1).unwrap())
        .await
        .expect("analytics");
    assert_eq!(
        Value::Object(report),
        json!({
            "items": 7,
            "order_total_avg": 175.0,
            "discount_range_average": 1.0,
            "customers": 3,
            "total_discount_amount": 7.0,
            "commissions": {}
        })
    );
}
