use crate::store::Store;
use anyhow::Context;
use duckdb::Connection;
use std::path::Path;

/// Tables owned by the loader. Each one may have a matching `<name>.csv` in
/// the data directory.
pub const TABLES: &[&str] = &[
    "commissions",
    "order_lines",
    "orders",
    "product_promotions",
    "products",
    "promotions",
];

pub fn create_tables(conn: &Connection) -> Result<(), anyhow::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS commissions (
             date      DATE,
             vendor_id INTEGER,
             rate      DOUBLE
         );
         CREATE TABLE IF NOT EXISTS order_lines (
             order_id            INTEGER,
             product_id          INTEGER,
             product_description VARCHAR,
             product_price       INTEGER,
             product_vat_rate    DOUBLE,
             discount_rate       DOUBLE,
             quantity            INTEGER,
             full_price_amount   INTEGER,
             discounted_amount   DOUBLE,
             vat_amount          DOUBLE,
             total_amount        DOUBLE
         );
         CREATE TABLE IF NOT EXISTS orders (
             id          INTEGER PRIMARY KEY,
             created_at  TIMESTAMP,
             vendor_id   INTEGER,
             customer_id INTEGER
         );
         CREATE TABLE IF NOT EXISTS product_promotions (
             date         DATE,
             product_id   INTEGER,
             promotion_id INTEGER
         );
         CREATE TABLE IF NOT EXISTS products (
             id                  INTEGER PRIMARY KEY,
             product_description VARCHAR
         );
         CREATE TABLE IF NOT EXISTS promotions (
             id          INTEGER PRIMARY KEY,
             description VARCHAR
         );",
    )
    .context("create tables")
}

/// Creates the schema and bulk-loads `<data_dir>/<table>.csv` into each
/// table, replacing whatever rows were there. Tables without a CSV are
/// skipped.
pub async fn load_dir(store: &Store, data_dir: &Path) -> Result<(), anyhow::Error> {
    let data_dir = data_dir.to_path_buf();
    store
        .with_conn(move |conn| {
            create_tables(conn)?;
            for table in TABLES {
                let csv_path = data_dir.join(format!("{table}.csv"));
                if !csv_path.exists() {
                    tracing::warn!("no csv for {table}, skipping");
                    continue;
                }
                let loaded = load_csv(conn, table, &csv_path)
                    .with_context(|| format!("load {}", csv_path.display()))?;
                tracing::info!("loaded {loaded} rows into {table}");
            }
            Ok(())
        })
        .await
}

fn load_csv(conn: &Connection, table: &str, csv_path: &Path) -> Result<usize, anyhow::Error> {
    let path = csv_path
        .to_str()
        .context("non-utf8 csv path")?
        .replace('\'', "''");
    conn.execute(&format!("DELETE FROM {table}"), [])?;
    // BY NAME so column order in the file does not matter, only the header.
    let loaded = conn.execute(
        &format!("INSERT INTO {table} BY NAME SELECT * FROM read_csv_auto('{path}', header = true)"),
        [],
    )?;
    Ok(loaded)
}
