use crate::store::Store;
use anyhow::Context;
use chrono::NaiveDate;
use duckdb::{Connection, params};
use serde_json::{Map, Value};

/// JSON shape of one analytics response: the five metric keys plus
/// `commissions`, numeric values null when the aggregate matched no rows.
pub type AnalyticsReport = Map<String, Value>;

#[derive(Clone, Copy, Debug)]
pub enum ScalarKind {
    Int,
    Float,
}

pub struct Metric {
    pub key: &'static str,
    pub sql: &'static str,
    pub kind: ScalarKind,
}

// SUM over INTEGER widens to HUGEINT in DuckDB, hence the BIGINT cast.
pub static METRICS: [Metric; 5] = [
    Metric {
        key: "items",
        sql: "SELECT CAST(SUM(ol.quantity) AS BIGINT)
              FROM orders o
              INNER JOIN order_lines ol
              ON o.id = ol.order_id
              WHERE CAST(o.created_at AS DATE) = ?",
        kind: ScalarKind::Int,
    },
    Metric {
        key: "order_total_avg",
        sql: "SELECT AVG(ol.total_amount)
              FROM orders o
              INNER JOIN order_lines ol
              ON o.id = ol.order_id
              WHERE CAST(o.created_at AS DATE) = ?",
        kind: ScalarKind::Float,
    },
    Metric {
        key: "discount_range_average",
        sql: "SELECT AVG(ol.discount_rate)
              FROM orders o
              INNER JOIN order_lines ol
              ON o.id = ol.order_id
              WHERE CAST(o.created_at AS DATE) = ?",
        kind: ScalarKind::Float,
    },
    Metric {
        key: "customers",
        sql: "SELECT COUNT(DISTINCT customer_id)
              FROM orders
              WHERE CAST(created_at AS DATE) = ?",
        kind: ScalarKind::Int,
    },
    Metric {
        key: "total_discount_amount",
        sql: "SELECT SUM(ol.discounted_amount)
              FROM orders o
              INNER JOIN order_lines ol
              ON o.id = ol.order_id
              WHERE CAST(o.created_at AS DATE) = ?",
        kind: ScalarKind::Float,
    },
];

// Placeholder until commission reporting lands; always an empty object.
const COMMISSIONS_KEY: &str = "commissions";

/// Runs every catalog query for `date` on one scoped connection and collects
/// the scalars under their keys. Fails as a whole if any query fails.
pub async fn run_analytics(store: &Store, date: NaiveDate) -> Result<AnalyticsReport, anyhow::Error> {
    let date_str = date.format("%Y-%m-%d").to_string();
    tracing::info!("running analytics for {date_str}");
    let mut report = store
        .with_conn(move |conn| {
            let mut report = Map::new();
            for metric in &METRICS {
                let value = scalar_query(conn, metric, &date_str)
                    .with_context(|| format!("query {}", metric.key))?;
                report.insert(metric.key.to_string(), value);
            }
            Ok(report)
        })
        .await?;
    tracing::info!("analytics complete");

    report.insert(COMMISSIONS_KEY.to_string(), Value::Object(Map::new()));
    Ok(report)
}

/// Single-scalar executor: first column of the first row, null when the
/// aggregate is SQL NULL or no row comes back.
fn scalar_query(conn: &Connection, metric: &Metric, date: &str) -> Result<Value, anyhow::Error> {
    let mut stmt = conn.prepare(metric.sql)?;
    let mut rows = stmt.query(params![date])?;
    let Some(row) = rows.next()? else {
        return Ok(Value::Null);
    };
    let value = match metric.kind {
        ScalarKind::Int => row.get::<_, Option<i64>>(0)?.map_or(Value::Null, Value::from),
        ScalarKind::Float => row.get::<_, Option<f64>>(0)?.map_or(Value::Null, Value::from),
    };
    Ok(value)
}
