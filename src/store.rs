use anyhow::Context;
use duckdb::Connection;
use std::sync::{Arc, Mutex};

/// Process-wide data-source handle: one DuckDB connection serialized behind a
/// mutex. Each unit of work borrows it for its whole batch via `with_conn`.
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &str) -> Result<Self, anyhow::Error> {
        let conn = Connection::open(path).with_context(|| format!("open db {}", path))?;
        Ok(Self::from_conn(conn))
    }

    pub fn open_in_memory() -> Result<Self, anyhow::Error> {
        let conn = Connection::open_in_memory().context("open in-memory db")?;
        Ok(Self::from_conn(conn))
    }

    fn from_conn(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub async fn with_conn<T, F>(&self, func: F) -> Result<T, anyhow::Error>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, anyhow::Error> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().expect("db lock");
            func(&conn)
        })
        .await?
    }
}
