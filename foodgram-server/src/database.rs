use anyhow::Result;

#[derive(Clone)]
pub struct Database {
    pub pool: r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>,
}

impl Database {
    /// Open (or create) the database file at `path` and bring it up to the latest schema.
    pub async fn connect(path: &str) -> Result<Self> {
        let manager = r2d2_sqlite::SqliteConnectionManager::file(path)
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = r2d2::Pool::new(manager)?;
        let me = Self { pool };
        me.migrate().await?;
        Ok(me)
    }

    /// Migrate the database to the latest version.
    async fn migrate(&self) -> Result<()> {
        let migrations = [include_str!("migrations/01-initial.sql")];
        // Find the current migration version. If it fails, we need to run all the migrations.
        let conn = self.pool.get()?;
        let current_version: String = conn
            .query_row(
                "SELECT value FROM metadata WHERE key = 'schema_version'",
                rusqlite::params![],
                |row| row.get(0),
            )
            .unwrap_or("0".to_string());
        let current_version = current_version.parse::<usize>().unwrap_or(0);
        tracing::info!("Current schema version: {}", current_version);
        for migration in migrations.iter().skip(current_version) {
            tracing::warn!("Applying migration: {}", migration);
            conn.execute_batch(migration)?;
        }
        Ok(())
    }

    /// Convenience method to collect rows from a query into a Vec.
    pub fn collect_rows<T: FromRow, P: rusqlite::Params>(
        &self,
        sql: &str,
        parameters: P,
    ) -> Result<Vec<T>> {
        let conn = self.pool.get()?;
        collect_rows(&conn, sql, parameters)
    }

    /// Run a query expected to produce zero or one row.
    pub fn first_row<T: FromRow, P: rusqlite::Params>(
        &self,
        sql: &str,
        parameters: P,
    ) -> Result<Option<T>> {
        Ok(self.collect_rows(sql, parameters)?.into_iter().next())
    }

    /// Whether a query returns any row at all.
    pub fn exists<P: rusqlite::Params>(
        &self,
        sql: &str,
        parameters: P,
    ) -> Result<bool> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(sql)?;
        let exists = stmt.exists(parameters)?;
        Ok(exists)
    }
}

/// Same as [`Database::collect_rows`], for callers already holding a connection or transaction.
pub fn collect_rows<T: FromRow, P: rusqlite::Params>(
    conn: &rusqlite::Connection,
    sql: &str,
    parameters: P,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query(parameters)?;
    rows.mapped(T::from_row)
        .map(|r| r.map_err(Into::into))
        .collect::<Result<_>>()
}

pub trait FromRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self>
    where
        Self: Sized;
}
