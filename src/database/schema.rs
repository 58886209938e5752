use sqlx::SqlitePool;
use tracing::info;

const SQL_CREATE_REPORTS: &str = r#"
CREATE TABLE IF NOT EXISTS reports (
  id TEXT PRIMARY KEY NOT NULL,
  title TEXT NOT NULL,
  description TEXT NOT NULL,
  category TEXT NOT NULL,
  latitude REAL NOT NULL,
  longitude REAL NOT NULL,
  image_url TEXT,
  audio_url TEXT,
  status INTEGER NOT NULL DEFAULT 0 CHECK (status BETWEEN 0 AND 3),
  created_at TEXT NOT NULL,
  owner_id TEXT NOT NULL,
  owner_name TEXT NOT NULL
)
"#;

const SQL_CREATE_REPORTS_OWNER_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_reports_owner ON reports (owner_id, created_at)
"#;

const SQL_CREATE_REPORT_VOTES: &str = r#"
CREATE TABLE IF NOT EXISTS report_votes (
  report_id TEXT NOT NULL REFERENCES reports (id) ON DELETE CASCADE,
  user_id TEXT NOT NULL,
  voted_at TEXT NOT NULL,
  PRIMARY KEY (report_id, user_id)
)
"#;

pub async fn apply_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    for statement in [
        SQL_CREATE_REPORTS,
        SQL_CREATE_REPORTS_OWNER_INDEX,
        SQL_CREATE_REPORT_VOTES,
    ] {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("🗄️  Schema ready");
    Ok(())
}

// A private in-memory database. One connection, kept forever, or the data vanishes.
#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    apply_schema(&pool).await.expect("schema");
    pool
}
