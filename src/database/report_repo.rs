use sqlx::SqlitePool;

use crate::models::ReportRow;

const REPORT_COLUMNS: &str = r#"
  id, title, description, category, latitude, longitude,
  image_url, audio_url, status, created_at, owner_id, owner_name
"#;

const SQL_INSERT_REPORT: &str = r#"
INSERT INTO reports (
  id,
  title,
  description,
  category,
  latitude,
  longitude,
  image_url,
  audio_url,
  status,
  created_at,
  owner_id,
  owner_name
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?)
"#;

const SQL_UPDATE_REPORT_STATUS: &str = r#"
UPDATE reports
SET status = ?
WHERE id = ?
"#;

const SQL_REPORT_EXISTS: &str = r#"
SELECT COUNT(1) FROM reports WHERE id = ?
"#;

pub struct NewReportRecord<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: Option<&'a str>,
    pub audio_url: Option<&'a str>,
    pub created_at: &'a str,
    pub owner_id: &'a str,
    pub owner_name: &'a str,
}

pub async fn insert_report(pool: &SqlitePool, rec: NewReportRecord<'_>) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_REPORT)
        .bind(rec.id)
        .bind(rec.title)
        .bind(rec.description)
        .bind(rec.category)
        .bind(rec.latitude)
        .bind(rec.longitude)
        .bind(rec.image_url)
        .bind(rec.audio_url)
        .bind(rec.created_at)
        .bind(rec.owner_id)
        .bind(rec.owner_name)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

// Newest first; rowid breaks ties between reports created in the same instant.
pub async fn list_reports(pool: &SqlitePool) -> sqlx::Result<Vec<ReportRow>> {
    let sql = format!(
        "SELECT {} FROM reports ORDER BY created_at DESC, rowid DESC",
        REPORT_COLUMNS
    );
    sqlx::query_as::<_, ReportRow>(&sql).fetch_all(pool).await
}

pub async fn list_reports_by_owner(
    pool: &SqlitePool,
    owner_id: &str,
) -> sqlx::Result<Vec<ReportRow>> {
    let sql = format!(
        "SELECT {} FROM reports WHERE owner_id = ? ORDER BY created_at DESC, rowid DESC",
        REPORT_COLUMNS
    );
    sqlx::query_as::<_, ReportRow>(&sql)
        .bind(owner_id)
        .fetch_all(pool)
        .await
}

pub async fn load_report(pool: &SqlitePool, report_id: &str) -> sqlx::Result<Option<ReportRow>> {
    let sql = format!("SELECT {} FROM reports WHERE id = ?", REPORT_COLUMNS);
    sqlx::query_as::<_, ReportRow>(&sql)
        .bind(report_id)
        .fetch_optional(pool)
        .await
}

pub async fn report_exists(pool: &SqlitePool, report_id: &str) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar(SQL_REPORT_EXISTS)
        .bind(report_id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn update_report_status(
    pool: &SqlitePool,
    report_id: &str,
    status: i64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_REPORT_STATUS)
        .bind(status)
        .bind(report_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
