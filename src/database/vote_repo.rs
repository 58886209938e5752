use sqlx::SqlitePool;

#[derive(Debug, sqlx::FromRow)]
pub struct VoteRow {
    pub report_id: String,
    pub user_id: String,
}

// Primary key (report_id, user_id) turns a repeat vote into a no-op.
const SQL_INSERT_VOTE: &str = r#"
INSERT OR IGNORE INTO report_votes (report_id, user_id, voted_at)
VALUES (?, ?, ?)
"#;

const SQL_DELETE_VOTE: &str = r#"
DELETE FROM report_votes
WHERE report_id = ? AND user_id = ?
"#;

const SQL_LIST_ALL_VOTES: &str = r#"
SELECT report_id, user_id
FROM report_votes
ORDER BY rowid ASC
"#;

const SQL_LIST_VOTES_BY_OWNER: &str = r#"
SELECT v.report_id, v.user_id
FROM report_votes v
JOIN reports r ON r.id = v.report_id
WHERE r.owner_id = ?
ORDER BY v.rowid ASC
"#;

const SQL_LIST_VOTES_FOR_REPORT: &str = r#"
SELECT report_id, user_id
FROM report_votes
WHERE report_id = ?
ORDER BY rowid ASC
"#;

pub async fn insert_vote(
    pool: &SqlitePool,
    report_id: &str,
    user_id: &str,
    voted_at: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_VOTE)
        .bind(report_id)
        .bind(user_id)
        .bind(voted_at)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete_vote(pool: &SqlitePool, report_id: &str, user_id: &str) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_VOTE)
        .bind(report_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn list_all_votes(pool: &SqlitePool) -> sqlx::Result<Vec<VoteRow>> {
    sqlx::query_as::<_, VoteRow>(SQL_LIST_ALL_VOTES)
        .fetch_all(pool)
        .await
}

pub async fn list_votes_by_owner(pool: &SqlitePool, owner_id: &str) -> sqlx::Result<Vec<VoteRow>> {
    sqlx::query_as::<_, VoteRow>(SQL_LIST_VOTES_BY_OWNER)
        .bind(owner_id)
        .fetch_all(pool)
        .await
}

pub async fn list_votes_for_report(
    pool: &SqlitePool,
    report_id: &str,
) -> sqlx::Result<Vec<VoteRow>> {
    sqlx::query_as::<_, VoteRow>(SQL_LIST_VOTES_FOR_REPORT)
        .bind(report_id)
        .fetch_all(pool)
        .await
}
