use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::database::report_repo::{self, NewReportRecord};
use crate::database::vote_repo::{self, VoteRow};
use crate::error::StoreError;
use crate::models::{NewReport, Report, ReportRow, ReportStatus};
use crate::services::capabilities::ReportStore;

#[derive(Debug, Clone)]
pub struct SqliteReportStore {
    pool: SqlitePool,
}

impl SqliteReportStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ensure_exists(&self, report_id: &str) -> Result<(), StoreError> {
        if report_repo::report_exists(&self.pool, report_id).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound(report_id.to_string()))
        }
    }
}

fn now_text() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn attach_votes(rows: Vec<ReportRow>, votes: Vec<VoteRow>) -> Vec<Report> {
    let mut by_report: HashMap<String, Vec<String>> = HashMap::new();
    for vote in votes {
        by_report.entry(vote.report_id).or_default().push(vote.user_id);
    }
    rows.into_iter()
        .map(|row| {
            let voters = by_report.remove(&row.id).unwrap_or_default();
            Report::from_row(row, voters)
        })
        .collect()
}

#[async_trait]
impl ReportStore for SqliteReportStore {
    async fn list_all_reports(&self) -> Result<Vec<Report>, StoreError> {
        let rows = report_repo::list_reports(&self.pool).await?;
        let votes = vote_repo::list_all_votes(&self.pool).await?;
        Ok(attach_votes(rows, votes))
    }

    async fn list_reports_by_owner(&self, owner_id: &str) -> Result<Vec<Report>, StoreError> {
        let rows = report_repo::list_reports_by_owner(&self.pool, owner_id).await?;
        let votes = vote_repo::list_votes_by_owner(&self.pool, owner_id).await?;
        Ok(attach_votes(rows, votes))
    }

    async fn get_report(&self, report_id: &str) -> Result<Option<Report>, StoreError> {
        let Some(row) = report_repo::load_report(&self.pool, report_id).await? else {
            return Ok(None);
        };
        let votes = vote_repo::list_votes_for_report(&self.pool, report_id).await?;
        Ok(attach_votes(vec![row], votes).pop())
    }

    async fn create_report(&self, report: NewReport) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let created_at = now_text();
        report_repo::insert_report(
            &self.pool,
            NewReportRecord {
                id: &id,
                title: &report.title,
                description: &report.description,
                category: report.category.label(),
                latitude: report.coordinate.latitude,
                longitude: report.coordinate.longitude,
                image_url: report.image_url.as_deref(),
                audio_url: report.audio_url.as_deref(),
                created_at: &created_at,
                owner_id: &report.owner_id,
                owner_name: &report.owner_name,
            },
        )
        .await?;
        info!(
            "📝 Report {} created by {} ({})",
            id,
            report.owner_id,
            report.category.label()
        );
        Ok(id)
    }

    async fn set_vote(&self, report_id: &str, user_id: &str, add: bool) -> Result<(), StoreError> {
        self.ensure_exists(report_id).await?;
        let changed = if add {
            vote_repo::insert_vote(&self.pool, report_id, user_id, &now_text()).await?
        } else {
            vote_repo::delete_vote(&self.pool, report_id, user_id).await?
        };
        info!(
            "👍 Vote {} on {} by {} (changed={})",
            if add { "added" } else { "removed" },
            report_id,
            user_id,
            changed
        );
        Ok(())
    }

    async fn update_report_status(
        &self,
        report_id: &str,
        status: ReportStatus,
    ) -> Result<(), StoreError> {
        let updated =
            report_repo::update_report_status(&self.pool, report_id, status.ordinal()).await?;
        if updated == 0 {
            return Err(StoreError::NotFound(report_id.to_string()));
        }
        info!("🔄 Report {} moved to {}", report_id, status.label());
        Ok(())
    }
}
