use std::collections::HashMap;

use chrono::SecondsFormat;
use serde::Serialize;
use tracing::info;

use crate::error::{ServiceError, StoreError, ValidationError};
use crate::models::{Coordinate, NewReport, NewReportRequest, Report, ReportStatus};
use crate::services::address_service;
use crate::services::capabilities::{ReportStore, ReverseGeocoder};
use crate::services::geo_service;

// Card fields shared by every feed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportCardView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub status: i64,
    pub status_label: &'static str,
    pub created_at: String,
    pub owner_id: String,
    pub owner_name: String,
    pub vote_count: usize,
}

impl From<&Report> for ReportCardView {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id.clone(),
            title: report.title.clone(),
            description: report.description.clone(),
            category: report.category.clone(),
            latitude: report.coordinate.latitude,
            longitude: report.coordinate.longitude,
            image_url: report.image_url.clone(),
            audio_url: report.audio_url.clone(),
            status: report.status.ordinal(),
            status_label: report.status.label(),
            created_at: report
                .created_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            owner_id: report.owner_id.clone(),
            owner_name: report.owner_name.clone(),
            vote_count: report.vote_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbyReportView {
    #[serde(flatten)]
    pub card: ReportCardView,
    pub distance_km: f64,
    pub distance_label: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusStepView {
    pub label: &'static str,
    pub reached: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommunityReportView {
    #[serde(flatten)]
    pub card: ReportCardView,
    pub has_voted: bool,
    pub progress: Vec<StatusStepView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommunityFeed {
    pub status_filter: Option<i64>,
    pub reports: Vec<CommunityReportView>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ProfileStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub owner_id: String,
    pub stats: ProfileStats,
    pub reports: Vec<ReportCardView>,
    pub addresses: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapMarker {
    pub id: String,
    pub title: String,
    pub category: String,
    pub status_label: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

pub async fn submit_report(
    store: &dyn ReportStore,
    request: NewReportRequest,
) -> Result<String, ServiceError> {
    let report = NewReport::try_from(request)?;
    Ok(store.create_report(report).await?)
}

pub async fn cast_vote(
    store: &dyn ReportStore,
    report_id: &str,
    user_id: &str,
    add: bool,
) -> Result<(), ServiceError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(ValidationError::MissingUserId.into());
    }
    Ok(store.set_vote(report_id, user_id, add).await?)
}

pub async fn change_status(
    store: &dyn ReportStore,
    report_id: &str,
    ordinal: i64,
) -> Result<(), ServiceError> {
    let status =
        ReportStatus::from_ordinal(ordinal).ok_or(ValidationError::InvalidStatus(ordinal))?;
    Ok(store.update_report_status(report_id, status).await?)
}

pub async fn nearby_feed(
    store: &dyn ReportStore,
    origin: Coordinate,
    radius_km: f64,
    limit: usize,
) -> Result<Vec<NearbyReportView>, StoreError> {
    let reports = store.list_all_reports().await?;
    let total = reports.len();
    let nearby = geo_service::nearby(reports, origin, radius_km);
    info!(
        "📍 Nearby feed: {} of {} reports within {}km",
        nearby.len(),
        total,
        radius_km
    );

    Ok(nearby
        .iter()
        .take(limit)
        .map(|report| {
            let distance_km = geo_service::distance_km(origin, report.coordinate);
            NearbyReportView {
                card: ReportCardView::from(report),
                distance_km,
                distance_label: geo_service::format_distance(distance_km),
            }
        })
        .collect())
}

pub async fn community_feed(
    store: &dyn ReportStore,
    status_filter: Option<ReportStatus>,
    viewer_id: Option<&str>,
) -> Result<CommunityFeed, StoreError> {
    let reports = store.list_all_reports().await?;
    let reports = reports
        .iter()
        .filter(|r| status_filter.map_or(true, |s| r.status == s))
        .map(|report| CommunityReportView {
            card: ReportCardView::from(report),
            has_voted: viewer_id.is_some_and(|v| report.has_voted(v)),
            progress: status_progress(report.status),
        })
        .collect();

    Ok(CommunityFeed {
        status_filter: status_filter.map(ReportStatus::ordinal),
        reports,
    })
}

pub fn status_progress(status: ReportStatus) -> Vec<StatusStepView> {
    ReportStatus::ALL
        .into_iter()
        .map(|step| StatusStepView {
            label: step.label(),
            reached: step <= status,
        })
        .collect()
}

pub fn profile_stats(reports: &[Report]) -> ProfileStats {
    let completed = reports.iter().filter(|r| r.status.is_completed()).count();
    ProfileStats {
        total: reports.len(),
        completed,
        in_progress: reports.len() - completed,
    }
}

pub async fn profile_summary(
    store: &dyn ReportStore,
    geocoder: &dyn ReverseGeocoder,
    owner_id: &str,
    geocoder_concurrency: usize,
) -> Result<ProfileSummary, StoreError> {
    let reports = store.list_reports_by_owner(owner_id).await?;
    let addresses =
        address_service::resolve_addresses(geocoder, &reports, geocoder_concurrency).await;

    Ok(ProfileSummary {
        owner_id: owner_id.to_string(),
        stats: profile_stats(&reports),
        reports: reports.iter().map(ReportCardView::from).collect(),
        addresses,
    })
}

pub fn map_markers(reports: &[Report]) -> Vec<MapMarker> {
    reports
        .iter()
        .filter(|r| r.coordinate.is_known())
        .map(|r| MapMarker {
            id: r.id.clone(),
            title: r.title.clone(),
            category: r.category.clone(),
            status_label: r.status.label(),
            latitude: r.coordinate.latitude,
            longitude: r.coordinate.longitude,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::schema::memory_pool;
    use crate::database::SqliteReportStore;
    use crate::services::address_service::LOCATION_NOT_AVAILABLE;
    use crate::services::test_support::{components, report_at, CannedGeocoder};

    const PUNE: Coordinate = Coordinate::new(18.5204, 73.8567);

    fn request(title: &str, lat: f64, lng: f64, owner: &str) -> NewReportRequest {
        NewReportRequest {
            title: title.to_string(),
            category: "Pothole".to_string(),
            latitude: Some(lat),
            longitude: Some(lng),
            owner_id: Some(owner.to_string()),
            ..NewReportRequest::default()
        }
    }

    async fn seeded_store() -> SqliteReportStore {
        let store = SqliteReportStore::new(memory_pool().await);
        for (title, lat, lng) in [
            ("pimpri", 18.6298, 73.7997),
            ("shivajinagar", 18.5314, 73.8446),
            ("camp", 18.5158, 73.8780),
            ("kothrud", 18.5074, 73.8077),
            ("swargate", 18.5018, 73.8636),
        ] {
            store
                .create_report(NewReport::try_from(request(title, lat, lng, "u1")).unwrap())
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn submit_validates_before_touching_the_store() {
        let store = SqliteReportStore::new(memory_pool().await);
        let err = submit_report(&store, request(" ", 18.5, 73.8, "u1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::MissingTitle)
        ));
        assert!(store.list_all_reports().await.unwrap().is_empty());

        let id = submit_report(&store, request("Broken pipe", 18.5, 73.8, "u1"))
            .await
            .unwrap();
        assert!(store.get_report(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn nearby_feed_truncates_and_labels_distances() {
        let store = seeded_store().await;
        let feed = nearby_feed(&store, PUNE, 10.0, 3).await.unwrap();

        // Newest first: swargate, kothrud, camp, shivajinagar are in range; pimpri is not.
        let titles: Vec<&str> = feed.iter().map(|v| v.card.title.as_str()).collect();
        assert_eq!(titles, vec!["swargate", "kothrud", "camp"]);
        for view in &feed {
            assert!(view.distance_km < 10.0);
            assert_eq!(view.distance_label, geo_service::format_distance(view.distance_km));
        }

        let all = nearby_feed(&store, PUNE, 10.0, 50).await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn community_feed_filters_by_status_and_marks_viewer_votes() {
        let store = seeded_store().await;
        let reports = store.list_all_reports().await.unwrap();
        let voted = &reports[0].id;
        let working = &reports[1].id;
        cast_vote(&store, voted, "viewer", true).await.unwrap();
        change_status(&store, working, 2).await.unwrap();

        let feed = community_feed(&store, None, Some("viewer")).await.unwrap();
        assert_eq!(feed.reports.len(), 5);
        assert!(feed.reports[0].has_voted);
        assert_eq!(feed.reports[0].card.vote_count, 1);
        assert!(!feed.reports[1].has_voted);

        let feed = community_feed(&store, Some(ReportStatus::Working), None)
            .await
            .unwrap();
        assert_eq!(feed.status_filter, Some(2));
        assert_eq!(feed.reports.len(), 1);
        assert_eq!(&feed.reports[0].card.id, working);
        let reached: Vec<bool> = feed.reports[0].progress.iter().map(|s| s.reached).collect();
        assert_eq!(reached, vec![true, true, true, false]);
    }

    #[tokio::test]
    async fn vote_and_status_inputs_are_validated() {
        let store = seeded_store().await;
        let id = store.list_all_reports().await.unwrap()[0].id.clone();

        assert!(matches!(
            cast_vote(&store, &id, "  ", true).await,
            Err(ServiceError::Validation(ValidationError::MissingUserId))
        ));
        assert!(matches!(
            change_status(&store, &id, 7).await,
            Err(ServiceError::Validation(ValidationError::InvalidStatus(7)))
        ));
        assert!(matches!(
            cast_vote(&store, "ghost", "u2", true).await,
            Err(ServiceError::Store(StoreError::NotFound(_)))
        ));
    }

    #[test]
    fn status_progress_reaches_up_to_current() {
        let steps = status_progress(ReportStatus::Reported);
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].label, "Reported");
        assert!(steps[0].reached);
        assert!(steps[1..].iter().all(|s| !s.reached));
        assert!(status_progress(ReportStatus::Completed).iter().all(|s| s.reached));
    }

    #[tokio::test]
    async fn profile_summary_counts_and_resolves_addresses() {
        let store = seeded_store().await;
        let other = store
            .create_report(
                NewReport::try_from(request("elsewhere", 19.07, 72.87, "u2")).unwrap(),
            )
            .await
            .unwrap();
        let mine = store.list_reports_by_owner("u1").await.unwrap();
        change_status(&store, &mine[0].id, 3).await.unwrap();

        let geocoder = CannedGeocoder::new(components(&[("street", "MG Road"), ("city", "Pune")]));
        let summary = profile_summary(&store, &geocoder, "u1", 2).await.unwrap();
        assert_eq!(
            summary.stats,
            ProfileStats {
                total: 5,
                completed: 1,
                in_progress: 4
            }
        );
        assert_eq!(summary.reports.len(), 5);
        assert_eq!(summary.addresses.len(), 5);
        assert!(summary.addresses.values().all(|a| a == "MG Road, Pune"));
        assert!(!summary.addresses.contains_key(&other));
        assert_eq!(geocoder.calls(), 5);
    }

    #[test]
    fn profile_stats_for_unset_location_report_still_counts() {
        let mut done = report_at("done", Coordinate::UNSET);
        done.status = ReportStatus::Completed;
        let stats = profile_stats(&[done, report_at("open", PUNE)]);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.in_progress, 1);
    }

    #[tokio::test]
    async fn legacy_unset_report_resolves_to_sentinel() {
        let reports = vec![report_at("legacy", Coordinate::UNSET)];
        let addresses =
            address_service::resolve_addresses(&CannedGeocoder::empty(), &reports, 1).await;
        assert_eq!(addresses["legacy"], LOCATION_NOT_AVAILABLE);
    }

    #[test]
    fn map_markers_skip_reports_without_a_location() {
        let reports = vec![
            report_at("a", PUNE),
            report_at("b", Coordinate::UNSET),
            report_at("c", Coordinate::new(f64::NAN, 1.0)),
        ];
        let markers = map_markers(&reports);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].id, "a");
        assert_eq!(markers[0].status_label, "Reported");
    }
}
