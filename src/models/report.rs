use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::ValidationError;
use crate::models::Coordinate;

pub const GUEST_OWNER_ID: &str = "guest";
pub const ANONYMOUS_OWNER_NAME: &str = "Anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ReportStatus {
    #[default]
    Reported,
    Validated,
    Working,
    Completed,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 4] = [
        ReportStatus::Reported,
        ReportStatus::Validated,
        ReportStatus::Working,
        ReportStatus::Completed,
    ];

    pub fn from_ordinal(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Reported),
            1 => Some(Self::Validated),
            2 => Some(Self::Working),
            3 => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn ordinal(self) -> i64 {
        self as i64
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Reported => "Reported",
            Self::Validated => "Validated",
            Self::Working => "Working",
            Self::Completed => "Completed",
        }
    }

    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Pothole,
    Garbage,
    Streetlight,
    WaterLeak,
    SewageBlock,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Pothole,
        Category::Garbage,
        Category::Streetlight,
        Category::WaterLeak,
        Category::SewageBlock,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Pothole => "Pothole",
            Self::Garbage => "Garbage",
            Self::Streetlight => "Streetlight",
            Self::WaterLeak => "Water Leak",
            Self::SewageBlock => "Sewage Block",
            Self::Other => "Other",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(raw))
    }
}

// Raw `reports` row. Votes live in their own table and are attached afterwards.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub status: i64,
    pub created_at: String,
    pub owner_id: String,
    pub owner_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub coordinate: Coordinate,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub owner_id: String,
    pub owner_name: String,
    pub votes: Vec<String>,
}

impl Report {
    pub fn from_row(row: ReportRow, votes: Vec<String>) -> Self {
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_default();
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            coordinate: Coordinate::new(row.latitude, row.longitude),
            image_url: row.image_url,
            audio_url: row.audio_url,
            status: ReportStatus::from_ordinal(row.status).unwrap_or_default(),
            created_at,
            owner_id: row.owner_id,
            owner_name: row.owner_name,
            votes,
        }
    }

    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    pub fn has_voted(&self, user_id: &str) -> bool {
        self.votes.iter().any(|v| v == user_id)
    }
}

// Media is uploaded elsewhere; only URLs arrive here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReportRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub owner_id: Option<String>,
    pub owner_name: Option<String>,
}

// Validated insert payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub coordinate: Coordinate,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub owner_id: String,
    pub owner_name: String,
}

impl TryFrom<NewReportRequest> for NewReport {
    type Error = ValidationError;

    fn try_from(req: NewReportRequest) -> Result<Self, Self::Error> {
        let title = req.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let category = Category::parse(&req.category)
            .ok_or_else(|| ValidationError::UnknownCategory(req.category.clone()))?;

        let coordinate = match (req.latitude, req.longitude) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng),
            _ => return Err(ValidationError::LocationUnavailable),
        };
        if !coordinate.is_known() {
            return Err(ValidationError::LocationUnavailable);
        }

        let description = req
            .description
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| title.clone());

        Ok(Self {
            title,
            description,
            category,
            coordinate,
            image_url: non_blank(req.image_url),
            audio_url: non_blank(req.audio_url),
            owner_id: non_blank(req.owner_id).unwrap_or_else(|| GUEST_OWNER_ID.to_string()),
            owner_name: non_blank(req.owner_name)
                .unwrap_or_else(|| ANONYMOUS_OWNER_NAME.to_string()),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NewReportRequest {
        NewReportRequest {
            title: "  Open manhole ".to_string(),
            category: "water leak".to_string(),
            latitude: Some(18.5204),
            longitude: Some(73.8567),
            ..NewReportRequest::default()
        }
    }

    #[test]
    fn status_ordinals_cover_lifecycle() {
        for status in ReportStatus::ALL {
            assert_eq!(ReportStatus::from_ordinal(status.ordinal()), Some(status));
        }
        assert_eq!(ReportStatus::from_ordinal(4), None);
        assert_eq!(ReportStatus::from_ordinal(-1), None);
        assert!(ReportStatus::Completed.is_completed());
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(Category::parse("Sewage Block"), Some(Category::SewageBlock));
        assert_eq!(Category::parse(" pothole"), Some(Category::Pothole));
        assert_eq!(Category::parse("Graffiti"), None);
    }

    #[test]
    fn new_report_defaults_description_and_owner() {
        let report = NewReport::try_from(request()).unwrap();
        assert_eq!(report.title, "Open manhole");
        assert_eq!(report.description, "Open manhole");
        assert_eq!(report.category, Category::WaterLeak);
        assert_eq!(report.owner_id, GUEST_OWNER_ID);
        assert_eq!(report.owner_name, ANONYMOUS_OWNER_NAME);
        assert_eq!(report.image_url, None);
    }

    #[test]
    fn new_report_rejects_missing_pieces() {
        let mut req = request();
        req.title = "   ".to_string();
        assert_eq!(
            NewReport::try_from(req),
            Err(ValidationError::MissingTitle)
        );

        let mut req = request();
        req.category = String::new();
        assert!(matches!(
            NewReport::try_from(req),
            Err(ValidationError::UnknownCategory(_))
        ));

        let mut req = request();
        req.latitude = Some(0.0);
        req.longitude = Some(0.0);
        assert_eq!(
            NewReport::try_from(req),
            Err(ValidationError::LocationUnavailable)
        );

        let mut req = request();
        req.longitude = None;
        assert_eq!(
            NewReport::try_from(req),
            Err(ValidationError::LocationUnavailable)
        );
    }

    #[test]
    fn unparseable_row_fields_fall_back() {
        let row = ReportRow {
            id: "r1".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            category: "Other".to_string(),
            latitude: 1.0,
            longitude: 2.0,
            image_url: None,
            audio_url: None,
            status: 9,
            created_at: "not a date".to_string(),
            owner_id: "u1".to_string(),
            owner_name: "Asha".to_string(),
        };
        let report = Report::from_row(row, vec!["u2".to_string()]);
        assert_eq!(report.status, ReportStatus::Reported);
        assert_eq!(report.created_at, DateTime::<Utc>::default());
        assert!(report.has_voted("u2"));
        assert_eq!(report.vote_count(), 1);
    }
}
