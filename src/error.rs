use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoder client could not be built: {0}")]
    Client(String),
    #[error("geocoder unreachable: {0}")]
    Unreachable(String),
    #[error("geocoder returned status {0}")]
    UpstreamStatus(u16),
    #[error("geocoder response could not be decoded: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("report {0} not found")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("please enter a title")]
    MissingTitle,
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("location not available")]
    LocationUnavailable,
    #[error("status ordinal {0} is outside 0..=3")]
    InvalidStatus(i64),
    #[error("user id is required")]
    MissingUserId,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
