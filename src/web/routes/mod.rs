pub mod health;
pub mod location;
pub mod reports;
