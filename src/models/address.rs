use serde::{Deserialize, Serialize};

// Best-match structured address from a reverse geocoder. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressComponents {
    pub street: Option<String>,
    pub street_number: Option<String>,
    pub name: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub subregion: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
}
