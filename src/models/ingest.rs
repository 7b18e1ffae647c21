use serde::{Deserialize, Serialize};

use super::domain::{lenient_availability, Availability};

/// Raw provider row as delivered by an ingestion source
///
/// Identity, location and rating fields are already canonical. The free-text
/// fields use whatever vocabulary the upstream system had and are folded into
/// canonical tags by the normalizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProviderRow {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, alias = "reviews_count")]
    pub reviews_count: Option<u32>,
    #[serde(default, alias = "treatment_type")]
    pub treatment_type: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub mobility: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_availability")]
    pub availability: Vec<Availability>,
}
