use crate::core::distance::{haversine_distance, is_within_bounding_box};
use crate::models::{BoundingBox, Provider};

/// Hard exclusion constraints derived from a validated query
///
/// Applied before any scoring; a provider failing one never reaches the
/// ranked list.
#[derive(Debug, Clone, Copy)]
pub struct ExclusionFilter {
    pub min_rating: Option<f64>,
    pub radius: Option<RadiusFilter>,
}

/// Distance cutoff around the query origin
#[derive(Debug, Clone, Copy)]
pub struct RadiusFilter {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: f64,
    pub bounding_box: BoundingBox,
}

/// Check the rating floor
#[inline]
pub fn meets_min_rating(provider: &Provider, min_rating: Option<f64>) -> bool {
    match min_rating {
        Some(min) => provider.rating >= min,
        None => true,
    }
}

/// Check the radius cutoff
///
/// Providers without coordinates cannot be placed and are kept; the
/// geography signal treats them as neutral instead.
#[inline]
pub fn within_radius(provider: &Provider, radius: &RadiusFilter) -> bool {
    let Some((lat, lng)) = provider.coordinates() else {
        return true;
    };

    if !is_within_bounding_box(lat, lng, &radius.bounding_box) {
        return false;
    }

    haversine_distance(radius.lat, radius.lng, lat, lng) <= radius.radius_km
}

impl ExclusionFilter {
    #[inline]
    pub fn admits(&self, provider: &Provider) -> bool {
        if !meets_min_rating(provider, self.min_rating) {
            return false;
        }
        match &self.radius {
            Some(radius) => within_radius(provider, radius),
            None => true,
        }
    }
}
