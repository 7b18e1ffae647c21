// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod matcher;
pub mod normalize;
pub mod scoring;

pub use distance::{haversine_distance, calculate_bounding_box, is_within_bounding_box};
pub use filters::{ExclusionFilter, RadiusFilter, meets_min_rating, within_radius};
pub use matcher::{Matcher, MatchError};
pub use normalize::{normalize_token, extract_services, extract_expertise, canonicalize_services, normalize_row};
pub use scoring::{calculate_match_score, NEUTRAL_SIGNAL};
