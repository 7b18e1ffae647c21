use crate::core::{distance::haversine_distance, normalize::normalize_token};
use crate::models::{Day, MatchQuery, Provider, ScoreBreakdown, ScoringWeights, SignalSettings, MAX_RATING};

/// Signal value for a dimension the query does not ask about, or that the
/// provider cannot be judged on
pub const NEUTRAL_SIGNAL: f64 = 0.5;

/// Calculate a match score (0-100) and its breakdown for one provider
///
/// Scoring formula:
/// score = (
///     geography    * w.geography +     # Closer = higher
///     services     * w.services +      # Share of requested services offered
///     expertise    * w.expertise +     # Share of requested expertise held
///     availability * w.availability +  # Works the requested day/slot
///     reputation   * w.reputation      # rating / 5
/// ) * 100
pub fn calculate_match_score(
    provider: &Provider,
    query: &MatchQuery,
    weights: &ScoringWeights,
    settings: &SignalSettings,
) -> (f64, ScoreBreakdown, Option<f64>) {
    let distance_km = match (query.origin(), provider.coordinates()) {
        (Some((qlat, qlng)), Some((plat, plng))) => Some(haversine_distance(qlat, qlng, plat, plng)),
        _ => None,
    };

    let decay_km = query.radius_km.map(|r| r * 0.5).unwrap_or(settings.distance_decay_km);

    let breakdown = ScoreBreakdown {
        geography: geography_score(distance_km, decay_km),
        services: overlap_score(&query.services, &provider.services),
        expertise: overlap_score(&query.expertise, &provider.expertise),
        availability: availability_score(
            provider,
            query.day,
            query.slot.as_deref(),
            settings.slot_mismatch_credit,
        ),
        reputation: reputation_score(provider.rating),
    };

    (composite_score(&breakdown, weights), breakdown, distance_km)
}

/// Weighted combination of the signals, scaled to 0-100
#[inline]
pub fn composite_score(breakdown: &ScoreBreakdown, weights: &ScoringWeights) -> f64 {
    let total = (breakdown.geography * weights.geography
        + breakdown.services * weights.services
        + breakdown.expertise * weights.expertise
        + breakdown.availability * weights.availability
        + breakdown.reputation * weights.reputation)
        * 100.0;

    total.clamp(0.0, 100.0)
}

/// Geography score (0-1), exponentially decaying with distance
///
/// `None` means one side has no coordinates and yields the neutral value.
#[inline]
pub fn geography_score(distance_km: Option<f64>, decay_km: f64) -> f64 {
    match distance_km {
        Some(d) if decay_km > 0.0 => (-d / decay_km).exp(),
        Some(_) => 0.0,
        None => NEUTRAL_SIGNAL,
    }
}

/// Share of the requested tags the provider offers (0-1)
///
/// An empty request is neutral. Duplicate requested tags count once.
#[inline]
pub fn overlap_score<T: PartialEq>(requested: &[T], offered: &[T]) -> f64 {
    let mut distinct: Vec<&T> = Vec::with_capacity(requested.len());
    for tag in requested {
        if !distinct.contains(&tag) {
            distinct.push(tag);
        }
    }

    if distinct.is_empty() {
        return NEUTRAL_SIGNAL;
    }

    let hits = distinct.iter().filter(|tag| offered.contains(**tag)).count();
    hits as f64 / distinct.len() as f64
}

/// Availability score (0-1)
///
/// * day and slot requested: 1.0 on an exact slot, `slot_mismatch_credit`
///   when only the day matches, 0.0 otherwise
/// * day only: 1.0 when the provider works that day
/// * slot only: 1.0 when any day carries the slot
/// * neither: neutral
pub fn availability_score(
    provider: &Provider,
    day: Option<Day>,
    slot: Option<&str>,
    slot_mismatch_credit: f64,
) -> f64 {
    let slot = slot.map(normalize_token).filter(|s| !s.is_empty());
    let has_slot = |slots: &[String], wanted: &str| slots.iter().any(|s| normalize_token(s) == wanted);

    match (day, slot) {
        (None, None) => NEUTRAL_SIGNAL,
        (Some(day), None) => match provider.availability_on(day) {
            Some(_) => 1.0,
            None => 0.0,
        },
        (Some(day), Some(slot)) => match provider.availability_on(day) {
            Some(entry) if has_slot(entry.slots.as_slice(), slot.as_str()) => 1.0,
            Some(_) => slot_mismatch_credit.clamp(0.0, 1.0),
            None => 0.0,
        },
        (None, Some(slot)) => {
            if provider.availability.iter().any(|entry| has_slot(entry.slots.as_slice(), slot.as_str())) {
                1.0
            } else {
                0.0
            }
        }
    }
}

/// Reputation score (0-1): rating normalized against the rating scale
#[inline]
pub fn reputation_score(rating: f64) -> f64 {
    if !rating.is_finite() {
        return 0.0;
    }
    (rating / MAX_RATING).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Availability, Expertise, Service};

    fn create_test_provider() -> Provider {
        Provider {
            id: "p1".to_string(),
            name: "Test Nurse".to_string(),
            city: "Tel Aviv".to_string(),
            lat: Some(32.0853),
            lng: Some(34.7818),
            rating: 4.5,
            reviews_count: 12,
            services: vec![Service::WoundCare, Service::Medication],
            expertise: vec![Expertise::NightShift],
            availability: vec![
                Availability { day: Day::Mon, slots: vec!["morning".to_string()] },
                Availability { day: Day::Thu, slots: vec!["evening".to_string(), "night".to_string()] },
            ],
        }
    }

    #[test]
    fn test_geography_score() {
        assert_eq!(geography_score(Some(0.0), 10.0), 1.0);
        assert_eq!(geography_score(None, 10.0), NEUTRAL_SIGNAL);

        let near = geography_score(Some(1.0), 10.0);
        let far = geography_score(Some(8.0), 10.0);
        assert!(near > far);
        assert!(far > 0.0);
    }

    #[test]
    fn test_overlap_score() {
        let offered = vec![Service::WoundCare, Service::Medication];

        assert_eq!(overlap_score(&[Service::WoundCare], &offered), 1.0);
        assert_eq!(overlap_score(&[Service::WoundCare, Service::Stoma], &offered), 0.5);
        assert_eq!(overlap_score(&[Service::WoundCare, Service::WoundCare], &offered), 1.0);
        assert_eq!(overlap_score::<Service>(&[], &offered), NEUTRAL_SIGNAL);
        assert_eq!(overlap_score(&[Service::Stoma], &[]), 0.0);
    }

    #[test]
    fn test_availability_score() {
        let provider = create_test_provider();

        assert_eq!(availability_score(&provider, None, None, 0.25), NEUTRAL_SIGNAL);
        assert_eq!(availability_score(&provider, Some(Day::Mon), None, 0.25), 1.0);
        assert_eq!(availability_score(&provider, Some(Day::Tue), None, 0.25), 0.0);
        assert_eq!(availability_score(&provider, Some(Day::Thu), Some("NIGHT"), 0.25), 1.0);
        assert_eq!(availability_score(&provider, Some(Day::Mon), Some("night"), 0.25), 0.25);
        assert_eq!(availability_score(&provider, None, Some("evening"), 0.25), 1.0);
        assert_eq!(availability_score(&provider, None, Some("afternoon"), 0.25), 0.0);
    }

    #[test]
    fn test_reputation_score() {
        assert_eq!(reputation_score(5.0), 1.0);
        assert_eq!(reputation_score(2.5), 0.5);
        assert_eq!(reputation_score(9.0), 1.0);
        assert_eq!(reputation_score(f64::NAN), 0.0);
    }

    #[test]
    fn test_calculate_match_score_bounds() {
        let provider = create_test_provider();
        let query = MatchQuery {
            lat: Some(32.08),
            lng: Some(34.78),
            services: vec![Service::WoundCare],
            day: Some(Day::Thu),
            slot: Some("evening".to_string()),
            ..Default::default()
        };

        let (score, breakdown, distance) =
            calculate_match_score(&provider, &query, &ScoringWeights::default(), &SignalSettings::default());

        assert!((0.0..=100.0).contains(&score));
        assert_eq!(breakdown.services, 1.0);
        assert_eq!(breakdown.availability, 1.0);
        assert_eq!(breakdown.expertise, NEUTRAL_SIGNAL);
        assert!(distance.unwrap() < 1.0);
    }

    #[test]
    fn test_empty_query_only_reputation_differs() {
        let mut low = create_test_provider();
        low.rating = 3.0;
        let high = create_test_provider();
        let query = MatchQuery::default();
        let weights = ScoringWeights::default();
        let settings = SignalSettings::default();

        let (low_score, low_bd, _) = calculate_match_score(&low, &query, &weights, &settings);
        let (high_score, high_bd, _) = calculate_match_score(&high, &query, &weights, &settings);

        assert!(high_score > low_score);
        assert_eq!(low_bd.geography, high_bd.geography);
        assert_eq!(low_bd.services, high_bd.services);
        assert_eq!(low_bd.availability, high_bd.availability);
    }
}
