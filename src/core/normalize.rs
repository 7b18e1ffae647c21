use crate::models::{Availability, Expertise, Provider, RawProviderRow, Service};

/// Known raw spellings for each canonical service, in scan order
const SERVICE_SYNONYMS: &[(Service, &[&str])] = &[
    (Service::WoundCare, &["wound", "wound_treatment", "wound_care", "WOUND_CARE"]),
    (Service::Medication, &["medication", "meds", "MEDICATION", "MEDICATION_ARRANGEMENT"]),
    (Service::Hospital, &["hospital", "_hospital", "PRIVATE_SECURITY_HOSPITAL"]),
    (Service::HomeCare, &["_home", "home", "PRIVATE_SECURITY_HOME"]),
    (Service::Pediatrics, &["pediatrics", "child", "kids", "PEDIATRICS"]),
    (Service::DayNight, &["day_night", "DAY_NIGHT", "DAY_NIGHT_CIRCUMCISION_NURSE"]),
    (Service::Circumcision, &["circumcision", "CIRCUMCISION_NURSE"]),
    (Service::General, &["default", "general", "nurse", "DEFAULT"]),
    (Service::Catheter, &["catheter", "CENTRAL_CATHETER_TREATMENT"]),
    (Service::Stoma, &["stoma", "STOMA_TREATMENT"]),
    (Service::Enema, &["enema", "ENEMA_UNDER_INSTRUCTION"]),
];

/// Mobility codes and the expertise each one implies
const MOBILITY_EXPERTISE: &[(&str, Expertise)] = &[
    ("INDEPENDENT", Expertise::Independent),
    ("WALKER", Expertise::MobilityWalker),
    ("WHEELCHAIR", Expertise::MobilityWheelchair),
    ("BEDRIDDEN", Expertise::MobilityBedridden),
    ("WALKING_CANE", Expertise::MobilityCane),
];

/// Remark keywords and the expertise each one implies
const REMARK_EXPERTISE: &[(&str, Expertise)] = &[
    ("urgent", Expertise::UrgentCare),
    ("night", Expertise::NightShift),
    ("day", Expertise::DayShift),
];

/// Common comparison unit: lower-cased, `_` and `-` turned into spaces, trimmed
pub fn normalize_token(raw: &str) -> String {
    raw.to_lowercase().replace(['_', '-'], " ").trim().to_string()
}

fn push_unique<T: PartialEq>(tags: &mut Vec<T>, tag: T) {
    if !tags.contains(&tag) {
        tags.push(tag);
    }
}

/// Map raw treatment type, name and remarks onto canonical services
///
/// Each field is scanned against the whole synonym table and the hits are
/// unioned. Never returns an empty list: with no hit at all the result is
/// exactly `[General]`.
pub fn extract_services(
    treatment_type: Option<&str>,
    name: Option<&str>,
    remarks: Option<&str>,
) -> Vec<Service> {
    let mut services = Vec::new();

    for field in [treatment_type, name, remarks].into_iter().flatten() {
        let normalized = normalize_token(field);
        if normalized.is_empty() {
            continue;
        }

        for (service, synonyms) in SERVICE_SYNONYMS {
            let hit = synonyms
                .iter()
                .any(|syn| field == *syn || normalized.contains(&normalize_token(syn)));
            if hit {
                push_unique(&mut services, *service);
            }
        }
    }

    if services.is_empty() {
        services.push(Service::General);
    }

    services
}

/// Map raw mobility, status and remarks onto canonical expertise tags
///
/// Status may yield both `Experienced` and `Active` at once; remarks may
/// yield any combination of shift tags. An empty result is valid.
pub fn extract_expertise(
    mobility: Option<&str>,
    status: Option<&str>,
    remarks: Option<&str>,
) -> Vec<Expertise> {
    let mut expertise = Vec::new();

    if let Some(mobility) = mobility {
        let normalized = normalize_token(mobility);
        if let Some((_, tag)) = MOBILITY_EXPERTISE
            .iter()
            .find(|(code, _)| normalize_token(code) == normalized)
        {
            push_unique(&mut expertise, *tag);
        }
    }

    if let Some(status) = status {
        let normalized = normalize_token(status);
        if normalized.contains("cancelled") || normalized.contains("closed") {
            push_unique(&mut expertise, Expertise::Experienced);
        }
        if normalized.contains("active") {
            push_unique(&mut expertise, Expertise::Active);
        }
    }

    if let Some(remarks) = remarks {
        let normalized = normalize_token(remarks);
        for (keyword, tag) in REMARK_EXPERTISE {
            if normalized.contains(keyword) {
                push_unique(&mut expertise, *tag);
            }
        }
    }

    expertise
}

/// Re-derive services from tags that are already canonical names
pub fn canonicalize_services<S: AsRef<str>>(tags: &[S]) -> Vec<Service> {
    let mut services = Vec::new();
    for tag in tags {
        let tag = tag.as_ref();
        if normalize_token(tag).is_empty() {
            continue;
        }
        for service in extract_services(Some(tag), None, None) {
            push_unique(&mut services, service);
        }
    }
    if services.is_empty() {
        services.push(Service::General);
    }
    services
}

/// Fold a raw ingestion row into a canonical provider
pub fn normalize_row(row: RawProviderRow) -> Provider {
    let services = extract_services(
        row.treatment_type.as_deref(),
        row.name.as_deref(),
        row.remarks.as_deref(),
    );
    let expertise = extract_expertise(
        row.mobility.as_deref(),
        row.status.as_deref(),
        row.remarks.as_deref(),
    );

    Provider {
        id: row.id,
        name: row.name.unwrap_or_default(),
        city: row.city.unwrap_or_default(),
        lat: row.lat,
        lng: row.lng,
        rating: row.rating.unwrap_or(0.0),
        reviews_count: row.reviews_count.unwrap_or(0),
        services,
        expertise,
        availability: merge_availability(row.availability),
    }
}

/// Collapse repeated days into one entry each, keeping first-seen order
fn merge_availability(entries: Vec<Availability>) -> Vec<Availability> {
    let mut merged: Vec<Availability> = Vec::with_capacity(entries.len());
    for entry in entries {
        let existing = merged.iter_mut().find(|e| e.day == entry.day);
        match existing {
            Some(existing) => {
                for slot in entry.slots {
                    push_unique(&mut existing.slots, slot);
                }
            }
            None => {
                let mut slots = Vec::with_capacity(entry.slots.len());
                for slot in entry.slots {
                    push_unique(&mut slots, slot);
                }
                merged.push(Availability { day: entry.day, slots });
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Day;

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("  WOUND_CARE "), "wound care");
        assert_eq!(normalize_token("Day-Night"), "day night");
        assert_eq!(normalize_token(""), "");
    }

    #[test]
    fn test_legacy_code_maps_to_service() {
        let services = extract_services(Some("WOUND_CARE"), None, None);
        assert_eq!(services, vec![Service::WoundCare]);
    }

    #[test]
    fn test_fallback_only_when_union_empty() {
        assert_eq!(extract_services(None, None, None), vec![Service::General]);
        assert_eq!(
            extract_services(Some("xyz"), Some("Dana"), Some("  ")),
            vec![Service::General]
        );

        // A hit in remarks suppresses the fallback even if the other fields miss
        let services = extract_services(Some("xyz"), Some("Dana"), Some("stoma bag change"));
        assert_eq!(services, vec![Service::Stoma]);
    }

    #[test]
    fn test_fields_are_unioned_in_first_match_order() {
        let services = extract_services(
            Some("PRIVATE_SECURITY_HOSPITAL"),
            Some("Home nurse"),
            Some("meds and wound dressing"),
        );
        assert_eq!(
            services,
            vec![
                Service::Hospital,
                Service::HomeCare,
                Service::General,
                Service::WoundCare,
                Service::Medication,
            ]
        );
    }

    #[test]
    fn test_compound_code_hits_several_services() {
        let services = extract_services(Some("DAY_NIGHT_CIRCUMCISION_NURSE"), None, None);
        assert!(services.contains(&Service::DayNight));
        assert!(services.contains(&Service::Circumcision));
        assert!(services.contains(&Service::General));
    }

    #[test]
    fn test_mobility_mapping() {
        assert_eq!(
            extract_expertise(Some("WHEELCHAIR"), None, None),
            vec![Expertise::MobilityWheelchair]
        );
        assert_eq!(
            extract_expertise(Some("walking-cane"), None, None),
            vec![Expertise::MobilityCane]
        );
        assert!(extract_expertise(Some("HOVERBOARD"), None, None).is_empty());
    }

    #[test]
    fn test_status_can_yield_both_tags() {
        let expertise = extract_expertise(None, Some("ACTIVE_AFTER_CLOSED"), None);
        assert_eq!(expertise, vec![Expertise::Experienced, Expertise::Active]);
    }

    #[test]
    fn test_remarks_substrings() {
        let expertise = extract_expertise(None, None, Some("daytime urgent transfer at night"));
        assert_eq!(
            expertise,
            vec![Expertise::UrgentCare, Expertise::NightShift, Expertise::DayShift]
        );
    }

    #[test]
    fn test_canonical_services_are_fixed_points() {
        for service in Service::ALL {
            assert_eq!(
                canonicalize_services(&[service.as_str()]),
                vec![service],
                "{} should re-normalize to itself",
                service
            );
        }

        let once = extract_services(Some("WOUND_CARE"), Some("Meds nurse"), None);
        let names: Vec<&str> = once.iter().map(|s| s.as_str()).collect();
        assert_eq!(canonicalize_services(&names), once);
    }

    #[test]
    fn test_normalize_row_merges_duplicate_days() {
        let row = RawProviderRow {
            id: "r1".to_string(),
            name: Some("Rina".to_string()),
            treatment_type: Some("STOMA_TREATMENT".to_string()),
            mobility: Some("BEDRIDDEN".to_string()),
            availability: vec![
                Availability { day: Day::Mon, slots: vec!["morning".to_string()] },
                Availability { day: Day::Wed, slots: vec!["evening".to_string()] },
                Availability {
                    day: Day::Mon,
                    slots: vec!["morning".to_string(), "night".to_string()],
                },
            ],
            ..Default::default()
        };

        let provider = normalize_row(row);
        assert_eq!(provider.services, vec![Service::Stoma]);
        assert_eq!(provider.expertise, vec![Expertise::MobilityBedridden]);
        assert_eq!(provider.availability.len(), 2);
        assert_eq!(provider.availability[0].day, Day::Mon);
        assert_eq!(provider.availability[0].slots, vec!["morning", "night"]);
        assert_eq!(provider.rating, 0.0);
    }
}
