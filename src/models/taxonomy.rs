use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::normalize::normalize_token;

/// Error returned when a string is not part of the canonical taxonomy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} tag: {value:?}")]
pub struct UnknownTag {
    pub kind: &'static str,
    pub value: String,
}

/// Canonical service tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Service {
    WoundCare,
    Medication,
    Hospital,
    HomeCare,
    Pediatrics,
    DayNight,
    Circumcision,
    General,
    Catheter,
    Stoma,
    Enema,
}

impl Service {
    pub const ALL: [Service; 11] = [
        Service::WoundCare,
        Service::Medication,
        Service::Hospital,
        Service::HomeCare,
        Service::Pediatrics,
        Service::DayNight,
        Service::Circumcision,
        Service::General,
        Service::Catheter,
        Service::Stoma,
        Service::Enema,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::WoundCare => "wound care",
            Service::Medication => "medication",
            Service::Hospital => "hospital",
            Service::HomeCare => "home care",
            Service::Pediatrics => "pediatrics",
            Service::DayNight => "day night",
            Service::Circumcision => "circumcision",
            Service::General => "general",
            Service::Catheter => "catheter",
            Service::Stoma => "stoma",
            Service::Enema => "enema",
        }
    }
}

/// Canonical expertise tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Expertise {
    Independent,
    MobilityWalker,
    MobilityWheelchair,
    MobilityBedridden,
    MobilityCane,
    Experienced,
    Active,
    UrgentCare,
    NightShift,
    DayShift,
}

impl Expertise {
    pub const ALL: [Expertise; 10] = [
        Expertise::Independent,
        Expertise::MobilityWalker,
        Expertise::MobilityWheelchair,
        Expertise::MobilityBedridden,
        Expertise::MobilityCane,
        Expertise::Experienced,
        Expertise::Active,
        Expertise::UrgentCare,
        Expertise::NightShift,
        Expertise::DayShift,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Expertise::Independent => "independent",
            Expertise::MobilityWalker => "mobility-walker",
            Expertise::MobilityWheelchair => "mobility-wheelchair",
            Expertise::MobilityBedridden => "mobility-bedridden",
            Expertise::MobilityCane => "mobility-cane",
            Expertise::Experienced => "experienced",
            Expertise::Active => "active",
            Expertise::UrgentCare => "urgent-care",
            Expertise::NightShift => "night-shift",
            Expertise::DayShift => "day-shift",
        }
    }
}

/// Day of the week an availability entry applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Day {
    pub const ALL: [Day; 7] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri, Day::Sat, Day::Sun];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Mon => "mon",
            Day::Tue => "tue",
            Day::Wed => "wed",
            Day::Thu => "thu",
            Day::Fri => "fri",
            Day::Sat => "sat",
            Day::Sun => "sun",
        }
    }

    fn full_name(&self) -> &'static str {
        match self {
            Day::Mon => "monday",
            Day::Tue => "tuesday",
            Day::Wed => "wednesday",
            Day::Thu => "thursday",
            Day::Fri => "friday",
            Day::Sat => "saturday",
            Day::Sun => "sunday",
        }
    }
}

macro_rules! impl_tag_text {
    ($ty:ident, $kind:literal, $matches:expr) => {
        impl FromStr for $ty {
            type Err = UnknownTag;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let token = normalize_token(s);
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|tag| $matches(tag, token.as_str()))
                    .ok_or_else(|| UnknownTag {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl TryFrom<String> for $ty {
            type Error = UnknownTag;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$ty> for &'static str {
            fn from(value: $ty) -> Self {
                value.as_str()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_tag_text!(Service, "service", |tag: &Service, token: &str| {
    normalize_token(tag.as_str()) == token
});
impl_tag_text!(Expertise, "expertise", |tag: &Expertise, token: &str| {
    normalize_token(tag.as_str()) == token
});
impl_tag_text!(Day, "day", |tag: &Day, token: &str| {
    tag.as_str() == token || tag.full_name() == token
});

/// Deserialize a tag list, dropping values outside the taxonomy
///
/// Stored records come from upstream systems we do not control, so a single
/// unknown tag must not reject the whole record. Duplicates are removed,
/// keeping the first occurrence.
pub fn lenient_tags<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = UnknownTag> + PartialEq,
{
    let raw: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(parse_tags(raw.unwrap_or_default()))
}

/// Parse tag strings, dropping unknown values and duplicates
pub fn parse_tags<T, I, S>(raw: I) -> Vec<T>
where
    T: FromStr<Err = UnknownTag> + PartialEq,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags: Vec<T> = Vec::new();
    for value in raw {
        match value.as_ref().parse::<T>() {
            Ok(tag) => {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
            Err(e) => tracing::warn!("Dropping tag outside the taxonomy: {}", e),
        }
    }
    tags
}
