//! Query Engine
//!
//! `apply` turns a snapshot plus the user's criteria into the ordered list of
//! visible capabilities. It only reads the snapshot; the result is a new
//! vector of borrowed entries.

use crate::model::{Capability, Snapshot};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Capacity bucket used by the availability filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// More than 30 hours/week
    High,
    /// 20 to 30 hours/week inclusive
    Medium,
    /// Under 20 hours/week
    Low,
}

impl Availability {
    pub const ALL: [Availability; 3] = [Availability::High, Availability::Medium, Availability::Low];

    pub fn matches(self, capacity: f64) -> bool {
        match self {
            Availability::High => capacity > 30.0,
            Availability::Medium => (20.0..=30.0).contains(&capacity),
            Availability::Low => capacity < 20.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Availability::High => "high",
            Availability::Medium => "medium",
            Availability::Low => "low",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Availability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Availability::High),
            "medium" => Ok(Availability::Medium),
            "low" => Ok(Availability::Low),
            other => Err(format!("Unknown availability bucket: {} (expected high, medium or low)", other)),
        }
    }
}

/// Ordering applied to the filtered list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
    CapacityDesc,
    CapacityAsc,
    ConsultantsDesc,
    ConsultantsAsc,
    Practice,
    /// Anything we do not know; leaves snapshot order untouched.
    Unrecognized(String),
}

impl SortKey {
    pub const KNOWN: [SortKey; 7] = [
        SortKey::NameAsc,
        SortKey::NameDesc,
        SortKey::CapacityDesc,
        SortKey::CapacityAsc,
        SortKey::ConsultantsDesc,
        SortKey::ConsultantsAsc,
        SortKey::Practice,
    ];

    pub fn parse(s: &str) -> SortKey {
        match s {
            "name-asc" => SortKey::NameAsc,
            "name-desc" => SortKey::NameDesc,
            "capacity-desc" => SortKey::CapacityDesc,
            "capacity-asc" => SortKey::CapacityAsc,
            "consultants-desc" => SortKey::ConsultantsDesc,
            "consultants-asc" => SortKey::ConsultantsAsc,
            "practice" => SortKey::Practice,
            other => SortKey::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::CapacityDesc => "capacity-desc",
            SortKey::CapacityAsc => "capacity-asc",
            SortKey::ConsultantsDesc => "consultants-desc",
            SortKey::ConsultantsAsc => "consultants-asc",
            SortKey::Practice => "practice",
            SortKey::Unrecognized(raw) => raw,
        }
    }

    /// Human label for pickers.
    pub fn label(&self) -> &str {
        match self {
            SortKey::NameAsc => "Name (A-Z)",
            SortKey::NameDesc => "Name (Z-A)",
            SortKey::CapacityDesc => "Capacity (High to Low)",
            SortKey::CapacityAsc => "Capacity (Low to High)",
            SortKey::ConsultantsDesc => "Team Size (Largest)",
            SortKey::ConsultantsAsc => "Team Size (Smallest)",
            SortKey::Practice => "Practice Area",
            SortKey::Unrecognized(raw) => raw,
        }
    }

    fn compare(&self, a: (&str, &Capability), b: (&str, &Capability)) -> Ordering {
        let ((name_a, cap_a), (name_b, cap_b)) = (a, b);
        match self {
            SortKey::NameAsc => locale_cmp(name_a, name_b),
            SortKey::NameDesc => locale_cmp(name_b, name_a),
            SortKey::CapacityDesc => cap_b.capacity.total_cmp(&cap_a.capacity),
            SortKey::CapacityAsc => cap_a.capacity.total_cmp(&cap_b.capacity),
            SortKey::ConsultantsDesc => cap_b.consultant_count().cmp(&cap_a.consultant_count()),
            SortKey::ConsultantsAsc => cap_a.consultant_count().cmp(&cap_b.consultant_count()),
            SortKey::Practice => locale_cmp(&cap_a.practice_area, &cap_b.practice_area),
            SortKey::Unrecognized(_) => Ordering::Equal,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SortKey::parse(s))
    }
}

/// Current search/filter/sort selection. Lives in the controller, never
/// persisted, survives snapshot reloads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Criteria {
    pub search: String,
    pub practice_area: Option<String>,
    pub industry: Option<String>,
    pub availability: Option<Availability>,
    pub sort: SortKey,
}

impl Criteria {
    /// True when every filter passes `capability`. Sort is not consulted.
    pub fn matches(&self, name: &str, capability: &Capability) -> bool {
        self.matches_search(name, capability)
            && self.matches_practice(capability)
            && self.matches_industry(capability)
            && self.matches_availability(capability)
    }

    // Only the name and description are searched.
    fn matches_search(&self, name: &str, capability: &Capability) -> bool {
        let term = self.search.trim().to_lowercase();
        term.is_empty()
            || name.to_lowercase().contains(&term)
            || capability.description.to_lowercase().contains(&term)
    }

    fn matches_practice(&self, capability: &Capability) -> bool {
        match &self.practice_area {
            None => true,
            Some(area) => capability.practice_area == *area,
        }
    }

    fn matches_industry(&self, capability: &Capability) -> bool {
        match &self.industry {
            None => true,
            Some(industry) => capability.industries().iter().any(|i| i == industry),
        }
    }

    fn matches_availability(&self, capability: &Capability) -> bool {
        self.availability
            .map_or(true, |bucket| bucket.matches(capability.capacity))
    }
}

/// Filter then stable-sort the snapshot.
pub fn apply<'a>(snapshot: &'a Snapshot, criteria: &Criteria) -> Vec<(&'a str, &'a Capability)> {
    let mut visible: Vec<(&str, &Capability)> = snapshot
        .iter()
        .filter(|(name, capability)| criteria.matches(name, capability))
        .collect();
    visible.sort_by(|a, b| criteria.sort.compare(*a, *b));
    visible
}

/// String ordering that behaves like a user-facing collation: letters compare
/// with accents and case folded away first, then unaccented sorts before
/// accented, then lowercase before uppercase, then raw code points break any
/// remaining tie.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| lowercase_nfd(a).cmp(lowercase_nfd(b)))
        .then_with(|| {
            a.chars()
                .zip(b.chars())
                .find(|(x, y)| x != y)
                .map_or(Ordering::Equal, |(x, y)| {
                    x.is_uppercase().cmp(&y.is_uppercase())
                })
        })
        .then_with(|| a.cmp(b))
}

/// Lowercased canonical decomposition with combining marks dropped, so
/// "É" and "e" share a primary key.
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn lowercase_nfd(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}
