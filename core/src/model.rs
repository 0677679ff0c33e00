//! Capability data model
//!
//! A [`Snapshot`] is the full directory as returned by `GET /capabilities`:
//! a JSON object keyed by capability name. Key order from the backend is kept
//! because it is the order used when no sort applies and for the
//! registration picker.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A registrable skill/service offering.
///
/// The name lives in the snapshot key, not in the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub practice_area: String,

    /// Absent and empty mean the same thing for filtering; rendering shows
    /// "Not specified" only when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_verticals: Option<Vec<String>>,

    /// Weekly hours available. Null or missing reads as zero.
    #[serde(default, deserialize_with = "capacity_or_zero")]
    pub capacity: f64,

    /// Registered emails in backend order. Opaque strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultants: Option<Vec<String>>,
}

fn capacity_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl Capability {
    pub fn industries(&self) -> &[String] {
        self.industry_verticals.as_deref().unwrap_or(&[])
    }

    pub fn consultants(&self) -> &[String] {
        self.consultants.as_deref().unwrap_or(&[])
    }

    pub fn consultant_count(&self) -> usize {
        self.consultants().len()
    }

    pub fn has_consultant(&self, email: &str) -> bool {
        self.consultants().iter().any(|c| c == email)
    }
}

/// Every capability the backend knows about, keyed by unique name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    entries: Vec<(String, Capability)>,
    /// Name to position in `entries`
    index: HashMap<String, usize>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by name. A replaced entry keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, capability: Capability) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&position) => self.entries[position].1 = capability,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, capability));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.index.get(name).map(|&position| &self.entries[position].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Capability)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Distinct practice areas, sorted.
    pub fn practice_areas(&self) -> Vec<String> {
        let mut areas: Vec<String> = self
            .entries
            .iter()
            .map(|(_, c)| c.practice_area.clone())
            .filter(|a| !a.is_empty())
            .collect();
        areas.sort_by(|a, b| crate::query::locale_cmp(a, b));
        areas.dedup();
        areas
    }

    /// Distinct industry verticals across all capabilities, sorted.
    pub fn industry_verticals(&self) -> Vec<String> {
        let mut industries: Vec<String> = self
            .entries
            .iter()
            .flat_map(|(_, c)| c.industries().iter().cloned())
            .collect();
        industries.sort_by(|a, b| crate::query::locale_cmp(a, b));
        industries.dedup();
        industries
    }
}

impl FromIterator<(String, Capability)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, Capability)>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for (name, capability) in iter {
            snapshot.insert(name, capability);
        }
        snapshot
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, capability) in &self.entries {
            map.serialize_entry(name, capability)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = Snapshot;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping capability names to capabilities")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Snapshot, A::Error> {
                let mut snapshot = Snapshot::new();
                while let Some((name, capability)) =
                    access.next_entry::<String, Capability>()?
                {
                    snapshot.insert(name, capability);
                }
                Ok(snapshot)
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}
