mod fallback;

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use fallback::fallback_catalog;

// a single company entry as it appears in the data document
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Record {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name_en: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name_ar: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub location_link: Option<String>,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub longitude: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subscription_plan_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub package_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub verified: bool,
}

impl Record {
    /// True when the record carries a non-empty location link.
    pub fn has_location_link(&self) -> bool {
        self.location_link
            .as_deref()
            .is_some_and(|link| !link.is_empty())
    }

    /// English name, Arabic name, email and phone are searched.
    /// `term` is expected to be trimmed and lowercased already.
    pub fn matches_search(&self, term: &str) -> bool {
        self.name_en.to_lowercase().contains(term)
            || self.name_ar.contains(term)
            || self.email.to_lowercase().contains(term)
            || self
                .phone
                .as_deref()
                .is_some_and(|phone| !phone.is_empty() && phone.contains(term))
    }
}

// exported rows carry explicit nulls for blank columns
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// coordinates show up both as "21.51" and as 21.51 in exported data
#[derive(Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Text(String),
    Number(f64),
}

fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Coordinate>::deserialize(deserializer)?;
    Ok(value.map(|c| match c {
        Coordinate::Text(text) => text,
        Coordinate::Number(number) => number.to_string(),
    }))
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Category {
    pub name: String,
    pub records: Vec<Record>,
}

/// Categories in document order, each holding its records in document order.
///
/// Record ids are assumed to be unique across the whole catalog. This is
/// not checked: conversion marks are keyed by id alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a category, replacing the records of an existing one with the
    /// same name while keeping its original position.
    pub fn insert(&mut self, name: impl Into<String>, records: Vec<Record>) {
        let name = name.into();
        match self.categories.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.records = records,
            None => self.categories.push(Category { name, records }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[Record]> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.records.as_slice())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.categories.iter().flat_map(|c| c.records.iter())
    }

    pub fn record_count(&self) -> usize {
        self.categories.iter().map(|c| c.records.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of category names to lists of company records")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut catalog = Catalog::new();
        while let Some((name, records)) = access.next_entry::<String, Vec<Record>>()? {
            catalog.insert(name, records);
        }
        Ok(catalog)
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

impl Serialize for Catalog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.records)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "Zeta": [
            {"id": 7, "name_en": "Zed Corp", "name_ar": "زد", "email": "z@z.com",
             "phone": null, "location_link": "", "latitude": 21.5, "longitude": "39.1",
             "subscription_plan_id": 1, "package_id": 2, "verified": true}
        ],
        "Alpha": [],
        "Mid": [
            {"id": 8, "name_en": "Mid Co", "name_ar": "وسط", "email": "m@m.com"}
        ]
    }"#;

    #[test]
    fn keeps_document_category_order() {
        let catalog = Catalog::from_json_str(DOC).unwrap();
        let names: Vec<_> = catalog.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(catalog.record_count(), 2);
    }

    #[test]
    fn optional_fields_default_when_missing() {
        let catalog = Catalog::from_json_str(DOC).unwrap();
        let mid = &catalog.get("Mid").unwrap()[0];
        assert_eq!(mid.phone, None);
        assert_eq!(mid.location_link, None);
        assert!(!mid.verified);
        assert_eq!(mid.subscription_plan_id, 0);
    }

    #[test]
    fn numeric_coordinates_become_text() {
        let catalog = Catalog::from_json_str(DOC).unwrap();
        let zed = &catalog.get("Zeta").unwrap()[0];
        assert_eq!(zed.latitude.as_deref(), Some("21.5"));
        assert_eq!(zed.longitude.as_deref(), Some("39.1"));
    }

    #[test]
    fn duplicate_category_keeps_first_position_last_value() {
        let raw = r#"{"A": [], "B": [], "A": [{"id": 1, "name_en": "x", "name_ar": "y"}]}"#;
        let catalog = Catalog::from_json_str(raw).unwrap();
        assert_eq!(catalog.categories()[0].name, "A");
        assert_eq!(catalog.get("A").unwrap().len(), 1);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn null_columns_take_their_defaults() {
        let raw = r#"{"Cafes": [
            {"id": 11, "name_en": "Bean", "name_ar": "بن", "email": null,
             "phone": null, "subscription_plan_id": null, "package_id": null,
             "verified": null},
            {"id": 12, "name_en": "Leaf", "name_ar": "ورق", "email": "l@l.sa",
             "subscription_plan_id": 2, "package_id": 1, "verified": true}
        ]}"#;
        let catalog = Catalog::from_json_str(raw).unwrap();
        let cafes = catalog.get("Cafes").unwrap();
        assert_eq!(cafes.len(), 2);
        assert_eq!(cafes[0].email, "");
        assert_eq!(cafes[0].subscription_plan_id, 0);
        assert_eq!(cafes[0].package_id, 0);
        assert!(!cafes[0].verified);
        assert!(cafes[1].verified);
        assert!(!cafes[0].matches_search("l@l"));
    }

    #[test]
    fn rejects_non_map_documents() {
        assert!(Catalog::from_json_str("[]").is_err());
        assert!(Catalog::from_json_str(r#"{"A": [{"id": "one"}]}"#).is_err());
    }

    #[test]
    fn empty_location_link_does_not_count() {
        let catalog = Catalog::from_json_str(DOC).unwrap();
        assert!(!catalog.get("Zeta").unwrap()[0].has_location_link());
    }

    #[test]
    fn serializes_back_in_order() {
        let catalog = Catalog::from_json_str(DOC).unwrap();
        let out = serde_json::to_string(&catalog).unwrap();
        let zeta = out.find("\"Zeta\"").unwrap();
        let alpha = out.find("\"Alpha\"").unwrap();
        assert!(zeta < alpha);
    }
}
