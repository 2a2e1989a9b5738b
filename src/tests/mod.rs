use std::collections::HashSet;

use crate::catalog::{fallback_catalog, Catalog};
use crate::engine::{DirectoryEngine, CONVERTED_KEY};
use crate::store::{ConvertedStore, JsonFileStore, MemoryStore};

const SMALL_DOC: &str = r#"{
    "A": [{"id": 1, "name_en": "Tech", "name_ar": "ت", "email": "a@a.com",
           "phone": "123", "location_link": ""}],
    "B": []
}"#;

const SAMPLE_DOC: &str = r#"{
    "Goo.gl Links": [
        {"id": 1, "name_en": "Tech Solutions Inc", "name_ar": "حلول تقنية",
         "email": "info@techsolutions.com", "phone": "+966501234567",
         "website": "https://techsolutions.com",
         "location_link": "https://maps.app.goo.gl/XZutgH2i4ciaBZDQ9",
         "latitude": "21.510839", "longitude": "39.1808593",
         "subscription_plan_id": 2, "package_id": 1, "verified": false},
        {"id": 2, "name_en": "Digital Marketing Pro",
         "name_ar": "التسويق الرقمي المحترف",
         "email": "contact@digitalpro.com", "phone": "+966502345678",
         "website": "https://digitalpro.com",
         "location_link": "https://maps.app.goo.gl/ABC123DEF456",
         "latitude": "24.7136", "longitude": "46.6753",
         "subscription_plan_id": 3, "package_id": 2, "verified": true}
    ],
    "Google Maps Embed": [
        {"id": 3, "name_en": "Restaurant Al-Madinah", "name_ar": "مطعم المدينة",
         "email": "info@almadinah.com", "phone": "+966503456789",
         "location_link": "https://www.google.com/maps/embed?pb=!1m18",
         "subscription_plan_id": 2, "package_id": 1, "verified": false}
    ],
    "Other Maps": [
        {"id": 5, "name_en": "Fashion Store", "name_ar": "متجر الأزياء",
         "email": "info@fashionstore.com", "phone": "+966505678901",
         "location_link": "https://www.openstreetmap.org/?mlat=21.510839",
         "subscription_plan_id": 2, "package_id": 1, "verified": false}
    ],
    "No Links": [
        {"id": 6, "name_en": "Consulting Services", "name_ar": "خدمات استشارية",
         "email": "info@consulting.com", "phone": "+966506789012",
         "location_link": "", "latitude": "", "longitude": "",
         "subscription_plan_id": 3, "package_id": 2, "verified": true}
    ]
}"#;

fn ids(records: &[&crate::catalog::Record]) -> Vec<u64> {
    records.iter().map(|r| r.id).collect()
}

#[test]
fn small_catalog_walkthrough() {
    let catalog = Catalog::from_json_str(SMALL_DOC).unwrap();
    let mut engine = DirectoryEngine::new(catalog, MemoryStore::new());

    assert_eq!(ids(&engine.select_category("A")), vec![1]);
    assert_eq!(ids(&engine.apply_search("tech")), vec![1]);
    assert!(engine.apply_search("xyz").is_empty());

    engine.mark_converted(1);
    assert_eq!(ids(&engine.select_category(CONVERTED_KEY)), vec![1]);
}

#[test]
fn every_category_selects_verbatim() {
    let catalog = Catalog::from_json_str(SAMPLE_DOC).unwrap();
    let mut engine = DirectoryEngine::new(catalog.clone(), MemoryStore::new());
    for category in catalog.categories() {
        let visible: Vec<_> = engine
            .select_category(&category.name)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(visible, category.records);
    }
}

#[test]
fn converted_view_matches_set_size() {
    let catalog = Catalog::from_json_str(SAMPLE_DOC).unwrap();
    let mut engine = DirectoryEngine::new(catalog, MemoryStore::with_ids([6, 2, 3]));
    let visible = engine.select_category(CONVERTED_KEY);
    assert_eq!(ids(&visible), vec![2, 3, 6]);
    let unique: HashSet<_> = visible.iter().map(|r| r.id).collect();
    assert_eq!(unique.len(), 3);
    assert_eq!(engine.converted_ids().len(), 3);
}

#[test]
fn search_round_trip_restores_base_list() {
    let catalog = Catalog::from_json_str(SAMPLE_DOC).unwrap();
    let mut engine = DirectoryEngine::new(catalog, MemoryStore::new());
    let base = ids(&engine.select_category("Goo.gl Links"));
    assert_eq!(ids(&engine.apply_search("DIGITAL")), vec![2]);
    assert_eq!(ids(&engine.apply_search("")), base);
}

#[test]
fn search_predicates() {
    let catalog = Catalog::from_json_str(SAMPLE_DOC).unwrap();
    let mut engine = DirectoryEngine::new(catalog, MemoryStore::new());
    engine.select_category("Goo.gl Links");

    // English name and email ignore case
    assert_eq!(ids(&engine.apply_search("tech SOLUTIONS")), vec![1]);
    assert_eq!(ids(&engine.apply_search("CONTACT@DIGITALPRO")), vec![2]);
    // Arabic name verbatim
    assert_eq!(ids(&engine.apply_search("الرقمي")), vec![2]);
    // phone verbatim
    assert_eq!(ids(&engine.apply_search("502345")), vec![2]);
    // website and location link are not searched
    assert!(engine.apply_search("maps.app.goo.gl").is_empty());
}

#[test]
fn stats_ignore_converted_marks() {
    let catalog = Catalog::from_json_str(SAMPLE_DOC).unwrap();
    let mut engine = DirectoryEngine::new(catalog, MemoryStore::new());
    let before = engine.stats();
    assert_eq!(before.total, 5);
    assert_eq!(before.with_location_link, 4);
    assert_eq!(before.converted, 0);

    engine.mark_converted(5);
    engine.mark_converted(1234);
    let after = engine.stats();
    assert_eq!(after.total, before.total);
    assert_eq!(after.converted, 2);
}

#[test]
fn marks_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("convertedCompanies.json");

    let mut engine = DirectoryEngine::new(fallback_catalog(), JsonFileStore::new(&path));
    engine.mark_converted(1);
    engine.mark_converted(40);
    engine.unmark_converted(40);
    drop(engine);

    let mut engine = DirectoryEngine::new(fallback_catalog(), JsonFileStore::new(&path));
    assert!(engine.is_converted(1));
    assert!(!engine.is_converted(40));
    assert_eq!(ids(&engine.select_category(CONVERTED_KEY)), vec![1]);
}

#[test]
fn garbled_state_file_starts_empty_and_is_kept_aside() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("convertedCompanies.json");
    std::fs::write(&path, "not json").unwrap();

    let mut engine = DirectoryEngine::new(fallback_catalog(), JsonFileStore::new(&path));
    assert!(engine.converted_ids().is_empty());
    engine.mark_converted(1);
    let store = JsonFileStore::new(&path);
    assert!(store.load().unwrap().contains(&1));
    assert_eq!(std::fs::read_to_string(store.backup_path()).unwrap(), "not json");
}

#[test]
fn fallback_catalog_is_fully_interactive() {
    let mut engine = DirectoryEngine::new(fallback_catalog(), MemoryStore::new());
    assert_eq!(engine.category_counts().len(), 5);
    assert!(engine.select_category("Other Maps").is_empty());
    assert_eq!(ids(&engine.select_category("Goo.gl Links")), vec![1]);
    assert_eq!(ids(&engine.apply_search("حلول")), vec![1]);
    assert_eq!(engine.stats().with_location_link, 1);
}
