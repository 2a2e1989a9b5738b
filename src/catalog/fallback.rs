use super::{Catalog, Record};

pub const FALLBACK_CATEGORIES: [&str; 5] = [
    "Goo.gl Links",
    "Google Maps Embed",
    "Google Maps Other",
    "Other Maps",
    "No Links",
];

// used when the data source cannot be loaded
pub fn fallback_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    for name in FALLBACK_CATEGORIES {
        catalog.insert(name, Vec::new());
    }
    catalog.insert(
        FALLBACK_CATEGORIES[0],
        vec![Record {
            id: 1,
            name_en: "Tech Solutions Inc".to_string(),
            name_ar: "حلول تقنية".to_string(),
            email: "info@techsolutions.com".to_string(),
            phone: Some("+966501234567".to_string()),
            website: Some("https://techsolutions.com".to_string()),
            location_link: Some("https://maps.app.goo.gl/XZutgH2i4ciaBZDQ9".to_string()),
            latitude: Some("21.510839".to_string()),
            longitude: Some("39.1808593".to_string()),
            subscription_plan_id: 2,
            package_id: 1,
            verified: false,
        }],
    );
    catalog
}
