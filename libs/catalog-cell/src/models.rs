// libs/catalog-cell/src/models.rs
use serde::{Deserialize, Serialize};

use mediva_cell::Service;

pub const XRAY_CATEGORY: &str = "X-Ray";
pub const ULTRASOUND_CATEGORY: &str = "Ultrasound";
pub const ECHO_CATEGORY: &str = "Echocardiography";
pub const OTHER_CATEGORY: &str = "Other";

// ==============================================================================
// CATALOG MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingItem {
    pub name: String,
    pub price: f64,
}

impl PricingItem {
    pub fn new(name: &str, price: f64) -> Self {
        Self { name: name.to_string(), price }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanCategory {
    pub name: String,
    pub tests: Vec<PricingItem>,
}

/// Scan names grouped by category, in display order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScanCatalog {
    pub categories: Vec<ScanCategory>,
}

impl ScanCatalog {
    /// The clinic's published price list: the five most requested tests per category.
    pub fn standard() -> Self {
        Self {
            categories: vec![
                ScanCategory {
                    name: XRAY_CATEGORY.to_string(),
                    tests: vec![
                        PricingItem::new("Chest AP View", 450.0),
                        PricingItem::new("Chest PA View", 450.0),
                        PricingItem::new("Cervical Spine AP View", 450.0),
                        PricingItem::new("Lumbar Spine AP View", 450.0),
                        PricingItem::new("Pelvis AP View", 450.0),
                    ],
                },
                ScanCategory {
                    name: ULTRASOUND_CATEGORY.to_string(),
                    tests: vec![
                        PricingItem::new("EARLY PREGNANCY SCAN", 2000.0),
                        PricingItem::new("NT SCAN", 2500.0),
                        PricingItem::new("ANOMALY SCAN", 4500.0),
                        PricingItem::new("GROWTH SCAN", 2500.0),
                        PricingItem::new("ABDOMEN & PELVIS", 2200.0),
                    ],
                },
            ],
        }
    }

    /// Groups remote services into categories. Names already in the standard
    /// table keep their category; the rest go through [`categorize`].
    pub fn from_services(services: &[Service]) -> Self {
        let standard = Self::standard();
        let mut catalog = Self::default();

        for service in services {
            let name = service.scan_name.trim();
            if name.is_empty() || catalog.contains(name) {
                continue;
            }

            let category = standard
                .test_category(name)
                .unwrap_or_else(|| categorize(name))
                .to_string();

            catalog.insert(&category, PricingItem::new(name, service.scan_price));
        }

        catalog
    }

    fn insert(&mut self, category: &str, item: PricingItem) {
        match self.categories.iter_mut().find(|c| c.name == category) {
            Some(existing) => existing.tests.push(item),
            None => self.categories.push(ScanCategory {
                name: category.to_string(),
                tests: vec![item],
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|c| c.tests.is_empty())
    }

    pub fn contains(&self, test_name: &str) -> bool {
        self.find(test_name).is_some()
    }

    fn find(&self, test_name: &str) -> Option<(&ScanCategory, &PricingItem)> {
        self.categories.iter().find_map(|category| {
            category.tests.iter()
                .find(|test| test.name == test_name)
                .map(|test| (category, test))
        })
    }

    pub fn all_test_names(&self) -> Vec<&str> {
        self.categories.iter()
            .flat_map(|category| category.tests.iter().map(|test| test.name.as_str()))
            .collect()
    }

    /// `None` when the scan is not in the catalog.
    pub fn test_price(&self, test_name: &str) -> Option<f64> {
        self.find(test_name).map(|(_, test)| test.price)
    }

    pub fn test_category(&self, test_name: &str) -> Option<&str> {
        self.find(test_name).map(|(category, _)| category.name.as_str())
    }

    /// Case-insensitive substring filter. Categories left empty are dropped.
    pub fn search(&self, term: &str) -> Vec<ScanCategory> {
        let needle = term.trim().to_lowercase();

        self.categories.iter()
            .filter_map(|category| {
                let tests: Vec<PricingItem> = category.tests.iter()
                    .filter(|test| test.name.to_lowercase().contains(&needle))
                    .cloned()
                    .collect();

                (!tests.is_empty()).then(|| ScanCategory {
                    name: category.name.clone(),
                    tests,
                })
            })
            .collect()
    }

    /// Sum of known prices; unknown scans count as zero.
    pub fn total_price<S: AsRef<str>>(&self, scans: &[S]) -> f64 {
        scans.iter()
            .filter_map(|scan| self.test_price(scan.as_ref()))
            .sum()
    }
}

/// Keyword rules for services that are not in the standard table.
pub fn categorize(test_name: &str) -> &'static str {
    let upper = test_name.to_uppercase();
    let has = |keywords: &[&str]| keywords.iter().any(|k| upper.contains(k));

    if has(&["VIEW", "X-RAY", "XRAY"]) {
        XRAY_CATEGORY
    } else if has(&["ECHO"]) {
        ECHO_CATEGORY
    } else if has(&["SCAN", "ULTRASOUND", "USG", "DOPPLER", "PELVIS", "ABDOMEN"]) {
        ULTRASOUND_CATEGORY
    } else {
        OTHER_CATEGORY
    }
}

// ==============================================================================
// RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanPriceResponse {
    pub name: String,
    pub price: Option<f64>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanPriceQuery {
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Pricing service unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Pricing service returned no services")]
    EmptyRemoteCatalog,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_lookup() {
        let catalog = ScanCatalog::standard();

        assert_eq!(catalog.test_price("NT SCAN"), Some(2500.0));
        assert_eq!(catalog.test_price("Chest PA View"), Some(450.0));
        assert_eq!(catalog.test_price("MRI Brain"), None);
        assert_eq!(catalog.test_price("nt scan"), None);
    }

    #[test]
    fn test_category_lookup() {
        let catalog = ScanCatalog::standard();

        assert_eq!(catalog.test_category("ANOMALY SCAN"), Some(ULTRASOUND_CATEGORY));
        assert_eq!(catalog.test_category("Pelvis AP View"), Some(XRAY_CATEGORY));
        assert_eq!(catalog.test_category("CT Chest"), None);
    }

    #[test]
    fn test_all_test_names_keeps_order() {
        let catalog = ScanCatalog::standard();
        let names = catalog.all_test_names();

        assert_eq!(names.len(), 10);
        assert_eq!(names[0], "Chest AP View");
        assert_eq!(names[9], "ABDOMEN & PELVIS");
    }

    #[test]
    fn test_search_drops_empty_categories() {
        let catalog = ScanCatalog::standard();

        let results = catalog.search("scan");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, ULTRASOUND_CATEGORY);
        assert_eq!(results[0].tests.len(), 4);

        let results = catalog.search("PELVIS");
        assert_eq!(results.len(), 2);

        assert_eq!(catalog.search("").len(), 2);
        assert!(catalog.search("mri").is_empty());
    }

    #[test]
    fn test_total_price_ignores_unknown() {
        let catalog = ScanCatalog::standard();
        let scans = vec!["NT SCAN".to_string(), "Chest AP View".to_string(), "MRI Brain".to_string()];

        assert_eq!(catalog.total_price(&scans), 2950.0);
        assert_eq!(catalog.total_price::<String>(&[]), 0.0);
    }

    #[test]
    fn test_from_services_categorizes() {
        let services = vec![
            Service { scan_name: "NT SCAN".to_string(), scan_price: 2400.0 },
            Service { scan_name: "Knee AP View".to_string(), scan_price: 500.0 },
            Service { scan_name: "2D ECHO".to_string(), scan_price: 1800.0 },
            Service { scan_name: "Venous Doppler".to_string(), scan_price: 3000.0 },
            Service { scan_name: "Consultation".to_string(), scan_price: 300.0 },
            Service { scan_name: "NT SCAN".to_string(), scan_price: 9999.0 },
        ];

        let catalog = ScanCatalog::from_services(&services);

        assert_eq!(catalog.test_price("NT SCAN"), Some(2400.0));
        assert_eq!(catalog.test_category("Knee AP View"), Some(XRAY_CATEGORY));
        assert_eq!(catalog.test_category("2D ECHO"), Some(ECHO_CATEGORY));
        assert_eq!(catalog.test_category("Venous Doppler"), Some(ULTRASOUND_CATEGORY));
        assert_eq!(catalog.test_category("Consultation"), Some(OTHER_CATEGORY));
        assert_eq!(catalog.all_test_names().len(), 5);
    }
}
