use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::store::Location;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct City {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl From<&City> for Location {
    fn from(city: &City) -> Self {
        Location::new(city.name.clone(), city.lat, city.lon)
    }
}

const BUNDLED: &[(&str, f64, f64)] = &[
    ("札幌", 43.0618, 141.3545),
    ("旭川", 43.7706, 142.3650),
    ("函館", 41.7687, 140.7288),
    ("青森", 40.8246, 140.7406),
    ("盛岡", 39.7036, 141.1527),
    ("仙台", 38.2682, 140.8694),
    ("秋田", 39.7186, 140.1024),
    ("山形", 38.2404, 140.3633),
    ("福島", 37.7503, 140.4676),
    ("水戸", 36.3418, 140.4468),
    ("宇都宮", 36.5657, 139.8836),
    ("前橋", 36.3912, 139.0608),
    ("さいたま", 35.8617, 139.6455),
    ("千葉", 35.6074, 140.1065),
    ("東京", 35.6895, 139.6917),
    ("横浜", 35.4437, 139.6380),
    ("新潟", 37.9162, 139.0364),
    ("富山", 36.6953, 137.2113),
    ("金沢", 36.5613, 136.6562),
    ("福井", 36.0652, 136.2216),
    ("甲府", 35.6642, 138.5684),
    ("長野", 36.6513, 138.1810),
    ("岐阜", 35.4233, 136.7607),
    ("静岡", 34.9756, 138.3828),
    ("名古屋", 35.1815, 136.9066),
    ("津", 34.7303, 136.5086),
    ("大津", 35.0045, 135.8686),
    ("京都", 35.0116, 135.7681),
    ("大阪", 34.6937, 135.5023),
    ("神戸", 34.6901, 135.1955),
    ("奈良", 34.6851, 135.8048),
    ("和歌山", 34.2260, 135.1675),
    ("鳥取", 35.5011, 134.2351),
    ("松江", 35.4723, 133.0505),
    ("岡山", 34.6551, 133.9195),
    ("広島", 34.3853, 132.4553),
    ("山口", 34.1785, 131.4737),
    ("徳島", 34.0658, 134.5593),
    ("高松", 34.3401, 134.0434),
    ("松山", 33.8392, 132.7657),
    ("高知", 33.5597, 133.5311),
    ("北九州", 33.8835, 130.8752),
    ("福岡", 33.5904, 130.4017),
    ("佐賀", 33.2635, 130.3009),
    ("長崎", 32.7503, 129.8779),
    ("熊本", 32.8032, 130.7079),
    ("大分", 33.2382, 131.6126),
    ("宮崎", 31.9111, 131.4239),
    ("鹿児島", 31.5966, 130.5571),
    ("那覇", 26.2124, 127.6809),
];

/// Read-only list of searchable cities.
#[derive(Debug, Clone)]
pub struct Catalog {
    cities: Vec<City>,
}

impl Catalog {
    pub fn bundled() -> Self {
        let cities = BUNDLED
            .iter()
            .map(|&(name, lat, lon)| City {
                name: name.to_string(),
                lat,
                lon,
            })
            .collect();
        Self { cities }
    }

    /// Replace the bundled list with a JSON array of `{name, lat, lon}`.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cities: Vec<City> = serde_json::from_str(&raw)?;
        log::info!("loaded {} cities from {}", cities.len(), path.display());
        Ok(Self { cities })
    }

    #[cfg(test)]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Plain case-sensitive containment, catalog order. Blank input matches nothing.
    pub fn search(&self, input: &str) -> Vec<&City> {
        let keyword = input.trim();
        if keyword.is_empty() {
            return Vec::new();
        }
        self.cities
            .iter()
            .filter(|city| city.name.contains(keyword))
            .collect()
    }

    /// Exact name first, then the first substring match.
    pub fn lookup(&self, name: &str) -> Result<&City, CatalogError> {
        self.cities
            .iter()
            .find(|city| city.name == name)
            .or_else(|| self.search(name).into_iter().next())
            .ok_or_else(|| CatalogError::UnknownCity(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(cities: &[&'a City]) -> Vec<&'a str> {
        cities.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_blank_input_clears_results() {
        let catalog = Catalog::bundled();
        assert!(catalog.search("").is_empty());
        assert!(catalog.search("   ").is_empty());
    }

    #[test]
    fn test_substring_match_in_catalog_order() {
        let catalog = Catalog::bundled();
        assert_eq!(
            names(&catalog.search("島")),
            ["福島", "広島", "徳島", "鹿児島"]
        );
        assert_eq!(names(&catalog.search(" 大阪 ")), ["大阪"]);
    }

    #[test]
    fn test_search_is_case_sensitive() {
        let catalog = Catalog {
            cities: vec![City {
                name: "Tokyo".to_string(),
                lat: 35.6895,
                lon: 139.6917,
            }],
        };
        assert_eq!(catalog.search("Tok").len(), 1);
        assert!(catalog.search("tok").is_empty());
    }

    #[test]
    fn test_lookup_prefers_exact_name() {
        let catalog = Catalog::bundled();
        assert_eq!(catalog.lookup("津").unwrap().name, "津");
        assert_eq!(catalog.lookup("古屋").unwrap().name, "名古屋");
        assert!(matches!(
            catalog.lookup("Atlantis"),
            Err(CatalogError::UnknownCity(_))
        ));
    }

    #[test]
    fn test_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.json");
        fs::write(&path, r#"[{"name":"Madison","lat":43.07,"lon":-89.4}]"#)
            .unwrap();
        let catalog = Catalog::from_file(&path).unwrap();
        assert_eq!(catalog.cities().len(), 1);
        assert_eq!(names(&catalog.search("Mad")), ["Madison"]);
    }
}
