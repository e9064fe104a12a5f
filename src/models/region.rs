use serde::{Deserialize, Serialize};

/// Geographic point used to resolve a region against the forecast API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A catalog entry: an oblast from the advisory map, or one of the Kostanay
/// districts the forecast service covers. Only entries with coordinates can
/// be forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    pub id: &'static str,
    pub name: &'static str,
    pub soil: &'static str,
    pub crops: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coords: Option<Coordinates>,
}

#[rustfmt::skip]
const REGIONS: &[Region] = &[
    Region { id: "r1", name: "Akmola", soil: "Loam/Chernozem", crops: &["wheat", "barley"], coords: None },
    Region { id: "r2", name: "Aktobe", soil: "Sandy loam/Sand", crops: &["wheat", "sunflower"], coords: None },
    Region { id: "r3", name: "Atyrau", soil: "Sand/Loam", crops: &["sunflower"], coords: None },
    Region { id: "r4", name: "Almaty", soil: "Chernozem", crops: &["sunflower", "wheat"], coords: None },
    Region { id: "r5", name: "Aktobe Oblast", soil: "Loam", crops: &["wheat"], coords: None },
    Region { id: "r6", name: "Kostanay Oblast", soil: "Loam", crops: &["wheat", "barley"], coords: None },
    Region { id: "r7", name: "Pavlodar", soil: "Sandy loam", crops: &["wheat"], coords: None },
    Region { id: "r8", name: "Karaganda", soil: "Sandy loam", crops: &["barley"], coords: None },
    Region { id: "r9", name: "East Kazakhstan", soil: "Chernozem", crops: &["sunflower"], coords: None },
    Region { id: "r10", name: "Turkestan", soil: "Chernozem", crops: &["wheat", "sunflower"], coords: None },
    Region { id: "r11", name: "Zhambyl", soil: "Loam", crops: &["wheat"], coords: None },
    Region { id: "r12", name: "Kyzylorda", soil: "Sand", crops: &["sunflower"], coords: None },
    Region { id: "r13", name: "Mangystau", soil: "Sand", crops: &["sunflower"], coords: None },
    Region { id: "r14", name: "West Kazakhstan", soil: "Loam", crops: &["wheat"], coords: None },
    Region { id: "r15", name: "North Kazakhstan", soil: "Loam", crops: &["wheat"], coords: None },
    Region { id: "r16", name: "Abai", soil: "Sandy loam", crops: &["barley"], coords: None },
    Region { id: "r17", name: "Zhetysu", soil: "Chernozem", crops: &["wheat"], coords: None },
    // Forecast districts
    Region {
        id: "kostanay",
        name: "Kostanay",
        soil: "Loam",
        crops: &["wheat", "barley"],
        coords: Some(Coordinates { lat: 53.2144, lon: 63.6246 }),
    },
    Region {
        id: "rudny",
        name: "Rudny",
        soil: "Loam",
        crops: &["wheat", "barley"],
        coords: Some(Coordinates { lat: 52.9517, lon: 63.1142 }),
    },
    Region {
        id: "lisakovsk",
        name: "Lisakovsk",
        soil: "Loam",
        crops: &["wheat"],
        coords: Some(Coordinates { lat: 52.5369, lon: 62.4997 }),
    },
];

/// Standing soil advisory for a forecast district, from the regional survey
/// table. Describes the district before any sample arrives; sample scoring
/// never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SoilBaseline {
    pub score: u8,
    pub description: &'static str,
    pub recommendation: &'static str,
}

#[rustfmt::skip]
const DISTRICT_BASELINES: &[(&str, SoilBaseline)] = &[
    ("kostanay", SoilBaseline { score: 68, description: "Medium moisture capacity", recommendation: "Minimum tillage recommended" }),
    ("rudny", SoilBaseline { score: 72, description: "Good soil structure", recommendation: "Suited to most crops" }),
    ("lisakovsk", SoilBaseline { score: 65, description: "Moderate fertility", recommendation: "Fertilizer application required" }),
];

impl Region {
    pub fn all() -> &'static [Region] {
        REGIONS
    }

    /// Look up by id or name, case-insensitive.
    pub fn find(key: &str) -> Option<&'static Region> {
        let key = key.trim().to_lowercase();
        REGIONS
            .iter()
            .find(|r| r.id.to_lowercase() == key || r.name.to_lowercase() == key)
    }

    /// Entries the forecast service can resolve.
    pub fn forecast_districts() -> impl Iterator<Item = &'static Region> {
        REGIONS.iter().filter(|r| r.coords.is_some())
    }

    /// Survey baseline, carried only for the forecast districts.
    pub fn baseline(&self) -> Option<&'static SoilBaseline> {
        DISTRICT_BASELINES
            .iter()
            .find(|(id, _)| *id == self.id)
            .map(|(_, baseline)| baseline)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Variety recommendation from the breeding-catalog collaborator.
///
/// The engine passes the crop/region pair through and renders this record
/// opaquely; the lookup itself lives outside this codebase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(dead_code)]
pub struct VarietyRecommendation {
    pub crop: String,
    pub recommended_variety: String,
    pub features: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_by_id_and_name_case_insensitive() {
        assert_eq!(Region::find("r6").unwrap().name, "Kostanay Oblast");
        assert_eq!(Region::find("kostanay").unwrap().name, "Kostanay");
        assert_eq!(Region::find("KOSTANAY").unwrap().name, "Kostanay");
        assert_eq!(Region::find("  Rudny ").unwrap().id, "rudny");
        assert!(Region::find("atlantis").is_none());
    }

    #[test]
    fn catalog_covers_map_and_districts() {
        assert_eq!(Region::all().len(), 20);
        assert_eq!(Region::forecast_districts().count(), 3);
    }

    #[test]
    fn districts_carry_coordinates() {
        for key in ["kostanay", "rudny", "lisakovsk"] {
            let region = Region::find(key).unwrap();
            assert!(region.coords.is_some(), "{} should have coords", key);
        }
        assert!(Region::find("r1").unwrap().coords.is_none());
    }

    #[test]
    fn districts_carry_soil_baselines() {
        for district in Region::forecast_districts() {
            assert!(
                district.baseline().is_some(),
                "{} should have a baseline",
                district.id
            );
        }

        let kostanay = Region::find("kostanay").unwrap().baseline().unwrap();
        assert_eq!(kostanay.score, 68);
        assert_eq!(kostanay.description, "Medium moisture capacity");
        assert_eq!(kostanay.recommendation, "Minimum tillage recommended");

        assert_eq!(Region::find("rudny").unwrap().baseline().unwrap().score, 72);
        assert_eq!(Region::find("lisakovsk").unwrap().baseline().unwrap().score, 65);

        // Oblast map entries have no survey baseline
        assert!(Region::find("r6").unwrap().baseline().is_none());
    }

    #[test]
    fn variety_recommendation_wire_fields() {
        let rec: VarietyRecommendation = serde_json::from_str(
            r#"{"crop":"wheat","recommended_variety":"Astana 2","features":"Drought tolerant, up to 25 dt/ha"}"#,
        )
        .unwrap();
        assert_eq!(rec.recommended_variety, "Astana 2");

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["crop"], "wheat");
        assert!(json.get("recommended_variety").is_some());
        assert!(json.get("features").is_some());
    }
}
