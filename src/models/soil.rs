use crate::error::{AgroSmartError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single soil-test submission.
///
/// All six readings are required. Nutrient concentrations (N, P, K) are in
/// lab-reported mg/kg; organic matter and moisture are percentages. The
/// scorer assumes a validated sample - call [`SoilSample::validate`] at the
/// input boundary before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    pub ph: f64,
    pub organic_matter_percent: f64,
    pub moisture_percent: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

impl SoilSample {
    /// Reject samples the scoring curves are not defined for: non-finite
    /// readings, out-of-range percentages, or negative concentrations.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("ph", self.ph),
            ("organic_matter_percent", self.organic_matter_percent),
            ("moisture_percent", self.moisture_percent),
            ("nitrogen", self.nitrogen),
            ("phosphorus", self.phosphorus),
            ("potassium", self.potassium),
        ];

        for (name, value) in fields {
            if !value.is_finite() {
                return Err(AgroSmartError::Validation(format!(
                    "{} must be a finite number",
                    name
                )));
            }
        }

        if !(0.0..=14.0).contains(&self.ph) {
            return Err(AgroSmartError::Validation(format!(
                "ph must be between 0 and 14, got {}",
                self.ph
            )));
        }
        for (name, value) in [
            ("organic_matter_percent", self.organic_matter_percent),
            ("moisture_percent", self.moisture_percent),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(AgroSmartError::Validation(format!(
                    "{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("nitrogen", self.nitrogen),
            ("phosphorus", self.phosphorus),
            ("potassium", self.potassium),
        ] {
            if value < 0.0 {
                return Err(AgroSmartError::Validation(format!(
                    "{} cannot be negative, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// Per-metric sub-scores, each 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubScores {
    pub ph: u8,
    pub organic: u8,
    pub moisture: u8,
    pub nitrogen: u8,
    pub phosphorus: u8,
    pub potassium: u8,
}

/// Advisory findings, evaluated against the raw sample in a fixed order:
/// pH (low, then high), organic matter, moisture, N, P, K.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finding {
    LimingNeeded,
    PhosphorusAvailability,
    LowOrganicMatter,
    IrrigationNeeded,
    NitrogenDeficient,
    PhosphorusDeficient,
    PotassiumDeficient,
}

impl Finding {
    /// Advisory message as rendered to the grower; this is also the wire form.
    pub fn message(&self) -> &'static str {
        match self {
            Finding::LimingNeeded => "liming needed",
            Finding::PhosphorusAvailability => "check phosphorus availability",
            Finding::LowOrganicMatter => "increase organic inputs",
            Finding::IrrigationNeeded => "irrigation needed",
            Finding::NitrogenDeficient => "nitrogen deficient",
            Finding::PhosphorusDeficient => "phosphorus deficient",
            Finding::PotassiumDeficient => "potassium deficient",
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl Serialize for Finding {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.message())
    }
}

/// Overall fertility tier keyed on the total score. The breakpoints live in
/// the scoring calibration, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FertilityTier {
    Poor,
    Moderate,
    Good,
}

impl FertilityTier {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "poor" => Some(FertilityTier::Poor),
            "moderate" => Some(FertilityTier::Moderate),
            "good" => Some(FertilityTier::Good),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FertilityTier::Poor => "poor",
            FertilityTier::Moderate => "moderate",
            FertilityTier::Good => "good",
        }
    }

    /// Tiered recommendation text shown alongside the score.
    pub fn advice(&self) -> &'static str {
        match self {
            FertilityTier::Poor => {
                "Low fertility. Amend before planting: fertilization, organic \
                 inputs, and moisture management."
            }
            FertilityTier::Moderate => {
                "Moderate fertility. Targeted amendments recommended ahead of \
                 the season."
            }
            FertilityTier::Good => {
                "Parameters within the healthy range. Suitable for most crops; \
                 minimal tillage recommended."
            }
        }
    }
}

impl std::fmt::Display for FertilityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of scoring one sample.
///
/// Serializes as `{total, breakdown: {ph, organic, moisture, nitrogen,
/// phosphorus, potassium}, findings: [..], tier: ".."}` - the wire contract
/// consumed by advisory frontends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub total: u8,
    pub breakdown: SubScores,
    pub findings: Vec<Finding>,
    pub tier: FertilityTier,
}

impl ScoreBreakdown {
    pub fn recommendation(&self) -> &'static str {
        self.tier.advice()
    }
}

/// A scored sample as recorded in the submissions sink.
///
/// Recording is fire-and-forget: the advisory response never depends on this
/// row being written. The calibration version travels with the row.
#[derive(Debug, Clone, PartialEq)]
pub struct SoilSubmission {
    pub id: Option<i64>,
    pub user_id: Option<String>,
    pub region: Option<String>,
    pub sample: SoilSample,
    pub total: u8,
    pub tier: FertilityTier,
    pub calibration: String,
    pub submitted_at: DateTime<Utc>,
}

impl SoilSubmission {
    pub fn new(
        sample: SoilSample,
        result: &ScoreBreakdown,
        calibration: &str,
        user_id: Option<String>,
        region: Option<String>,
    ) -> Self {
        Self {
            id: None,
            user_id,
            region,
            sample,
            total: result.total,
            tier: result.tier,
            calibration: calibration.to_string(),
            submitted_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SoilSample {
        SoilSample {
            ph: 6.5,
            organic_matter_percent: 8.0,
            moisture_percent: 26.0,
            nitrogen: 60.0,
            phosphorus: 20.0,
            potassium: 150.0,
        }
    }

    #[test]
    fn validate_accepts_in_range_sample() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_finite() {
        let mut s = sample();
        s.nitrogen = f64::NAN;
        assert!(s.validate().is_err());

        let mut s = sample();
        s.ph = f64::INFINITY;
        assert!(s.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_domain() {
        let mut s = sample();
        s.ph = 15.0;
        assert!(s.validate().is_err());

        let mut s = sample();
        s.moisture_percent = 120.0;
        assert!(s.validate().is_err());

        let mut s = sample();
        s.potassium = -1.0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn finding_messages() {
        assert_eq!(Finding::LimingNeeded.message(), "liming needed");
        assert_eq!(
            Finding::PhosphorusAvailability.message(),
            "check phosphorus availability"
        );
        assert_eq!(Finding::PotassiumDeficient.message(), "potassium deficient");
    }

    #[test]
    fn tier_labels() {
        assert_eq!(FertilityTier::Poor.as_str(), "poor");
        assert_eq!(FertilityTier::Moderate.as_str(), "moderate");
        assert_eq!(FertilityTier::Good.as_str(), "good");
    }

    #[test]
    fn tier_from_str_round_trips() {
        for tier in [
            FertilityTier::Poor,
            FertilityTier::Moderate,
            FertilityTier::Good,
        ] {
            assert_eq!(FertilityTier::from_str(tier.as_str()), Some(tier));
        }
        assert_eq!(FertilityTier::from_str("excellent"), None);
    }

    #[test]
    fn score_breakdown_wire_shape() {
        let result = ScoreBreakdown {
            total: 72,
            breakdown: SubScores {
                ph: 85,
                organic: 75,
                moisture: 91,
                nitrogen: 50,
                phosphorus: 60,
                potassium: 70,
            },
            findings: vec![Finding::NitrogenDeficient],
            tier: FertilityTier::Good,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["total"], 72);
        assert_eq!(json["breakdown"]["ph"], 85);
        assert_eq!(json["breakdown"]["potassium"], 70);
        assert_eq!(json["findings"][0], "nitrogen deficient");
        assert_eq!(json["tier"], "good");
    }
}
