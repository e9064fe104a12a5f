use crate::models::{FertilityTier, Finding, ScoreBreakdown, SoilSample, SubScores};

/// Fertility scoring calibration.
///
/// Every constant the scorer uses lives here; the canonical set is
/// [`Calibration::V1`]. A deployment uses exactly one calibration, and each
/// stored submission records which one scored it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub version: &'static str,
    /// Agronomic pH optimum; the score falls off linearly on both sides.
    pub ph_optimum: f64,
    /// Points lost per pH unit of distance from the optimum.
    pub ph_penalty_slope: f64,
    /// Ideal volumetric moisture; penalized symmetrically on both sides.
    pub moisture_ideal_percent: f64,
    /// Points lost per percentage point of distance from the ideal.
    pub moisture_penalty_slope: f64,
    /// Readings at which each nutrient ramp reaches 100.
    pub organic_saturation_percent: f64,
    pub nitrogen_saturation: f64,
    pub phosphorus_saturation: f64,
    pub potassium_saturation: f64,
    pub weights: Weights,
    pub findings: FindingThresholds,
    pub tiers: TierBreakpoints,
}

/// Convex weights over the six sub-scores; must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub ph: f64,
    pub organic: f64,
    pub moisture: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

impl Weights {
    #[allow(dead_code)]
    pub fn sum(&self) -> f64 {
        self.ph + self.organic + self.moisture + self.nitrogen + self.phosphorus + self.potassium
    }
}

/// Raw-reading thresholds below (or above, for high pH) which a finding fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FindingThresholds {
    pub ph_low: f64,
    pub ph_high: f64,
    pub organic_low_percent: f64,
    pub moisture_low_percent: f64,
    pub nitrogen_low: f64,
    pub phosphorus_low: f64,
    pub potassium_low: f64,
}

/// Total-score breakpoints for the tiered recommendation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierBreakpoints {
    pub poor_below: u8,
    pub moderate_below: u8,
}

impl Calibration {
    /// Canonical calibration, version 1.
    ///
    /// pH optimum 6.5, slope 15/unit; moisture ideal 26 %, slope 3/point;
    /// saturations: organic 8 %, N 60, P 20, K 150 mg/kg; weights
    /// 0.20/0.20/0.15/0.15/0.15/0.15; findings at pH <5.5 / >7.5,
    /// organic <3 %, moisture <12 %, N <20, P <8, K <50; tiers at <45 / <70.
    pub const V1: Calibration = Calibration {
        version: "v1",
        ph_optimum: 6.5,
        ph_penalty_slope: 15.0,
        moisture_ideal_percent: 26.0,
        moisture_penalty_slope: 3.0,
        organic_saturation_percent: 8.0,
        nitrogen_saturation: 60.0,
        phosphorus_saturation: 20.0,
        potassium_saturation: 150.0,
        weights: Weights {
            ph: 0.20,
            organic: 0.20,
            moisture: 0.15,
            nitrogen: 0.15,
            phosphorus: 0.15,
            potassium: 0.15,
        },
        findings: FindingThresholds {
            ph_low: 5.5,
            ph_high: 7.5,
            organic_low_percent: 3.0,
            moisture_low_percent: 12.0,
            nitrogen_low: 20.0,
            phosphorus_low: 8.0,
            potassium_low: 50.0,
        },
        tiers: TierBreakpoints {
            poor_below: 45,
            moderate_below: 70,
        },
    };
}

impl Default for Calibration {
    fn default() -> Self {
        Self::V1
    }
}

/// Distance-penalty curve: 100 at the optimum, losing `slope` points per
/// unit of distance on either side, floored at 0.
fn penalty_curve(reading: f64, optimum: f64, slope: f64) -> f64 {
    (100.0 - (optimum - reading).abs() * slope).max(0.0)
}

/// Linear ramp: 0 at a zero reading, 100 at the saturation threshold,
/// clamped into [0, 100].
fn saturation_curve(reading: f64, saturation: f64) -> f64 {
    (reading / saturation * 100.0).clamp(0.0, 100.0)
}

fn as_subscore(curve: f64) -> u8 {
    curve.round() as u8
}

/// Pure soil fertility scorer.
///
/// Deterministic and infallible for any validated sample: curves clamp, so
/// the sub-scores and the total always land in [0, 100].
pub struct SoilScorer {
    calibration: Calibration,
}

impl SoilScorer {
    pub fn new() -> Self {
        Self {
            calibration: Calibration::V1,
        }
    }

    #[allow(dead_code)]
    pub fn with_calibration(calibration: Calibration) -> Self {
        Self { calibration }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn score(&self, sample: &SoilSample) -> ScoreBreakdown {
        let cal = &self.calibration;

        // One curve per sub-score; the total is the weighted round of the
        // same integers reported in the breakdown.
        let breakdown = SubScores {
            ph: as_subscore(penalty_curve(sample.ph, cal.ph_optimum, cal.ph_penalty_slope)),
            organic: as_subscore(saturation_curve(
                sample.organic_matter_percent,
                cal.organic_saturation_percent,
            )),
            moisture: as_subscore(penalty_curve(
                sample.moisture_percent,
                cal.moisture_ideal_percent,
                cal.moisture_penalty_slope,
            )),
            nitrogen: as_subscore(saturation_curve(sample.nitrogen, cal.nitrogen_saturation)),
            phosphorus: as_subscore(saturation_curve(
                sample.phosphorus,
                cal.phosphorus_saturation,
            )),
            potassium: as_subscore(saturation_curve(sample.potassium, cal.potassium_saturation)),
        };

        let total = weighted_total(&breakdown, &cal.weights);

        ScoreBreakdown {
            total,
            breakdown,
            findings: self.findings(sample),
            tier: self.tier(total),
        }
    }

    /// Findings evaluate against raw readings, in fixed rule order:
    /// pH low, pH high, organic, moisture, N, P, K.
    fn findings(&self, sample: &SoilSample) -> Vec<Finding> {
        let t = &self.calibration.findings;
        let mut findings = Vec::new();

        if sample.ph < t.ph_low {
            findings.push(Finding::LimingNeeded);
        }
        if sample.ph > t.ph_high {
            findings.push(Finding::PhosphorusAvailability);
        }
        if sample.organic_matter_percent < t.organic_low_percent {
            findings.push(Finding::LowOrganicMatter);
        }
        if sample.moisture_percent < t.moisture_low_percent {
            findings.push(Finding::IrrigationNeeded);
        }
        if sample.nitrogen < t.nitrogen_low {
            findings.push(Finding::NitrogenDeficient);
        }
        if sample.phosphorus < t.phosphorus_low {
            findings.push(Finding::PhosphorusDeficient);
        }
        if sample.potassium < t.potassium_low {
            findings.push(Finding::PotassiumDeficient);
        }

        findings
    }

    fn tier(&self, total: u8) -> FertilityTier {
        let t = &self.calibration.tiers;
        if total < t.poor_below {
            FertilityTier::Poor
        } else if total < t.moderate_below {
            FertilityTier::Moderate
        } else {
            FertilityTier::Good
        }
    }
}

impl Default for SoilScorer {
    fn default() -> Self {
        Self::new()
    }
}

fn weighted_total(scores: &SubScores, w: &Weights) -> u8 {
    let total = f64::from(scores.ph) * w.ph
        + f64::from(scores.organic) * w.organic
        + f64::from(scores.moisture) * w.moisture
        + f64::from(scores.nitrogen) * w.nitrogen
        + f64::from(scores.phosphorus) * w.phosphorus
        + f64::from(scores.potassium) * w.potassium;
    total.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(
        ph: f64,
        organic: f64,
        moisture: f64,
        nitrogen: f64,
        phosphorus: f64,
        potassium: f64,
    ) -> SoilSample {
        SoilSample {
            ph,
            organic_matter_percent: organic,
            moisture_percent: moisture,
            nitrogen,
            phosphorus,
            potassium,
        }
    }

    /// Recompute the convex combination from the reported integer sub-scores.
    fn recombine(result: &ScoreBreakdown, w: &Weights) -> u8 {
        weighted_total(&result.breakdown, w)
    }

    #[test]
    fn v1_weights_sum_to_one() {
        assert!((Calibration::V1.weights.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn saturation_sample_scores_100_with_no_findings() {
        // Every reading at its calibrated optimum/saturation
        let result = SoilScorer::new().score(&sample(6.5, 8.0, 26.0, 60.0, 20.0, 150.0));

        assert_eq!(result.total, 100);
        assert_eq!(result.breakdown.ph, 100);
        assert_eq!(result.breakdown.organic, 100);
        assert_eq!(result.breakdown.moisture, 100);
        assert_eq!(result.breakdown.nitrogen, 100);
        assert_eq!(result.breakdown.phosphorus, 100);
        assert_eq!(result.breakdown.potassium, 100);
        assert!(result.findings.is_empty());
        assert_eq!(result.tier, FertilityTier::Good);
    }

    #[test]
    fn depleted_sample_scores_poor_with_all_deficiency_findings() {
        let result = SoilScorer::new().score(&sample(4.5, 1.0, 5.0, 5.0, 2.0, 10.0));

        assert_eq!(result.breakdown.ph, 70);
        assert_eq!(result.breakdown.organic, 13);
        assert_eq!(result.breakdown.moisture, 37);
        assert_eq!(result.breakdown.nitrogen, 8);
        assert_eq!(result.breakdown.phosphorus, 10);
        assert_eq!(result.breakdown.potassium, 7);
        assert_eq!(result.total, 26);
        assert!(result.total < 45);
        assert_eq!(result.tier, FertilityTier::Poor);

        // All six low-reading rules fire, in rule order
        assert_eq!(
            result.findings,
            vec![
                Finding::LimingNeeded,
                Finding::LowOrganicMatter,
                Finding::IrrigationNeeded,
                Finding::NitrogenDeficient,
                Finding::PhosphorusDeficient,
                Finding::PotassiumDeficient,
            ]
        );
    }

    #[test]
    fn alkaline_sample_flags_phosphorus_availability_first() {
        let result = SoilScorer::new().score(&sample(8.2, 1.0, 5.0, 5.0, 2.0, 10.0));

        assert_eq!(
            result.findings,
            vec![
                Finding::PhosphorusAvailability,
                Finding::LowOrganicMatter,
                Finding::IrrigationNeeded,
                Finding::NitrogenDeficient,
                Finding::PhosphorusDeficient,
                Finding::PotassiumDeficient,
            ]
        );
    }

    #[test]
    fn scoring_is_deterministic() {
        let scorer = SoilScorer::new();
        let s = sample(5.9, 4.2, 18.0, 33.0, 11.0, 88.0);
        assert_eq!(scorer.score(&s), scorer.score(&s));
    }

    #[test]
    fn scores_stay_in_bounds_for_extreme_samples() {
        let scorer = SoilScorer::new();
        let extremes = [
            sample(0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
            sample(14.0, 100.0, 100.0, 10_000.0, 10_000.0, 10_000.0),
            sample(6.5, 50.0, 0.0, 1.0, 500.0, 0.0),
        ];

        for s in extremes {
            let result = scorer.score(&s);
            assert!(result.total <= 100);
            for sub in [
                result.breakdown.ph,
                result.breakdown.organic,
                result.breakdown.moisture,
                result.breakdown.nitrogen,
                result.breakdown.phosphorus,
                result.breakdown.potassium,
            ] {
                assert!(sub <= 100);
            }
        }
    }

    #[test]
    fn total_is_the_convex_combination_of_reported_subscores() {
        let scorer = SoilScorer::new();
        for s in [
            sample(6.5, 8.0, 26.0, 60.0, 20.0, 150.0),
            sample(4.5, 1.0, 5.0, 5.0, 2.0, 10.0),
            sample(7.1, 5.5, 30.0, 45.0, 14.0, 120.0),
        ] {
            let result = scorer.score(&s);
            assert_eq!(result.total, recombine(&result, &scorer.calibration().weights));
        }
    }

    #[test]
    fn changing_the_ph_slope_moves_subscore_and_total_together() {
        // Regression guard: the displayed sub-score and the total must come
        // from the same curve, so a slope change shifts both consistently.
        let s = sample(5.0, 8.0, 26.0, 60.0, 20.0, 150.0);

        let v1 = SoilScorer::new().score(&s);
        let steeper = SoilScorer::with_calibration(Calibration {
            ph_penalty_slope: 20.0,
            ..Calibration::V1
        })
        .score(&s);

        assert_eq!(v1.breakdown.ph, 78); // 100 - 1.5 * 15, rounded
        assert_eq!(steeper.breakdown.ph, 70); // 100 - 1.5 * 20

        // Both totals still reproduce from their own breakdowns
        assert_eq!(v1.total, recombine(&v1, &Calibration::V1.weights));
        assert_eq!(steeper.total, recombine(&steeper, &Calibration::V1.weights));
        assert!(steeper.total < v1.total);
    }

    #[test]
    fn tier_breakpoints() {
        let scorer = SoilScorer::new();

        // A sample whose six curves all land on `target` produces
        // total == round(target), since the weights sum to 1.
        let uniform = |target: f64| {
            let cal = Calibration::V1;
            sample(
                cal.ph_optimum - (100.0 - target) / cal.ph_penalty_slope,
                target / 100.0 * cal.organic_saturation_percent,
                cal.moisture_ideal_percent - (100.0 - target) / cal.moisture_penalty_slope,
                target / 100.0 * cal.nitrogen_saturation,
                target / 100.0 * cal.phosphorus_saturation,
                target / 100.0 * cal.potassium_saturation,
            )
        };

        let poor = scorer.score(&uniform(44.0));
        assert_eq!(poor.total, 44);
        assert_eq!(poor.tier, FertilityTier::Poor);

        let moderate = scorer.score(&uniform(45.0));
        assert_eq!(moderate.total, 45);
        assert_eq!(moderate.tier, FertilityTier::Moderate);

        let upper_moderate = scorer.score(&uniform(69.0));
        assert_eq!(upper_moderate.total, 69);
        assert_eq!(upper_moderate.tier, FertilityTier::Moderate);

        let good = scorer.score(&uniform(70.0));
        assert_eq!(good.total, 70);
        assert_eq!(good.tier, FertilityTier::Good);
    }
}
