use std::collections::HashSet;

use chrono::NaiveDate;

use crate::models::{ForecastDay, ForecastObservation};

/// Conditions a 3-hour observation must meet to make its date a favorable
/// field-work day.
///
/// The temperature band is inclusive on both ends; wind and rain bounds are
/// exclusive. The ideal band is a narrower range used for display emphasis
/// and is never part of the favorable/unfavorable decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FavorabilityCriteria {
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub max_wind_ms: f64,
    pub max_rain_mm: f64,
    pub ideal_min_temp_c: f64,
    pub ideal_max_temp_c: f64,
}

impl Default for FavorabilityCriteria {
    fn default() -> Self {
        Self {
            min_temp_c: 10.0,
            max_temp_c: 25.0,
            max_wind_ms: 6.0,
            max_rain_mm: 1.0,
            ideal_min_temp_c: 18.0,
            ideal_max_temp_c: 22.0,
        }
    }
}

impl FavorabilityCriteria {
    /// The single place the favorable decision is made.
    pub fn is_favorable(&self, obs: &ForecastObservation) -> bool {
        obs.temp_c >= self.min_temp_c
            && obs.temp_c <= self.max_temp_c
            && obs.wind_speed_ms < self.max_wind_ms
            && obs.rain_3h_mm < self.max_rain_mm
    }

    pub fn is_ideal_temp(&self, temp_c: f64) -> bool {
        temp_c >= self.ideal_min_temp_c && temp_c <= self.ideal_max_temp_c
    }

    /// Reduce a 3-hourly forecast to its favorable days.
    ///
    /// The first qualifying observation represents its date; later slots on
    /// the same date are ignored. Output keeps the input's chronological
    /// order, with dates already in wire form.
    pub fn select_favorable_days(&self, observations: &[ForecastObservation]) -> Vec<ForecastDay> {
        let mut seen: HashSet<NaiveDate> = HashSet::new();
        let mut days = Vec::new();

        for obs in observations {
            if !self.is_favorable(obs) {
                continue;
            }
            if seen.insert(obs.date()) {
                days.push(ForecastDay::new(
                    obs.date(),
                    obs.temp_c,
                    obs.wind_speed_ms,
                    Some(obs.rain_3h_mm),
                ));
            }
        }

        days
    }
}
