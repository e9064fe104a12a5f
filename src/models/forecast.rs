use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Wire date format used by the favorable-days feed (`dd.mm.yyyy`).
pub const SOURCE_DATE_FORMAT: &str = "%d.%m.%Y";

/// A single 3-hour forecast observation, metric units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastObservation {
    pub timestamp: DateTime<Utc>,
    pub temp_c: f64,
    pub wind_speed_ms: f64,
    /// Accumulated rain over the 3-hour slot; 0 when the source reports none.
    pub rain_3h_mm: f64,
}

impl ForecastObservation {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// A favorable day as reported by the forecast collaborator.
///
/// The date travels in `dd.mm.yyyy` form; `rain` is optional on the wire and
/// an absent value is not the same as a reported zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    pub temp: f64,
    pub wind: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain: Option<f64>,
}

impl ForecastDay {
    pub fn new(date: NaiveDate, temp: f64, wind: f64, rain: Option<f64>) -> Self {
        Self {
            date: date.format(SOURCE_DATE_FORMAT).to_string(),
            temp,
            wind,
            rain,
        }
    }

    /// Normalize the wire date to the internal representation. `None` marks
    /// the record as unparsable; the aggregator drops it and counts it.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, SOURCE_DATE_FORMAT).ok()
    }
}

/// One day of the dense planting calendar.
///
/// Weather fields are populated only when a favorable record supplied them;
/// `favorable` is decided by the aggregator and nowhere else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain: Option<f64>,
    pub favorable: bool,
}

impl CalendarDay {
    /// An empty placeholder for `date`: no weather, not favorable.
    pub fn placeholder(date: NaiveDate) -> Self {
        Self {
            date,
            label: date.format(SOURCE_DATE_FORMAT).to_string(),
            temp: None,
            wind: None,
            rain: None,
            favorable: false,
        }
    }
}

/// Forecast-window response: the dense calendar for the grid view, the
/// original favorable list for the list view, and the count of records
/// dropped for unparsable dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowReport {
    pub region: String,
    pub days: Vec<CalendarDay>,
    pub favorable_days: Vec<ForecastDay>,
    pub dropped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_day_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();
        let day = ForecastDay::new(date, 20.0, 4.0, None);
        assert_eq!(day.date, "03.05.2024");
        assert_eq!(day.parsed_date(), Some(date));
    }

    #[test]
    fn forecast_day_bad_date_is_unparsable() {
        let day = ForecastDay {
            date: "bad-date".into(),
            temp: 20.0,
            wind: 4.0,
            rain: None,
        };
        assert_eq!(day.parsed_date(), None);

        // ISO form is not the wire format either
        let day = ForecastDay {
            date: "2024-05-03".into(),
            temp: 20.0,
            wind: 4.0,
            rain: None,
        };
        assert_eq!(day.parsed_date(), None);
    }

    #[test]
    fn forecast_day_rain_absent_vs_zero() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();

        let dry = serde_json::to_value(ForecastDay::new(date, 20.0, 4.0, None)).unwrap();
        assert!(dry.get("rain").is_none());

        let zero = serde_json::to_value(ForecastDay::new(date, 20.0, 4.0, Some(0.0))).unwrap();
        assert_eq!(zero["rain"], 0.0);
    }

    #[test]
    fn forecast_day_deserializes_without_rain() {
        let day: ForecastDay =
            serde_json::from_str(r#"{"date":"03.05.2024","temp":20,"wind":4}"#).unwrap();
        assert_eq!(day.rain, None);
        assert_eq!(day.temp, 20.0);
    }

    #[test]
    fn calendar_placeholder_is_empty_and_labeled() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let day = CalendarDay::placeholder(date);
        assert_eq!(day.label, "01.05.2024");
        assert!(!day.favorable);
        assert!(day.temp.is_none() && day.wind.is_none() && day.rain.is_none());
    }

    #[test]
    fn calendar_day_serializes_iso_date_and_skips_absent_weather() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let json = serde_json::to_value(CalendarDay::placeholder(date)).unwrap();
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["label"], "01.05.2024");
        assert_eq!(json["favorable"], false);
        assert!(json.get("temp").is_none());
        assert!(json.get("wind").is_none());
        assert!(json.get("rain").is_none());
    }

    #[test]
    fn window_report_wire_shape() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();
        let report = WindowReport {
            region: "kostanay".into(),
            days: vec![CalendarDay::placeholder(date)],
            favorable_days: vec![ForecastDay::new(date, 20.0, 4.0, None)],
            dropped: 1,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["region"], "kostanay");
        assert_eq!(json["days"][0]["date"], "2024-05-03");
        assert_eq!(json["favorable_days"][0]["date"], "03.05.2024");
        assert_eq!(json["dropped"], 1);
    }
}
