use crate::db::Database;
use crate::error::Result;
use crate::models::{FertilityTier, SoilSample, SoilSubmission};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use tracing::warn;

// Soil Submission Queries

impl Database {
    pub fn record_soil_submission(&self, submission: &SoilSubmission) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO soil_submissions
                    (user_id, region, ph, organic_matter_percent, moisture_percent,
                     nitrogen, phosphorus, potassium, total_score, tier, calibration, submitted_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
                params![
                    submission.user_id,
                    submission.region,
                    submission.sample.ph,
                    submission.sample.organic_matter_percent,
                    submission.sample.moisture_percent,
                    submission.sample.nitrogen,
                    submission.sample.phosphorus,
                    submission.sample.potassium,
                    submission.total,
                    submission.tier.as_str(),
                    submission.calibration,
                    submission.submitted_at.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn recent_soil_submissions(&self, limit: u32) -> Result<Vec<SoilSubmission>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM soil_submissions ORDER BY submitted_at DESC, id DESC LIMIT ?1",
            )?;
            let submissions = stmt
                .query_map([limit], row_to_submission)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(submissions)
        })
    }

    pub fn soil_submission_count(&self) -> Result<i64> {
        self.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM soil_submissions", [], |row| {
                row.get(0)
            })
            .map_err(Into::into)
        })
    }
}

fn row_to_submission(row: &Row) -> rusqlite::Result<SoilSubmission> {
    let tier_str: String = row.get("tier")?;
    let submitted_at_str: String = row.get("submitted_at")?;

    let tier = FertilityTier::from_str(&tier_str).unwrap_or_else(|| {
        warn!(tier = %tier_str, "Unknown tier in database, defaulting to Moderate");
        FertilityTier::Moderate
    });

    Ok(SoilSubmission {
        id: Some(row.get("id")?),
        user_id: row.get("user_id")?,
        region: row.get("region")?,
        sample: SoilSample {
            ph: row.get("ph")?,
            organic_matter_percent: row.get("organic_matter_percent")?,
            moisture_percent: row.get("moisture_percent")?,
            nitrogen: row.get("nitrogen")?,
            phosphorus: row.get("phosphorus")?,
            potassium: row.get("potassium")?,
        },
        total: row.get("total_score")?,
        tier,
        calibration: row.get("calibration")?,
        submitted_at: DateTime::parse_from_rfc3339(&submitted_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
