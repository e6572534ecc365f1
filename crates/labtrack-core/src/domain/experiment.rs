use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaterialFeedstock {
    pub mix_design: String,
    pub cement: String,
    pub fine_aggregate: String,
    pub coarse_aggregate: String,
    pub water: String,
    pub water_cement_ratio: String,
    pub block_size_length: String,
    pub block_size_width: String,
    pub block_size_height: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExposureConditions {
    pub co2_form: String,
    pub co2_mass: String,
    pub injection_pressure: String,
    pub head_space: String,
    pub reaction_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticalTest {
    pub name: String,
    pub sample_id: String,
    pub date: NaiveDate,
    pub pdf_url: String,
}

/// Every writable experiment field. Create and update both take a full draft.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentDraft {
    pub batch_id: String,
    pub reactor_id: i64,
    pub operator: String,
    pub date: NaiveDate,
    pub block_id: String,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub material_feedstock: MaterialFeedstock,
    pub exposure_conditions: ExposureConditions,
    pub analytical_tests: Vec<AnalyticalTest>,
}

impl ExperimentDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("batchId", &self.batch_id),
            ("operator", &self.operator),
            ("blockId", &self.block_id),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!("{field} is required")));
            }
        }
        Ok(())
    }
}

/// A batch experiment run on one reactor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    pub id: i64,
    pub batch_id: String,
    pub reactor_id: i64,
    pub operator: String,
    pub date: NaiveDate,
    pub block_id: String,
    #[serde(with = "clock")]
    pub time_start: NaiveTime,
    #[serde(with = "clock")]
    pub time_end: NaiveTime,
    pub material_feedstock: MaterialFeedstock,
    pub exposure_conditions: ExposureConditions,
    pub analytical_tests: Vec<AnalyticalTest>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Experiment {
    pub fn from_draft(id: i64, draft: ExperimentDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            batch_id: draft.batch_id,
            reactor_id: draft.reactor_id,
            operator: draft.operator,
            date: draft.date,
            block_id: draft.block_id,
            time_start: draft.time_start,
            time_end: draft.time_end,
            material_feedstock: draft.material_feedstock,
            exposure_conditions: draft.exposure_conditions,
            analytical_tests: draft.analytical_tests,
            deleted_at: None,
            created_at,
        }
    }

    pub fn apply(&mut self, draft: ExperimentDraft) {
        let id = self.id;
        let created_at = self.created_at;
        *self = Self::from_draft(id, draft, created_at);
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Run length between start and end. A run that ends before it starts
    /// is taken to cross midnight.
    pub fn duration_seconds(&self) -> i64 {
        crate::time::run_seconds(self.time_start, self.time_end)
    }
}

mod clock {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&crate::time::format_clock(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        crate::time::parse_clock(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ExperimentDraft {
        ExperimentDraft {
            batch_id: "B-01".into(),
            reactor_id: 1,
            operator: "Wanjiru".into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            block_id: "BLK-7".into(),
            time_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            time_end: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            material_feedstock: MaterialFeedstock::default(),
            exposure_conditions: ExposureConditions::default(),
            analytical_tests: Vec::new(),
        }
    }

    #[test]
    fn times_serialize_as_hours_and_minutes() {
        let exp = Experiment::from_draft(3, draft(), Utc::now());
        let json = serde_json::to_value(&exp).unwrap();
        assert_eq!(json["timeStart"], "09:00");
        assert_eq!(json["timeEnd"], "10:30");
        assert_eq!(json["batchId"], "B-01");
    }

    #[test]
    fn duration_handles_midnight() {
        let mut exp = Experiment::from_draft(1, draft(), Utc::now());
        assert_eq!(exp.duration_seconds(), 5_400);

        exp.time_start = NaiveTime::from_hms_opt(23, 30, 0).unwrap();
        exp.time_end = NaiveTime::from_hms_opt(0, 15, 0).unwrap();
        assert_eq!(exp.duration_seconds(), 2_700);
    }

    #[test]
    fn blank_batch_is_invalid() {
        let mut d = draft();
        d.batch_id = "  ".into();
        assert!(d.validate().is_err());
    }
}
