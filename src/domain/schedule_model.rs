// =====================
// Scheduling domain model
// =====================

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Ministry {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub color: String,
    pub is_active: bool,
}

/// Acceptance state of one volunteer on one schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum AssignmentStatus {
    #[sqlx(rename = "PENDING")]
    #[serde(rename = "PENDING")]
    Pending,
    #[sqlx(rename = "CONFIRMED")]
    #[serde(rename = "CONFIRMED")]
    Confirmed,
    #[sqlx(rename = "EXCHANGE_REQUESTED")]
    #[serde(rename = "EXCHANGE_REQUESTED")]
    ExchangeRequested,
}

impl AssignmentStatus {
    /// Source states from which a volunteer may move an assignment to `self`.
    /// `Pending` is entry-only: rows are born pending on roster insertion and
    /// no volunteer request leads back to it.
    pub fn legal_sources(self) -> &'static [AssignmentStatus] {
        match self {
            AssignmentStatus::Pending => &[],
            AssignmentStatus::Confirmed => {
                &[AssignmentStatus::Pending, AssignmentStatus::ExchangeRequested]
            }
            AssignmentStatus::ExchangeRequested => &[AssignmentStatus::Pending],
        }
    }
}

/// One duty slot. The volunteer roster lives in `schedule_volunteers` and is
/// owned exclusively by its schedule.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub service_type: String,
    pub ministry_id: i64,
    pub notes: Option<String>,
}

/// Schedule row joined with its ministry, as the coordinator views it.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleHeader {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub schedule: Schedule,
    pub ministry_name: String,
    pub ministry_color: String,
}

/// One roster entry, joined with the volunteer's name.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerEntry {
    pub assignment_id: i64,
    pub user_id: i64,
    pub name: String,
    pub status: AssignmentStatus,
    pub requested_change_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWithVolunteers {
    #[serde(flatten)]
    pub header: ScheduleHeader,
    pub volunteers: Vec<VolunteerEntry>,
}

/// Raw `schedule_volunteers` row.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i64,
    pub schedule_id: i64,
    pub user_id: i64,
    pub status: AssignmentStatus,
    pub requested_change_reason: Option<String>,
}

/// One of the caller's own assignments, joined with slot details
/// (the volunteer-facing "my schedules" view).
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MyAssignment {
    pub assignment_id: i64,
    pub schedule_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub service_type: String,
    pub notes: Option<String>,
    pub ministry: String,
    pub status: AssignmentStatus,
    pub requested_change_reason: Option<String>,
}

/// One row of the flattened report view (one line per assignment).
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedAssignment {
    pub schedule_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub service_type: String,
    pub ministry: String,
    pub volunteer: String,
    pub status: AssignmentStatus,
}

/// Full payload for creating or rewriting a schedule. `volunteer_ids` is the
/// complete intended roster; duplicates collapse to one assignment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInput {
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(rename = "type")]
    pub service_type: String,
    pub ministry_id: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub volunteer_ids: Vec<i64>,
}

impl ScheduleInput {
    /// Field-shape checks only, run before any store access.
    pub fn validate(&self) -> Result<()> {
        if self.service_type.trim().is_empty() {
            return Err(Error::Validation("schedule type must not be blank".into()));
        }
        Ok(())
    }
}
