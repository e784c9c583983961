use serde::{Deserialize, Serialize};

use crate::domain::schedule_model::AssignmentStatus;

/// Typed filters for the flattened report view. `None` means "no filter";
/// there is no sentinel string for "all".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilters {
    /// Case-insensitive substring match on volunteer name or schedule type.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<AssignmentStatus>,
    #[serde(default)]
    pub ministry_id: Option<i64>,
}

/// Role-dependent dashboard counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DashboardSummary {
    #[serde(rename_all = "camelCase")]
    Coordinator {
        active_volunteers: i64,
        pending_schedules: i64,
    },
    #[serde(rename_all = "camelCase")]
    Volunteer {
        upcoming: i64,
        pending_confirmations: i64,
    },
}
