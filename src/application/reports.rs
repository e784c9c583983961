use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::application::dto::{DashboardSummary, ReportFilters};
use crate::domain::auth_model::{Caller, Role, UserStatus};
use crate::domain::schedule_model::{AssignmentStatus, FlattenedAssignment};
use crate::error::Result;

/// Read-only projections for dashboards and reports. No transactions and no
/// state mutation; any error aborts the whole read.
pub struct ReportService {
    pool: SqlitePool,
}

impl ReportService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// One row per assignment across all schedules, filterable and ordered by
    /// date descending, time ascending, volunteer name ascending.
    pub async fn list_flattened(
        &self,
        _caller: &Caller,
        filters: &ReportFilters,
    ) -> Result<Vec<FlattenedAssignment>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT s.id AS schedule_id, s.date, s.time, s.type,
                    m.name AS ministry, u.name AS volunteer, sv.status
             FROM schedule_volunteers sv
             JOIN schedules s ON sv.schedule_id = s.id
             JOIN users u ON sv.user_id = u.id
             JOIN ministries m ON s.ministry_id = m.id
             WHERE 1 = 1",
        );

        if let Some(search) = filters.search.as_deref() {
            let like = format!("%{search}%");
            qb.push(" AND (u.name LIKE ");
            qb.push_bind(like.clone());
            qb.push(" OR s.type LIKE ");
            qb.push_bind(like);
            qb.push(")");
        }
        if let Some(status) = filters.status {
            qb.push(" AND sv.status = ");
            qb.push_bind(status);
        }
        if let Some(ministry_id) = filters.ministry_id {
            qb.push(" AND s.ministry_id = ");
            qb.push_bind(ministry_id);
        }
        qb.push(" ORDER BY s.date DESC, s.time ASC, u.name ASC");

        let rows = qb
            .build_query_as::<FlattenedAssignment>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Role-dispatched dashboard counters.
    pub async fn summary(&self, caller: &Caller) -> Result<DashboardSummary> {
        match caller.role {
            Role::Coordinator => {
                let active_volunteers: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE status = ? AND role = ?")
                        .bind(UserStatus::Active)
                        .bind(Role::Volunteer)
                        .fetch_one(&self.pool)
                        .await?;

                let pending_schedules: i64 = sqlx::query_scalar(
                    "SELECT COUNT(DISTINCT schedule_id) FROM schedule_volunteers WHERE status = ?",
                )
                .bind(AssignmentStatus::Pending)
                .fetch_one(&self.pool)
                .await?;

                Ok(DashboardSummary::Coordinator {
                    active_volunteers,
                    pending_schedules,
                })
            }
            Role::Volunteer => {
                let upcoming: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*)
                     FROM schedule_volunteers sv
                     JOIN schedules s ON sv.schedule_id = s.id
                     WHERE sv.user_id = ? AND s.date >= date('now')",
                )
                .bind(caller.id)
                .fetch_one(&self.pool)
                .await?;

                let pending_confirmations: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM schedule_volunteers WHERE user_id = ? AND status = ?",
                )
                .bind(caller.id)
                .bind(AssignmentStatus::Pending)
                .fetch_one(&self.pool)
                .await?;

                Ok(DashboardSummary::Volunteer {
                    upcoming,
                    pending_confirmations,
                })
            }
        }
    }
}
