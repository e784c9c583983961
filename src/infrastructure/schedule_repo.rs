use std::collections::BTreeSet;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::domain::schedule_model::{
    Assignment, AssignmentStatus, MyAssignment, ScheduleHeader, ScheduleInput,
    ScheduleWithVolunteers, VolunteerEntry,
};
use crate::error::{Error, Result};

/// CRUD over `schedules` and their `schedule_volunteers` join rows.
/// A schedule's volunteer list is exactly its current join rows; writes that
/// touch both tables take the caller's connection so they run inside the
/// caller's transaction.
pub struct ScheduleRepository {
    pool: SqlitePool,
}

impl ScheduleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =================================================================
    // 1. Aggregate reads
    // =================================================================

    pub async fn get(&self, id: i64) -> Result<ScheduleWithVolunteers> {
        let header: Option<ScheduleHeader> = sqlx::query_as(
            "SELECT s.id, s.date, s.time, s.type, s.ministry_id, s.notes,
                    m.name AS ministry_name, m.color AS ministry_color
             FROM schedules s
             JOIN ministries m ON s.ministry_id = m.id
             WHERE s.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let header = header.ok_or(Error::NotFound("schedule"))?;
        let volunteers = self.volunteers_of(id).await?;

        Ok(ScheduleWithVolunteers { header, volunteers })
    }

    pub async fn list(&self) -> Result<Vec<ScheduleWithVolunteers>> {
        let headers: Vec<ScheduleHeader> = sqlx::query_as(
            "SELECT s.id, s.date, s.time, s.type, s.ministry_id, s.notes,
                    m.name AS ministry_name, m.color AS ministry_color
             FROM schedules s
             JOIN ministries m ON s.ministry_id = m.id
             ORDER BY s.date DESC, s.time ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        // Loop query per schedule; fine at this scale.
        let mut out = Vec::with_capacity(headers.len());
        for header in headers {
            let volunteers = self.volunteers_of(header.schedule.id).await?;
            out.push(ScheduleWithVolunteers { header, volunteers });
        }
        Ok(out)
    }

    async fn volunteers_of(&self, schedule_id: i64) -> Result<Vec<VolunteerEntry>> {
        let rows = sqlx::query_as(
            "SELECT sv.id AS assignment_id, sv.user_id, u.name,
                    sv.status, sv.requested_change_reason
             FROM schedule_volunteers sv
             JOIN users u ON sv.user_id = u.id
             WHERE sv.schedule_id = ?
             ORDER BY u.name ASC",
        )
        .bind(schedule_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // =================================================================
    // 2. Schedule writes (transactional pieces)
    // =================================================================

    pub async fn insert(&self, conn: &mut SqliteConnection, input: &ScheduleInput) -> Result<i64> {
        let id = sqlx::query(
            "INSERT INTO schedules (date, time, type, ministry_id, notes)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(input.date)
        .bind(input.time)
        .bind(&input.service_type)
        .bind(input.ministry_id)
        .bind(&input.notes)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
        Ok(id)
    }

    pub async fn update_fields(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        input: &ScheduleInput,
    ) -> Result<()> {
        let affected = sqlx::query(
            "UPDATE schedules
             SET date = ?, time = ?, type = ?, ministry_id = ?, notes = ?
             WHERE id = ?",
        )
        .bind(input.date)
        .bind(input.time)
        .bind(&input.service_type)
        .bind(input.ministry_id)
        .bind(&input.notes)
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(Error::NotFound("schedule"));
        }
        Ok(())
    }

    /// Deletes the full roster and inserts one fresh PENDING row per distinct
    /// volunteer id. Prior per-volunteer statuses do not survive.
    pub async fn replace_roster(
        &self,
        conn: &mut SqliteConnection,
        schedule_id: i64,
        volunteer_ids: &[i64],
    ) -> Result<()> {
        sqlx::query("DELETE FROM schedule_volunteers WHERE schedule_id = ?")
            .bind(schedule_id)
            .execute(&mut *conn)
            .await?;

        let unique: BTreeSet<i64> = volunteer_ids.iter().copied().collect();
        for user_id in unique {
            sqlx::query(
                "INSERT INTO schedule_volunteers (schedule_id, user_id, status)
                 VALUES (?, ?, ?)",
            )
            .bind(schedule_id)
            .bind(user_id)
            .bind(AssignmentStatus::Pending)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Roster rewrite that keeps status and reason for volunteers present in
    /// both the old and the new roster; removed volunteers are deleted and
    /// newcomers start PENDING.
    pub async fn replace_roster_preserving(
        &self,
        conn: &mut SqliteConnection,
        schedule_id: i64,
        volunteer_ids: &[i64],
    ) -> Result<()> {
        let unique: BTreeSet<i64> = volunteer_ids.iter().copied().collect();

        if unique.is_empty() {
            sqlx::query("DELETE FROM schedule_volunteers WHERE schedule_id = ?")
                .bind(schedule_id)
                .execute(&mut *conn)
                .await?;
            return Ok(());
        }

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("DELETE FROM schedule_volunteers WHERE schedule_id = ");
        qb.push_bind(schedule_id);
        qb.push(" AND user_id NOT IN (");
        {
            let mut sep = qb.separated(", ");
            for user_id in &unique {
                sep.push_bind(*user_id);
            }
        }
        qb.push(")");
        qb.build().execute(&mut *conn).await?;

        for user_id in unique {
            sqlx::query(
                "INSERT INTO schedule_volunteers (schedule_id, user_id, status)
                 VALUES (?, ?, ?)
                 ON CONFLICT (schedule_id, user_id) DO NOTHING",
            )
            .bind(schedule_id)
            .bind(user_id)
            .bind(AssignmentStatus::Pending)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Single-statement delete; ON DELETE CASCADE removes the roster.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let affected = sqlx::query("DELETE FROM schedules WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(Error::NotFound("schedule"));
        }
        Ok(())
    }

    // =================================================================
    // 3. Volunteer-facing reads and the guarded status write
    // =================================================================

    pub async fn list_for_user(
        &self,
        user_id: i64,
        status: Option<AssignmentStatus>,
    ) -> Result<Vec<MyAssignment>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT sv.id AS assignment_id, sv.schedule_id,
                    s.date, s.time, s.type, s.notes,
                    m.name AS ministry, sv.status, sv.requested_change_reason
             FROM schedule_volunteers sv
             JOIN schedules s ON sv.schedule_id = s.id
             JOIN ministries m ON s.ministry_id = m.id
             WHERE sv.user_id = ",
        );
        qb.push_bind(user_id);
        if let Some(status) = status {
            qb.push(" AND sv.status = ");
            qb.push_bind(status);
        }
        // Soonest first, unlike the coordinator's most-recent-first listing.
        qb.push(" ORDER BY s.date ASC, s.time ASC");

        let rows = qb
            .build_query_as::<MyAssignment>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_assignment(&self, id: i64) -> Result<Assignment> {
        let row: Option<Assignment> = sqlx::query_as(
            "SELECT id, schedule_id, user_id, status, requested_change_reason
             FROM schedule_volunteers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(Error::NotFound("assignment"))
    }

    /// Conditional status write. The predicate carries ownership
    /// (`user_id = ?`) and the legal source states for the requested target,
    /// so a single row update is the only concurrency mechanism needed.
    /// Returns the number of rows affected; zero means the row is missing,
    /// owned by someone else, or not in a legal source state.
    pub async fn update_status_guarded(
        &self,
        assignment_id: i64,
        user_id: i64,
        target: AssignmentStatus,
        reason: Option<&str>,
    ) -> Result<u64> {
        let sources = target.legal_sources();
        if sources.is_empty() {
            // Entry-only target; no row can legally reach it.
            return Ok(0);
        }

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("UPDATE schedule_volunteers SET status = ");
        qb.push_bind(target);
        qb.push(", requested_change_reason = ");
        qb.push_bind(reason.map(str::to_owned));
        qb.push(" WHERE id = ");
        qb.push_bind(assignment_id);
        qb.push(" AND user_id = ");
        qb.push_bind(user_id);
        qb.push(" AND status IN (");
        {
            let mut sep = qb.separated(", ");
            for source in sources {
                sep.push_bind(*source);
            }
        }
        qb.push(")");

        Ok(qb.build().execute(&self.pool).await?.rows_affected())
    }

    /// Current status of the row, but only if the caller owns it.
    pub async fn find_owned_status(
        &self,
        assignment_id: i64,
        user_id: i64,
    ) -> Result<Option<AssignmentStatus>> {
        let status = sqlx::query_scalar(
            "SELECT status FROM schedule_volunteers WHERE id = ? AND user_id = ?",
        )
        .bind(assignment_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(status)
    }
}
