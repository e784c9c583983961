use sqlx::SqlitePool;

use crate::domain::auth_model::Caller;
use crate::domain::schedule_model::{
    Assignment, AssignmentStatus, MyAssignment, ScheduleInput, ScheduleWithVolunteers,
};
use crate::error::{Error, Result};
use crate::infrastructure::schedule_repo::ScheduleRepository;

/// What a coordinator edit does to volunteers kept on the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RosterRewrite {
    /// Full delete-and-reinsert: every kept volunteer drops back to PENDING.
    /// Matches the historical behavior; a rewritten roster is a new
    /// assignment.
    #[default]
    Reset,
    /// Keep status and reason for volunteers present in both the old and the
    /// new roster; only newcomers start PENDING.
    PreserveUnchanged,
}

/// The only component permitted to mutate schedule/roster state. Role and
/// ownership checks happen here; multi-row writes run in one transaction.
pub struct SchedulingService {
    pool: SqlitePool,
    repo: ScheduleRepository,
    rewrite: RosterRewrite,
}

impl SchedulingService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repo: ScheduleRepository::new(pool.clone()),
            pool,
            rewrite: RosterRewrite::default(),
        }
    }

    pub fn with_rewrite_policy(mut self, rewrite: RosterRewrite) -> Self {
        self.rewrite = rewrite;
        self
    }

    // =================================================================
    // Coordinator operations
    // =================================================================

    /// Creates the schedule and its full roster atomically. An error at any
    /// step drops the transaction, which rolls back the schedule row.
    pub async fn create(&self, caller: &Caller, input: &ScheduleInput) -> Result<ScheduleWithVolunteers> {
        caller.require_coordinator()?;
        input.validate()?;

        let mut tx = self.pool.begin().await?;
        let schedule_id = self.repo.insert(&mut tx, input).await?;
        if !input.volunteer_ids.is_empty() {
            self.repo
                .replace_roster(&mut tx, schedule_id, &input.volunteer_ids)
                .await?;
        }
        tx.commit().await?;

        tracing::info!(
            schedule_id,
            volunteers = input.volunteer_ids.len(),
            "schedule created"
        );
        self.repo.get(schedule_id).await
    }

    pub async fn list(&self, caller: &Caller) -> Result<Vec<ScheduleWithVolunteers>> {
        caller.require_coordinator()?;
        self.repo.list().await
    }

    /// Rewrites the scalar fields and the roster in one transaction. Under
    /// the default `Reset` policy every volunteer drops back to PENDING,
    /// including volunteers kept from the previous roster.
    pub async fn update(
        &self,
        caller: &Caller,
        id: i64,
        input: &ScheduleInput,
    ) -> Result<ScheduleWithVolunteers> {
        caller.require_coordinator()?;
        input.validate()?;

        let mut tx = self.pool.begin().await?;
        self.repo.update_fields(&mut tx, id, input).await?;
        match self.rewrite {
            RosterRewrite::Reset => {
                self.repo
                    .replace_roster(&mut tx, id, &input.volunteer_ids)
                    .await?;
            }
            RosterRewrite::PreserveUnchanged => {
                self.repo
                    .replace_roster_preserving(&mut tx, id, &input.volunteer_ids)
                    .await?;
            }
        }
        tx.commit().await?;

        tracing::info!(schedule_id = id, "schedule updated");
        self.repo.get(id).await
    }

    /// No explicit transaction: the cascading delete of the roster is atomic
    /// at the store level.
    pub async fn delete(&self, caller: &Caller, id: i64) -> Result<()> {
        caller.require_coordinator()?;
        self.repo.delete(id).await?;
        tracing::info!(schedule_id = id, "schedule deleted");
        Ok(())
    }

    // =================================================================
    // Volunteer operations
    // =================================================================

    /// The caller's own assignments, soonest first, optionally restricted to
    /// one status.
    pub async fn list_mine(
        &self,
        caller: &Caller,
        status: Option<AssignmentStatus>,
    ) -> Result<Vec<MyAssignment>> {
        self.repo.list_for_user(caller.id, status).await
    }

    pub async fn confirm(&self, caller: &Caller, assignment_id: i64) -> Result<Assignment> {
        self.update_assignment_status(caller, assignment_id, AssignmentStatus::Confirmed, None)
            .await
    }

    pub async fn request_change(
        &self,
        caller: &Caller,
        assignment_id: i64,
        reason: String,
    ) -> Result<Assignment> {
        self.update_assignment_status(
            caller,
            assignment_id,
            AssignmentStatus::ExchangeRequested,
            Some(reason),
        )
        .await
    }

    /// Volunteer-facing state transition. Ownership is enforced by the update
    /// predicate itself; a missing row and someone else's row fail the same
    /// way, so assignment ids cannot be enumerated.
    pub async fn update_assignment_status(
        &self,
        caller: &Caller,
        assignment_id: i64,
        new_status: AssignmentStatus,
        reason: Option<String>,
    ) -> Result<Assignment> {
        let reason = match new_status {
            AssignmentStatus::ExchangeRequested => {
                let reason = reason
                    .as_deref()
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .ok_or_else(|| {
                        Error::Validation("an exchange request needs a reason".into())
                    })?;
                Some(reason.to_owned())
            }
            AssignmentStatus::Pending => {
                return Err(Error::Validation(
                    "assignments cannot be moved back to pending".into(),
                ));
            }
            _ => {
                if reason.as_deref().is_some_and(|r| !r.trim().is_empty()) {
                    return Err(Error::Validation(
                        "a reason only accompanies an exchange request".into(),
                    ));
                }
                None
            }
        };

        let affected = self
            .repo
            .update_status_guarded(assignment_id, caller.id, new_status, reason.as_deref())
            .await?;

        if affected == 0 {
            // The guard failed on ownership or on the state machine. Only a
            // caller who owns the row learns which.
            return match self.repo.find_owned_status(assignment_id, caller.id).await? {
                Some(current) => Err(Error::InvalidTransition {
                    from: current,
                    to: new_status,
                }),
                None => Err(Error::AccessDenied),
            };
        }

        tracing::info!(assignment_id, status = ?new_status, "assignment status updated");
        self.repo.get_assignment(assignment_id).await
    }
}
