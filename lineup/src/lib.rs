//! Booking rules for worship lineups.
//!
//! A member may only be booked for a role they currently hold, and every
//! saved booking carries a copy of the member and role names so history stays
//! readable after either record is renamed or deleted.

use thiserror::Error;
use tracing::{debug, instrument};

pub mod models;

pub use models::{Assignment, Lineup, Member, Role};

/// A booking rejected because the member doesn't hold the role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{member_name} does not hold the role '{role_name}'")]
pub struct ConstraintViolation {
    pub member_name: String,
    pub role_name: String,
}

/// Checks that `role` is among the roles `member` currently holds.
///
/// Never substitutes another role; a mismatch is returned to the caller.
pub fn validate_assignment(member: &Member, role: &Role) -> Result<(), ConstraintViolation> {
    if member.holds(role.id) {
        return Ok(());
    }

    Err(ConstraintViolation {
        member_name: member.name.clone(),
        role_name: role.name.clone(),
    })
}

/// Validates and builds a new, snapshotted assignment ready to be persisted.
#[instrument(skip(member, role), fields(member_id = member.id, role_id = role.id), level = "trace")]
pub fn book(lineup_id: i64, member: &Member, role: &Role) -> Result<Assignment, ConstraintViolation> {
    validate_assignment(member, role)?;

    let mut assignment = Assignment::new(lineup_id, member.id, role.id);
    assignment.apply_snapshot(Some(member), Some(role));
    debug!(member = %member.name, role = %role.name, "booking accepted");

    Ok(assignment)
}
