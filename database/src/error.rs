use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Member doesn't hold the requested role
    #[error("Rejected booking: {0}")]
    Constraint(#[from] lineup::ConstraintViolation),

    #[error("Member {member_id} is already booked as role {role_id} on lineup {lineup_id}")]
    DuplicateAssignment {
        lineup_id: i64,
        member_id: i64,
        role_id: i64,
    },

    #[error("Member not found: {0}")]
    MemberNotFound(i64),

    #[error("Role not found: {0}")]
    RoleNotFound(i64),

    #[error("Lineup not found: {0}")]
    LineupNotFound(i64),

    /// Saved assignment whose row no longer exists
    #[error("Assignment not found: {0}")]
    AssignmentNotFound(i64),
}
