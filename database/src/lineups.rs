use lineup::{Assignment, Lineup};
use tracing::{debug, instrument, warn};

use crate::{models, Database, Error, Result};

type AssignmentRow = (i64, i64, Option<i64>, String, Option<i64>, String);

fn assignment_from_row(row: AssignmentRow) -> Assignment {
    let (id, lineup_id, member_id, member_name_snapshot, role_id, role_name_snapshot) = row;
    Assignment {
        id: Some(id),
        lineup_id,
        member_id,
        member_name_snapshot,
        role_id,
        role_name_snapshot,
    }
}

/// Turns a unique violation on (lineup, member, role) into a typed error.
fn duplicate_or(err: sqlx::Error, assignment: &Assignment) -> Error {
    let is_duplicate = matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation());
    match (is_duplicate, assignment.member_id, assignment.role_id) {
        (true, Some(member_id), Some(role_id)) => Error::DuplicateAssignment {
            lineup_id: assignment.lineup_id,
            member_id,
            role_id,
        },
        _ => Error::Database(err),
    }
}

impl Database {
    #[instrument(skip(self), ret, level = "trace")]
    pub async fn insert_lineup(&self, lineup: &models::NewLineup) -> Result<i64> {
        let (lineup_id,): (i64,) = sqlx::query_as(
            "
            insert into lineups(lineup_date, event, playlist_id)
            values ($1, $2, $3)
            returning id
        ",
        )
        .bind(lineup.date)
        .bind(&lineup.event)
        .bind(lineup.playlist_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(lineup_id)
    }

    #[instrument(skip(self), level = "trace")]
    pub async fn lineup(&self, lineup_id: i64) -> Result<Option<Lineup>> {
        let row: Option<(i64, time::Date, String, Option<i64>)> = sqlx::query_as(
            "select id, lineup_date, event, playlist_id from lineups where id = $1",
        )
        .bind(lineup_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, date, event, playlist_id)| Lineup {
            id,
            date,
            event,
            playlist_id,
        }))
    }

    /// Books a member for a role on a lineup.
    ///
    /// The member must currently hold the role; a rejected booking comes back
    /// as [`Error::Constraint`] and nothing is written.
    #[instrument(skip(self), level = "trace")]
    pub async fn book_assignment(
        &self,
        lineup_id: i64,
        member_id: i64,
        role_id: i64,
    ) -> Result<Assignment> {
        self.lineup(lineup_id)
            .await?
            .ok_or(Error::LineupNotFound(lineup_id))?;
        let member = self
            .member(member_id)
            .await?
            .ok_or(Error::MemberNotFound(member_id))?;
        let role = self
            .role(role_id)
            .await?
            .ok_or(Error::RoleNotFound(role_id))?;

        let mut assignment = lineup::book(lineup_id, &member, &role).inspect_err(|violation| {
            warn!(%violation, "booking rejected");
        })?;
        self.write_assignment(&mut assignment).await?;

        Ok(assignment)
    }

    /// Persists an assignment, refreshing its snapshot names first.
    ///
    /// References that no longer resolve are left as they are and their
    /// snapshots are kept. While both references resolve the member must still
    /// hold the role.
    #[instrument(skip(self), level = "trace")]
    pub async fn save_assignment(&self, assignment: &mut Assignment) -> Result<()> {
        let member = match assignment.member_id {
            Some(member_id) => self.member(member_id).await?,
            None => None,
        };
        let role = match assignment.role_id {
            Some(role_id) => self.role(role_id).await?,
            None => None,
        };

        if let (Some(member), Some(role)) = (&member, &role) {
            lineup::validate_assignment(member, role)?;
        }
        assignment.apply_snapshot(member.as_ref(), role.as_ref());

        self.write_assignment(assignment).await
    }

    async fn write_assignment(&self, assignment: &mut Assignment) -> Result<()> {
        match assignment.id {
            Some(assignment_id) => {
                let updated = sqlx::query(
                    "
                    update lineup_members
                    set lineup_id = $2,
                        member_id = $3,
                        member_name_snapshot = $4,
                        role_id = $5,
                        role_name_snapshot = $6,
                        updated_at = now()
                    where id = $1
                ",
                )
                .bind(assignment_id)
                .bind(assignment.lineup_id)
                .bind(assignment.member_id)
                .bind(&assignment.member_name_snapshot)
                .bind(assignment.role_id)
                .bind(&assignment.role_name_snapshot)
                .execute(&self.pool)
                .await
                .map_err(|err| duplicate_or(err, assignment))?
                .rows_affected();
                if updated == 0 {
                    return Err(Error::AssignmentNotFound(assignment_id));
                }
                debug!(assignment_id, "assignment updated");
            }
            None => {
                let (assignment_id,): (i64,) = sqlx::query_as(
                    "
                    insert into lineup_members(
                        lineup_id, member_id, member_name_snapshot, role_id, role_name_snapshot
                    )
                    values ($1, $2, $3, $4, $5)
                    returning id
                ",
                )
                .bind(assignment.lineup_id)
                .bind(assignment.member_id)
                .bind(&assignment.member_name_snapshot)
                .bind(assignment.role_id)
                .bind(&assignment.role_name_snapshot)
                .fetch_one(&self.pool)
                .await
                .map_err(|err| duplicate_or(err, assignment))?;
                assignment.id = Some(assignment_id);
                debug!(assignment_id, "assignment inserted");
            }
        }

        Ok(())
    }

    #[instrument(skip(self), level = "trace")]
    pub async fn assignment(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let row: Option<AssignmentRow> = sqlx::query_as(
            "
            select id, lineup_id, member_id, member_name_snapshot, role_id, role_name_snapshot
            from lineup_members
            where id = $1
        ",
        )
        .bind(assignment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(assignment_from_row))
    }

    /// Every booking on a lineup, in booking order.
    #[instrument(skip(self), level = "trace")]
    pub async fn lineup_assignments(&self, lineup_id: i64) -> Result<Vec<Assignment>> {
        let rows: Vec<AssignmentRow> = sqlx::query_as(
            "
            select id, lineup_id, member_id, member_name_snapshot, role_id, role_name_snapshot
            from lineup_members
            where lineup_id = $1
            order by id
        ",
        )
        .bind(lineup_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(assignment_from_row).collect())
    }
}
