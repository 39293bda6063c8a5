use time::{Date, Month};
use tracing::instrument;

use crate::{models, Database, Result};

impl Database {
    /// Songs ranked by how many of the playlists used by lineups dated in
    /// `[from, to]` include them.
    #[instrument(skip(self), level = "trace")]
    pub async fn most_played_songs(
        &self,
        from: Date,
        to: Date,
        limit: i64,
    ) -> Result<Vec<models::SongPlayCount>> {
        let songs = sqlx::query_as(
            "
            select s.id as song_id, s.title, s.author, count(*) as total
            from playlist_songs ps
            join songs s on s.id = ps.song_id
            where ps.playlist_id in (
                select playlist_id from lineups
                where lineup_date between $1 and $2 and playlist_id is not null
            )
            group by s.id, s.title, s.author
            order by total desc, s.title
            limit $3
        ",
        )
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(songs)
    }

    /// Members ranked by bookings on lineups dated in `[from, to]`.
    #[instrument(skip(self), level = "trace")]
    pub async fn most_scheduled_members(
        &self,
        from: Date,
        to: Date,
        limit: i64,
    ) -> Result<Vec<models::MemberScheduleCount>> {
        let members = sqlx::query_as(
            "
            select m.id as member_id, m.name, count(*) as total
            from lineup_members lm
            join lineups l on l.id = lm.lineup_id
            join members m on m.id = lm.member_id
            where l.lineup_date between $1 and $2
            group by m.id, m.name
            order by total desc, m.name
            limit $3
        ",
        )
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    /// A member's most recent bookings, newest first.
    #[instrument(skip(self), level = "trace")]
    pub async fn schedule_history(
        &self,
        member_id: i64,
        limit: i64,
    ) -> Result<Vec<models::ScheduleEntry>> {
        let entries = sqlx::query_as(
            "
            select lm.id as assignment_id,
                   l.lineup_date,
                   l.event,
                   coalesce(r.name, lm.role_name_snapshot) as role_name
            from lineup_members lm
            join lineups l on l.id = lm.lineup_id
            left join roles r on r.id = lm.role_id
            where lm.member_id = $1
            order by l.lineup_date desc, lm.id desc
            limit $2
        ",
        )
        .bind(member_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

/// The same day `months` calendar months earlier, clamped to the end of
/// shorter months (31 March minus one month is 28 or 29 February).
pub fn months_before(date: Date, months: u32) -> Date {
    let index = date.year() as i64 * 12 + u8::from(date.month()) as i64 - 1 - months as i64;
    let year = index.div_euclid(12) as i32;
    let month = Month::January.nth_next(index.rem_euclid(12) as u8);

    (1..=date.day())
        .rev()
        .find_map(|day| Date::from_calendar_date(year, month, day).ok())
        .unwrap_or(Date::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_months_before_same_day() {
        assert_eq!(months_before(date!(2024 - 09 - 15), 6), date!(2024 - 03 - 15));
        assert_eq!(months_before(date!(2024 - 09 - 15), 0), date!(2024 - 09 - 15));
    }

    #[test]
    fn test_months_before_crosses_year() {
        assert_eq!(months_before(date!(2024 - 02 - 10), 6), date!(2023 - 08 - 10));
        assert_eq!(months_before(date!(2024 - 05 - 01), 12), date!(2023 - 05 - 01));
    }

    #[test]
    fn test_months_before_clamps_day() {
        assert_eq!(months_before(date!(2024 - 03 - 31), 1), date!(2024 - 02 - 29));
        assert_eq!(months_before(date!(2023 - 03 - 31), 1), date!(2023 - 02 - 28));
        assert_eq!(months_before(date!(2024 - 08 - 31), 6), date!(2024 - 02 - 29));
        assert_eq!(months_before(date!(2024 - 02 - 29), 12), date!(2023 - 02 - 28));
    }
}
