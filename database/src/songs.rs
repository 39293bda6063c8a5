use std::collections::BTreeSet;

use tracing::{debug, instrument};

use crate::{models, Database, Result};

impl Database {
    /// Stores a song and links it to its chords, registering chord names that
    /// aren't in the vocabulary yet.
    #[instrument(skip(self, song, chords), fields(title = %song.title), ret, level = "trace")]
    pub async fn insert_song(
        &self,
        song: &models::NewSong,
        chords: &BTreeSet<String>,
    ) -> Result<i64> {
        let chords = chords.iter().cloned().collect::<Vec<_>>();
        let mut tx = self.pool.begin().await?;

        let (song_id,): (i64,) = sqlx::query_as(
            "
            insert into songs(title, author, tone, body, link)
            values ($1, $2, $3, $4, $5)
            returning id
        ",
        )
        .bind(&song.title)
        .bind(&song.author)
        .bind(&song.tone)
        .bind(&song.body)
        .bind(&song.link)
        .fetch_one(&mut *tx)
        .await?;

        let registered = sqlx::query(
            "
            insert into chords(name)
            select unnest($1::text[])
            on conflict (name) do nothing
        ",
        )
        .bind(&chords)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        debug!(n_rows = registered, "new chords registered");

        sqlx::query(
            "
            insert into song_chords(song_id, chord_id)
            select $1, id from chords where name = any($2)
        ",
        )
        .bind(song_id)
        .bind(&chords)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(song_id)
    }

    /// Every chord name seen so far, sorted.
    #[instrument(skip(self), level = "trace")]
    pub async fn known_chords(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as("select name from chords order by name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    #[instrument(skip(self), ret, level = "trace")]
    pub async fn insert_playlist(&self, playlist: &models::NewPlaylist) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let (playlist_id,): (i64,) = sqlx::query_as(
            "
            insert into playlists(name, playlist_date)
            values ($1, $2)
            returning id
        ",
        )
        .bind(&playlist.name)
        .bind(playlist.date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "
            insert into playlist_songs(playlist_id, song_id)
            select $1, unnest($2::bigint[])
        ",
        )
        .bind(playlist_id)
        .bind(&playlist.song_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(playlist_id)
    }
}
