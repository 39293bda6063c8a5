use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSong {
    pub title: String,
    pub author: String,
    pub tone: String,
    /// Rich-text body, chords interleaved with lyrics.
    pub body: String,
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlaylist {
    pub name: String,
    pub date: time::Date,
    pub song_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLineup {
    pub date: time::Date,
    pub event: String,
    pub playlist_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct SongPlayCount {
    pub song_id: i64,
    pub title: String,
    pub author: String,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct MemberScheduleCount {
    pub member_id: i64,
    pub name: String,
    pub total: i64,
}

/// One past booking as seen by the booked member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ScheduleEntry {
    pub assignment_id: i64,
    pub lineup_date: time::Date,
    pub event: String,
    /// Current role name, or the snapshot once the role is gone.
    pub role_name: String,
}
