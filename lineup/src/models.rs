use std::fmt;

use serde::{Deserialize, Serialize};

/// Something a member can do on stage: vocals, guitar, drums, sound desk...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
    /// Roles the member is qualified for right now.
    pub roles: Vec<Role>,
}

impl Member {
    pub fn holds(&self, role_id: i64) -> bool {
        self.roles.iter().any(|role| role.id == role_id)
    }
}

/// One worship event occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineup {
    pub id: i64,
    pub date: time::Date,
    pub event: String,
    pub playlist_id: Option<i64>,
}

impl fmt::Display for Lineup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let event = match self.event.trim() {
            "" => "Lineup",
            event => event,
        };
        write!(f, "{event} | {}", self.date)
    }
}

/// A member booked for a role on a lineup.
///
/// `member_id` and `role_id` are weak references: once the member or role is
/// deleted they become `None`, and the snapshot names are all that is left to
/// display. Snapshots are only ever overwritten, never cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Option<i64>,
    pub lineup_id: i64,
    pub member_id: Option<i64>,
    pub member_name_snapshot: String,
    pub role_id: Option<i64>,
    pub role_name_snapshot: String,
}

impl Assignment {
    pub fn new(lineup_id: i64, member_id: i64, role_id: i64) -> Self {
        Self {
            id: None,
            lineup_id,
            member_id: Some(member_id),
            member_name_snapshot: String::new(),
            role_id: Some(role_id),
            role_name_snapshot: String::new(),
        }
    }

    /// Copies the current names of the referenced member and role into the
    /// snapshot fields. Must run before every save.
    ///
    /// A field is only touched when its reference is still set and the record
    /// passed in is the one it points at.
    pub fn apply_snapshot(&mut self, member: Option<&Member>, role: Option<&Role>) {
        if let Some(member) = member.filter(|m| self.member_id == Some(m.id)) {
            self.member_name_snapshot.clone_from(&member.name);
        }
        if let Some(role) = role.filter(|r| self.role_id == Some(r.id)) {
            self.role_name_snapshot.clone_from(&role.name);
        }
    }

    /// Live member name while the reference resolves, the snapshot otherwise.
    pub fn member_display<'a>(&'a self, live: Option<&'a Member>) -> &'a str {
        match live.filter(|m| self.member_id == Some(m.id)) {
            Some(member) => &member.name,
            None => &self.member_name_snapshot,
        }
    }

    pub fn role_display<'a>(&'a self, live: Option<&'a Role>) -> &'a str {
        match live.filter(|r| self.role_id == Some(r.id)) {
            Some(role) => &role.name,
            None => &self.role_name_snapshot,
        }
    }

    /// Detaches the member reference, as the store does when the member is deleted.
    pub fn detach_member(&mut self) {
        self.member_id = None;
    }

    pub fn detach_role(&mut self) {
        self.role_id = None;
    }
}
