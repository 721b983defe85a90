use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::TaskId;

/// Chat platform user id (Discord snowflake as text).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Chat platform channel id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 検証済みで、まだ store に書かれていないタスク。
///
/// `TaskValidator` だけがこれを作る。store が ID を振って `Task` になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub user_id: UserId,
    pub channel_id: Option<ChannelId>,
    pub class_name: String,
    pub assignment_name: String,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl NewTask {
    pub fn with_id(self, task_id: TaskId) -> Task {
        Task {
            task_id,
            user_id: self.user_id,
            channel_id: self.channel_id,
            class_name: self.class_name,
            assignment_name: self.assignment_name,
            due_date: self.due_date,
            created_at: self.created_at,
        }
    }
}

/// A stored assignment record.
///
/// `due_date` has no time component; it is interpreted in the configured
/// timezone and serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<ChannelId>,
    pub class_name: String,
    pub assignment_name: String,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.user_id == user
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ulid::Ulid;

    fn sample() -> Task {
        NewTask {
            user_id: UserId::new("42"),
            channel_id: None,
            class_name: "CS101".into(),
            assignment_name: "HW3".into(),
            due_date: NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 12, 24, 8, 0, 0).unwrap(),
        }
        .with_id(TaskId::from_ulid(Ulid::new()))
    }

    #[test]
    fn record_shape_uses_plain_date() {
        let task = sample();
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["due_date"], "2024-12-25");
        assert_eq!(value["user_id"], "42");
        assert_eq!(value["class_name"], "CS101");
        assert!(value.get("channel_id").is_none());
    }

    #[test]
    fn ownership_is_by_user_id() {
        let task = sample();
        assert!(task.is_owned_by(&UserId::new("42")));
        assert!(!task.is_owned_by(&UserId::new("43")));
    }
}
