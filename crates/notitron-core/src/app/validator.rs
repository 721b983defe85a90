//! TaskValidator - add_task の 3 引数を検証して NewTask を作る
//!
//! 副作用なし。store への書き込みは TaskService が行う。

use chrono::{DateTime, Utc};

use crate::domain::{ChannelId, Field, NewTask, NotiError, UserId, parse_due_date};

/// Raw fields of an add-task command, as typed by the user.
#[derive(Debug, Clone, Copy)]
pub struct TaskInput<'a> {
    pub class_name: &'a str,
    pub assignment_name: &'a str,
    pub due_date: &'a str,
}

pub struct TaskValidator;

impl TaskValidator {
    /// Check order: class name, assignment name, due date.
    pub fn validate(
        user_id: UserId,
        channel_id: Option<ChannelId>,
        input: TaskInput<'_>,
        now: DateTime<Utc>,
    ) -> Result<NewTask, NotiError> {
        let class_name = non_empty(input.class_name, Field::ClassName)?;
        let assignment_name = non_empty(input.assignment_name, Field::AssignmentName)?;
        let due_date = parse_due_date(input.due_date)?;

        Ok(NewTask {
            user_id,
            channel_id,
            class_name,
            assignment_name,
            due_date,
            created_at: now,
        })
    }
}

fn non_empty(value: &str, field: Field) -> Result<String, NotiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(NotiError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}
