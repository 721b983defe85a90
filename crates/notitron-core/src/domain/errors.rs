//! Errors - エラー型と分類
//!
//! # 分類
//! - User: 入力エラー。add_task の応答としてそのまま返す（ユーザーが再試行）
//! - Infrastructure: store の障害。汎用の失敗メッセージを返す。自動リトライはしない
//! - Delivery: 1 タスク分の送信失敗。ログに出してスキャンは続ける

use std::fmt;

use super::TaskId;

/// Which free-text field of the add-task command was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ClassName,
    AssignmentName,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::ClassName => f.write_str("class name"),
            Field::AssignmentName => f.write_str("assignment name"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    User,
    Infrastructure,
    Delivery,
}

#[derive(Debug, thiserror::Error)]
pub enum NotiError {
    #[error("invalid due date {0:?}: expected MM/DD/YY or MM/DD/YYYY")]
    InvalidDateFormat(String),

    #[error("{0} must not be empty")]
    EmptyField(Field),

    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    #[error("task {0} belongs to another user")]
    NotOwner(TaskId),

    #[error("task store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("message delivery failed: {0}")]
    DeliveryFailure(String),
}

impl NotiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NotiError::InvalidDateFormat(_)
            | NotiError::EmptyField(_)
            | NotiError::TaskNotFound(_)
            | NotiError::NotOwner(_) => ErrorKind::User,
            NotiError::StoreUnavailable(_) => ErrorKind::Infrastructure,
            NotiError::DeliveryFailure(_) => ErrorKind::Delivery,
        }
    }

    /// Text shown to the chat user. Infrastructure details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            NotiError::InvalidDateFormat(raw) => format!(
                "Invalid due date `{raw}`. Use MM/DD/YY or MM/DD/YYYY, e.g. 12/25/24."
            ),
            NotiError::EmptyField(field) => format!("The {field} must not be empty."),
            NotiError::TaskNotFound(id) => format!("No task with id `{id}`."),
            NotiError::NotOwner(_) => "You are not allowed to modify this task.".to_string(),
            NotiError::StoreUnavailable(_) | NotiError::DeliveryFailure(_) => {
                "Something went wrong on our side. Please try again later.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_are_classified_as_user() {
        assert_eq!(NotiError::InvalidDateFormat("x".into()).kind(), ErrorKind::User);
        assert_eq!(NotiError::EmptyField(Field::ClassName).kind(), ErrorKind::User);
        assert_eq!(
            NotiError::StoreUnavailable("down".into()).kind(),
            ErrorKind::Infrastructure
        );
        assert_eq!(
            NotiError::DeliveryFailure("429".into()).kind(),
            ErrorKind::Delivery
        );
    }

    #[test]
    fn empty_field_message_names_the_field() {
        let msg = NotiError::EmptyField(Field::AssignmentName).user_message();
        assert!(msg.contains("assignment name"));
    }

    #[test]
    fn store_errors_do_not_leak_details_to_users() {
        let err = NotiError::StoreUnavailable("connection refused at 10.0.0.3".into());
        assert!(!err.user_message().contains("10.0.0.3"));
        assert!(err.to_string().contains("10.0.0.3"));
    }
}
