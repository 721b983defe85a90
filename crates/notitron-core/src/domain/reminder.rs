use serde::{Deserialize, Serialize};

use super::due_date::format_due_date;
use super::{ChannelId, Task, TaskId, Urgency, UserId};

/// Notifier が 1 タスクにつき 1 通送るメッセージ。
///
/// 宛先は `channel_id` があればそのチャンネル（owner をメンション）、
/// なければ owner への DM。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub task_id: TaskId,
    pub user_id: UserId,
    pub channel_id: Option<ChannelId>,
    pub urgency: Urgency,
    pub text: String,
}

impl Reminder {
    pub fn for_task(task: &Task, urgency: Urgency) -> Self {
        let due = format_due_date(task.due_date);
        let text = match urgency {
            Urgency::DueToday => format!(
                "<@{}>, your task '{}' for class '{}' is due TODAY ({due})!",
                task.user_id, task.assignment_name, task.class_name
            ),
            Urgency::DueTomorrow => format!(
                "<@{}>, heads up: your task '{}' for class '{}' is due tomorrow ({due}).",
                task.user_id, task.assignment_name, task.class_name
            ),
        };

        Self {
            task_id: task.task_id,
            user_id: task.user_id.clone(),
            channel_id: task.channel_id.clone(),
            urgency,
            text,
        }
    }
}
