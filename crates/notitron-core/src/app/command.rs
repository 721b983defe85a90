//! Command - チャットのテキストコマンドの解析と実行
//!
//! `/add_task "CS 101" HW3 12/25/24` のように、空白区切り・ダブルクォートで
//! グルーピングする。プレフィックスで始まらないメッセージは無視（None）。

use tracing::error;

use super::service::TaskService;
use super::validator::TaskInput;
use crate::domain::{ChannelId, ErrorKind, NotiError, TaskId, UserId, format_due_date};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddTask {
        class_name: String,
        assignment_name: String,
        due_date: String,
    },
    Complete {
        task_id: String,
    },
    Tasks,
    Help,
    /// Recognized prefix but wrong arity or unknown name.
    Usage(String),
}

pub const USAGE: &str = "\
Commands:
  /add_task <class> <assignment> <due-date>   due date as MM/DD/YY or MM/DD/YYYY
  /tasks                                       list your tasks
  /complete <task-id>                          mark one of your tasks as done
  /help                                        show this message
Use double quotes for names with spaces: /add_task \"CS 101\" \"Homework 3\" 12/25/24";

impl Command {
    pub fn parse(prefix: &str, text: &str) -> Option<Self> {
        let body = text.trim().strip_prefix(prefix)?;
        let mut args = split_args(body);
        if args.is_empty() {
            return None;
        }
        let name = args.remove(0).to_ascii_lowercase();

        let add_usage = format!("Usage: {prefix}add_task <class> <assignment> <due-date>");
        let command = match name.as_str() {
            "add_task" | "addtask" | "add" => match <[String; 3]>::try_from(args) {
                Ok([class_name, assignment_name, due_date]) => Command::AddTask {
                    class_name,
                    assignment_name,
                    due_date,
                },
                Err(args) => Command::Usage(format!(
                    "Expected 3 arguments (class, assignment, due date) but got {}. {add_usage}",
                    args.len()
                )),
            },
            "complete" | "done" => match <[String; 1]>::try_from(args) {
                Ok([task_id]) => Command::Complete { task_id },
                Err(_) => Command::Usage(format!("Usage: {prefix}complete <task-id>")),
            },
            "tasks" | "list" => Command::Tasks,
            "help" => Command::Help,
            other => Command::Usage(format!("Unknown command `{other}`.\n{USAGE}")),
        };
        Some(command)
    }
}

/// Whitespace split with double-quote grouping. An unterminated quote runs to
/// the end of the input.
pub fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        args.push(current);
    }
    args
}

/// Who sent a command and where.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub user_id: UserId,
    pub channel_id: Option<ChannelId>,
}

/// コマンドを TaskService に流して返信テキストを作る
#[derive(Clone)]
pub struct CommandHandler {
    service: TaskService,
    prefix: String,
}

impl CommandHandler {
    pub fn new(service: TaskService, prefix: impl Into<String>) -> Self {
        Self {
            service,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the reply, or `None` when the message is not a command.
    pub async fn handle_text(&self, ctx: &CommandContext, text: &str) -> Option<String> {
        let command = Command::parse(&self.prefix, text)?;
        Some(self.execute(ctx, command).await)
    }

    pub async fn execute(&self, ctx: &CommandContext, command: Command) -> String {
        let result = match command {
            Command::AddTask {
                class_name,
                assignment_name,
                due_date,
            } => self.add_task(ctx, &class_name, &assignment_name, &due_date).await,
            Command::Complete { task_id } => self.complete(ctx, &task_id).await,
            Command::Tasks => self.tasks(ctx).await,
            Command::Help => Ok(USAGE.to_string()),
            Command::Usage(text) => Ok(text),
        };
        result.unwrap_or_else(|e| {
            if e.kind() == ErrorKind::Infrastructure {
                error!(user_id = %ctx.user_id, error = %e, "command failed");
            }
            e.user_message()
        })
    }

    async fn add_task(
        &self,
        ctx: &CommandContext,
        class_name: &str,
        assignment_name: &str,
        due_date: &str,
    ) -> Result<String, NotiError> {
        let task = self
            .service
            .add_task(
                ctx.user_id.clone(),
                ctx.channel_id.clone(),
                TaskInput {
                    class_name,
                    assignment_name,
                    due_date,
                },
            )
            .await?;
        Ok(format!(
            "Task added: '{}' for class '{}', due {}. (id: {})",
            task.assignment_name,
            task.class_name,
            format_due_date(task.due_date),
            task.task_id
        ))
    }

    async fn complete(&self, ctx: &CommandContext, raw_id: &str) -> Result<String, NotiError> {
        let Ok(task_id) = raw_id.parse::<TaskId>() else {
            return Ok(format!("`{raw_id}` is not a task id. Use {}tasks to see yours.", self.prefix));
        };
        let task = self.service.complete_task(&ctx.user_id, task_id).await?;
        Ok(format!(
            "Task completed: '{}' for class '{}' has been removed.",
            task.assignment_name, task.class_name
        ))
    }

    async fn tasks(&self, ctx: &CommandContext) -> Result<String, NotiError> {
        let tasks = self.service.list_tasks(&ctx.user_id).await?;
        if tasks.is_empty() {
            return Ok("You have no tasks.".to_string());
        }
        let lines: Vec<String> = tasks
            .iter()
            .map(|t| {
                format!(
                    "- {} | {} | due {} | {}",
                    t.class_name,
                    t.assignment_name,
                    format_due_date(t.due_date),
                    t.task_id
                )
            })
            .collect();
        Ok(format!("Your tasks:\n{}", lines.join("\n")))
    }
}
