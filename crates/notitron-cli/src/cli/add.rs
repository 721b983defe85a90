//! `notitron add` command implementation

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use notitron_core::app::{TaskInput, TaskService};
use notitron_core::config::Config;
use notitron_core::domain::{ChannelId, UserId, format_due_date};
use notitron_core::ports::SystemClock;

#[derive(Args)]
pub struct AddArgs {
    /// Owner's Discord user id
    #[arg(long)]
    pub user: String,

    /// Channel to post reminders in (DM when omitted)
    #[arg(long)]
    pub channel: Option<String>,

    pub class_name: String,
    pub assignment_name: String,

    /// MM/DD/YY or MM/DD/YYYY
    pub due_date: String,
}

pub async fn run(config: &Config, args: AddArgs) -> Result<()> {
    let store = super::open_store(config).await?;
    let service = TaskService::new(store, Arc::new(SystemClock));

    let task = service
        .add_task(
            UserId::new(args.user),
            args.channel.map(ChannelId::new),
            TaskInput {
                class_name: &args.class_name,
                assignment_name: &args.assignment_name,
                due_date: &args.due_date,
            },
        )
        .await?;

    println!(
        "Added {} ({} / {}, due {})",
        task.task_id,
        task.class_name,
        task.assignment_name,
        format_due_date(task.due_date)
    );
    Ok(())
}
