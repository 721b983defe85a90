//! `notitron list` command implementation

use anyhow::Result;
use clap::Args;
use notitron_core::config::Config;
use notitron_core::domain::{Task, UserId, format_due_date};

const TABLE_COL_CLASS: usize = 16;
const TABLE_COL_ASSIGNMENT: usize = 24;
const TABLE_COL_DUE: usize = 10;
const TABLE_COL_USER: usize = 20;

#[derive(Args)]
pub struct ListArgs {
    /// Only tasks owned by this user id
    #[arg(long)]
    user: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

fn print_table_header() {
    println!(
        "{:<width_class$} {:<width_assignment$} {:<width_due$} {:<width_user$} ID",
        "CLASS",
        "ASSIGNMENT",
        "DUE",
        "OWNER",
        width_class = TABLE_COL_CLASS,
        width_assignment = TABLE_COL_ASSIGNMENT,
        width_due = TABLE_COL_DUE,
        width_user = TABLE_COL_USER,
    );
    println!(
        "{}",
        "-".repeat(TABLE_COL_CLASS + TABLE_COL_ASSIGNMENT + TABLE_COL_DUE + TABLE_COL_USER + 36)
    );
}

fn print_table_row(task: &Task) {
    println!(
        "{:<width_class$} {:<width_assignment$} {:<width_due$} {:<width_user$} {}",
        super::truncate(&task.class_name, TABLE_COL_CLASS),
        super::truncate(&task.assignment_name, TABLE_COL_ASSIGNMENT),
        format_due_date(task.due_date),
        super::truncate(task.user_id.as_str(), TABLE_COL_USER),
        task.task_id,
        width_class = TABLE_COL_CLASS,
        width_assignment = TABLE_COL_ASSIGNMENT,
        width_due = TABLE_COL_DUE,
        width_user = TABLE_COL_USER,
    );
}

pub async fn run(config: &Config, args: ListArgs) -> Result<()> {
    let store = super::open_store(config).await?;
    let tasks = match args.user {
        Some(user) => store.list_for_user(&UserId::new(user)).await?,
        None => store.list().await?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }
    print_table_header();
    for task in &tasks {
        print_table_row(task);
    }
    println!("\n{} task(s)", tasks.len());
    Ok(())
}
