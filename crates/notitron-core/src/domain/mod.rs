//! Domain model (ids, task record, due date, urgency, errors).
//!
//! ドメイン層は I/O を持たない純粋なモデルだけを置く。
//! - ids: TaskId（ULID ベース）
//! - task: Task / NewTask / UserId / ChannelId
//! - due_date: 期日文字列のパースと表示
//! - urgency: today との差分による分類（due today / due tomorrow / expired）
//! - reminder: Notifier が送るメッセージ
//! - errors: NotiError と ErrorKind

pub mod ids;
pub mod task;
pub mod due_date;
pub mod urgency;
pub mod reminder;
pub mod errors;

pub use self::ids::TaskId;
pub use self::task::{ChannelId, NewTask, Task, UserId};
pub use self::due_date::{format_due_date, parse_due_date};
pub use self::urgency::{Urgency, is_expired};
pub use self::reminder::Reminder;
pub use self::errors::{ErrorKind, Field, NotiError};
