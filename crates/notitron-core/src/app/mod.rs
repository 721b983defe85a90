//! App - アプリケーション層
//!
//! ports を組み合わせてアプリケーションロジックを実装する。
//!
//! # 主要コンポーネント
//! - **TaskValidator**: add_task の入力検証
//! - **TaskService**: 追加・完了・一覧
//! - **CommandHandler**: テキストコマンド → TaskService → 返信テキスト
//! - **NotifierLoop**: 期日が近いタスクへのリマインダー
//! - **CleanerLoop**: 期限切れタスクの削除
//! - **LoopGroup**: 2 つのループの起動と停止
//! - **AppBuilder**: ワイヤリング

pub mod builder;
pub mod cleaner_loop;
pub mod command;
pub mod loop_group;
pub mod notifier_loop;
pub mod service;
pub mod validator;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::cleaner_loop::CleanerLoop;
pub use self::command::{Command, CommandContext, CommandHandler, USAGE};
pub use self::loop_group::LoopGroup;
pub use self::notifier_loop::{NotifierLoop, ScanReport};
pub use self::service::TaskService;
pub use self::validator::{TaskInput, TaskValidator};
