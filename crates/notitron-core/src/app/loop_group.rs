use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{CleanerLoop, NotifierLoop};

/// Notifier と Cleaner を独立した tokio task として動かすハンドル。
/// - `request_shutdown()` で両方のループが次の待機点で止まる
/// - `shutdown_and_join()` で終了まで待てる
pub struct LoopGroup {
    shutdown_tx: watch::Sender<bool>,
    joins: Vec<JoinHandle<()>>,
}

impl LoopGroup {
    pub fn spawn(notifier: NotifierLoop, cleaner: CleanerLoop) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let joins = vec![
            tokio::spawn(notifier.run(shutdown_rx.clone())),
            tokio::spawn(cleaner.run(shutdown_rx)),
        ];
        Self { shutdown_tx, joins }
    }

    /// In-flight scans are not cancelled; loops stop at their next wait.
    pub fn request_shutdown(&self) {
        // receivers may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        for j in self.joins {
            let _ = j.await;
        }
    }
}
