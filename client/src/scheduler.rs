use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::{sleep, Duration};

/// Delivers delayed AI moves back to the game loop.
///
/// Each scheduled move sends the generation it was scheduled for once the
/// delay elapses. Only one move is pending at a time.
pub struct AiScheduler {
    delay: Duration,
    tx: mpsc::UnboundedSender<u64>,
    pending: Option<AbortHandle>,
}

impl AiScheduler {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<u64>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { delay, tx, pending: None }, rx)
    }

    pub fn schedule(&mut self, generation: u64) {
        self.cancel();

        let tx = self.tx.clone();
        let delay = self.delay;
        let task = tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(generation);
        });
        self.pending = Some(task.abort_handle());
        log::debug!("Scheduled AI move for game {generation} in {}ms", delay.as_millis());
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for AiScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
