use tokio::sync::oneshot;

/// Pending result of a unit of work submitted to the engine.
///
/// Resolves to `None` when the work was rejected, failed, or cancelled; the
/// cause has been logged by then.
#[derive(Debug)]
pub struct CalibrationTask<T> {
    rx: oneshot::Receiver<Option<T>>,
}

impl<T> CalibrationTask<T> {
    pub(crate) fn channel() -> (oneshot::Sender<Option<T>>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }

    /// Block the calling thread until the task finishes.
    ///
    /// Must not be called from inside an async runtime; use [`Self::result`]
    /// there.
    pub fn wait(self) -> Option<T> {
        self.rx.blocking_recv().ok().flatten()
    }

    pub async fn result(self) -> Option<T> {
        self.rx.await.ok().flatten()
    }
}
