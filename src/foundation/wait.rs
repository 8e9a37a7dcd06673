use std::{sync::mpsc, time::Duration};

/// Result of a bounded wait on a worker thread.
#[derive(Debug)]
pub enum Waited<T> {
    Done(T),
    TimedOut,
    /// The worker could not be spawned or died before reporting.
    Lost(String),
}

/// Run `work` on a named worker thread and wait at most `timeout` for its result.
///
/// On timeout the worker is detached; whatever it produces later is dropped.
pub fn wait_bounded<T, F>(label: &str, timeout: Duration, work: F) -> Waited<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let spawned = std::thread::Builder::new()
        .name(format!("greetcard-{label}"))
        .spawn(move || {
            let _ = tx.send(work());
        });
    if let Err(e) = spawned {
        return Waited::Lost(format!("spawn {label} worker: {e}"));
    }

    match rx.recv_timeout(timeout) {
        Ok(v) => Waited::Done(v),
        Err(mpsc::RecvTimeoutError::Timeout) => Waited::TimedOut,
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            Waited::Lost(format!("{label} worker exited without a result"))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/wait.rs"]
mod tests;
