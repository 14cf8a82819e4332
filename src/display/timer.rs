//! One-shot dismiss timer on its own thread.
//!
//! ```text
//! Caller thread                        Timer thread
//! -------------                        ------------
//! arm(deadline, generation)  ───────▶  wait until deadline
//! arm(deadline2, generation2) ──────▶  replaces the pending fire
//!                                      deadline2 passes
//!                                      on_fire(generation2)
//! ```
//!
//! At most one fire is pending. Arming again replaces it and cancelling
//! drops it. The callback receives the generation it was armed with so
//! the receiver can ignore a fire that raced with a newer arm.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

enum TimerCommand {
    Arm { deadline: Instant, generation: u64 },
    Cancel,
    Shutdown,
}

/// Handle to a dismiss timer thread. Dropping it stops the thread.
pub(crate) struct DismissTimer {
    tx: Sender<TimerCommand>,
    handle: Option<JoinHandle<()>>,
}

impl DismissTimer {
    /// Spawn the timer thread. `on_fire` runs on that thread.
    pub(crate) fn spawn<F>(on_fire: F) -> std::io::Result<Self>
    where
        F: Fn(u64) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("epaper-dismiss".to_string())
            .spawn(move || timer_thread_main(&rx, &on_fire))?;
        Ok(Self {
            tx,
            handle: Some(handle),
        })
    }

    /// Fire `generation` after `delay`, replacing any pending fire.
    pub(crate) fn arm(&self, delay: Duration, generation: u64) {
        let command = TimerCommand::Arm {
            deadline: Instant::now() + delay,
            generation,
        };
        if self.tx.send(command).is_err() {
            warn!("dismiss timer thread is gone, notification will not auto-hide");
        }
    }

    pub(crate) fn cancel(&self) {
        let _ = self.tx.send(TimerCommand::Cancel);
    }
}

impl Drop for DismissTimer {
    fn drop(&mut self) {
        let _ = self.tx.send(TimerCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            // The last display handle can be released from inside `on_fire`,
            // which runs on the timer thread itself.
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

fn timer_thread_main(rx: &Receiver<TimerCommand>, on_fire: &dyn Fn(u64)) {
    let mut pending: Option<(Instant, u64)> = None;
    loop {
        let command = match pending {
            Some((deadline, generation)) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(wait) {
                    Ok(command) => command,
                    Err(RecvTimeoutError::Timeout) => {
                        pending = None;
                        debug!(generation, "dismiss timer fired");
                        on_fire(generation);
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(command) => command,
                Err(_) => break,
            },
        };

        match command {
            TimerCommand::Arm {
                deadline,
                generation,
            } => pending = Some((deadline, generation)),
            TimerCommand::Cancel => pending = None,
            TimerCommand::Shutdown => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<u64>>>, impl Fn(u64) + Send + 'static) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&fired);
        (fired, move |g| sink.lock().unwrap().push(g))
    }

    #[test]
    fn test_fires_once_after_delay() {
        let (fired, on_fire) = recorder();
        let timer = DismissTimer::spawn(on_fire).unwrap();
        timer.arm(Duration::from_millis(20), 1);
        thread::sleep(Duration::from_millis(200));
        assert_eq!(*fired.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_rearm_replaces_pending_fire() {
        let (fired, on_fire) = recorder();
        let timer = DismissTimer::spawn(on_fire).unwrap();
        timer.arm(Duration::from_millis(30), 1);
        timer.arm(Duration::from_millis(60), 2);
        thread::sleep(Duration::from_millis(300));
        assert_eq!(*fired.lock().unwrap(), vec![2]);
    }

    #[test]
    fn test_cancel_and_drop() {
        let (fired, on_fire) = recorder();
        let timer = DismissTimer::spawn(on_fire).unwrap();
        timer.arm(Duration::from_millis(30), 1);
        timer.cancel();
        thread::sleep(Duration::from_millis(120));
        drop(timer);
        assert!(fired.lock().unwrap().is_empty());
    }
}
