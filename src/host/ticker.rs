//! Thread-backed timers for hosts without their own timer callbacks
//!
//! Each registered timer runs on its own thread and posts its `TimerKind`
//! onto a shared channel. The runtime drains that channel on a single
//! thread, so ticks are never handled concurrently.
//!
//! A timer has at most one undelivered tick: while a tick of that kind is
//! waiting, later ones are dropped instead of queued.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::core::traits::{TimerHost, TimerKind};

/// One slot per timer kind
const TICK_QUEUE_CAPACITY: usize = 2;

type PendingTicks = Arc<Mutex<HashSet<TimerKind>>>;

struct TickerThread {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl TickerThread {
    fn stop(self) {
        let _ = self.stop_tx.send(());
        if self.handle.join().is_err() {
            error!("[timer] Ticker thread panicked");
        }
    }
}

/// `TimerHost` posting coalesced ticks onto a crossbeam channel
pub struct ThreadTicker {
    tick_tx: Sender<TimerKind>,
    tick_rx: Receiver<TimerKind>,
    pending: PendingTicks,
    threads: Mutex<HashMap<TimerKind, TickerThread>>,
}

impl ThreadTicker {
    pub fn new() -> Self {
        let (tick_tx, tick_rx) = bounded(TICK_QUEUE_CAPACITY);
        Self {
            tick_tx,
            tick_rx,
            pending: Arc::new(Mutex::new(HashSet::new())),
            threads: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_registered(&self, timer: TimerKind) -> bool {
        self.threads.lock().contains_key(&timer)
    }

    /// Wait up to `timeout` for the next tick
    pub fn next_tick(&self, timeout: Duration) -> Option<TimerKind> {
        match self.tick_rx.recv_timeout(timeout) {
            Ok(timer) => {
                self.pending.lock().remove(&timer);
                Some(timer)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Ticks posted but not yet taken
    pub fn queued(&self) -> usize {
        self.tick_rx.len()
    }

    /// Drop every undelivered tick, returning how many there were
    pub fn discard_pending(&self) -> usize {
        let discarded = self.tick_rx.try_iter().count();
        self.pending.lock().clear();
        discarded
    }

    /// Stop every running timer thread
    pub fn shutdown(&self) {
        let threads: Vec<TickerThread> = self.threads.lock().drain().map(|(_, t)| t).collect();
        for thread in threads {
            thread.stop();
        }
    }
}

impl Default for ThreadTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerHost for ThreadTicker {
    fn register_timer(&self, timer: TimerKind, interval: Duration) {
        self.unregister_timer(timer);

        let (stop_tx, stop_rx) = bounded::<()>(1);
        let tick_tx = self.tick_tx.clone();
        let pending = Arc::clone(&self.pending);
        let handle =
            thread::spawn(move || tick_loop(timer, interval, stop_rx, tick_tx, pending));

        self.threads
            .lock()
            .insert(timer, TickerThread { stop_tx, handle });
    }

    fn unregister_timer(&self, timer: TimerKind) {
        // Take the thread out before joining so the lock is not held
        let thread = self.threads.lock().remove(&timer);
        if let Some(thread) = thread {
            thread.stop();
        }
    }
}

impl Drop for ThreadTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn tick_loop(
    timer: TimerKind,
    interval: Duration,
    stop_rx: Receiver<()>,
    tick_tx: Sender<TimerKind>,
    pending: PendingTicks,
) {
    debug!(timer = ?timer, "[timer] Thread started");
    loop {
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {
                if !pending.lock().insert(timer) {
                    // Previous tick not handled yet
                    continue;
                }
                match tick_tx.try_send(timer) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        pending.lock().remove(&timer);
                    }
                    Err(TrySendError::Disconnected(_)) => break,
                }
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    debug!(timer = ?timer, "[timer] Thread stopped");
}
