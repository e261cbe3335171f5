//! Input producers and the single pending-event slot.
//!
//! A keyboard reader and a pointer poller run on a tokio runtime and feed a
//! channel of capacity one. The render thread takes one event per frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError, Receiver, Sender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::backend::{KeySource, PointerSource, PointerState, Position};
use crate::config::InputConfig;
use crate::error::EngineError;
use crate::keys::KeyInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyInput),
    /// Left button went down at this cell.
    Click(Position),
    /// Pointer moved without a click.
    Hover(Position),
}

pub struct Dispatcher {
    rx: Receiver<InputEvent>,
    running: Arc<AtomicBool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    /// A dispatcher fed by hand. Useful for scripting and tests.
    pub fn channel(capacity: usize) -> (Sender<InputEvent>, Dispatcher) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let dispatcher = Dispatcher { rx, running: Arc::new(AtomicBool::new(true)), tasks: Vec::new() };
        (tx, dispatcher)
    }

    /// Starts the keyboard reader and (optionally) the pointer poller on
    /// `handle`. Must be called from outside the runtime's own threads.
    pub fn spawn<K, P>(handle: &Handle, keys: K, pointer: Option<P>, config: &InputConfig) -> Self
    where
        K: KeySource,
        P: PointerSource,
    {
        let (tx, mut dispatcher) = Self::channel(1);
        let running = Arc::clone(&dispatcher.running);

        let key_tx = tx.clone();
        let key_running = Arc::clone(&running);
        let key_timeout = config.key_poll;
        dispatcher.tasks.push(
            handle.spawn_blocking(move || keyboard_loop(keys, key_tx, key_running, key_timeout)),
        );

        if let Some(pointer) = pointer {
            let interval = config.pointer_poll;
            let debounce = config.click_debounce;
            dispatcher
                .tasks
                .push(handle.spawn(pointer_loop(pointer, tx, running, interval, debounce)));
        }
        debug!(producers = dispatcher.tasks.len(), "dispatcher started");
        dispatcher
    }

    /// Blocks until the next event. Must not be called on a runtime thread.
    pub fn next_event(&mut self) -> Result<InputEvent> {
        match self.rx.blocking_recv() {
            Some(ev) => Ok(ev),
            None => Err(EngineError::InputClosed.into()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Asks producers to stop. The keyboard reader notices after its
    /// current read times out.
    pub fn shutdown(&mut self) {
        if self.running.swap(false, Ordering::Relaxed) {
            debug!("dispatcher stopping");
        }
        self.rx.close();
    }

    pub fn tasks_finished(&self) -> bool {
        self.tasks.iter().all(|t| t.is_finished())
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn keyboard_loop<K: KeySource>(
    mut keys: K,
    tx: Sender<InputEvent>,
    running: Arc<AtomicBool>,
    timeout: Duration,
) {
    while running.load(Ordering::Relaxed) {
        match keys.read_key(timeout) {
            Ok(Some(key)) => {
                // Waits for the slot instead of dropping the key, so a key
                // typed while a frame is busy is handled by the next frame.
                if tx.blocking_send(InputEvent::Key(key)).is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "keyboard source failed");
                break;
            }
        }
    }
    debug!("keyboard reader stopped");
}

async fn pointer_loop<P: PointerSource>(
    mut pointer: P,
    tx: Sender<InputEvent>,
    running: Arc<AtomicBool>,
    interval: Duration,
    debounce: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    let mut last = PointerState::default();
    while running.load(Ordering::Relaxed) {
        ticker.tick().await;
        let now = match pointer.poll_pointer() {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "pointer source failed");
                break;
            }
        };
        let clicked = now.left_down && !last.left_down;
        let moved = now.position != last.position;
        last = now;

        let event = if clicked {
            InputEvent::Click(now.position)
        } else if moved {
            InputEvent::Hover(now.position)
        } else {
            continue;
        };
        match tx.try_send(event) {
            // Slot taken: this frame already has its event.
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Closed(_)) => break,
        }
        if clicked {
            tokio::time::sleep(debounce).await;
        }
    }
    debug!("pointer poller stopped");
}
