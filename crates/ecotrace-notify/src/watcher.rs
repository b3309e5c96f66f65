//! Polling watcher — one owned timer per dashboard subscription.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use ecotrace_core::config::NotifyConfig;
use ecotrace_entity::notification::Notification;

use crate::fallback::synthetic_notifications;
use crate::fetcher::{NotificationFetcher, Recipient};
use crate::listener::ListenerRegistry;

/// Periodically fetches a recipient's notifications and fans each batch
/// out to the registered listeners.
///
/// Start/stop are idempotent: starting an already running watcher does not
/// spawn a second timer, and stopping an idle watcher is a no-op. The
/// polling task is cancelled through a `watch` channel so an in-flight
/// fetch finishes before the task exits.
pub struct NotificationWatcher {
    /// Notification source.
    fetcher: Arc<dyn NotificationFetcher>,
    /// Fan-out targets.
    listeners: Arc<ListenerRegistry>,
    /// Who this watcher polls for.
    recipient: Recipient,
    /// Tick interval.
    poll_interval: Duration,
    /// Whether to synthesize samples on fetch failure.
    fallback_enabled: bool,
    /// The running poll task, if any.
    task: std::sync::Mutex<Option<PollTask>>,
}

struct PollTask {
    cancel: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl std::fmt::Debug for NotificationWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationWatcher")
            .field("recipient", &self.recipient)
            .field("poll_interval", &self.poll_interval)
            .field("fallback_enabled", &self.fallback_enabled)
            .finish()
    }
}

impl NotificationWatcher {
    /// Creates a stopped watcher.
    pub fn new(
        fetcher: Arc<dyn NotificationFetcher>,
        listeners: Arc<ListenerRegistry>,
        recipient: Recipient,
        config: &NotifyConfig,
    ) -> Self {
        Self {
            fetcher,
            listeners,
            recipient,
            poll_interval: Duration::from_secs(config.poll_interval_seconds),
            fallback_enabled: config.fallback_enabled,
            task: std::sync::Mutex::new(None),
        }
    }

    /// Starts polling. Returns `false` when the watcher was already
    /// running, in which case no second timer is created.
    pub fn start(&self) -> bool {
        let mut slot = self.task.lock().expect("watcher lock poisoned");
        if slot.is_some() {
            return false;
        }

        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let fetcher = Arc::clone(&self.fetcher);
        let listeners = Arc::clone(&self.listeners);
        let recipient = self.recipient;
        let poll_interval = self.poll_interval;
        let fallback_enabled = self.fallback_enabled;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            loop {
                tokio::select! {
                    _ = cancel_rx.changed() => {
                        if *cancel_rx.borrow() {
                            debug!(user_id = %recipient.user_id, "Notification watcher stopping");
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        poll_once(&*fetcher, &listeners, &recipient, fallback_enabled).await;
                    }
                }
            }
        });

        *slot = Some(PollTask {
            cancel: cancel_tx,
            handle,
        });
        true
    }

    /// Stops polling. Returns `false` when the watcher was not running.
    pub fn stop(&self) -> bool {
        let task = {
            let mut slot = self.task.lock().expect("watcher lock poisoned");
            slot.take()
        };
        match task {
            Some(task) => {
                let _ = task.cancel.send(true);
                task.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Whether the polling task is active.
    pub fn is_running(&self) -> bool {
        self.task.lock().expect("watcher lock poisoned").is_some()
    }

    /// Fans a locally produced batch out to all listeners, outside the
    /// polling cadence (used after local mutations like mark-read).
    pub fn deliver_local(&self, batch: &[Notification]) {
        self.listeners.deliver(batch);
    }

    /// Access to the listener registry for subscription management.
    pub fn listeners(&self) -> &Arc<ListenerRegistry> {
        &self.listeners
    }
}

impl Drop for NotificationWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One poll cycle: fetch, then deliver — real rows, or marked synthetic
/// samples when the store is down and the fallback is enabled.
async fn poll_once(
    fetcher: &dyn NotificationFetcher,
    listeners: &ListenerRegistry,
    recipient: &Recipient,
    fallback_enabled: bool,
) {
    match fetcher.fetch(recipient).await {
        Ok(batch) => {
            debug!(
                user_id = %recipient.user_id,
                count = batch.len(),
                "Delivering notification batch"
            );
            listeners.deliver(&batch);
        }
        Err(e) if fallback_enabled => {
            warn!(
                user_id = %recipient.user_id,
                error = %e,
                "Notification fetch failed; delivering synthetic samples"
            );
            let samples = synthetic_notifications(recipient.user_id, recipient.role);
            listeners.deliver(&samples);
        }
        Err(e) => {
            warn!(
                user_id = %recipient.user_id,
                error = %e,
                "Notification fetch failed"
            );
        }
    }
}
