//! Behavioral tests for the notification watcher and listener fan-out,
//! driven through a mock fetcher so no database is needed.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use ecotrace_core::config::NotifyConfig;
use ecotrace_core::error::AppError;
use ecotrace_core::result::AppResult;
use ecotrace_entity::notification::Notification;
use ecotrace_entity::user::UserRole;
use ecotrace_notify::{ListenerRegistry, NotificationFetcher, NotificationWatcher, Recipient};

/// Fetcher that counts calls and returns an empty batch.
struct CountingFetcher {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl NotificationFetcher for CountingFetcher {
    async fn fetch(&self, _recipient: &Recipient) -> AppResult<Vec<Notification>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

/// Fetcher that always fails, simulating an unreachable store.
struct FailingFetcher;

#[async_trait]
impl NotificationFetcher for FailingFetcher {
    async fn fetch(&self, _recipient: &Recipient) -> AppResult<Vec<Notification>> {
        Err(AppError::service_unavailable("store unreachable"))
    }
}

fn recipient() -> Recipient {
    Recipient {
        user_id: Uuid::new_v4(),
        role: UserRole::Transporteur,
    }
}

fn config(fallback: bool) -> NotifyConfig {
    NotifyConfig {
        poll_interval_seconds: 3600,
        fallback_enabled: fallback,
        ..NotifyConfig::default()
    }
}

fn watcher_with(
    fetcher: Arc<dyn NotificationFetcher>,
    fallback: bool,
) -> (NotificationWatcher, Arc<ListenerRegistry>) {
    let listeners = Arc::new(ListenerRegistry::new());
    let watcher = NotificationWatcher::new(
        fetcher,
        Arc::clone(&listeners),
        recipient(),
        &config(fallback),
    );
    (watcher, listeners)
}

#[tokio::test]
async fn starting_twice_keeps_a_single_interval() {
    let calls = Arc::new(AtomicUsize::new(0));
    let fetcher = Arc::new(CountingFetcher {
        calls: Arc::clone(&calls),
    });
    let (watcher, _listeners) = watcher_with(fetcher, false);

    assert!(watcher.start());
    assert!(!watcher.start(), "second start must not spawn a new timer");
    assert!(watcher.is_running());

    // The interval fires immediately on spawn; with a single timer and a
    // one-hour period we must observe exactly one fetch.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(watcher.stop());
}

#[tokio::test]
async fn stopping_twice_is_a_noop() {
    let fetcher = Arc::new(CountingFetcher {
        calls: Arc::new(AtomicUsize::new(0)),
    });
    let (watcher, _listeners) = watcher_with(fetcher, false);

    assert!(!watcher.stop(), "stop before start is a no-op");

    assert!(watcher.start());
    assert!(watcher.stop());
    assert!(!watcher.stop(), "second stop is a no-op");
    assert!(!watcher.is_running());
}

#[tokio::test]
async fn watcher_can_be_restarted_after_stop() {
    let calls = Arc::new(AtomicUsize::new(0));
    let fetcher = Arc::new(CountingFetcher {
        calls: Arc::clone(&calls),
    });
    let (watcher, _listeners) = watcher_with(fetcher, false);

    assert!(watcher.start());
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(watcher.stop());

    assert!(watcher.start());
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(watcher.stop());

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn every_listener_hears_each_fetch_once() {
    let fetcher = Arc::new(CountingFetcher {
        calls: Arc::new(AtomicUsize::new(0)),
    });
    let (watcher, listeners) = watcher_with(fetcher, false);

    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&first);
    listeners.subscribe(Box::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    let counter = Arc::clone(&second);
    listeners.subscribe(Box::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    watcher.start();
    tokio::time::sleep(Duration::from_millis(200)).await;
    watcher.stop();

    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fetch_failure_with_fallback_delivers_marked_samples() {
    let (watcher, listeners) = watcher_with(Arc::new(FailingFetcher), true);

    let all_synthetic = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&all_synthetic);
    listeners.subscribe(Box::new(move |batch| {
        if !batch.is_empty() && batch.iter().all(|n| n.synthetic) {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }));

    watcher.start();
    tokio::time::sleep(Duration::from_millis(200)).await;
    watcher.stop();

    assert_eq!(all_synthetic.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fetch_failure_without_fallback_delivers_nothing() {
    let (watcher, listeners) = watcher_with(Arc::new(FailingFetcher), false);

    let deliveries = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&deliveries);
    listeners.subscribe(Box::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    watcher.start();
    tokio::time::sleep(Duration::from_millis(200)).await;
    watcher.stop();

    assert_eq!(deliveries.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn local_mutations_fan_out_immediately() {
    let fetcher = Arc::new(CountingFetcher {
        calls: Arc::new(AtomicUsize::new(0)),
    });
    let (watcher, listeners) = watcher_with(fetcher, false);

    let deliveries = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&deliveries);
    listeners.subscribe(Box::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    // No polling task at all; a local mutation still reaches listeners.
    watcher.deliver_local(&[]);
    assert_eq!(deliveries.load(Ordering::SeqCst), 1);
}
