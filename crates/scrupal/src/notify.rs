//! User-visible notifications for failed fetches

use reqwest::Method;
use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;
use tracing::warn;

/// What the user is told when a controller's request fails
///
/// `status` is `None` when no HTTP response arrived at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub method: Method,
    pub url: String,
    pub status: Option<u16>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "0".to_string());
        let headers = self
            .headers
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Failed with: {status} {{{headers}}} data={}", self.body)
    }
}

/// Sink for notifications; must not fail or block
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Reports notifications through tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        warn!(
            method = %notification.method,
            url = %notification.url,
            status = ?notification.status,
            "{notification}"
        );
    }
}

/// Writes one line per notification, whatever the log filter says
#[derive(Debug)]
pub struct WriteNotifier<W> {
    out: Mutex<W>,
}

impl WriteNotifier<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> WriteNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> Notifier for WriteNotifier<W> {
    fn notify(&self, notification: &Notification) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(e) = writeln!(out, "{notification}").and_then(|_| out.flush()) {
            warn!(error = %e, "failed to write notification");
        }
    }
}

/// Keeps notifications in memory, for hosts that show them later
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }

    /// Removes and returns everything received so far
    pub fn drain(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .map(|mut seen| std::mem::take(&mut *seen))
            .unwrap_or_default()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notification: &Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification.clone());
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, notification: &Notification) {
        (**self).notify(notification)
    }
}
