//! Scoped interrupt handling for a single download.
//!
//! An [`InterruptGuard`] listens for Ctrl+C while it is alive and records
//! the interrupt in a one-shot [`CancellationToken`]. Dropping the guard
//! stops listening, so an interrupt that arrives after a download has
//! returned cannot leak into the next one.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub struct InterruptGuard {
    token: CancellationToken,
    watcher: JoinHandle<()>,
}

impl InterruptGuard {
    /// Start listening. A cancelled `parent` counts as an interrupt too.
    ///
    /// Must be called from within a tokio runtime.
    pub fn acquire(parent: Option<&CancellationToken>) -> Self {
        let token = parent.map_or_else(CancellationToken::new, CancellationToken::child_token);
        let watcher = spawn_signal_watcher(token.clone());
        Self { token, watcher }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_interrupted(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

#[cfg(unix)]
fn spawn_signal_watcher(token: CancellationToken) -> JoinHandle<()> {
    use tokio::signal::unix::{signal, SignalKind};

    // Register before returning so there is no window where SIGINT still
    // has its default disposition.
    let registration = signal(SignalKind::interrupt());
    tokio::spawn(async move {
        match registration {
            Ok(mut interrupts) => {
                if interrupts.recv().await.is_some() {
                    warn!("Interrupt received, cancelling download");
                    token.cancel();
                }
            }
            Err(e) => debug!("Could not install interrupt handler: {e}"),
        }
    })
}

#[cfg(not(unix))]
fn spawn_signal_watcher(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received, cancelling download");
                token.cancel();
            }
            Err(e) => debug!("Could not install interrupt handler: {e}"),
        }
    })
}
