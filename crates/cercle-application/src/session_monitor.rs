//! Periodic session liveness check.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use cercle_core::session::SessionProbe;

/// Why a [`SessionMonitor`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorExit {
    Cancelled,
    /// The probe reported an expired or missing session.
    SessionEnded,
}

/// Background task probing the session every `interval`.
pub struct SessionMonitor;

impl SessionMonitor {
    /// Spawns the monitor on the current runtime.
    ///
    /// The loop stops when `cancel` fires or when a probe fails with
    /// `SessionExpired` / `Unauthenticated`. Other probe failures are logged
    /// and the next tick runs as usual.
    pub fn spawn(
        probe: Arc<dyn SessionProbe>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<MonitorExit> {
        tokio::spawn(async move {
            tracing::info!(?interval, "Session monitor started");
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }

                let result = tokio::select! {
                    _ = cancel.cancelled() => break,
                    result = probe.probe() => result,
                };

                match result {
                    Ok(()) => tracing::debug!("Session alive"),
                    Err(e) if e.is_session_terminal() => {
                        tracing::info!(error = %e, "Session monitor stopped: session ended");
                        return MonitorExit::SessionEnded;
                    }
                    Err(e) => tracing::warn!(error = %e, "Session liveness check failed"),
                }
            }
            tracing::info!("Session monitor stopped");
            MonitorExit::Cancelled
        })
    }
}
