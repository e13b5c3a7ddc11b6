use anyhow::Result;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use cercle_application::{MonitorExit, SessionMonitor};

use crate::context::AppContext;

pub async fn run(ctx: &AppContext, interval: Option<u64>) -> Result<()> {
    let interval = Duration::from_secs(interval.unwrap_or(ctx.config.liveness_interval_secs).max(1));
    let cancel = CancellationToken::new();
    let monitor = SessionMonitor::spawn(ctx.api.clone(), interval, cancel.clone());

    println!("Watching session every {:?} (Ctrl-C to stop)", interval);
    let ctrl_c = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let exit = monitor.await?;
    ctrl_c.abort();

    match exit {
        MonitorExit::Cancelled => println!("Stopped."),
        MonitorExit::SessionEnded => println!("Session ended."),
    }
    Ok(())
}
