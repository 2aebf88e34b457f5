use futures::future::BoxFuture;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

type CloseFn = Box<dyn FnOnce() -> BoxFuture<'static, anyhow::Result<()>> + Send>;

/// Runs registered closers once the process is asked to stop.
///
/// Closers run in reverse registration order, each bounded by the close
/// timeout. A failing or hanging closer is logged and the next one still runs.
pub struct Shutdown {
    closers: Vec<(String, CloseFn)>,
    timeout: Duration,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_CLOSE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            closers: vec![],
            timeout,
        }
    }

    pub fn register<F, Fut>(&mut self, name: impl Into<String>, close: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.closers
            .push((name.into(), Box::new(move || Box::pin(close()))));
    }

    pub fn len(&self) -> usize {
        self.closers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closers.is_empty()
    }

    /// Blocks until SIGINT, SIGTERM, SIGHUP, SIGQUIT or SIGABRT arrives, then
    /// closes everything.
    pub async fn wait_for_signal(self) -> usize {
        match wait_for_termination().await {
            Ok(signal) => log::info!("received {signal}, shutting down"),
            Err(err) => log::error!("failed to listen for shutdown signals: {err}"),
        }
        self.close().await
    }

    /// Like [`Shutdown::wait_for_signal`], but also stops when `trigger`
    /// completes.
    pub async fn wait_until<F>(self, trigger: F) -> usize
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = wait_for_termination() => match result {
                Ok(signal) => log::info!("received {signal}, shutting down"),
                Err(err) => log::error!("failed to listen for shutdown signals: {err}"),
            },
            _ = trigger => log::info!("shutdown requested"),
        }
        self.close().await
    }

    /// Runs every closer and returns how many of them failed or timed out.
    pub async fn close(mut self) -> usize {
        let mut failures = 0;
        while let Some((name, close)) = self.closers.pop() {
            match tokio::time::timeout(self.timeout, close()).await {
                Ok(Ok(())) => log::info!("closed {name}"),
                Ok(Err(err)) => {
                    failures += 1;
                    log::error!("failed to close {name}: {err:#}");
                }
                Err(_) => {
                    failures += 1;
                    log::error!("timed out closing {name} after {:?}", self.timeout);
                }
            }
        }
        failures
    }
}

#[cfg(unix)]
async fn wait_for_termination() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    const SIGABRT: i32 = 6;
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;
    let mut quit = signal(SignalKind::quit())?;
    let mut abort = signal(SignalKind::from_raw(SIGABRT))?;

    let name = tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
        _ = hangup.recv() => "SIGHUP",
        _ = quit.recv() => "SIGQUIT",
        _ = abort.recv() => "SIGABRT",
    };
    Ok(name)
}

#[cfg(not(unix))]
async fn wait_for_termination() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}
