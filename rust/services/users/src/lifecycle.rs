use api_utils::Shutdown;
use std::future::Future;

pub const HTTP_SERVER: &str = "http server";
pub const BROKER_CONNECTION: &str = "broker connection";

/// Registers the service closers. Closers run in reverse registration order,
/// so the http server drains its in-flight requests while the broker
/// connection they publish on is still open.
pub fn register_closers<H, HFut, B, BFut>(
    shutdown: &mut Shutdown,
    stop_http: H,
    close_broker: B,
) where
    H: FnOnce() -> HFut + Send + 'static,
    HFut: Future<Output = anyhow::Result<()>> + Send + 'static,
    B: FnOnce() -> BFut + Send + 'static,
    BFut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    shutdown.register(BROKER_CONNECTION, close_broker);
    shutdown.register(HTTP_SERVER, stop_http);
}
