#[cfg(test)]
mod tests {
    use crate::shutdown::Shutdown;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[tokio::test]
    async fn should_close_in_reverse_registration_order() {
        let order = Arc::new(Mutex::new(vec![]));
        let mut shutdown = Shutdown::new();
        for name in ["http", "broker", "consumers"] {
            let order = order.clone();
            shutdown.register(name, move || async move {
                order.lock().unwrap().push(name);
                Ok(())
            });
        }
        assert_eq!(shutdown.len(), 3);

        let failures = shutdown.wait_until(async {}).await;

        assert_eq!(failures, 0);
        assert_eq!(*order.lock().unwrap(), vec!["consumers", "broker", "http"]);
    }

    #[tokio::test]
    async fn should_continue_after_failing_or_hanging_closer() {
        let closed = Arc::new(Mutex::new(vec![]));
        let mut shutdown = Shutdown::with_timeout(Duration::from_millis(50));

        let first = closed.clone();
        shutdown.register("first", move || async move {
            first.lock().unwrap().push("first");
            Ok(())
        });
        shutdown.register("hanging", || async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        });
        shutdown.register("failing", || async { Err(anyhow::anyhow!("boom")) });

        let failures = shutdown.close().await;

        assert_eq!(failures, 2);
        assert_eq!(*closed.lock().unwrap(), vec!["first"]);
    }
}
