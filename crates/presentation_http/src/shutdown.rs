//! Graceful shutdown with a bounded drain period

use std::time::Duration;

use axum::Router;
use tokio::{net::TcpListener, sync::oneshot};
use tracing::{info, warn};

/// How the server stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every in-flight connection finished before the deadline
    Drained,
    /// The deadline passed with connections still open
    TimedOut,
}

/// Serve `app` until `signal` resolves, then give open connections at most
/// `drain_timeout` to finish
///
/// Connection tasks still running at the deadline are left to the runtime
/// shutdown.
pub async fn serve_with_drain_timeout<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    drain_timeout: Duration,
) -> std::io::Result<ShutdownOutcome>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (fired_tx, mut fired_rx) = oneshot::channel();
    let signal = async move {
        signal.await;
        let _ = fired_tx.send(());
    };

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        biased;
        result = &mut server => {
            result?;
            return Ok(ShutdownOutcome::Drained);
        }
        Ok(()) = &mut fired_rx => {}
    }

    info!("⏳ Waiting up to {:?} for connections to close...", drain_timeout);

    if let Ok(result) = tokio::time::timeout(drain_timeout, &mut server).await {
        result?;
        Ok(ShutdownOutcome::Drained)
    } else {
        warn!(
            timeout_secs = drain_timeout.as_secs_f64(),
            "Connections still open after shutdown timeout, forcing shutdown"
        );
        Ok(ShutdownOutcome::TimedOut)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::routing::get;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpStream,
        sync::Notify,
    };

    use super::*;

    fn app(entered: Arc<Notify>) -> Router {
        Router::new()
            .route("/fast", get(|| async { "ok" }))
            .route(
                "/stuck",
                get(move || {
                    let entered = Arc::clone(&entered);
                    async move {
                        entered.notify_one();
                        std::future::pending::<&'static str>().await
                    }
                }),
            )
    }

    async fn send_request(addr: std::net::SocketAddr, path: &str) -> TcpStream {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request =
            format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        stream
    }

    #[tokio::test]
    async fn idle_server_drains_immediately() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve_with_drain_timeout(
            listener,
            app(Arc::new(Notify::new())),
            async move {
                let _ = stop_rx.await;
            },
            Duration::from_secs(5),
        ));

        stop_tx.send(()).unwrap();
        let outcome = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(outcome, ShutdownOutcome::Drained);
    }

    #[tokio::test]
    async fn finished_request_does_not_hold_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve_with_drain_timeout(
            listener,
            app(Arc::new(Notify::new())),
            async move {
                let _ = stop_rx.await;
            },
            Duration::from_secs(5),
        ));

        let mut stream = send_request(addr, "/fast").await;
        let mut buf = [0_u8; 64];
        let read = stream.read(&mut buf).await.unwrap();
        assert!(String::from_utf8_lossy(&buf[..read]).starts_with("HTTP/1.1 200"));

        stop_tx.send(()).unwrap();
        let outcome = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(outcome, ShutdownOutcome::Drained);
    }

    #[tokio::test]
    async fn stuck_request_is_cut_off_at_deadline() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let entered = Arc::new(Notify::new());
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve_with_drain_timeout(
            listener,
            app(Arc::clone(&entered)),
            async move {
                let _ = stop_rx.await;
            },
            Duration::from_millis(200),
        ));

        let _stream = send_request(addr, "/stuck").await;
        entered.notified().await;

        stop_tx.send(()).unwrap();
        let outcome = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(outcome, ShutdownOutcome::TimedOut);
    }
}
