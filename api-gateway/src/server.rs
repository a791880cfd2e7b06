//! Server lifecycle
//!
//! The accept loop runs as its own task. The caller's task waits on the
//! shutdown future, then stops accepting and gives in-flight requests a
//! bounded grace period. Handlers still running when it elapses are
//! cancelled and answered with 503, which lets their connections close.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Default drain window after a shutdown signal
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// How long cancelled connections get to flush their 503 before the
/// accept task is aborted
const FORCE_CLOSE_WAIT: Duration = Duration::from_secs(1);

/// Lifecycle states, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Starting,
    Listening,
    ShuttingDown,
    Stopped,
}

pub struct Server {
    bind_address: String,
    router: Router,
    grace: Duration,
    state: Arc<watch::Sender<ServerState>>,
}

impl Server {
    pub fn new(bind_address: impl Into<String>, router: Router) -> Self {
        let (state, _) = watch::channel(ServerState::Starting);
        Self {
            bind_address: bind_address.into(),
            router,
            grace: DEFAULT_GRACE_PERIOD,
            state: Arc::new(state),
        }
    }

    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Observe lifecycle transitions
    pub fn subscribe(&self) -> watch::Receiver<ServerState> {
        self.state.subscribe()
    }

    /// Serve until `shutdown` resolves, then drain.
    ///
    /// Bind and serve failures are logged; they never end this call early, so
    /// the shutdown wait still happens.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(address = %self.bind_address, "Starting server");

        let cancel = CancellationToken::new();
        let force = CancellationToken::new();
        let router = {
            let force = force.clone();
            self.router.layer(middleware::from_fn(move |req: Request, next: Next| {
                cancel_on_force(force.clone(), req, next)
            }))
        };
        let mut accept_loop = tokio::spawn(serve(
            self.bind_address.clone(),
            router,
            cancel.clone(),
            self.state.clone(),
        ));

        shutdown.await;

        transition(&self.state, ServerState::ShuttingDown);
        info!(grace_ms = self.grace.as_millis() as u64, "Shutdown Server ...");
        cancel.cancel();

        match tokio::time::timeout(self.grace, &mut accept_loop).await {
            Ok(Ok(())) => info!("In-flight requests drained"),
            Ok(Err(err)) => error!(error = %err, "Accept loop terminated abnormally"),
            Err(_) => {
                warn!("Grace period elapsed, cancelling in-flight requests");
                force.cancel();
                if tokio::time::timeout(FORCE_CLOSE_WAIT, &mut accept_loop)
                    .await
                    .is_err()
                {
                    warn!("Connections still open, aborting accept loop");
                    accept_loop.abort();
                }
            }
        }

        transition(&self.state, ServerState::Stopped);
        info!("Server exiting");
    }
}

async fn serve(
    bind_address: String,
    router: Router,
    cancel: CancellationToken,
    state: Arc<watch::Sender<ServerState>>,
) {
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(address = %bind_address, error = %err, "listen failed");
            return;
        }
    };

    transition(&state, ServerState::Listening);
    info!(address = %bind_address, "Start Server");

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await;

    if let Err(err) = result {
        error!(error = %err, "server failed while running");
    }
}

async fn cancel_on_force(force: CancellationToken, req: Request, next: Next) -> Response {
    tokio::select! {
        response = next.run(req) => response,
        _ = force.cancelled() => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

fn transition(state: &watch::Sender<ServerState>, next: ServerState) {
    let previous = state.send_replace(next);
    info!(from = ?previous, to = ?next, "Server state changed");
}

/// Resolves on SIGINT, or SIGTERM on Unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal");
}

#[cfg(test)]
mod tests {
    use std::net::{SocketAddr, TcpListener};

    use async_trait::async_trait;
    use axum::routing::get;
    use fcstats_cms::{CmsError, DescribeMetricListRequest, DescribeMetricListResponse, MetricsClient};
    use fcstats_metering::StatsAggregator;
    use tokio::sync::oneshot;

    use super::*;
    use crate::routes::{router, AppState};

    struct EmptyMetrics;

    #[async_trait]
    impl MetricsClient for EmptyMetrics {
        async fn describe_metric_list(
            &self,
            _request: &DescribeMetricListRequest,
        ) -> Result<DescribeMetricListResponse, CmsError> {
            Ok(DescribeMetricListResponse::ok("[]"))
        }
    }

    fn test_bind_addr() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    }

    fn stats_router() -> Router {
        router(AppState::new(StatsAggregator::new(Arc::new(EmptyMetrics))))
    }

    #[tokio::test]
    async fn test_server_lifecycle() {
        let addr = test_bind_addr();
        let server = Server::new(addr.to_string(), stats_router());
        let mut states = server.subscribe();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let running = tokio::spawn(server.run(async move {
            let _ = stop_rx.await;
        }));

        states
            .wait_for(|s| *s == ServerState::Listening)
            .await
            .unwrap();

        let url = format!("http://{}/stats/service", addr);
        let response = reqwest::get(&url).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["data"]["totalInvocations"], 0);

        stop_tx.send(()).unwrap();
        running.await.unwrap();
        assert_eq!(*states.borrow(), ServerState::Stopped);

        match reqwest::get(&url).await {
            Ok(_) => panic!("server should be closed by now"),
            Err(error) => assert!(error.is_connect()),
        }
    }

    #[tokio::test]
    async fn test_bind_failure_still_waits_for_shutdown() {
        let occupied = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = occupied.local_addr().unwrap();

        let server = Server::new(addr.to_string(), stats_router());
        let states = server.subscribe();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let running = tokio::spawn(server.run(async move {
            let _ = stop_rx.await;
        }));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!running.is_finished());
        assert_eq!(*states.borrow(), ServerState::Starting);

        stop_tx.send(()).unwrap();
        running.await.unwrap();
        assert_eq!(*states.borrow(), ServerState::Stopped);
    }

    #[tokio::test]
    async fn test_in_flight_request_drains_within_grace() {
        let addr = test_bind_addr();
        let slow = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(300)).await;
                "done"
            }),
        );
        let server = Server::new(addr.to_string(), slow).with_grace_period(Duration::from_secs(2));
        let mut states = server.subscribe();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let running = tokio::spawn(server.run(async move {
            let _ = stop_rx.await;
        }));
        states
            .wait_for(|s| *s == ServerState::Listening)
            .await
            .unwrap();

        let in_flight = tokio::spawn(reqwest::get(format!("http://{}/slow", addr)));
        tokio::time::sleep(Duration::from_millis(100)).await;

        stop_tx.send(()).unwrap();
        running.await.unwrap();
        assert_eq!(*states.borrow(), ServerState::Stopped);

        let response = in_flight.await.unwrap().unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(response.text().await.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_grace_period_bounds_drain() {
        let addr = test_bind_addr();
        let slow = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "done"
            }),
        );
        let server = Server::new(addr.to_string(), slow).with_grace_period(Duration::from_millis(200));
        let mut states = server.subscribe();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let running = tokio::spawn(server.run(async move {
            let _ = stop_rx.await;
        }));
        states
            .wait_for(|s| *s == ServerState::Listening)
            .await
            .unwrap();

        let in_flight = tokio::spawn(reqwest::get(format!("http://{}/slow", addr)));
        tokio::time::sleep(Duration::from_millis(100)).await;

        let started = std::time::Instant::now();
        stop_tx.send(()).unwrap();
        running.await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(*states.borrow(), ServerState::Stopped);

        let response = tokio::time::timeout(Duration::from_secs(2), in_flight)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(response.status().as_u16(), 503);
    }
}
