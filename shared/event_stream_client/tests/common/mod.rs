use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    routing::get,
    Router,
};
use event_stream_client::{
    BackoffConfig, EventStreamCallback, EventStreamConfig, Error, ServerSentEvent,
};
use futures::{stream, StreamExt};
use std::{
    collections::HashMap,
    convert::Infallible,
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, Once,
    },
    time::Duration,
};
use tokio::sync::mpsc;
use tracing::level_filters::LevelFilter;

static INIT_TRACING_ONCE: Once = Once::new();

pub fn init_test_environment() {
    INIT_TRACING_ONCE.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(LevelFilter::TRACE)
            .with_target(false)
            .with_test_writer()
            .init();
    });
}

///
/// Response sent for a single stream request
///
#[derive(Clone)]
pub enum Script {
    Status(StatusCode),
    Events {
        events: Vec<(&'static str, &'static str)>,
        close: bool,
    },
    /// Block with reconnection time only, then the stream is closed
    Retry(Duration),
}

#[derive(Default)]
pub struct TestServerState {
    scripts: Vec<Script>,
    requests: AtomicUsize,
    last_event_ids: Mutex<Vec<Option<String>>>,
    tokens: Mutex<Vec<Option<String>>>,
}

pub struct TestServer {
    pub address: SocketAddr,
    state: Arc<TestServerState>,
}

impl TestServer {
    pub async fn start(scripts: Vec<Script>) -> Self {
        let state = Arc::new(TestServerState {
            scripts,
            ..Default::default()
        });
        let router = Router::new()
            .route("/subscribe", get(subscribe))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { address, state }
    }

    pub fn config(&self, backoff: BackoffConfig) -> EventStreamConfig {
        EventStreamConfig {
            url: format!("http://{}/subscribe", self.address),
            query: vec![("token".to_string(), "secret".to_string())],
            backoff,
        }
    }

    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    pub fn last_event_ids(&self) -> Vec<Option<String>> {
        self.state.last_event_ids.lock().unwrap().clone()
    }

    pub fn tokens(&self) -> Vec<Option<String>> {
        self.state.tokens.lock().unwrap().clone()
    }
}

async fn subscribe(
    State(state): State<Arc<TestServerState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let index = state.requests.fetch_add(1, Ordering::SeqCst);

    let last_event_id = headers
        .get("last-event-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state.last_event_ids.lock().unwrap().push(last_event_id);
    state.tokens.lock().unwrap().push(query.get("token").cloned());

    let script = state.scripts.get(index).cloned().unwrap_or(Script::Events {
        events: Vec::new(),
        close: false,
    });

    match script {
        Script::Status(status) => status.into_response(),
        Script::Retry(retry) => {
            let events = stream::iter([Ok::<_, Infallible>(Event::default().retry(retry))]);
            Sse::new(events.boxed()).into_response()
        }
        Script::Events { events, close } => {
            let events = events.into_iter().map(|(id, data)| {
                Ok::<_, Infallible>(Event::default().event("notification").id(id).data(data))
            });
            let events = stream::iter(events);

            if close {
                Sse::new(events.boxed()).into_response()
            } else {
                let events = events.chain(stream::pending());
                Sse::new(events.boxed()).into_response()
            }
        }
    }
}

#[derive(Clone)]
pub struct TestCallback {
    events_tx: mpsc::UnboundedSender<ServerSentEvent>,
    errors_tx: mpsc::UnboundedSender<String>,
}

impl TestCallback {
    pub fn new() -> (
        Self,
        mpsc::UnboundedReceiver<ServerSentEvent>,
        mpsc::UnboundedReceiver<String>,
    ) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (errors_tx, errors_rx) = mpsc::unbounded_channel();

        (
            Self {
                events_tx,
                errors_tx,
            },
            events_rx,
            errors_rx,
        )
    }
}

#[async_trait]
impl EventStreamCallback for TestCallback {
    async fn on_event(&self, event: ServerSentEvent) {
        let _ = self.events_tx.send(event);
    }

    async fn on_error(&self, error: &Error) {
        let _ = self.errors_tx.send(error.to_string());
    }
}

pub fn fast_backoff() -> BackoffConfig {
    BackoffConfig::fixed(Duration::from_millis(50))
}
