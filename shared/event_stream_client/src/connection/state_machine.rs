use super::{EventStreamCallback, EventStreamConfig, EventStreamStatus};
use crate::{
    error::Error,
    event::{EventParser, ServerSentEvent},
    retry::Backoff,
};
use futures_util::StreamExt;
use reqwest::{header::ACCEPT, Response, StatusCode};
use std::sync::Arc;
use tokio::sync::{watch, Notify};

const LAST_EVENT_ID_HEADER: &str = "Last-Event-ID";

pub struct StateMachine<Callback> {
    config: EventStreamConfig,
    client: reqwest::Client,
    callback: Callback,

    status_tx: watch::Sender<EventStreamStatus>,

    backoff: Backoff,
    parser: EventParser,
    last_event_id: Option<String>,
    response: Option<Response>,

    state: State,
}

impl<Callback> StateMachine<Callback>
where
    Callback: EventStreamCallback,
{
    pub fn new(
        config: EventStreamConfig,
        client: reqwest::Client,
        callback: Callback,
        status_tx: watch::Sender<EventStreamStatus>,
    ) -> Self {
        let backoff = Backoff::new(config.backoff.clone());

        Self {
            config,
            client,
            callback,
            status_tx,
            backoff,
            parser: EventParser::new(),
            last_event_id: None,
            response: None,
            state: State::Connecting,
        }
    }

    ///
    /// Infinite loop that keeps stream open.
    /// Loop can be stopped by using notify
    /// and ends by itself when server rejects credentials.
    ///
    #[tracing::instrument(
        name = "Event Stream",
        target = "event_stream_client::connection",
        skip_all,
        fields(url = %self.config.url)
    )]
    pub async fn run(mut self, stop: Arc<Notify>) {
        tracing::info!("state machine started");

        tokio::select! {
            biased;

            _ = stop.notified() => {
                tracing::info!("closing stream");
                self.response = None;
                self.status_tx.send_replace(EventStreamStatus::Closed);
            }

            _ = async { loop {
                match self.state {
                    State::Connecting => {
                        tracing::info!("state: Connecting");
                        self.connecting_state().await;
                    }
                    State::Streaming => {
                        tracing::info!("state: Streaming");
                        self.streaming_state().await;
                    }
                    State::Reconnecting => {
                        tracing::info!("state: Reconnecting");
                        self.reconnecting_state().await;
                    }
                    State::Rejected => {
                        tracing::info!("state: Rejected");
                        break;
                    }
                }
            }} => {}
        }

        tracing::info!("state machine finished");
    }

    async fn connecting_state(&mut self) {
        let mut request = self
            .client
            .get(&self.config.url)
            .query(&self.config.query)
            .header(ACCEPT, "text/event-stream");
        if let Some(last_event_id) = &self.last_event_id {
            request = request.header(LAST_EVENT_ID_HEADER, last_event_id);
        }

        match request.send().await {
            Ok(response) if response.status() == StatusCode::UNAUTHORIZED => {
                tracing::warn!("stream rejected credentials");
                self.callback.on_error(&Error::Unauthorized).await;
                self.status_tx.send_replace(EventStreamStatus::Unauthorized);
                self.state = State::Rejected;
            }
            Ok(response) if !response.status().is_success() => {
                self.fail(Error::UnexpectedStatus(response.status())).await;
            }
            Ok(response) => {
                tracing::info!("stream opened");
                self.backoff.reset();
                self.response = Some(response);
                self.status_tx.send_replace(EventStreamStatus::Connected);
                self.state = State::Streaming;
            }
            Err(err) => self.fail(Error::Transport(err)).await,
        }
    }

    async fn streaming_state(&mut self) {
        // It's not possible to reach this state without response
        let Some(response) = self.response.take() else {
            self.state = State::Reconnecting;
            return;
        };

        let mut stream = response.bytes_stream();
        let err = loop {
            match stream.next().await {
                Some(Ok(chunk)) => {
                    let events = self.parser.feed(&chunk);
                    if let Some(retry) = self.parser.take_reconnection_time() {
                        tracing::debug!(?retry, "server changed reconnection time");
                        self.backoff.set_initial_delay(retry);
                    }

                    for event in events {
                        self.process_event(event).await;
                    }
                }
                Some(Err(err)) => break Error::Transport(err),
                None => break Error::StreamClosed,
            }
        };

        self.fail(err).await;
    }

    async fn reconnecting_state(&mut self) {
        self.status_tx.send_replace(EventStreamStatus::Reconnecting);

        // Partial event of the dead connection must not be glued
        // with the beginning of the new one
        self.parser.reset();

        let delay = self.backoff.next_delay();
        tracing::info!(attempt = self.backoff.attempt(), ?delay, "waiting to reconnect");
        tokio::time::sleep(delay).await;

        self.status_tx.send_replace(EventStreamStatus::Connecting);
        self.state = State::Connecting;
    }

    async fn process_event(&mut self, event: ServerSentEvent) {
        if let Some(id) = &event.id {
            self.last_event_id = Some(id.clone());
        }

        tracing::trace!(event = %event.event, id = ?event.id, "received event");
        self.callback.on_event(event).await;
    }

    async fn fail(&mut self, err: Error) {
        tracing::warn!(%err, "stream failed");
        self.callback.on_error(&err).await;
        self.state = State::Reconnecting;
    }
}

enum State {
    Connecting,
    Streaming,
    Reconnecting,
    Rejected,
}
