use super::{server_sent_event::DEFAULT_EVENT_TYPE, ServerSentEvent};
use std::time::Duration;

///
/// Incremental parser of `text/event-stream` body.
///
/// Chunks can be split at any byte, so incomplete line
/// is kept in the buffer until the rest of it arrives.
///
#[derive(Debug, Default)]
pub struct EventParser {
    buffer: Vec<u8>,

    event: Option<String>,
    data: Vec<String>,
    id: Option<String>,
    retry: Option<Duration>,

    /// Applies as soon as the field is parsed, even without dispatched event
    reconnection_time: Option<Duration>,
}

impl EventParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ServerSentEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(position) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let mut line = self.buffer.drain(..=position).collect::<Vec<_>>();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }

            let line = String::from_utf8_lossy(&line);
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }

        events
    }

    ///
    /// ### Returns
    /// Reconnection time sent by the server since the last call
    ///
    pub fn take_reconnection_time(&mut self) -> Option<Duration> {
        self.reconnection_time.take()
    }

    ///
    /// Discard everything received so far.
    /// Must be called before feeding data from a new connection.
    ///
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn process_line(&mut self, line: &str) -> Option<ServerSentEvent> {
        if line.is_empty() {
            return self.dispatch();
        }

        if line.starts_with(':') {
            tracing::trace!("skipped comment");
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            "id" if !value.contains('\0') => self.id = Some(value.to_string()),
            "retry" => match value.parse::<u64>() {
                Ok(millis) => {
                    self.retry = Some(Duration::from_millis(millis));
                    self.reconnection_time = self.retry;
                }
                Err(_) => tracing::debug!(value, "ignored invalid retry field"),
            },
            _ => tracing::trace!(field, "ignored unknown field"),
        }

        None
    }

    fn dispatch(&mut self) -> Option<ServerSentEvent> {
        let event = self.event.take();
        let data = std::mem::take(&mut self.data);
        let retry = self.retry.take();

        // id is kept between events as the last event id
        let id = self.id.clone();

        if data.is_empty() {
            return None;
        }

        Some(ServerSentEvent {
            event: event
                .filter(|event| !event.is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
            data: data.join("\n"),
            id,
            retry,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_single_event() {
        let mut parser = EventParser::new();

        let events = parser.feed(b"event: notification\nid: 7\ndata: {\"id\":7}\n\n");

        assert_eq!(
            events,
            vec![ServerSentEvent {
                event: "notification".to_string(),
                data: "{\"id\":7}".to_string(),
                id: Some("7".to_string()),
                retry: None,
            }]
        );
    }

    #[test]
    fn parse_event_split_across_chunks() {
        let mut parser = EventParser::new();

        assert!(parser.feed(b"event: notifi").is_empty());
        assert!(parser.feed(b"cation\r\ndata: first").is_empty());
        let events = parser.feed(b" line\r\n\r\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "notification");
        assert_eq!(events[0].data, "first line");
    }

    #[test]
    fn parse_utf8_split_inside_character() {
        let mut parser = EventParser::new();
        let bytes = "data: zażółć\n\n".as_bytes();

        assert!(parser.feed(&bytes[..9]).is_empty());
        let events = parser.feed(&bytes[9..]);

        assert_eq!(events[0].data, "zażółć");
    }

    #[test]
    fn parse_multiline_data() {
        let mut parser = EventParser::new();

        let events = parser.feed(b"data: line 1\ndata: line 2\n\n");

        assert_eq!(events[0].event, "message");
        assert_eq!(events[0].data, "line 1\nline 2");
    }

    #[test]
    fn parse_skips_comments_and_empty_events() {
        let mut parser = EventParser::new();

        let events = parser.feed(b": keep-alive\n\nevent: ping\n\ndata: x\n\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "message");
    }

    #[test]
    fn parse_retry_field() {
        let mut parser = EventParser::new();

        let events = parser.feed(b"retry: 1500\ndata: x\n\nretry: soon\ndata: y\n\n");

        assert_eq!(events[0].retry, Some(Duration::from_millis(1500)));
        assert_eq!(events[1].retry, None);
    }

    #[test]
    fn parse_retry_without_data() {
        let mut parser = EventParser::new();

        let events = parser.feed(b"retry: 3000\n\n");

        assert!(events.is_empty());
        assert_eq!(
            parser.take_reconnection_time(),
            Some(Duration::from_millis(3000))
        );
        assert_eq!(parser.take_reconnection_time(), None);

        // Retry of the block without data doesn't leak into the next event
        let events = parser.feed(b"data: x\n\n");
        assert_eq!(events[0].retry, None);
    }

    #[test]
    fn parse_reconnection_time_keeps_latest_value() {
        let mut parser = EventParser::new();

        parser.feed(b"retry: 1000\ndata: x\n\nretry: 2000\n\n");

        assert_eq!(
            parser.take_reconnection_time(),
            Some(Duration::from_millis(2000))
        );
    }

    #[test]
    fn parse_keeps_last_event_id() {
        let mut parser = EventParser::new();

        let events = parser.feed(b"id: 1\ndata: a\n\ndata: b\n\n");

        assert_eq!(events[1].id, Some("1".to_string()));
    }

    #[test]
    fn reset_discards_partial_event() {
        let mut parser = EventParser::new();
        parser.feed(b"event: notification\ndata: partial");

        parser.reset();
        let events = parser.feed(b"data: fresh\n\n");

        assert_eq!(events[0].event, "message");
        assert_eq!(events[0].data, "fresh");
    }
}
