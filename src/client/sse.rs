//! Server-Sent Events (SSE) stream handling for A2A streaming responses.
//!
//! Wraps [`reqwest_eventsource::EventSource`] and unwraps each message's
//! `data` field — either a raw [`StreamResponse`] or a JSON-RPC envelope
//! around one — into a typed event.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::Stream;
use futures::StreamExt;
use reqwest_eventsource::{Event as SseEvent, EventSource};
use tokio::sync::mpsc;

use crate::error::{A2AError, A2AResult};
use crate::types::StreamResponse;

/// A stream of A2A server-sent events.
///
/// Supports both pull-based (`next()`) and push-based (`Stream` trait)
/// consumption.
///
/// # Example
///
/// ```no_run
/// # async fn example(mut stream: a2a_rs::client::SseStream) {
/// while let Some(event) = stream.next().await {
///     match event {
///         Ok(response) => println!("Got event: {:?}", response),
///         Err(e) => eprintln!("Stream error: {}", e),
///     }
/// }
/// # }
/// ```
pub struct SseStream {
    receiver: mpsc::Receiver<A2AResult<StreamResponse>>,
    /// Background task handle — kept alive so the parsing task runs to completion.
    _task: tokio::task::JoinHandle<()>,
}

impl std::fmt::Debug for SseStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SseStream").finish_non_exhaustive()
    }
}

impl SseStream {
    /// Opens an SSE connection from `builder` and starts parsing events in
    /// the background.
    pub(crate) fn from_request_builder(builder: reqwest::RequestBuilder) -> A2AResult<Self> {
        let mut source = EventSource::new(builder)
            .map_err(|e| A2AError::Transport(format!("failed to open SSE stream: {e}")))?;

        let (tx, rx) = mpsc::channel(64);

        let task = tokio::spawn(async move {
            while let Some(event) = source.next().await {
                match event {
                    Ok(SseEvent::Open) => {}
                    Ok(SseEvent::Message(message)) => match parse_event_data(&message.data) {
                        Ok(Some(parsed)) => {
                            if tx.send(parsed).await.is_err() {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => {
                            let _ = tx.send(Err(e)).await;
                            break;
                        }
                    },
                    Err(reqwest_eventsource::Error::StreamEnded) => break,
                    Err(e) => {
                        let _ = tx
                            .send(Err(A2AError::Transport(format!("SSE stream error: {e}"))))
                            .await;
                        break;
                    }
                }
            }
            source.close();
        });

        Ok(Self {
            receiver: rx,
            _task: task,
        })
    }

    /// Get the next event from the stream.
    ///
    /// Returns `None` when the stream is exhausted (server closed the
    /// connection or sent a terminal event). Returns `Some(Err(...))` on
    /// parse or transport errors.
    pub async fn next(&mut self) -> Option<A2AResult<StreamResponse>> {
        self.receiver.recv().await
    }

    /// Convert this stream into a `futures::Stream`.
    pub fn into_stream(self) -> SseStreamAdapter {
        SseStreamAdapter {
            receiver: self.receiver,
            _task: self._task,
        }
    }
}

/// Adapter that implements `futures::Stream` for an [`SseStream`].
///
/// Created by [`SseStream::into_stream()`].
pub struct SseStreamAdapter {
    receiver: mpsc::Receiver<A2AResult<StreamResponse>>,
    _task: tokio::task::JoinHandle<()>,
}

impl Stream for SseStreamAdapter {
    type Item = A2AResult<StreamResponse>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Parses one SSE message's `data` field.
///
/// Handles two shapes: a raw [`StreamResponse`], or a JSON-RPC response
/// envelope (`{"jsonrpc", "id", "result" | "error"}`) wrapping one, which is
/// what the axum integration in this crate actually sends.
fn parse_event_data(data: &str) -> A2AResult<Option<StreamResponse>> {
    let data = data.trim();
    if data.is_empty() || data == "[DONE]" {
        return Ok(None);
    }

    let value: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| A2AError::InvalidJson(format!("failed to parse SSE event data: {e} (data: {data})")))?;

    let event_value = if value.get("jsonrpc").is_some() {
        if let Some(error) = value.get("error") {
            let code = error.get("code").and_then(|c| c.as_i64()).unwrap_or(-1);
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error")
                .to_string();
            let data = error.get("data").cloned();
            return Err(A2AError::JsonRpc { code, message, data });
        }
        value.get("result").cloned().ok_or_else(|| {
            A2AError::InvalidJson(format!(
                "JSON-RPC SSE response has neither 'result' nor 'error': {data}"
            ))
        })?
    } else {
        value
    };

    let event: StreamResponse = serde_json::from_value(event_value).map_err(|e| {
        A2AError::InvalidJson(format!("failed to parse SSE event as StreamResponse: {e} (data: {data})"))
    })?;

    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_done_sentinel_are_skipped() {
        assert!(parse_event_data("").unwrap().is_none());
        assert!(parse_event_data("[DONE]").unwrap().is_none());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(parse_event_data("{not valid json}").is_err());
    }

    #[test]
    fn raw_status_update_parses() {
        let data = serde_json::json!({
            "taskId": "t-1",
            "status": { "state": "working" },
            "final": false
        })
        .to_string();
        let event = parse_event_data(&data).unwrap().unwrap();
        assert!(!event.is_final());
    }

    #[test]
    fn jsonrpc_wrapped_result_unwraps() {
        let data = serde_json::json!({
            "jsonrpc": "2.0",
            "id": "1",
            "result": {
                "taskId": "t-1",
                "status": { "state": "completed" },
                "final": true
            }
        })
        .to_string();
        let event = parse_event_data(&data).unwrap().unwrap();
        assert!(event.is_final());
    }

    #[test]
    fn jsonrpc_wrapped_error_becomes_jsonrpc_error() {
        let data = serde_json::json!({
            "jsonrpc": "2.0",
            "id": "1",
            "error": { "code": -32001, "message": "task not found" }
        })
        .to_string();
        let result = parse_event_data(&data);
        assert!(matches!(result, Err(A2AError::JsonRpc { code: -32001, .. })));
    }
}
