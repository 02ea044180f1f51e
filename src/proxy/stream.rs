//! Streaming translation: backend reply stream in, SSE frames out.
//!
//! The translation itself is an explicit state machine
//! ([`StreamTranslator`]) with no ties to the HTTP runtime, driven by one
//! input at a time; [`sse_body`] bridges it onto an `axum` response body
//! through a capacity-1 channel, so at most the current chunk is ever
//! buffered and the backend is read no faster than the client drains.

use std::io;

use axum::body::Body;
use bytes::Bytes;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

use crate::backend::{BackendError, BackendReply, ReplyStream};
use crate::proxy::translate;

const DONE_FRAME: &str = "data: [DONE]\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Streaming,
    Done,
    Errored,
}

/// What the driver must do with one translated input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamStep {
    /// Emit this SSE frame and keep streaming.
    Emit(String),
    /// Emit this terminal frame and close the stream.
    Finish(String),
    /// Tear the stream down with an error.
    Abort(String),
    /// The stream is already terminal; nothing may be emitted.
    Closed,
}

/// `Idle → Streaming → {Done, Errored}`. Exactly one terminal transition
/// per stream; every input after it yields [`StreamStep::Closed`].
pub struct StreamTranslator {
    state: StreamState,
    alias: String,
    id: String,
    created: i64,
}

impl StreamTranslator {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            state: StreamState::Idle,
            alias: alias.into(),
            id: translate::new_completion_id(),
            created: chrono::Utc::now().timestamp(),
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    fn is_terminal(&self) -> bool {
        matches!(self.state, StreamState::Done | StreamState::Errored)
    }

    /// Feed one backend reply.
    pub fn on_reply(&mut self, reply: &BackendReply) -> StreamStep {
        if self.is_terminal() {
            return StreamStep::Closed;
        }

        match reply.response_code() {
            200 => match reply.message_text() {
                Some(text) => {
                    let chunk =
                        translate::completion_chunk(&self.id, self.created, &self.alias, text);
                    match serde_json::to_string(&chunk) {
                        Ok(json) => {
                            self.state = StreamState::Streaming;
                            StreamStep::Emit(format!("data: {json}\n\n"))
                        }
                        Err(e) => {
                            self.state = StreamState::Errored;
                            StreamStep::Abort(format!("chunk serialization failed: {e}"))
                        }
                    }
                }
                None => {
                    self.state = StreamState::Errored;
                    StreamStep::Abort("stream chunk did not carry a message payload".into())
                }
            },
            204 => {
                self.state = StreamState::Done;
                StreamStep::Finish(DONE_FRAME.into())
            }
            code => {
                self.state = StreamState::Errored;
                StreamStep::Abort(format!("stream chunk carried response code {code}"))
            }
        }
    }

    /// Feed a transport-level failure.
    pub fn on_transport_error(&mut self, err: &BackendError) -> StreamStep {
        if self.is_terminal() {
            return StreamStep::Closed;
        }
        self.state = StreamState::Errored;
        StreamStep::Abort(err.to_string())
    }

    /// The backend closed the stream without a 204 terminator.
    pub fn on_close(&mut self) -> StreamStep {
        if self.is_terminal() {
            return StreamStep::Closed;
        }
        self.state = StreamState::Errored;
        StreamStep::Abort("backend closed the stream before completion".into())
    }
}

/// Bridge a backend reply stream onto an SSE response body.
///
/// The forwarding task pulls one reply at a time and suspends on the
/// capacity-1 channel until the previous frame has been taken. When the
/// client disconnects the send fails, the loop breaks, and dropping
/// `replies` cancels the underlying backend call.
pub fn sse_body(mut replies: ReplyStream, mut translator: StreamTranslator) -> Body {
    let (tx, rx) = mpsc::channel::<Result<Bytes, io::Error>>(1);

    tokio::spawn(async move {
        loop {
            let step = match replies.next().await {
                Some(Ok(reply)) => translator.on_reply(&reply),
                Some(Err(e)) => translator.on_transport_error(&e),
                None => translator.on_close(),
            };

            match step {
                StreamStep::Emit(frame) => {
                    if tx.send(Ok(Bytes::from(frame))).await.is_err() {
                        debug!("client disconnected, tearing down backend stream");
                        break;
                    }
                }
                StreamStep::Finish(frame) => {
                    let _ = tx.send(Ok(Bytes::from(frame))).await;
                    break;
                }
                StreamStep::Abort(reason) => {
                    warn!("stream aborted: {reason}");
                    let _ = tx
                        .send(Err(io::Error::new(io::ErrorKind::Other, reason)))
                        .await;
                    break;
                }
                StreamStep::Closed => break,
            }
        }
        // `replies` drops here, releasing the backend call.
    });

    Body::from_stream(ReceiverStream::new(rx))
}
