use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::warn;

use super::ApiState;
use crate::domain::StreamEvent;

/// `GET /start_stream`: live recognition events as server-sent events.
///
/// Failing to start is reported in-band as a single `{error}` event so the
/// client's event source sees it.
pub async fn start_stream(
    State(state): State<ApiState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let events = match state.sessions.start_stream().await {
        Ok(events) => events,
        Err(e) => {
            warn!(error = %e, "Recognition stream not started");
            let (tx, rx) = mpsc::channel(1);
            let _ = tx.try_send(StreamEvent::error(e.to_string()));
            rx
        }
    };

    let stream = ReceiverStream::new(events).map(|event| Event::default().json_data(event));
    Sse::new(stream).keep_alive(KeepAlive::default())
}
