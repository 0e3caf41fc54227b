use crate::middleware::SessionUser;
use crate::startup::AppState;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use std::convert::Infallible;

/// Change feed for list views. Every mutation of the document collection is
/// pushed to every subscriber; clients re-fetch their scoped list on each
/// event. Dropping the connection releases the subscription.
pub async fn document_events(
    State(state): State<AppState>,
    _session: SessionUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.records.subscribe();

    let stream = subscription.map(|event| {
        Ok(Event::default()
            .event("change")
            .data(serde_json::to_string(&event).unwrap_or_default()))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
