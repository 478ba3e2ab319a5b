//! WebSocket endpoints.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use stratos_state::events::EventFilter;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use uuid::Uuid;

use crate::state::AppState;

/// Strategy lifecycle event stream for one brief.
pub async fn strategy_stream(
    ws: WebSocketUpgrade,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_strategy_stream(socket, id, state))
}

async fn handle_strategy_stream(mut socket: WebSocket, brief_id: Uuid, state: AppState) {
    let filter = EventFilter::brief(brief_id);
    let mut events = BroadcastStream::new(state.strategies.events().subscribe());

    // Confirm the subscription before any events flow
    let hello = serde_json::json!({
        "type": "connected",
        "brief_id": brief_id,
    });
    if socket.send(Message::Text(hello.to_string().into())).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            event = events.next() => {
                match event {
                    Some(Ok(event)) if filter.matches(&event) => {
                        let json = match serde_json::to_string(&event) {
                            Ok(json) => json,
                            Err(_) => continue,
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    // Events for other briefs pass by silently
                    Some(Ok(_)) => {}
                    // Lagged receiver; resume at the live edge
                    Some(Err(_)) => {}
                    None => break,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        let _ = socket.send(Message::Pong(data)).await;
                    }
                    _ => {}
                }
            }
        }
    }
}
