use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use messenger_core::utils::validation::validate_identity;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{accept_async, tungstenite::Message, WebSocketStream};
use tracing::{error, info, warn};

use crate::messages::{ClientMessage, ErrorKind, ServerMessage};
use crate::state::ServerState;

type WsSender = SplitSink<WebSocketStream<TcpStream>, Message>;
type WsReceiver = SplitStream<WebSocketStream<TcpStream>>;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Accept connections until the listener fails for good.
pub async fn serve(listener: TcpListener, state: Arc<ServerState>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                info!("New connection from {}", peer_addr);

                let state = state.clone();
                tokio::spawn(async move {
                    match accept_async(stream).await {
                        Ok(ws_stream) => {
                            handle_connection(ws_stream, state).await;
                        }
                        Err(e) => {
                            error!("WebSocket handshake failed for {}: {}", peer_addr, e);
                        }
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Handle a single WebSocket connection
pub async fn handle_connection(ws_stream: WebSocketStream<TcpStream>, state: Arc<ServerState>) {
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let user_id = match wait_for_connect(&mut ws_sender, &mut ws_receiver).await {
        Some(id) => id,
        None => {
            warn!("Connection closed before connect");
            return;
        }
    };

    info!("User connected: {}", user_id);

    let connected = ServerMessage::Connected {
        user_id: user_id.clone(),
    };
    if let Err(e) = send_json(&mut ws_sender, &connected).await {
        error!("Failed to confirm connection for {}: {}", user_id, e);
        return;
    }

    loop {
        match ws_receiver.next().await {
            Some(Ok(Message::Text(text))) => {
                let response = handle_message(&text, &user_id, &state).await;
                if let Err(e) = send_json(&mut ws_sender, &response).await {
                    error!("Failed to send response to {}: {}", user_id, e);
                    break;
                }
            }
            Some(Ok(Message::Close(_))) => {
                info!("User {} sent close frame", user_id);
                break;
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                error!("WebSocket error for user {}: {}", user_id, e);
                break;
            }
            None => {
                info!("WebSocket stream ended for user {}", user_id);
                break;
            }
        }
    }

    info!("User disconnected: {}", user_id);
}

/// Wait for a `connect` frame naming a usable username. Anything else gets
/// an error reply and the wait continues.
async fn wait_for_connect(sender: &mut WsSender, receiver: &mut WsReceiver) -> Option<String> {
    let wait = async {
        while let Some(result) = receiver.next().await {
            let text = match result {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(_)) | Err(_) => return None,
                Ok(_) => continue,
            };

            let reply = match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Connect { user_id }) => match validate_identity(&user_id, &()) {
                    Ok(()) => return Some(user_id),
                    Err(e) => ServerMessage::error(ErrorKind::Validation, format!("user_id: {}", e)),
                },
                Ok(_) => ServerMessage::error(ErrorKind::Protocol, "Send connect first"),
                Err(e) => {
                    warn!("Failed to parse connect message: {}", e);
                    ServerMessage::error(ErrorKind::Protocol, format!("Malformed message: {}", e))
                }
            };
            if send_json(sender, &reply).await.is_err() {
                return None;
            }
        }
        None
    };

    match tokio::time::timeout(CONNECT_TIMEOUT, wait).await {
        Ok(result) => result,
        Err(_) => {
            warn!("Connect timeout");
            None
        }
    }
}

/// Parse one request frame and answer it as `user_id`. The database work
/// runs on the blocking pool.
pub async fn handle_message(text: &str, user_id: &str, state: &Arc<ServerState>) -> ServerMessage {
    let request: ClientMessage = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(e) => {
            warn!("Failed to parse message from {}: {}", user_id, e);
            return ServerMessage::error(ErrorKind::Protocol, format!("Malformed message: {}", e));
        }
    };

    let state = Arc::clone(state);
    let user = user_id.to_string();
    match tokio::task::spawn_blocking(move || state.handle_request(&user, request)).await {
        Ok(response) => response,
        Err(e) => {
            error!("Request task for {} failed: {}", user_id, e);
            ServerMessage::error(ErrorKind::Internal, "Request failed")
        }
    }
}

async fn send_json(
    sender: &mut WsSender,
    msg: &ServerMessage,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    match serde_json::to_string(msg) {
        Ok(json) => sender.send(Message::Text(json.into())).await,
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            Ok(())
        }
    }
}
