//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, protocol::Message},
};

use kairo_server::infrastructure::dto::websocket::ServerFrame;

use crate::{
    command::{Command, parse_command},
    error::ClientError,
    formatter::MessageFormatter,
    ui::{PROMPT, redisplay_prompt},
};

/// Map a failed handshake to a client error
fn handshake_error(error: WsError) -> ClientError {
    if let WsError::Http(response) = &error {
        match response.status().as_u16() {
            401 => return ClientError::AuthenticationFailed,
            503 => return ClientError::CapacityExhausted,
            _ => {}
        }
    }
    ClientError::ConnectionError(error.to_string())
}

/// Run the WebSocket client session
///
/// Returns `Ok(())` when the user quits, and an error when the connection
/// could not be established or was lost.
pub async fn run_client_session(url: &str, token: &str) -> Result<(), ClientError> {
    // The token travels as a query parameter
    let url = format!("{}?token={}", url, token);

    let (ws_stream, _response) = connect_async(&url).await.map_err(handshake_error)?;

    tracing::info!("Connected to messaging server!");

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to handle incoming messages
    let mut read_task = tokio::spawn(async move {
        let mut me = None;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match serde_json::from_str::<ServerFrame>(text.as_str()) {
                        Ok(frame) => {
                            if let ServerFrame::SessionOpened { user_id, .. } = &frame {
                                me = Some(*user_id);
                            }
                            MessageFormatter::format_frame(&frame, me)
                        }
                        // If parsing fails, display as raw text
                        Err(_) => MessageFormatter::format_raw_message(text.as_str()),
                    };
                    print!("{}", formatted);
                    redisplay_prompt();
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    // Ctrl+C / Ctrl+D
                    let _ = input_tx.send("/quit".to_string());
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to parse prompt input and send frames to the WebSocket
    let mut write_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            let frame = match parse_command(&line) {
                Ok(Command::Send(frame)) => frame,
                Ok(Command::Quit) => {
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(());
                }
                Err(e) => {
                    println!("{}", e);
                    redisplay_prompt();
                    continue;
                }
            };

            let json = match serde_json::to_string(&frame) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize frame: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                return Err(ClientError::ConnectionError(e.to_string()));
            }
        }
        Ok(())
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut read_task => {
            write_task.abort();
            Err(ClientError::ConnectionError("Connection lost".to_string()))
        }
        write_result = &mut write_task => {
            read_task.abort();
            write_result.map_err(|e| ClientError::ConnectionError(e.to_string()))?
        }
    }
}
