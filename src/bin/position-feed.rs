//! Mock sideline spotter: serves a scripted drive over websocket so the
//! dashboard's position feed can be exercised without real telemetry.

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::env;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_tungstenite::{accept_async, tungstenite::Message};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let addr = env::var("COACHTUI_FEED_BIND").unwrap_or_else(|_| "0.0.0.0:8765".to_string());
    let interval_ms: u64 = env::var("COACHTUI_FEED_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);

    let listener = TcpListener::bind(&addr).await?;
    let (tx, _rx) = broadcast::channel::<String>(64);

    eprintln!("position feed listening on {addr}");

    let script_tx = tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms.max(100)));
        for message in scripted_drive().iter().cycle() {
            interval.tick().await;
            let _ = script_tx.send(message.clone());
        }
    });

    loop {
        let (stream, peer) = listener.accept().await?;
        let rx = tx.subscribe();
        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, rx).await {
                eprintln!("client {peer} disconnected: {e}");
            }
        });
    }
}

async fn handle_client(
    stream: TcpStream,
    mut rx: broadcast::Receiver<String>,
) -> anyhow::Result<()> {
    let ws = accept_async(stream).await?;
    let (mut write, mut read) = ws.split();

    loop {
        tokio::select! {
            inbound = read.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                }
            }
            outbound = rx.recv() => {
                match outbound {
                    Ok(text) => {
                        write.send(Message::Text(text.into())).await?;
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    Ok(())
}

/// A twelve-snap two-minute drill, looped forever.
fn scripted_drive() -> Vec<String> {
    [
        json!({"qtr": 4, "clock_seconds": 115, "down": 1, "distance": 10, "yard_line": 75,
               "possession": "home", "play": "touchback, ball at the 25"}),
        json!({"down": 2, "distance": 4, "yard_line": 69, "play": "6-yd inside run"}),
        json!({"down": 1, "distance": 10, "yard_line": 58, "play": "11-yd out route"}),
        json!({"play": "incompletion, clock stopped"}),
        json!({"down": 2, "distance": 10, "yard_line": 58, "play": "throwaway under pressure"}),
        json!({"down": 3, "distance": 10, "yard_line": 58, "play": "screen blown up"}),
        json!({"down": 1, "distance": 10, "yard_line": 41, "play": "17-yd seam shot"}),
        json!({"down": 1, "distance": 10, "yard_line": 24, "play": "chunk gain to the 24"}),
        json!({"down": 2, "distance": 7, "yard_line": 21, "play": "3-yd draw"}),
        json!({"down": 3, "distance": 2, "yard_line": 16, "play": "5-yd slant, inside the 20"}),
        json!({"down": 4, "distance": 1, "yard_line": 15, "play": "stuffed at the line"}),
        json!({"qtr": 4, "clock_seconds": 38, "down": 4, "distance": 1, "yard_line": 15,
               "play": "decision point: go or kick"}),
    ]
    .iter()
    .map(|v| v.to_string())
    .collect()
}
