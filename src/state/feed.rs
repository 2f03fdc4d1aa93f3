use crate::state::game_clock::{FieldUpdate, Possession};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};
use tokio_tungstenite::{connect_async, tungstenite::Message};

#[derive(Debug, Clone)]
pub enum FeedEvent {
    Connected,
    Disconnected,
    Update(FeedWireMessage),
    Error(String),
}

/// One spotter message from the sideline position feed. Every field is
/// optional so a partial update (say, just ball movement) stays a one-line
/// payload on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedWireMessage {
    pub qtr: Option<u8>,
    pub clock_seconds: Option<u32>,
    pub down: Option<u8>,
    pub distance: Option<u8>,
    pub yard_line: Option<u8>,
    pub score_home: Option<u16>,
    pub score_away: Option<u16>,
    /// "home" or "away".
    pub possession: Option<String>,
    /// Free-text play description for the feed panel.
    pub play: Option<String>,
}

impl FeedWireMessage {
    pub fn to_update(&self) -> FieldUpdate {
        FieldUpdate {
            qtr: self.qtr,
            clock_seconds: self.clock_seconds,
            down: self.down,
            distance: self.distance,
            yard_line: self.yard_line,
            score_home: self.score_home,
            score_away: self.score_away,
            possession: self.possession.as_deref().and_then(parse_possession),
            ..FieldUpdate::default()
        }
    }

    /// True when the message carries nothing the clock would merge.
    pub fn is_commentary_only(&self) -> bool {
        self.to_update() == FieldUpdate::default()
    }
}

fn parse_possession(s: &str) -> Option<Possession> {
    match s {
        "home" => Some(Possession::Home),
        "away" => Some(Possession::Away),
        _ => None,
    }
}

/// Read-only websocket consumer for the position feed, with a 2-second
/// reconnect loop. Unparseable frames are reported, not fatal.
#[derive(Debug)]
pub struct FeedWorker {
    pub url: String,
    pub events: mpsc::Sender<FeedEvent>,
}

impl FeedWorker {
    pub async fn run(self) {
        loop {
            match connect_async(self.url.as_str()).await {
                Ok((stream, _)) => {
                    if self.events.send(FeedEvent::Connected).await.is_err() {
                        return;
                    }
                    let (_write, mut read) = stream.split();

                    while let Some(inbound) = read.next().await {
                        match inbound {
                            Ok(Message::Text(text)) => {
                                match serde_json::from_str::<FeedWireMessage>(&text) {
                                    Ok(msg) => {
                                        let _ = self.events.send(FeedEvent::Update(msg)).await;
                                    }
                                    Err(e) => {
                                        let _ = self
                                            .events
                                            .send(FeedEvent::Error(format!("feed parse error: {e}")))
                                            .await;
                                    }
                                }
                            }
                            Ok(Message::Close(_)) => break,
                            Ok(_) => {}
                            Err(e) => {
                                let _ = self
                                    .events
                                    .send(FeedEvent::Error(format!("feed read failed: {e}")))
                                    .await;
                                break;
                            }
                        }
                    }

                    if self.events.send(FeedEvent::Disconnected).await.is_err() {
                        return;
                    }
                }
                Err(e) => {
                    let _ = self
                        .events
                        .send(FeedEvent::Error(format!("feed connect failed: {e}")))
                        .await;
                    let _ = self.events.send(FeedEvent::Disconnected).await;
                }
            }

            sleep(Duration::from_secs(2)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_wire_message_maps_to_partial_update() {
        let msg: FeedWireMessage =
            serde_json::from_str(r#"{"yard_line": 18, "play": "12-yd slant"}"#)
                .expect("valid feed json");
        let update = msg.to_update();
        assert_eq!(update.yard_line, Some(18));
        assert_eq!(update.down, None);
        assert_eq!(update.possession, None);
        assert!(!msg.is_commentary_only());
    }

    #[test]
    fn commentary_only_message_carries_no_update() {
        let msg: FeedWireMessage = serde_json::from_str(r#"{"play": "injury timeout"}"#)
            .expect("valid feed json");
        assert!(msg.is_commentary_only());
    }

    #[test]
    fn unknown_possession_string_is_ignored() {
        let msg: FeedWireMessage = serde_json::from_str(r#"{"possession": "neutral"}"#)
            .expect("valid feed json");
        assert_eq!(msg.to_update().possession, None);
    }
}
