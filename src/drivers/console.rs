/// Stdin stand-in for the PIR module and the push button
use log::{debug, warn};
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

use crate::models::{ButtonEvent, MotionEvent, NodeEvent};

/// Map one console line to an event
pub fn parse_command(line: &str) -> Option<NodeEvent> {
    match line.trim().to_ascii_lowercase().as_str() {
        "m" | "motion" => Some(NodeEvent::Motion(MotionEvent::Motion)),
        "b" | "button" => Some(NodeEvent::Button(ButtonEvent::Press)),
        _ => None,
    }
}

pub fn spawn_console(events: Sender<NodeEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stdin()).lines();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!("Console closed");
                    break;
                }
                Err(e) => {
                    warn!("Console read failed: {}", e);
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match parse_command(&line) {
                Some(event) => {
                    if events.send(event).await.is_err() {
                        break;
                    }
                }
                None => warn!("Unknown console command '{}', expected 'm' or 'b'", line.trim()),
            }
        }
    })
}
