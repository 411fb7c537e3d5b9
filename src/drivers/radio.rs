/// Narrowband uplink used by the report cycle
use log::{error, info};
use std::net::SocketAddr;
use time::OffsetDateTime;
use tokio::net::UdpSocket;

use crate::frame::{ReportFrame, FRAME_LEN};
use crate::utils::format_datetime;

/// Synchronous send primitive consumed by the transmission controller
pub trait Radio {
    /// Attempt to transmit one frame; true when the whole frame left the node
    fn send(&mut self, frame: &ReportFrame) -> bool;
}

/// Radio that emits each frame as a single UDP datagram
///
/// The send never waits: a socket that is not ready counts as a failed
/// transmission and the report cycle retries on its own schedule.
pub struct UdpRadio {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpRadio {
    pub async fn bind(
        bind: SocketAddr,
        target: SocketAddr,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = match UdpSocket::bind(bind).await {
            Ok(socket) => socket,
            Err(e) => {
                error!("Failed to bind radio socket on {}: {}", bind, e);
                return Err(e.into());
            }
        };

        // try_send_to only succeeds once the reactor has seen the socket writable
        socket.writable().await?;

        info!("Radio uplink ready: {} -> {}", socket.local_addr()?, target);

        Ok(UdpRadio { socket, target })
    }
}

impl Radio for UdpRadio {
    fn send(&mut self, frame: &ReportFrame) -> bool {
        info!("Radio transmission started: {}", frame);

        match self.socket.try_send_to(frame.as_bytes(), self.target) {
            Ok(sent) if sent == FRAME_LEN => {
                info!(
                    "Radio transmission finished at {}",
                    format_datetime(&OffsetDateTime::now_utc())
                );
                true
            }
            Ok(sent) => {
                error!("Radio error: short datagram ({} of {} bytes)", sent, FRAME_LEN);
                false
            }
            Err(e) => {
                error!("Radio error: {}", e);
                false
            }
        }
    }
}
