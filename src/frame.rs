/// Report frame encoding and decoding
use log::warn;
use std::fmt;

use crate::models::Report;

/// Size of every report frame on the air
pub const FRAME_LEN: usize = 5;

/// Voltage byte meaning "no voltage samples"
pub const VOLTAGE_NO_DATA: u8 = 0xFF;

/// Temperature code meaning "no temperature samples"
pub const TEMPERATURE_NO_DATA: i16 = 0x7FFF;

/// A 5-byte uplink report
///
/// Layout:
/// - Byte 0: Battery voltage in tenths of a volt, rounded up (0xFF = no data)
/// - Bytes 1-2: Temperature in tenths of a degree C, signed big-endian (0x7FFF = no data)
/// - Bytes 3-4: Motion count since the last successful report, unsigned big-endian
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportFrame([u8; FRAME_LEN]);

impl ReportFrame {
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    pub fn decode(&self) -> Report {
        // A frame is always FRAME_LEN bytes long
        decode_fields(&self.0)
    }
}

impl fmt::Display for ReportFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Build a report frame from the channel averages and the motion count
///
/// Pure and deterministic; missing averages are encoded as sentinels.
pub fn encode(
    voltage_avg: Option<f32>,
    temperature_avg: Option<f32>,
    motion_count: u16,
) -> ReportFrame {
    let mut bytes = [0u8; FRAME_LEN];

    bytes[0] = voltage_avg.map(voltage_code).unwrap_or(VOLTAGE_NO_DATA);

    let temperature = temperature_avg
        .map(temperature_code)
        .unwrap_or(TEMPERATURE_NO_DATA);
    bytes[1..3].copy_from_slice(&temperature.to_be_bytes());

    bytes[3..5].copy_from_slice(&motion_count.to_be_bytes());

    ReportFrame(bytes)
}

/// Decode raw frame bytes received from the backend
///
/// # Returns
/// Some(Report) for a well-formed frame, None if the length is wrong
pub fn decode(data: &[u8]) -> Option<Report> {
    if data.len() != FRAME_LEN {
        warn!("Invalid report frame: len={}", data.len());
        return None;
    }

    Some(decode_fields(data))
}

/// Decode a frame given as hex digits, as shown by the radio backend
///
/// # Returns
/// Some(Report) for exactly FRAME_LEN bytes of valid hex, None otherwise
pub fn decode_hex(text: &str) -> Option<Report> {
    match hex::decode(text.trim()) {
        Ok(bytes) => decode(&bytes),
        Err(e) => {
            warn!("Invalid report frame hex '{}': {}", text.trim(), e);
            None
        }
    }
}

fn decode_fields(data: &[u8]) -> Report {
    let voltage = match data[0] {
        VOLTAGE_NO_DATA => None,
        code => Some(code as f32 / 10.0),
    };

    let temperature = match i16::from_be_bytes([data[1], data[2]]) {
        TEMPERATURE_NO_DATA => None,
        code => Some(code as f32 / 10.0),
    };

    Report {
        voltage,
        temperature,
        motion_count: u16::from_be_bytes([data[3], data[4]]),
    }
}

// Tenths of a volt, rounded up, kept below the sentinel
fn voltage_code(voltage: f32) -> u8 {
    (voltage * 10.0).ceil().clamp(0.0, (VOLTAGE_NO_DATA - 1) as f32) as u8
}

// Tenths of a degree, truncated toward zero, kept below the sentinel
fn temperature_code(temperature: f32) -> i16 {
    ((temperature * 10.0) as i16).min(TEMPERATURE_NO_DATA - 1)
}
