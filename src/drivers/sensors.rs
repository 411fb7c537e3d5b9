/// Host sensor sources backed by Linux sysfs
use log::{debug, warn};
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::models::{BatteryEvent, NodeEvent, ThermometerEvent, Tick};
use crate::utils::ticks_to_duration;

/// Parse a thermal zone reading (millidegrees C) into degrees C
pub fn parse_millidegrees(raw: &str) -> Option<f32> {
    raw.trim().parse::<i64>().ok().map(|m| m as f32 / 1000.0)
}

/// Parse a power supply `voltage_now` reading (microvolts) into volts
pub fn parse_microvolts(raw: &str) -> Option<f32> {
    raw.trim().parse::<i64>().ok().map(|uv| uv as f32 / 1_000_000.0)
}

/// Take one thermometer reading
///
/// An unreadable device is an error event; unreadable contents are an
/// update without a value.
pub async fn read_thermometer(path: &str) -> ThermometerEvent {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => {
            let reading = parse_millidegrees(&raw);
            if reading.is_none() {
                warn!("Unexpected thermometer contents in {}: {:?}", path, raw.trim());
            }
            ThermometerEvent::Update(reading)
        }
        Err(e) => {
            debug!("Failed to read thermometer {}: {}", path, e);
            ThermometerEvent::Error
        }
    }
}

/// Take one battery voltage reading
pub async fn read_battery(path: &str) -> BatteryEvent {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => {
            let reading = parse_microvolts(&raw);
            if reading.is_none() {
                warn!("Unexpected battery contents in {}: {:?}", path, raw.trim());
            }
            BatteryEvent::Update(reading)
        }
        Err(e) => {
            debug!("Failed to read battery voltage {}: {}", path, e);
            BatteryEvent::Error
        }
    }
}

/// Poll the thermometer every `interval_ms`, starting immediately
pub fn spawn_thermometer(path: String, interval_ms: Tick, events: Sender<NodeEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(ticks_to_duration(interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let event = read_thermometer(&path).await;
            if events.send(NodeEvent::Thermometer(event)).await.is_err() {
                debug!("Node stopped, thermometer source exiting");
                break;
            }
        }
    })
}

/// Poll the battery voltage every `interval_ms`, starting immediately
pub fn spawn_battery(path: String, interval_ms: Tick, events: Sender<NodeEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(ticks_to_duration(interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let event = read_battery(&path).await;
            if events.send(NodeEvent::Battery(event)).await.is_err() {
                debug!("Node stopped, battery source exiting");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn parses_sysfs_units() {
        assert_eq!(parse_millidegrees("23450\n"), Some(23.45));
        assert_eq!(parse_millidegrees("-5000"), Some(-5.0));
        assert_eq!(parse_microvolts("3670000\n"), Some(3.67));
        assert_eq!(parse_millidegrees("n/a"), None);
        assert_eq!(parse_microvolts(""), None);
    }

    #[tokio::test]
    async fn thermometer_maps_file_states_to_events() {
        let good = scratch_file("thermo-good", "21000\n");
        let bad = scratch_file("thermo-bad", "garbage");

        assert_eq!(
            read_thermometer(good.to_str().unwrap()).await,
            ThermometerEvent::Update(Some(21.0))
        );
        assert_eq!(
            read_thermometer(bad.to_str().unwrap()).await,
            ThermometerEvent::Update(None)
        );
        assert_eq!(
            read_thermometer("/nonexistent/thermal_zone/temp").await,
            ThermometerEvent::Error
        );

        let _ = std::fs::remove_file(good);
        let _ = std::fs::remove_file(bad);
    }

    #[tokio::test]
    async fn battery_maps_file_states_to_events() {
        let good = scratch_file("battery-good", "3000000\n");

        assert_eq!(
            read_battery(good.to_str().unwrap()).await,
            BatteryEvent::Update(Some(3.0))
        );
        assert_eq!(
            read_battery("/nonexistent/power_supply/voltage_now").await,
            BatteryEvent::Error
        );

        let _ = std::fs::remove_file(good);
    }

    #[tokio::test]
    async fn source_stops_when_node_is_gone() {
        let (tx, mut rx) = tokio::sync::mpsc::channel(1);
        let handle = spawn_battery("/nonexistent/voltage_now".to_string(), 10, tx);

        assert_eq!(rx.recv().await, Some(NodeEvent::Battery(BatteryEvent::Error)));
        drop(rx);

        handle.await.unwrap();
    }
}
