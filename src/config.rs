use log::debug;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::models::Tick;
use crate::motion::DEFAULT_DEBOUNCE_MS;
use crate::stream::DEFAULT_STREAM_SAMPLES;

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub stream_samples: usize,
    pub sensor_update_interval_ms: Tick,
    pub report_interval_ms: Tick,
    pub retry_interval_ms: Tick,
    pub first_report_at_ms: Tick,
    pub motion_debounce_ms: Tick,
    pub startup_pulse_ms: Tick,
    pub success_pulse_ms: Tick,
    pub radio_target: SocketAddr,
    pub radio_bind: SocketAddr,
    pub thermometer_path: String,
    pub battery_voltage_path: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            stream_samples: DEFAULT_STREAM_SAMPLES,
            sensor_update_interval_ms: 60 * 1000,
            report_interval_ms: 15 * 60 * 1000,
            retry_interval_ms: 1000,
            first_report_at_ms: 10 * 1000,
            motion_debounce_ms: DEFAULT_DEBOUNCE_MS,
            startup_pulse_ms: 1000,
            success_pulse_ms: 5000,
            radio_target: SocketAddr::from(([127, 0, 0, 1], 7654)),
            radio_bind: SocketAddr::from(([0, 0, 0, 0], 0)),
            thermometer_path: "/sys/class/thermal/thermal_zone0/temp".to_string(),
            battery_voltage_path: "/sys/class/power_supply/BAT0/voltage_now".to_string(),
        }
    }
}

impl NodeConfig {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    ///
    /// Missing keys keep their defaults; present keys must parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = NodeConfig::default();

        let config = NodeConfig {
            stream_samples: parse_or(&lookup, "STREAM_SAMPLES", defaults.stream_samples)?,
            sensor_update_interval_ms: parse_or(
                &lookup,
                "SENSOR_UPDATE_INTERVAL_MS",
                defaults.sensor_update_interval_ms,
            )?,
            report_interval_ms: parse_or(&lookup, "REPORT_INTERVAL_MS", defaults.report_interval_ms)?,
            retry_interval_ms: parse_or(&lookup, "RETRY_INTERVAL_MS", defaults.retry_interval_ms)?,
            first_report_at_ms: parse_or(&lookup, "FIRST_REPORT_AT_MS", defaults.first_report_at_ms)?,
            motion_debounce_ms: parse_or(&lookup, "MOTION_DEBOUNCE_MS", defaults.motion_debounce_ms)?,
            startup_pulse_ms: parse_or(&lookup, "STARTUP_PULSE_MS", defaults.startup_pulse_ms)?,
            success_pulse_ms: parse_or(&lookup, "SUCCESS_PULSE_MS", defaults.success_pulse_ms)?,
            radio_target: parse_or(&lookup, "RADIO_TARGET", defaults.radio_target)?,
            radio_bind: parse_or(&lookup, "RADIO_BIND", defaults.radio_bind)?,
            thermometer_path: lookup("THERMOMETER_PATH").unwrap_or(defaults.thermometer_path),
            battery_voltage_path: lookup("BATTERY_VOLTAGE_PATH")
                .unwrap_or(defaults.battery_voltage_path),
        };

        if config.stream_samples == 0 {
            return Err("STREAM_SAMPLES must be at least 1".into());
        }

        for (key, value) in [
            ("SENSOR_UPDATE_INTERVAL_MS", config.sensor_update_interval_ms),
            ("REPORT_INTERVAL_MS", config.report_interval_ms),
            ("RETRY_INTERVAL_MS", config.retry_interval_ms),
        ] {
            if value == 0 {
                return Err(format!("{} must be greater than zero", key).into());
            }
        }

        debug!("Loaded configuration: {:?}", config);

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, Box<dyn std::error::Error>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("Invalid value '{}' for {}: {}", raw, key, e).into()),
        None => Ok(default),
    }
}
