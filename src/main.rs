use log::{debug, error, info};
use time::OffsetDateTime;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use motion_report_node::config::NodeConfig;
use motion_report_node::controller::NodeContext;
use motion_report_node::drivers::console::spawn_console;
use motion_report_node::drivers::sensors::{spawn_battery, spawn_thermometer};
use motion_report_node::drivers::{LogIndicator, UdpRadio};
use motion_report_node::scheduler::{Clock, MonotonicClock};
use motion_report_node::utils::format_datetime;

const EVENT_QUEUE_DEPTH: usize = 32;

// Sleep until the planned wake, or forever when nothing is planned
async fn wait_for_wake(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn main_loop(config: NodeConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Starting telemetry node at: {}",
        format_datetime(&OffsetDateTime::now_utc())
    );

    let clock = MonotonicClock::start();
    let radio = UdpRadio::bind(config.radio_bind, config.radio_target).await?;
    let mut node = NodeContext::new(&config, radio, LogIndicator);

    let (tx, mut rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
    spawn_thermometer(
        config.thermometer_path.clone(),
        config.sensor_update_interval_ms,
        tx.clone(),
    );
    spawn_battery(
        config.battery_voltage_path.clone(),
        config.sensor_update_interval_ms,
        tx.clone(),
    );
    spawn_console(tx);

    node.init();

    loop {
        let deadline = node.next_wake().map(|tick| clock.instant_at(tick));

        tokio::select! {
            Some(event) = rx.recv() => {
                node.handle_event(event, clock.now());
            }
            _ = wait_for_wake(deadline) => {
                if let Some(outcome) = node.run_due(clock.now()) {
                    debug!("Report cycle finished: {:?}", outcome);
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match NodeConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            // Keep the sender alive so the node keeps running
            std::future::pending::<()>().await;
        }
        let _ = tx.send(());
    });

    // Run main loop or wait for shutdown signal
    tokio::select! {
        result = main_loop(config) => {
            match result {
                Ok(_) => info!("Node stopped"),
                Err(e) => error!("Fatal error: {}", e),
            }
        }
        _ = &mut rx => {
            info!("Node terminated by user. Exiting gracefully.");
        }
    }

    Ok(())
}
