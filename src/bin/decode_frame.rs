/// Decode a hex-encoded report frame as delivered by the radio backend
use clap::Parser;
use std::process;

use motion_report_node::frame::decode_hex;

#[derive(Parser, Debug)]
#[command(name = "decode-frame", about = "Decode a 5-byte node report frame")]
struct Args {
    /// Frame payload as 10 hex digits, e.g. 2500ea012c
    data: String,
}

fn describe(value: Option<f32>) -> String {
    match value {
        Some(value) => format!("{:.1}", value),
        None => "None".to_string(),
    }
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let report = match decode_hex(&args.data) {
        Some(report) => report,
        None => {
            eprintln!("Invalid DATA provided");
            process::exit(1);
        }
    };

    println!("Bat. voltage = {} V", describe(report.voltage));
    println!("Temperature  = {} °C", describe(report.temperature));
    println!("Motion count = {}", report.motion_count);
}
