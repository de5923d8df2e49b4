#![forbid(unsafe_code)]

//! obstate demo binary entry point.

use std::rc::Rc;

use obstate_core::StateConfig;
use obstate_demo::app;
use obstate_demo::cli;
use obstate_demo::store::CustomerState;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();
    let opts = cli::Opts::parse();

    let mut config = match StateConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(policy) = opts.policy {
        config = config.with_notify_policy(policy);
    }

    let customer = Rc::new(CustomerState::with_config(config));
    match app::run(&customer, &opts.first_name, &opts.last_name) {
        Ok(report) => {
            for (idx, frame) in report.frames.iter().enumerate() {
                println!("--- render {} ---", idx + 1);
                println!("{frame}");
            }
            println!(
                "--- {} renders, {} re-render requests, {} state changes (policy: {}) ---",
                report.frames.len(),
                report.render_requests,
                report.state_changes,
                config.notify_policy
            );
            if report.truncated {
                std::process::exit(2);
            }
        }
        Err(e) => {
            eprintln!("Runtime error: {e}");
            std::process::exit(1);
        }
    }
}
