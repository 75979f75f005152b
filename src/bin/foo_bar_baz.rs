use colored::Colorize;
use fanjoin::{Joiner, JoinerConfig};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// Sequentially the three calls would take ~1500ms. Run together they
// finish in about the time of the slowest one.
#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let start = Instant::now();

    let record = match Joiner::new(JoinerConfig::default()).run().await {
        Ok(record) => record,
        Err(err) => {
            println!("{}", err.to_string().red());
            return ExitCode::FAILURE;
        }
    };

    println!("do something important");
    println!("{}, Time: {}ms.", record, start.elapsed().as_millis());

    ExitCode::SUCCESS
}
