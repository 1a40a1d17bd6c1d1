mod cmd;

use clap::Parser;
use cmd::config::{Effective, WriteArgs};
use cmd::error::error_chain;

#[derive(Parser)]
#[command(
    name = "kafkawrite",
    about = "Пишет GitHub issues (JSON) в Kafka topic, по сообщению на issue"
)]
struct Cli {
    #[command(flatten)]
    args: WriteArgs,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let eff = match Effective::new(&cli.args) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {}", error_chain(&e));
            std::process::exit(1);
        }
    };

    match cmd::write::run(&eff).await {
        Ok(report) => println!("{report}"),
        Err(e) => {
            eprintln!("Error: {}", error_chain(&e));
            std::process::exit(1);
        }
    }
}
