use clap::Parser;
use larder::adapter::inbound::cli::{self, command::Cli, output};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(report) = cli::run(cli).await {
        if output::is_json() {
            output::error(&report.to_string());
        } else {
            eprintln!("{report:?}");
        }
        std::process::exit(1);
    }
}
