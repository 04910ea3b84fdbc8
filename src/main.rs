// src/main.rs

use anyhow::Result;
use clap::Parser;
use lifecycle_lookup::app::App;
use lifecycle_lookup::cli::Cli;
use lifecycle_lookup::utils::logger;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::try_parse().unwrap_or_else(|e| usage_exit(e));
	let log_filter = cli.log_filter();
	let config = cli.into_config().unwrap_or_else(|e| usage_exit(e));

	logger::init(log_filter);
	info!("Starting software lifecycle lookup");

	let app = App::new(config);
	app.run().await
}

fn usage_exit(e: clap::Error) -> ! {
	// Help and version go to stdout and are not failures.
	let code = if e.use_stderr() { 1 } else { 0 };
	let _ = e.print();
	std::process::exit(code)
}
