use env_logger::{Builder, Env};

/// Initialises logging; `RUST_LOG` takes precedence over `default_filter`.
pub fn init(default_filter: &str) {
	let _ = Builder::from_env(Env::default().default_filter_or(default_filter))
		.format_timestamp_millis()
		.format_module_path(true)
		.try_init();
}
