use anyhow::{Context, Result};

use tessera::app::DemoApp;
use tessera::config::DemoConfig;
use tessera::logging::{init_logging, LoggingConfig};

fn main() -> Result<()> {
    let config = DemoConfig::from_env().context("Invalid TESSERA_* configuration")?;

    init_logging(LoggingConfig {
        env_filter: config.log_filter.clone(),
        ..LoggingConfig::default()
    });

    let demo = config.demo;
    let app = DemoApp::new(config).with_context(|| format!("Failed to start demo `{}`", demo))?;
    app.run().context("Demo stopped with an error")?;
    Ok(())
}
