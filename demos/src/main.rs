//! menubar-demo: a menu bar in the terminal.
//!
//! Logs go to `menubar-demo.log` in the temp directory; set `RUST_LOG`
//! (e.g. `RUST_LOG=trace`) to see every transition and command.

use std::fs::File;

use menubar_core::app::{App, AppConfig};
use menubar_crossterm::CrosstermDriver;
use menubar_demos::{DemoModel, UI_HEIGHT, UI_WIDTH};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_path = std::env::temp_dir().join("menubar-demo.log");
    let log_file = File::create(&log_path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    log::info!("menubar-demo starting, logging to {}", log_path.display());

    let model = DemoModel::new()?;
    let driver = CrosstermDriver::new();
    let mut app = App::new(AppConfig {
        model,
        driver,
        width: UI_WIDTH,
        height: UI_HEIGHT,
    });
    app.run()?;
    Ok(())
}
