mod app;
mod error;
mod paths;
mod terminal;
mod view;

use log::info;
use pizza_lib::{FormConfig, OrderClient};
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::app::App;
use crate::error::TuiError;
use crate::terminal::Terminal;

fn init_logging() {
    paths::rotate_logs();

    let Some(path) = paths::log_file() else { return };

    match paths::create_log_file(&path) {
        Ok(file) => {
            let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), file);
        }
        Err(e) => eprintln!("Failed to create log file {}: {}", path.display(), e),
    }
}

async fn run() -> Result<(), TuiError> {
    let config = FormConfig::from_env()?;
    let client = OrderClient::from_config(&config)?;
    info!("Orders go to {}", client.endpoint());

    let mut terminal = Terminal::new()?;
    App::new(client).run(&mut terminal).await
}

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
