mod app;
mod logging;
mod page;
mod panel;

use gasyard_config::Config;
use tracing::info;

use crate::app::App;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Some(path) = logging::init() {
        info!(path = %path.display(), "logging to file");
    }
    let config = Config::load_or_default();
    let terminal = ratatui::init();
    let result = App::new(&config).run(terminal);
    ratatui::restore();
    result
}
