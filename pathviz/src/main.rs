//! pathviz: step-by-step A* in the terminal.

use std::path::PathBuf;

use pathviz::Pathviz;
use pathviz::config::Config;
use pathviz_core::app::{App, AppConfig};
use pathviz_crossterm::CrosstermDriver;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr, which the alternate screen hides; redirect to read them.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::resolve(path.as_deref())?;

    let model = Pathviz::new(&config);
    let size = model.screen_size();
    let driver = CrosstermDriver::new().with_frame_interval(config.frame_interval());
    let mut app = App::new(AppConfig {
        model,
        driver,
        width: size.x,
        height: size.y,
    });
    app.run()?;

    let model = app.model();
    match model.search().and_then(|s| s.path_cost()) {
        Some(cost) => log::info!("exited while {}, last path cost {cost:.3}", model.phase()),
        None => log::info!("exited while {}", model.phase()),
    }
    Ok(())
}
