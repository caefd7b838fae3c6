// Entrypoint for the CLI application.
// - Keeps `main` small: load the config, make sure the reference tables
//   exist and hand everything to the session loop.
// - Returns `anyhow::Result` so setup failures print a readable chain.

use std::io::{self, IsTerminal};

use anyhow::Context;
use growth_standards::chart::PlottersRenderer;
use growth_standards::config::Config;
use growth_standards::reference::ReferenceStore;
use growth_standards::term::{DialoguerConsole, LineConsole};
use growth_standards::ui::{spinner, Session};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::from_env()?;
    log::debug!("{:?}", config);

    let store = ReferenceStore::new(&config.data_dir);
    let progress = spinner("generating csv files, this can take a moment...");
    let written = store.ensure_tables(config.overwrite_tables);
    progress.finish_and_clear();
    let written = written.context("Failed to generate the reference tables")?;
    for path in &written {
        println!("{} file generated successfully.", path.display());
    }

    let renderer = PlottersRenderer { width: config.chart_width, height: config.chart_height };

    // Piped input gets the plain reader so end-of-input stops the session.
    if io::stdin().is_terminal() {
        Session::new(DialoguerConsole, renderer, store, &config.plot_path).run()
    } else {
        let console = LineConsole::new(io::stdin().lock(), io::stdout());
        Session::new(console, renderer, store, &config.plot_path).run()
    }
}
