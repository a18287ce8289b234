use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tasklist::{logging, seed, ui, App, Config};
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    let _log_guard = logging::init_tracing(&config.log_file)?;
    info!(endpoint = %config.endpoint, seed_limit = config.seed_limit, "starting task list");

    // Hosts the seed fetch; the UI loop stays on this thread.
    let runtime = tokio::runtime::Runtime::new().context("failed starting async runtime")?;
    let seed_rx = seed::spawn_seed_loader(runtime.handle(), config.endpoint.clone(), config.seed_limit);
    let mut app = App::new(Some(seed_rx));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // A seed fetch that never resolved is abandoned here.
    runtime.shutdown_background();

    if let Err(err) = result {
        error!(error = %err, "ui loop failed");
        return Err(err).context("ui loop failed");
    }
    info!(tasks = app.store.len(), "exiting");
    Ok(())
}
