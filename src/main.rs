use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use crossterm::event::read as event_read;
use ratatui::backend::CrosstermBackend;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Arc;
use terminull::config::Config;
use terminull::content::load_archive;
use terminull::services::terminal_modes::{self, TerminalModes};
use terminull::services::tracing_setup;
use terminull::session::{Geometry, Session, SessionEvent, SessionOptions};
use tokio::sync::mpsc;

/// A terminal BBS serving a read-only e-zine archive
#[derive(Parser, Debug)]
#[command(name = "terminull")]
#[command(about = "Browse the terminull archive from your terminal", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (JSON)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Content root holding issues/ and pages/
    #[arg(long, value_name = "DIR")]
    content_dir: Option<PathBuf>,

    /// Public website used in media placeholder links
    #[arg(long, value_name = "URL")]
    site_url: Option<String>,

    /// Display name for this session (default: $USER)
    #[arg(long, value_name = "NAME")]
    user: Option<String>,

    /// Path to log file (default: system temp dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

/// Defaults, then the config file, then the environment, then flags
fn resolve_config(args: &Args) -> AnyhowResult<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    config.apply_env();

    if let Some(dir) = &args.content_dir {
        config.content_dir = dir.clone();
    }
    if let Some(url) = &args.site_url {
        config.site_url = url.clone();
    }
    if let Some(user) = &args.user {
        config.user = Some(user.clone());
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Forward terminal events into the session until it hangs up
fn spawn_input_thread(tx: mpsc::Sender<SessionEvent>) {
    std::thread::spawn(move || loop {
        let event = match event_read() {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("terminal input failed: {}", e);
                let _ = tx.blocking_send(SessionEvent::Quit);
                return;
            }
        };
        if let Some(event) = SessionEvent::from_terminal(event) {
            if tx.blocking_send(event).is_err() {
                return;
            }
        }
    });
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    // Handle --dump-config early (no terminal setup needed)
    if args.dump_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("terminull.log"));
    tracing_setup::init_global(&log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;
    tracing::info!(content_dir = %config.content_dir.display(), "terminull starting");

    let archive = Arc::new(load_archive(&config.content_dir));

    let username = config
        .user
        .clone()
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_default();
    let (width, height) = crossterm::terminal::size().unwrap_or((0, 0));
    let options = SessionOptions {
        archive,
        site_url: config.site_url.clone(),
        username,
        geometry: Geometry::from_transport(width, height),
        today: chrono::Local::now().date_naive(),
    };

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        terminal_modes::emergency_cleanup();
        original_hook(panic);
    }));

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let mut modes = TerminalModes::enable().context("Failed to set up terminal")?;

    let result = runtime.block_on(async {
        let (mut session, tx) = Session::new(CrosstermBackend::new(stdout()), options)?;
        spawn_input_thread(tx);
        session.run().await
    });

    modes.undo();
    result.context("Session failed")?;
    tracing::info!("terminull exiting");
    Ok(())
}
