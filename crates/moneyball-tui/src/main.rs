// Moneyball dashboard entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config, pick the profile (first CLI argument or `active_profile`)
// 3. Fetch and parse the profile's CSV files
// 4. Build the session and run the TUI until the user quits

use moneyball_core::config;
use moneyball_core::data::loader;
use moneyball_core::session::Session;
use moneyball_tui::tui;

use anyhow::Context;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Moneyball dashboard starting up");

    let config = config::load_config().context("failed to load configuration")?;
    let requested = std::env::args().nth(1);
    let profile = config
        .select_profile(requested.as_deref())
        .context("failed to select profile")?;
    info!(
        "Profile {} ({}): {} files from {}",
        profile.name,
        profile.title,
        profile.files.len(),
        profile.base_url
    );

    let fetcher = loader::fetcher_for(profile, &config.http).context("failed to build fetcher")?;
    let report = loader::load_profile(fetcher.as_ref(), profile).await;
    info!(
        "Loaded {} rows from {} files, {} failed",
        report.table.len(),
        report.loaded.len(),
        report.failures.len()
    );

    let session = Session::new(profile, report, config.weights);
    if session.is_blocked() {
        warn!("Session has nothing to rank; the dashboard shows the notices only");
    }

    if let Err(e) = tui::run(session).await {
        error!("TUI error: {}", e);
        return Err(e);
    }

    info!("Moneyball dashboard shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("moneyball.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("moneyball_core=info,moneyball_tui=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
