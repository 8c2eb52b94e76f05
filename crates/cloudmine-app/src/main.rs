//! cloudmine: terminal front-end for the cloud-mining dashboard.
//!
//! Startup sequence:
//!   1. Open the bonus-date slot (on disk, or in memory with --ephemeral)
//!   2. Build the store with the default catalog and any --config overrides
//!   3. Mount every view, which starts the one-second mining timer
//!   4. Read commands from stdin until `quit` or EOF

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use cloudmine_app::{Outcome, Shell};
use cloudmine_core::config::{AppConfig, ConfigPatch};
use cloudmine_core::constants::{DEFAULT_UNLOCK_TAPS, DEFAULT_USER_ID};
use cloudmine_core::types::UserId;
use cloudmine_state::{AppContext, SlotDb, Store};

#[derive(Parser, Debug)]
#[command(
    name = "cloudmine",
    version,
    about = "Cloud-mining dashboard: accrue, claim, refer, withdraw"
)]
struct Args {
    /// Directory holding the persistent bonus-date slot.
    #[arg(long, default_value = "~/.cloudmine/slot")]
    data_dir: PathBuf,

    /// Keep the slot in memory; nothing survives the process.
    #[arg(long)]
    ephemeral: bool,

    /// JSON file with settings to apply on top of the defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Identifier of the signed-in user.
    #[arg(long, default_value = DEFAULT_USER_ID)]
    user_id: String,

    /// Rapid taps needed to reveal the admin panel.
    #[arg(long, default_value_t = DEFAULT_UNLOCK_TAPS)]
    unlock_taps: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,cloudmine=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("cloudmine starting");

    // ── Persistent slot ───────────────────────────────────────────────────────
    let slot = if args.ephemeral {
        SlotDb::temporary().context("opening in-memory slot")?
    } else {
        let data_dir = expand_tilde(&args.data_dir);
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("creating data dir {}", data_dir.display()))?;
        SlotDb::open(&data_dir)
            .with_context(|| format!("opening slot at {}", data_dir.display()))?
    };

    // ── Settings ──────────────────────────────────────────────────────────────
    let mut config = AppConfig::default();
    if let Some(path) = &args.config {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let patch = ConfigPatch::from_json(&json)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.apply(&patch);
        info!(path = %path.display(), "config overrides applied");
    }

    let store = Store::new(UserId::new(args.user_id), config);
    let ctx = AppContext::new(store, slot);
    let mut shell = Shell::new(ctx, args.unlock_taps).context("mounting views")?;

    // ── Command loop ──────────────────────────────────────────────────────────
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(b"cloudmine ready, type `help` for commands\n")
        .await?;
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("reading stdin")? else {
            break;
        };
        match shell.handle(&line, Instant::now()).await {
            Outcome::Continue(out) => {
                for l in out {
                    stdout.write_all(l.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                }
            }
            Outcome::Quit => break,
        }
    }

    shell.shutdown().context("flushing slot")?;
    info!("cloudmine stopped");
    Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(rest))
            .unwrap_or_else(|_| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
