use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use spirithatch::{
    app::{self, PlayOptions},
    clock::SystemClock,
    config::{self, Settings},
    model::Rules,
    server::{self, AppState},
    session::Session,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Raise a spirit animal from the terminal or the browser.
#[derive(Parser, Debug)]
#[command(name = "spirithatch", author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG wins when set
    #[arg(short = 'l', long, env = "SPIRITHATCH_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Play in the terminal (default)
    Play(PlayArgs),
    /// Serve the JSON API and browser page
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default)]
struct PlayArgs {
    /// Skip the name prompt
    #[arg(short, long)]
    name: Option<String>,
    /// Seed the RNG for a reproducible game
    #[arg(long)]
    seed: Option<u64>,
    /// Plain output without ANSI colors
    #[arg(long)]
    no_color: bool,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to listen on
    #[arg(short, long, env = "SPIRITHATCH_BIND")]
    bind: Option<String>,
    /// HTML page served at /
    #[arg(short, long, value_name = "FILE")]
    page: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
}

fn init_tracing(level: Option<&str>, fallback: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "spirithatch={}",
            level.unwrap_or(fallback)
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn load_settings() -> Settings {
    match config::load_or_init() {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "settings unavailable, using defaults");
            Settings::default()
        }
    }
}

fn play(args: PlayArgs, settings: Settings) -> Result<()> {
    app::run(PlayOptions {
        name: args.name,
        default_name: settings.default_name,
        color: settings.enable_color && !args.no_color,
        rng: rng_from(args.seed.or(settings.seed)),
    })
}

fn serve(args: ServeArgs, settings: Settings) -> Result<()> {
    let bind = args.bind.unwrap_or(settings.bind);
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address {bind:?}"))?;
    let page = args.page.unwrap_or(settings.page_path);
    if !page.exists() {
        warn!(page = %page.display(), "page not found; / will answer with an error");
    }

    let session = Session::new(
        &settings.default_name,
        Rules::default(),
        Arc::new(SystemClock),
        rng_from(args.seed.or(settings.seed)),
    );
    let state = Arc::new(AppState::new(session, page, settings.default_name));

    let runtime = tokio::runtime::Runtime::new().context("could not start tokio runtime")?;
    info!(%addr, "spirit hatch server starting");
    runtime.block_on(server::run(addr, state))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Cmd::Play(PlayArgs::default()));
    let fallback = match command {
        Cmd::Play(_) => "warn",
        Cmd::Serve(_) => "info",
    };
    init_tracing(cli.log_level.as_deref(), fallback);

    let settings = load_settings();
    match command {
        Cmd::Play(args) => play(args, settings),
        Cmd::Serve(args) => serve(args, settings),
    }
}
