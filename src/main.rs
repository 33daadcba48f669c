use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use vksync::{cli, config, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Output folder
    #[clap(short, long, env = "VKSYNC_DESTINATION", default_value = config::DEFAULT_DESTINATION)]
    destination: PathBuf,

    /// Album title written into every song
    #[clap(short, long, env = "VKSYNC_ALBUM", default_value = config::DEFAULT_ALBUM)]
    album: String,

    /// Concurrent downloads and tag rewrites [default: available parallelism]
    #[clap(short, long)]
    workers: Option<usize>,

    /// Credential cache file
    #[clap(short = 'f', long, env = "VKSYNC_AUTH_FILE", default_value = config::DEFAULT_AUTH_FILE)]
    credentials: PathBuf,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize again and replace the cached credential
    Auth,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env() {
        warning!("Cannot load .env file. Err: {}", e);
    }

    let cli = Cli::parse();

    let mut config = config::Config::from_env()
        .with_output_dir(cli.destination)
        .with_album(cli.album)
        .with_credentials_path(cli.credentials);
    if let Some(workers) = cli.workers {
        config = config.with_workers(workers);
    }

    match cli.command {
        None => cli::sync(&config).await,
        Some(Command::Auth) => cli::auth(&config).await,
        Some(Command::Completions(opt)) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
