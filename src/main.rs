use std::process::ExitCode;

use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use setlistsync::{
    cli::{self, SyncOptions},
    config::{self, Config},
    error::EXIT_USAGE,
    error, warning,
};

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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
  args_conflicts_with_subcommands = true, // disallow mixing sync flags with `completions`
  subcommand_negates_reqs = true,
)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Command>,

    #[clap(flatten)]
    sync: SyncArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// setlist.fm setlist id (e.g. 63de4613)
    #[clap(long)]
    pub setlist_id: Option<String>,

    /// Full setlist.fm URL, its last path segment is used as id
    #[clap(long)]
    pub setlist_url: Option<String>,

    /// Name of the playlist created on the Subsonic server
    #[clap(long, required = true)]
    pub playlist_name: Option<String>,

    /// Artist name used as search hint (defaults to the setlist's artist)
    #[clap(long)]
    pub artist: Option<String>,

    /// Maximum number of setlist songs to match
    #[clap(long, default_value_t = cli::DEFAULT_MAX_SONGS)]
    pub max_songs: usize,

    /// Maximum number of search results requested per song
    #[clap(long, default_value_t = cli::DEFAULT_SEARCH_LIMIT)]
    pub search_limit: u32,

    /// Match songs but do not create the playlist
    #[clap(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment file. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Some(Command::Completions(opt)) = cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    let Some(playlist_name) = cli.sync.playlist_name else {
        error!("--playlist-name is required");
        return ExitCode::from(EXIT_USAGE);
    };

    let opts = SyncOptions {
        setlist_id: cli.sync.setlist_id,
        setlist_url: cli.sync.setlist_url,
        playlist_name,
        artist: cli.sync.artist,
        max_songs: cli.sync.max_songs,
        search_limit: cli.sync.search_limit,
        dry_run: cli.sync.dry_run,
    };

    match cli::sync(&config, &opts).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
