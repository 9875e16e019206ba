use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use fittsforge::config::Config;
use fittsforge::error::FfResult;
use fittsforge::geometry::KeyboardGeometry;
use fittsforge::layouts::DEFAULT_ALPHABET;
use fittsforge::scorer::Scorer;
use std::process;
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, short, long, default_value = "data/digraphs_prob.txt")]
    digraphs: String,

    #[arg(global = true, short, long, default_value = "data/single_char_prob.txt")]
    letters: String,

    /// JSON geometry (`{"positions": [[x, y], ...]}`); the 27-key block if omitted.
    #[arg(global = true, short = 'k', long)]
    keyboard: Option<String>,

    #[arg(global = true, short, long, default_value = DEFAULT_ALPHABET)]
    alphabet: String,

    /// JSON config file; explicit flags override its values.
    #[arg(global = true, long)]
    config_file: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Search(cmd::search::SearchArgs),
    Score(cmd::score::ScoreArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Err(e) = execute(cli, &matches) {
        error!("❌ {}", e);
        process::exit(1);
    }
}

fn execute(cli: Cli, matches: &clap::ArgMatches) -> FfResult<()> {
    info!("🚀 Initializing FittsForge...");

    let (cli_config, sub_matches) = match &cli.command {
        Commands::Search(args) => (&args.config, matches.subcommand_matches("search")),
        Commands::Score(args) => (&args.config, matches.subcommand_matches("score")),
    };

    let config = match (&cli.config_file, sub_matches) {
        (Some(path), Some(sub)) => {
            info!("⚖️  Loading config from: {}", path);
            let mut file_config = Config::load_from_file(path)?;
            file_config.merge_from_cli(cli_config, sub);
            file_config
        }
        (Some(path), None) => {
            warn!("Ignoring config file '{}': no subcommand matches", path);
            cli_config.clone()
        }
        (None, _) => cli_config.clone(),
    };

    let geometry = match &cli.keyboard {
        Some(path) => {
            info!("📂 Loading Keyboard: {}", path);
            KeyboardGeometry::load_from_file(path)?
        }
        None => KeyboardGeometry::standard(),
    };
    let alphabet: Vec<char> = cli.alphabet.chars().collect();

    info!("📚 Loading tables: {} / {}", cli.digraphs, cli.letters);
    let scorer = Scorer::from_files(&cli.digraphs, &cli.letters, config.weights)?;

    match cli.command {
        Commands::Search(args) => cmd::search::run(args, config, &scorer, &geometry, &alphabet),
        Commands::Score(args) => cmd::score::run(args, &scorer, &geometry),
    }
}
