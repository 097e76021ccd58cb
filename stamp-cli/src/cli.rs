use stamp_core::Context;
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
pub struct Cli {
    #[arg(short, long, default_value_t = tracing::Level::INFO)]
    ///the log level for the applications {trace, debug, info, warn, error}
    pub log_level: tracing::Level,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug, Clone)]
pub struct Records {
    ///track json as returned by the catalog
    #[arg(short, long)]
    pub track: PathBuf,
    ///album json, required with `--context album`
    #[arg(short, long)]
    pub album: Option<PathBuf>,
    ///where album fields are read from
    #[arg(short, long, value_enum, default_value_t = Context::Track)]
    pub context: Context,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    ///tag a downloaded file and move it to its final name
    Tag {
        ///the downloaded (working) file
        file: PathBuf,
        ///where the tagged file ends up
        final_path: PathBuf,
        #[command(flatten)]
        records: Records,
        ///download root [default: ./ ]
        #[arg(short, long)]
        root_dir: Option<PathBuf>,
        ///request cover art embedding
        #[arg(short, long)]
        embed_art: bool,
        ///override multi-disc detection from the final path
        #[arg(short, long)]
        multi_disc: Option<bool>,
    },
    ///print the tags a track would receive
    Resolve {
        #[command(flatten)]
        records: Records,
    },
    Show {
        ///path to the songs to show
        songs: Vec<PathBuf>,
    },
}
