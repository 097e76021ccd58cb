#![warn(
    clippy::complexity,
    clippy::correctness,
    clippy::perf,
    clippy::pedantic,
    clippy::style
)]
#![allow(clippy::module_name_repetitions)]

use std::{collections::BTreeMap, path::Path};

use anyhow::{Context as _, Result};
use clap::Parser;
use stamp_core::{show, tag::DiscPolicy, Album, Context, TagJob, Track};

mod cli;
fn setup_logger(level: tracing::Level) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .without_time()
            .with_max_level(level)
            .pretty()
            .finish(),
    )
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("unable to read '{}'", path.to_string_lossy()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("'{}' is not a valid record", path.to_string_lossy()))
}

fn load_records(records: &cli::Records) -> Result<(Track, Option<Album>)> {
    let track = read_json(&records.track)?;
    let album = records.album.as_deref().map(read_json::<Album>).transpose()?;
    if records.context == Context::Album && album.is_none() {
        anyhow::bail!("an album record is required when tagging in album context");
    }
    Ok((track, album))
}

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    setup_logger(args.log_level)?;
    match args.command {
        cli::Command::Tag {
            file,
            final_path,
            records,
            root_dir,
            embed_art,
            multi_disc,
        } => {
            let (track, album) = load_records(&records)?;
            let root_dir = if let Some(dir) = root_dir {
                dir
            } else {
                tracing::debug!("no root directory supplied, defaulting to current directory");
                std::env::current_dir()?
            };
            let mut job = TagJob::new(&file, &final_path, &track)
                .root_dir(&root_dir)
                .embed_art(embed_art)
                .disc_policy(multi_disc.map_or(DiscPolicy::FilenameMarker, DiscPolicy::Explicit));
            if let Some(album) = &album {
                job = job.with_album(album);
            }
            job.context = records.context;
            stamp_core::tag_file(&job)?;
            tracing::info!(
                "tagged '{}' -> '{}'",
                file.to_string_lossy(),
                final_path.to_string_lossy()
            );
        }
        cli::Command::Resolve { records } => {
            let (track, album) = load_records(&records)?;
            let tags = stamp_core::resolve_fields(&track, album.as_ref(), records.context)?;
            print!("{}", toml::to_string_pretty(&tags)?);
        }
        cli::Command::Show { songs } => {
            let mut show_map = BTreeMap::new();
            for path in songs {
                match show::read_tags(&path) {
                    Ok(map) => {
                        tracing::debug!("{}: {}", path.to_string_lossy(), show::describe(&map));
                        show_map.insert(path.to_string_lossy().into_owned(), map);
                    }
                    Err(e) => tracing::error!("{e}"),
                }
            }
            print!("{}", toml::to_string_pretty(&show_map)?);
        }
    };
    Ok(())
}
