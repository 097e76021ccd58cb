use anyhow::Result;
use lofty::config::ParseOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use std::{collections::BTreeMap, path::Path};

/// Text items of the file's primary tag, keyed by lofty's item key name.
/// # Errors
///   the file can't be read or carries no tag
pub fn read_tags(path: &Path) -> Result<BTreeMap<String, String>> {
    let tagged = Probe::open(path)?
        .options(ParseOptions::new().read_properties(false))
        .read()?;
    let Some(tag) = tagged.primary_tag() else {
        anyhow::bail!("'{}' is untagged", path.to_string_lossy());
    };
    Ok(tag
        .items()
        .filter_map(|i| {
            i.value()
                .text()
                .map(|s| (format!("{:?}", i.key()), s.to_owned()))
        })
        .collect())
}

/// One line summary, e.g. `'Nocturne' by A. Pianist in album Nocturnes`.
#[must_use]
pub fn describe(tags: &BTreeMap<String, String>) -> String {
    let title = tags.get("TrackTitle").map_or_else(
        || String::from("Untitled Song"),
        |title| format!("'{title}'"),
    );
    let artist = tags
        .get("TrackArtist")
        .map(|artist| format!(" by {artist}"))
        .unwrap_or_default();
    let album = tags
        .get("AlbumTitle")
        .map(|album| format!(" in album {album}"))
        .unwrap_or_default();
    format!("{title}{artist}{album}")
}
