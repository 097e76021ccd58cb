use crate::record::{Album, Context, Track};
use serde::Serialize;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("missing required field '{0}'")]
    MissingField(String),
    #[error("release date '{0}' is too short to contain a year")]
    MalformedDate(String),
}

/// The complete set of values written to a file. Built in one go so a
/// missing field is reported before anything touches the disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTags {
    pub title: String,
    pub artist: String,
    pub genre: String,
    #[serde(rename = "albumartist")]
    pub album_artist: String,
    pub album: String,
    pub date: String,
    pub year: String,
    #[serde(rename = "tracknumber")]
    pub track_number: u32,
    #[serde(rename = "tracktotal")]
    pub track_total: u32,
    #[serde(rename = "discnumber")]
    pub disc_number: u32,
}

/// Logical text fields, named the way the catalog tooling names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Field {
    #[display(fmt = "album")]
    Album,
    #[display(fmt = "albumartist")]
    AlbumArtist,
    #[display(fmt = "artist")]
    Artist,
    #[display(fmt = "date")]
    Date,
    #[display(fmt = "genre")]
    Genre,
    #[display(fmt = "performer")]
    Performer,
    #[display(fmt = "title")]
    Title,
    #[display(fmt = "year")]
    Year,
}

impl ResolvedTags {
    /// `None` only for [`Field::Performer`], which the resolver never fills.
    #[must_use]
    pub fn text(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Album => &self.album,
            Field::AlbumArtist => &self.album_artist,
            Field::Artist => &self.artist,
            Field::Date => &self.date,
            Field::Genre => &self.genre,
            Field::Title => &self.title,
            Field::Year => &self.year,
            Field::Performer => return None,
        };
        Some(value.as_str())
    }
}

/// Builds the display title: `"{work}: {title} ({version})"`, with each
/// decoration only when present.
/// # Errors
///   [`Error::MissingField`] when the track has no title
pub fn resolve_title(track: &Track) -> Result<String, Error> {
    let mut title = present(track.title.as_ref())
        .ok_or_else(|| Error::MissingField(String::from("track.title")))?
        .to_owned();
    if let Some(version) = present(track.version.as_ref()) {
        title = format!("{title} ({version})");
    }
    if let Some(work) = present(track.work.as_ref()) {
        title = format!("{work}: {title}");
    }
    Ok(title)
}

/// Resolves every tag value for `track`. `album` is only consulted in
/// [`Context::Album`]; a standalone track reads album fields from its own
/// nested album.
/// # Errors
///   [`Error::MissingField`] naming the first absent source
///
///   [`Error::MalformedDate`] when the release date has fewer than four characters
pub fn resolve_fields(
    track: &Track,
    album: Option<&Album>,
    context: Context,
) -> Result<ResolvedTags, Error> {
    let sources = Sources::new(track, album, context)?;
    let title = resolve_title(track)?;
    let artist = sources.text(
        &[performer_name as Lookup<'_>, album_artist_name as Lookup<'_>],
        "artist.name",
    )?;
    let genre = sources.text(&[genre_name as Lookup<'_>], "genre.name")?;
    let album_artist = sources.text(&[album_artist_name as Lookup<'_>], "artist.name")?;
    let album_title = sources.text(&[release_title as Lookup<'_>], "title")?;
    let date = sources.text(&[release_date as Lookup<'_>], "release_date_original")?;
    let year = derive_year(&date)?;
    let track_total = sources
        .album
        .tracks_count
        .ok_or_else(|| sources.missing("tracks_count"))?;
    let track_number = track
        .track_number
        .ok_or_else(|| Error::MissingField(String::from("track.track_number")))?;
    let disc_number = track
        .media_number
        .ok_or_else(|| Error::MissingField(String::from("track.media_number")))?;
    Ok(ResolvedTags {
        title,
        artist,
        genre,
        album_artist,
        album: album_title,
        date,
        year,
        track_number,
        track_total,
        disc_number,
    })
}

/// First four characters of the release date. Anything after them is
/// ignored, so `"2021-05-01T00:00"` and `"2021"` both yield `"2021"`.
/// # Errors
///   [`Error::MalformedDate`] when `date` is shorter than four characters
pub fn derive_year(date: &str) -> Result<String, Error> {
    let end = date
        .char_indices()
        .nth(3)
        .map(|(i, c)| i + c.len_utf8())
        .ok_or_else(|| Error::MalformedDate(date.to_owned()))?;
    Ok(date[..end].to_owned())
}

type Lookup<'a> = fn(&Sources<'a>) -> Option<&'a str>;

struct Sources<'a> {
    track: &'a Track,
    album: &'a Album,
    //dotted path of `album`, for error messages
    album_path: &'static str,
}

impl<'a> Sources<'a> {
    fn new(track: &'a Track, album: Option<&'a Album>, context: Context) -> Result<Self, Error> {
        let (album, album_path) = match context {
            Context::Track => (track.album.as_ref(), "track.album"),
            Context::Album => (album, "album"),
        };
        let album = album.ok_or_else(|| Error::MissingField(album_path.to_owned()))?;
        Ok(Self {
            track,
            album,
            album_path,
        })
    }
    fn text(&self, chain: &[Lookup<'a>], last_key: &str) -> Result<String, Error> {
        chain
            .iter()
            .find_map(|lookup| lookup(self))
            .map(ToOwned::to_owned)
            .ok_or_else(|| self.missing(last_key))
    }
    fn missing(&self, key: &str) -> Error {
        Error::MissingField(format!("{}.{key}", self.album_path))
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

fn performer_name<'a>(sources: &Sources<'a>) -> Option<&'a str> {
    present(sources.track.performer.as_ref()?.name.as_ref())
}
fn album_artist_name<'a>(sources: &Sources<'a>) -> Option<&'a str> {
    present(sources.album.artist.as_ref()?.name.as_ref())
}
fn genre_name<'a>(sources: &Sources<'a>) -> Option<&'a str> {
    present(sources.album.genre.as_ref()?.name.as_ref())
}
fn release_title<'a>(sources: &Sources<'a>) -> Option<&'a str> {
    present(sources.album.title.as_ref())
}
fn release_date<'a>(sources: &Sources<'a>) -> Option<&'a str> {
    present(sources.album.release_date_original.as_ref())
}
