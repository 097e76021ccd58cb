use super::{Container, TagError, TagJob};
use crate::resolve::{Field, ResolvedTags};
use id3::frame::Content;
use id3::{Encoding, ErrorKind, Frame, Tag, TagLike, Version};
use std::path::Path;

/// Text frame for each logical field.
pub const FRAMES: [(Field, &str); 8] = [
    (Field::Album, "TALB"),
    (Field::AlbumArtist, "TPE2"),
    (Field::Artist, "TPE1"),
    (Field::Date, "TDAT"),
    (Field::Genre, "TCON"),
    (Field::Performer, "TOPE"),
    (Field::Title, "TIT2"),
    (Field::Year, "TYER"),
];

/// Written version, the one most players still read reliably.
pub const VERSION: Version = Version::Id3v23;

/// MP3 files, tagged through an ID3v2.3 tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mp3;

impl Container for Mp3 {
    fn write_tags(
        &self,
        path: &Path,
        tags: &ResolvedTags,
        _job: &TagJob<'_>,
    ) -> Result<(), TagError> {
        let mut tag = read_or_new(path)?;
        tag.add_frame(text_frame(
            "TRCK",
            format!("{}/{}", tags.track_number, tags.track_total),
        ));
        tag.add_frame(text_frame("TPOS", tags.disc_number.to_string()));
        for (field, id) in FRAMES {
            if let Some(value) = tags.text(field) {
                tag.add_frame(text_frame(id, value.to_owned()));
            }
        }
        tag.write_to_path(path, VERSION)?;
        Ok(())
    }
}

fn text_frame(id: &str, text: String) -> Frame {
    Frame::with_content(id, Content::Text(text)).set_encoding(Some(Encoding::UTF16))
}

/// Existing tag of `path`, or an empty one when the file has none or it
/// can't be parsed.
fn read_or_new(path: &Path) -> Result<Tag, TagError> {
    match Tag::read_from_path(path) {
        Ok(tag) => Ok(tag),
        Err(e) if matches!(e.kind, ErrorKind::Io(_)) => Err(e.into()),
        Err(e) => {
            tracing::debug!(
                "no usable id3 tag in '{}' ({e}), starting a new one",
                path.to_string_lossy()
            );
            Ok(Tag::new())
        }
    }
}
