use super::{Container, TagError, TagJob};
use crate::resolve::ResolvedTags;
use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::AudioFile;
use lofty::flac::FlacFile;
use lofty::ogg::VorbisComments;
use std::io::Cursor;
use std::path::Path;

/// Largest metadata block a FLAC header can describe (24 bit length).
pub const MAX_BLOCK_SIZE: usize = 16_777_215;

const LAST_BLOCK: u8 = 0x80;
const STREAMINFO: u8 = 0;
const PADDING: u8 = 1;

/// FLAC files, tagged through their Vorbis comment block. Written keys
/// replace earlier values; other keys and pictures are kept. The file is
/// rewritten in memory and only replaced on disk once the new comment block
/// reads back.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flac;

impl Container for Flac {
    fn write_tags(
        &self,
        path: &Path,
        tags: &ResolvedTags,
        job: &TagJob<'_>,
    ) -> Result<(), TagError> {
        let mut bytes = std::fs::read(path).map_err(TagError::Open)?;
        open_metadata_chain(&mut bytes);
        let mut buffer = Cursor::new(bytes);
        let mut flac =
            FlacFile::read_from(&mut buffer, ParseOptions::new().read_properties(false))?;

        let mut comments = flac.vorbis_comments().cloned().unwrap_or_default();
        comments.insert(String::from("TITLE"), tags.title.clone());
        comments.insert(String::from("TRACKNUMBER"), tags.track_number.to_string());
        if job.is_multi_disc() {
            comments.insert(String::from("DISCNUMBER"), tags.disc_number.to_string());
        }
        comments.insert(String::from("ARTIST"), tags.artist.clone());
        comments.insert(String::from("GENRE"), tags.genre.clone());
        comments.insert(String::from("ALBUMARTIST"), tags.album_artist.clone());
        comments.insert(String::from("TRACKTOTAL"), tags.track_total.to_string());
        comments.insert(String::from("ALBUM"), tags.album.clone());
        comments.insert(String::from("DATE"), tags.date.clone());

        let size = block_size(&comments);
        if size > MAX_BLOCK_SIZE {
            return Err(TagError::TagBlockTooLarge {
                size,
                max: MAX_BLOCK_SIZE,
            });
        }
        flac.set_vorbis_comments(comments);
        buffer.set_position(0);
        flac.save_to(&mut buffer, WriteOptions::default())?;

        buffer.set_position(0);
        let written =
            FlacFile::read_from(&mut buffer, ParseOptions::new().read_properties(false))?;
        if written.vorbis_comments().is_none() {
            return Err(TagError::CommentsNotWritten);
        }
        std::fs::write(path, buffer.into_inner()).map_err(TagError::Save)
    }
}

/// Clears the last-block flag of a STREAMINFO that ends the metadata and
/// appends an empty PADDING block, so blocks inserted after it stay reachable.
/// Input that doesn't look like FLAC is left for the parser to reject.
pub fn open_metadata_chain(bytes: &mut Vec<u8>) {
    let start = id3v2_len(bytes);
    if bytes.get(start..start + 4) != Some(b"fLaC".as_slice()) {
        return;
    }
    let header = start + 4;
    let Some(&[flags, l0, l1, l2]) = bytes.get(header..header + 4) else {
        return;
    };
    if flags != LAST_BLOCK | STREAMINFO {
        return;
    }
    let len = [l0, l1, l2]
        .iter()
        .fold(0usize, |acc, b| (acc << 8) | usize::from(*b));
    let end = header + 4 + len;
    if end > bytes.len() {
        return;
    }
    bytes[header] = STREAMINFO;
    let audio = bytes.split_off(end);
    bytes.extend_from_slice(&[LAST_BLOCK | PADDING, 0, 0, 0]);
    bytes.extend(audio);
}

/// Size of an ID3v2 tag some encoders put in front of the FLAC stream.
fn id3v2_len(bytes: &[u8]) -> usize {
    match bytes.get(..10) {
        Some(&[b'I', b'D', b'3', _, _, flags, s0, s1, s2, s3]) => {
            let size = [s0, s1, s2, s3]
                .iter()
                .fold(0usize, |acc, b| (acc << 7) | usize::from(b & 0x7f));
            let footer = if flags & 0x10 == 0 { 0 } else { 10 };
            10 + size + footer
        }
        _ => 0,
    }
}

/// Serialized length of a Vorbis comment block, excluding the block header.
#[must_use]
pub fn block_size(comments: &VorbisComments) -> usize {
    let items: usize = comments
        .items()
        .map(|(key, value)| 4 + key.len() + 1 + value.len())
        .sum();
    4 + comments.vendor().len() + 4 + items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_size_counts_length_prefixes() {
        let mut comments = VorbisComments::default();
        comments.set_vendor(String::from("stamp"));
        comments.insert(String::from("TITLE"), String::from("Nocturne"));
        // vendor: 4 + 5, count: 4, item: 4 + "TITLE=Nocturne"
        assert_eq!(block_size(&comments), 9 + 4 + 4 + 14);
    }

    fn streaminfo(flags: u8) -> Vec<u8> {
        let mut bytes = b"fLaC".to_vec();
        bytes.extend_from_slice(&[flags, 0x00, 0x00, 0x22]);
        bytes.extend_from_slice(&[0u8; 34]);
        bytes.extend_from_slice(b"audio");
        bytes
    }

    #[test]
    fn lone_streaminfo_gets_a_padding_block() {
        let mut bytes = streaminfo(0x80);
        open_metadata_chain(&mut bytes);
        assert_eq!(bytes[4], 0x00);
        assert_eq!(&bytes[42..46], &[0x81, 0, 0, 0]);
        assert_eq!(&bytes[46..], b"audio");
    }

    #[test]
    fn open_chain_is_left_alone() {
        let mut bytes = streaminfo(0x00);
        let before = bytes.clone();
        open_metadata_chain(&mut bytes);
        assert_eq!(bytes, before);

        let mut not_flac = b"RIFF....WAVE".to_vec();
        open_metadata_chain(&mut not_flac);
        assert_eq!(not_flac, b"RIFF....WAVE");
    }

    #[test]
    fn leading_id3_tag_is_skipped() {
        let mut bytes = vec![b'I', b'D', b'3', 3, 0, 0, 0, 0, 0, 2, 0, 0];
        bytes.extend(streaminfo(0x80));
        open_metadata_chain(&mut bytes);
        assert_eq!(bytes[16], 0x00);
        assert_eq!(&bytes[54..58], &[0x81, 0, 0, 0]);
    }
}
