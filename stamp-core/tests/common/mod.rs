#![allow(dead_code)]
use stamp_core::{Album, Named, Track};
use std::path::{Path, PathBuf};

/// An untagged FLAC as encoders write it: STREAMINFO (44.1kHz, stereo,
/// 16 bit), then a PADDING block closing the metadata, then filler standing
/// in for audio frames.
pub fn flac_fixture(dir: &Path, name: &str) -> PathBuf {
    let mut bytes = flac_head(0x00);
    // last-block flag set, type 1 (PADDING), 64 bytes
    bytes.extend_from_slice(&[0x81, 0x00, 0x00, 0x40]);
    bytes.extend_from_slice(&[0u8; 64]);
    bytes.extend_from_slice(&[0u8; 256]);
    write(dir, name, &bytes)
}

/// A FLAC whose only metadata block is STREAMINFO.
pub fn bare_flac_fixture(dir: &Path, name: &str) -> PathBuf {
    let mut bytes = flac_head(0x80);
    bytes.extend_from_slice(&[0u8; 256]);
    write(dir, name, &bytes)
}

fn flac_head(streaminfo_flags: u8) -> Vec<u8> {
    let mut bytes = b"fLaC".to_vec();
    // type 0 (STREAMINFO), 34 bytes
    bytes.extend_from_slice(&[streaminfo_flags, 0x00, 0x00, 0x22]);
    bytes.extend_from_slice(&[0x10, 0x00, 0x10, 0x00]);
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    bytes.extend_from_slice(&[0x0A, 0xC4, 0x42, 0xF0, 0x00, 0x00, 0x00, 0x00]);
    bytes.extend_from_slice(&[0u8; 16]);
    bytes
}

/// An untagged MPEG stream: one frame header and silence.
pub fn mp3_fixture(dir: &Path, name: &str) -> PathBuf {
    let mut bytes = vec![0xFF, 0xFB, 0x90, 0x00];
    bytes.extend_from_slice(&[0u8; 413]);
    write(dir, name, &bytes)
}

fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, bytes).unwrap();
    path
}

pub fn album() -> Album {
    Album {
        artist: Some(Named::new("The Orchestra")),
        genre: Some(Named::new("Classical")),
        title: Some(String::from("Nocturnes")),
        release_date_original: Some(String::from("2021-05-01")),
        tracks_count: Some(21),
    }
}

pub fn track() -> Track {
    Track {
        title: Some(String::from("Nocturne")),
        work: Some(String::from("Op. 9")),
        performer: Some(Named::new("A. Pianist")),
        track_number: Some(3),
        media_number: Some(2),
        album: Some(album()),
        ..Default::default()
    }
}
