//! Writing resolved tags into audio containers and moving the result into place.
use crate::record::{Album, Context, Track};
use crate::resolve::{self, ResolvedTags};
use std::path::{Path, PathBuf};

pub mod flac;
pub mod mp3;

pub use flac::Flac;
pub use mp3::Mp3;

#[derive(thiserror::Error, Debug)]
pub enum TagError {
    #[error(transparent)]
    Resolve(#[from] resolve::Error),
    #[error("error reading or writing flac metadata: {0}")]
    Flac(#[from] lofty::error::LoftyError),
    #[error("error reading or writing id3 tag: {0}")]
    Id3(#[from] id3::Error),
    #[error("vorbis comment block is {size} bytes, the limit is {max}")]
    TagBlockTooLarge { size: usize, max: usize },
    #[error("unsupported file type")]
    UnsupportedFormat,
    #[error("unable to open file: {0}")]
    Open(std::io::Error),
    #[error("unable to save file: {0}")]
    Save(std::io::Error),
    #[error("vorbis comment block missing after save")]
    CommentsNotWritten,
    #[error("unable to move file to '{}': {source}", .to.to_string_lossy())]
    Rename {
        to: PathBuf,
        source: std::io::Error,
    },
}
impl TagError {
    pub fn at(self, path: PathBuf) -> Error {
        Error { error: self, path }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("failed to tag '{}'. {error}", .path.to_string_lossy())]
pub struct Error {
    pub error: TagError,
    pub path: PathBuf,
}

/// How to decide whether a release spans several discs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiscPolicy {
    ///multi-disc when the final path contains [`DISC_MARKER`]
    #[default]
    FilenameMarker,
    ///the caller already knows
    Explicit(bool),
}

/// Substring the download layout puts in the path of multi-disc releases.
pub const DISC_MARKER: &str = "Disc ";

impl DiscPolicy {
    #[must_use]
    pub fn is_multi_disc(self, final_path: &Path) -> bool {
        match self {
            Self::FilenameMarker => final_path.to_string_lossy().contains(DISC_MARKER),
            Self::Explicit(multi_disc) => multi_disc,
        }
    }
}

/// One file to tag. The file at `path` is consumed and reappears at `final_path`.
#[derive(Debug, Clone)]
pub struct TagJob<'a> {
    pub path: &'a Path,
    ///download root; reserved for cover art lookup
    pub root_dir: &'a Path,
    pub final_path: &'a Path,
    pub track: &'a Track,
    pub album: Option<&'a Album>,
    pub context: Context,
    pub embed_art: bool,
    pub disc_policy: DiscPolicy,
}

impl<'a> TagJob<'a> {
    #[must_use]
    pub fn new(path: &'a Path, final_path: &'a Path, track: &'a Track) -> Self {
        Self {
            path,
            root_dir: Path::new(""),
            final_path,
            track,
            album: None,
            context: Context::Track,
            embed_art: false,
            disc_policy: DiscPolicy::default(),
        }
    }
    #[must_use]
    pub fn with_album(mut self, album: &'a Album) -> Self {
        self.album = Some(album);
        self.context = Context::Album;
        self
    }
    #[must_use]
    pub fn root_dir(mut self, root_dir: &'a Path) -> Self {
        self.root_dir = root_dir;
        self
    }
    #[must_use]
    pub fn embed_art(mut self, embed_art: bool) -> Self {
        self.embed_art = embed_art;
        self
    }
    #[must_use]
    pub fn disc_policy(mut self, disc_policy: DiscPolicy) -> Self {
        self.disc_policy = disc_policy;
        self
    }
    #[must_use]
    pub fn is_multi_disc(&self) -> bool {
        self.disc_policy.is_multi_disc(self.final_path)
    }
}

/// A tag layout for one audio container.
pub trait Container {
    /// Writes `tags` into the file at `path` and saves it. Must either save
    /// completely or leave the file as it was.
    /// # Errors
    ///   any read, size or save failure of the container's tag block
    fn write_tags(&self, path: &Path, tags: &ResolvedTags, job: &TagJob<'_>)
        -> Result<(), TagError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Format {
    #[display(fmt = "flac")]
    Flac,
    #[display(fmt = "mp3")]
    Mp3,
}

impl Format {
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "flac" => Some(Self::Flac),
            "mp3" => Some(Self::Mp3),
            _ => None,
        }
    }
    #[must_use]
    pub fn container(self) -> &'static dyn Container {
        match self {
            Self::Flac => &Flac,
            Self::Mp3 => &Mp3,
        }
    }
}

/// Tags `job.path` with the container picked from its extension.
/// # Errors
///   [`TagError::UnsupportedFormat`] for anything but flac and mp3, otherwise see [`tag`]
pub fn tag_file(job: &TagJob<'_>) -> Result<(), Error> {
    let format = Format::from_path(job.path)
        .ok_or_else(|| TagError::UnsupportedFormat.at(job.path.to_path_buf()))?;
    tag(format.container(), job)
}

/// Resolves the tag set, writes it with `container`, then renames the
/// working file to `job.final_path`. Nothing is renamed unless the save
/// succeeded.
/// # Errors
///   resolution failures before the file is touched, then write and rename failures
pub fn tag(container: &dyn Container, job: &TagJob<'_>) -> Result<(), Error> {
    let at = |e: TagError| e.at(job.path.to_path_buf());
    let tags = resolve::resolve_fields(job.track, job.album, job.context)
        .map_err(|e| at(e.into()))?;
    tracing::debug!(
        "tagging '{}' as '{}' by {}",
        job.path.to_string_lossy(),
        tags.title,
        tags.artist
    );
    if job.embed_art {
        tracing::debug!("cover art for '{}' is embedded by the caller", job.path.to_string_lossy());
    }
    container.write_tags(job.path, &tags, job).map_err(at)?;
    finalize(job.path, job.final_path).map_err(at)
}

fn finalize(from: &Path, to: &Path) -> Result<(), TagError> {
    move_file(
        from,
        to,
        |from, to| std::fs::rename(from, to),
        |path| std::fs::remove_file(path),
    )
}

/// `rename`, or copy and remove when the rename is refused (e.g. across
/// filesystems). A failed remove takes the copy back out, so the file only
/// ever exists at one of the two paths.
fn move_file(
    from: &Path,
    to: &Path,
    rename: fn(&Path, &Path) -> std::io::Result<()>,
    remove: fn(&Path) -> std::io::Result<()>,
) -> Result<(), TagError> {
    let rename_err = |source| TagError::Rename {
        to: to.to_path_buf(),
        source,
    };
    if let Err(e) = rename(from, to) {
        tracing::debug!(
            "rename of '{}' failed ({e}), copying instead",
            from.to_string_lossy()
        );
        std::fs::copy(from, to).map_err(rename_err)?;
        if let Err(e) = remove(from) {
            if let Err(cleanup) = std::fs::remove_file(to) {
                tracing::debug!(
                    "unable to remove copy '{}': {cleanup}",
                    to.to_string_lossy()
                );
            }
            return Err(rename_err(e));
        }
    }
    tracing::trace!("moved '{}' to '{}'", from.to_string_lossy(), to.to_string_lossy());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disc_marker_is_a_substring_match() {
        let policy = DiscPolicy::FilenameMarker;
        assert!(policy.is_multi_disc(Path::new("/music/Album/Disc 2/01. Intro.flac")));
        assert!(!policy.is_multi_disc(Path::new("/music/Album/01. Intro.flac")));
        assert!(!policy.is_multi_disc(Path::new("/music/Discography/01. Intro.flac")));
    }

    #[test]
    fn explicit_policy_ignores_path() {
        assert!(DiscPolicy::Explicit(true).is_multi_disc(Path::new("a.flac")));
        assert!(!DiscPolicy::Explicit(false).is_multi_disc(Path::new("Disc 1/a.flac")));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a.FLAC")), Some(Format::Flac));
        assert_eq!(Format::from_path(Path::new("dir/b.mp3")), Some(Format::Mp3));
        assert_eq!(Format::from_path(Path::new("c.m4a")), None);
        assert_eq!(Format::from_path(Path::new("noext")), None);
    }

    fn refuse_rename(_: &Path, _: &Path) -> std::io::Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "cross-device link"))
    }

    #[test]
    fn refused_rename_falls_back_to_copy() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("working.flac");
        let to = dir.path().join("final.flac");
        std::fs::write(&from, b"tagged").unwrap();

        move_file(&from, &to, refuse_rename, |path| std::fs::remove_file(path)).unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"tagged");
    }

    #[test]
    fn failed_remove_takes_the_copy_back() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("working.flac");
        let to = dir.path().join("final.flac");
        std::fs::write(&from, b"tagged").unwrap();

        let err = move_file(&from, &to, refuse_rename, |_| {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "busy"))
        })
        .unwrap_err();

        assert!(matches!(err, TagError::Rename { .. }));
        assert!(from.exists());
        assert!(!to.exists());
    }

    #[test]
    fn unsupported_file_is_left_alone() {
        let track = Track::default();
        let job = TagJob::new(Path::new("song.wav"), Path::new("out.wav"), &track);
        let err = tag_file(&job).unwrap_err();
        assert!(matches!(err.error, TagError::UnsupportedFormat));
    }
}
