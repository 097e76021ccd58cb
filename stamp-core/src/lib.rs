#![warn(
    clippy::complexity,
    clippy::correctness,
    clippy::perf,
    clippy::pedantic,
    clippy::style
)]
#![allow(clippy::module_name_repetitions)]
pub mod record;
pub mod resolve;
pub mod show;
pub mod tag;

pub use record::{Album, Context, Named, Track};
pub use resolve::{resolve_fields, resolve_title, ResolvedTags};
pub use tag::{tag_file, DiscPolicy, Format, TagJob};
