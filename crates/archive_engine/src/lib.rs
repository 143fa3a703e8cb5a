//! Archive engine: HTTP fetching, page decoding and state files around the
//! pure `archive_core` operations.
mod client;
mod decode;
mod details;
mod fetch;
mod persist;
mod settings;
mod types;

pub use client::{ArchiveClient, ClientError};
pub use decode::{decode_page, DecodedPage};
pub use details::{VideoDetails, VideoSource};
pub use fetch::{Fetcher, ReqwestFetcher};
pub use persist::{PersistError, StateStore};
pub use settings::{ArchiveSettings, FetchSettings};
pub use types::{BodyKind, FailureKind, FetchError, FetchMetadata, FetchOutput};
