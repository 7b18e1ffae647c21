// Service exports
pub mod document;
pub mod postgres;
pub mod snapshot;
pub mod source;
pub mod static_file;

pub use document::DocumentStoreSource;
pub use postgres::PostgresSource;
pub use snapshot::{ProviderSnapshot, SnapshotStore, refresh_once, spawn_refresh};
pub use source::{ProviderSource, SourceError};
pub use static_file::{FileFormat, StaticFileSource, parse_catalog};
