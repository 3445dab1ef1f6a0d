pub mod embed;
pub mod error;
pub mod store;
pub mod types;

pub use embed::Embedder;
pub use error::{Error, Result};
pub use store::DocumentStore;
pub use types::{ArticleRecord, DocumentKind, DocumentMetadata, IndexDocument};

pub mod prelude {
    pub use super::embed::Embedder;
    pub use super::error::{Error, Result};
    pub use super::store::DocumentStore;
    pub use super::types::{ArticleRecord, DocumentKind, DocumentMetadata, IndexDocument};
}
