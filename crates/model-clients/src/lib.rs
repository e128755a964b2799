//! HTTP clients for the remote inference servers hosting the translation,
//! vision-language and music models.
//!
//! The model seams are synchronous, so every client call blocks its thread
//! until the server answers. Call them from a blocking worker
//! (`tokio::task::spawn_blocking`), never from an async task.

mod http;

pub mod embedding;
pub mod generation;
pub mod translation;

pub use embedding::RemoteEmbedder;
pub use generation::RemoteMusicModel;
pub use http::Endpoint;
pub use translation::RemoteTranslator;
