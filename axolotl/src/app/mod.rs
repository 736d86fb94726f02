//! Application wiring.
//!
//! [`PackService`] ties the data layout, the configuration store, the item
//! resolver and the uploader together. A rebuild runs the synchronous pack
//! build and then hands the archive to the publisher:
//!
//! ```text
//! rebuild()
//!   ├── PackBuilder::build()   glyphs → staging → pack.zip
//!   └── Publisher::publish()   spawned upload → config url/hash
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::{PackService, RebuildReport};
pub use config::AppConfig;
pub use error::AppError;
