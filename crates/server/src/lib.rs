pub mod cache;
pub mod config;
pub mod fetch;
pub mod routes;
pub mod service;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use cache::{CachedDocument, DocumentCache};
pub use config::{Config, ConfigError};
pub use fetch::{find_image_url, FetchError, FetchOutcome, HttpImageSource, ImageLocation, ImageSource};
pub use routes::router;
pub use service::{RefreshError, TapListService};
