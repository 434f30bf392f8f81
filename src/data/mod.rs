//! Remote sources: fetching, the live fallback query, and URL configuration.

pub mod fallback;
pub mod fetch;
pub mod sources;

pub use fallback::{TodayValues, fetch_today};
pub use fetch::{Fetch, HttpFetcher};
pub use sources::SourceUrls;
