//! Source verification adapters
//!
//! | Adapter | Port | Key dependency |
//! |---------|------|----------------|
//! | [`HttpSourceFetcher`] | `SourceFetcher` | `reqwest` + `scraper` |
//! | [`StaticReputationTable`] | `ReputationTable` | none |
//! | [`ContentSourceDiscovery`] | `SourceDiscovery` | `regex` + `url` |

mod discovery;
mod html;
mod http_fetcher;
mod reputation;

pub use discovery::{
    ContentSourceDiscovery, DEFAULT_SEARCH_TEMPLATES, QUERY_PLACEHOLDER, key_terms, quoted_urls,
};
pub use html::html_to_text;
pub use http_fetcher::HttpSourceFetcher;
pub use reputation::StaticReputationTable;
