//! Built-in tools
//!
//! Both tools are parameterless and always return text: failures are
//! reported as `Error fetching ...` strings instead of tool errors.

mod http;
mod location;
mod news;

pub use http::{default_client, ApiKey, FetchError};
pub use location::{format_location, IpInfo, LocationTool, LOCATION_API_KEY_VAR};
pub use news::{format_headlines, Article, BreakingNewsTool, NEWS_API_KEY_VAR, NO_NEWS_MESSAGE};
