//! Configuration module

mod site;

pub use site::AdminConfig;
pub use site::HighlightConfig;
pub use site::SearchConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
