//! Content module - posts, front matter, the store, the index and rendering

pub mod access;
pub mod draft;
mod frontmatter;
pub mod index;
mod markdown;
mod post;
pub mod query;
pub mod store;

pub use access::ContentAccess;
pub use draft::PostDraft;
pub use frontmatter::{FrontMatter, FrontMatterError};
pub use index::{IndexReport, PostIndex};
pub use markdown::MarkdownRenderer;
pub use post::{Post, PostMeta};
pub use query::PostPage;
pub use store::PostStore;
