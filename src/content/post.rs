//! Post models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::FrontMatter;

/// One index entry: the slug plus every front-matter field, no body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMeta {
    /// Filename without the `.md` extension
    pub slug: String,

    #[serde(flatten)]
    pub matter: FrontMatter,
}

impl PostMeta {
    pub fn new(slug: impl Into<String>, matter: FrontMatter) -> Self {
        Self {
            slug: slug.into(),
            matter,
        }
    }

    pub fn title(&self) -> &str {
        &self.matter.title
    }

    /// Raw `date` value, empty when absent
    pub fn date(&self) -> &str {
        self.matter.date.as_deref().unwrap_or("")
    }

    /// Timestamp used for chronological ordering
    pub fn date_key(&self) -> Option<NaiveDateTime> {
        self.matter.parse_date()
    }

    /// Site path of the post's detail page
    pub fn path(&self) -> String {
        format!(
            "/posts/{}",
            percent_encoding::utf8_percent_encode(&self.slug, super::store::SLUG_ENCODE_SET)
        )
    }

    /// Get the previous (newer) post in a sorted list
    pub fn prev<'a>(&self, posts: &'a [PostMeta]) -> Option<&'a PostMeta> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        if pos > 0 {
            Some(&posts[pos - 1])
        } else {
            None
        }
    }

    /// Get the next (older) post in a sorted list
    pub fn next<'a>(&self, posts: &'a [PostMeta]) -> Option<&'a PostMeta> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        posts.get(pos + 1)
    }
}

/// A blog post with its markdown body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(flatten)]
    pub meta: PostMeta,

    /// Raw markdown body
    pub content: String,
}
