//! Structured post form used by the admin editor and `markblog new`

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use super::{FrontMatter, Post};
use crate::error::{BlogError, Result};
use crate::helpers::front_matter_date;

/// Layout written into generated front matter
const DRAFT_LAYOUT: &str = "blog";

/// Tags arrive either as a list or as one comma-separated string
fn comma_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::One(s)) => split_tags(&s),
        Some(Raw::Many(v)) => v
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        None => Vec::new(),
    })
}

/// Form inputs may send the number as text; blank counts as zero
fn form_minutes<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(super::frontmatter::minutes(deserializer)?.unwrap_or(0))
}

/// Split "Cloud, DevOps , Security" into trimmed tags
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Post fields as entered in the admin form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostDraft {
    pub title: String,
    pub author: String,
    #[serde(deserialize_with = "comma_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "form_minutes")]
    pub reading_time: u32,
    pub category: String,
    pub thumbnail: String,
    pub description: String,
    /// Markdown body
    #[serde(alias = "content")]
    pub body: String,
}

impl PostDraft {
    /// Check the form rules; the first failing field is reported
    pub fn validate(&self) -> Result<()> {
        fn required(value: &str, field: &'static str, label: &str) -> Result<()> {
            if value.trim().is_empty() {
                Err(BlogError::validation(field, format!("{} is required", label)))
            } else {
                Ok(())
            }
        }

        required(&self.title, "title", "Title")?;
        required(&self.author, "author", "Author")?;
        if self.tags.is_empty() {
            return Err(BlogError::validation("tags", "At least one tag is required"));
        }
        if self.reading_time < 1 {
            return Err(BlogError::validation(
                "reading_time",
                "Reading time must be at least 1 minute",
            ));
        }
        required(&self.category, "category", "Category")?;
        required(&self.thumbnail, "thumbnail", "Thumbnail")?;
        required(&self.description, "description", "Description")?;
        Ok(())
    }

    /// Front matter for this draft published at `date`
    pub fn to_front_matter(&self, date: &NaiveDateTime) -> FrontMatter {
        FrontMatter {
            layout: Some(DRAFT_LAYOUT.to_string()),
            title: self.title.trim().to_string(),
            date: Some(front_matter_date(date)),
            author: self.author.trim().to_string(),
            tags: self.tags.clone(),
            reading_time: Some(self.reading_time),
            category: self.category.trim().to_string(),
            thumbnail: Some(self.thumbnail.trim().to_string()),
            description: self.description.trim().to_string(),
        }
    }

    /// Complete markdown file: front-matter block, blank line, body
    pub fn to_markdown(&self, date: &NaiveDateTime) -> Result<String> {
        let block = self
            .to_front_matter(date)
            .to_block()
            .map_err(|e| BlogError::validation("title", e.to_string()))?;
        Ok(format!("{}{}", block, self.body))
    }

    /// Prefill the form from an existing post
    pub fn from_post(post: &Post) -> Self {
        let matter = &post.meta.matter;
        Self {
            title: matter.title.clone(),
            author: matter.author.clone(),
            tags: matter.tags.clone(),
            reading_time: matter.reading_time.unwrap_or_default(),
            category: matter.category.clone(),
            thumbnail: matter.thumbnail.clone().unwrap_or_default(),
            description: matter.description.clone(),
            body: post.content.clone(),
        }
    }
}
