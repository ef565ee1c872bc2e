//! Front-matter parsing

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Reading time arrives as `7`, `7.0` or `"7"`
pub(crate) fn minutes<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct Minutes;

    impl<'de> Visitor<'de> for Minutes {
        type Value = Option<u32>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number of minutes or a numeric string")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(value)
                .map(Some)
                .map_err(|_| E::custom(format!("reading_time {} is too large", value)))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if value < 0 {
                return Err(E::custom("reading_time cannot be negative"));
            }
            self.visit_u64(value as u64)
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
                return Err(E::custom(format!("invalid reading_time {}", value)));
            }
            Ok(Some(value.round() as u32))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let value = value.trim();
            if value.is_empty() {
                return Ok(None);
            }
            if let Ok(n) = value.parse::<u32>() {
                return Ok(Some(n));
            }
            match value.parse::<f64>() {
                Ok(f) => self.visit_f64(f),
                Err(_) => Err(E::custom(format!(
                    "reading_time {:?} is not a number",
                    value
                ))),
            }
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(Minutes)
        }
    }

    deserializer.deserialize_any(Minutes)
}

/// Why a front-matter block was rejected
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    #[error("missing front-matter block")]
    Missing,
    #[error("front-matter block is not closed with ---")]
    Unterminated,
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("title is required")]
    MissingTitle,
}

/// Front-matter data from a post
///
/// Field order here is the order fields are written back to disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub author: String,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "minutes", skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<u32>,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub description: String,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        let Some(rest) = content.strip_prefix("---") else {
            return Err(FrontMatterError::Missing);
        };
        let rest = rest.trim_start_matches([' ', '\t']);
        let rest = rest.trim_start_matches(['\n', '\r']);

        // An empty block closes immediately
        let (yaml_content, remaining) = if let Some(after) = rest.strip_prefix("---") {
            ("", after)
        } else {
            let end_pos = rest.find("\n---").ok_or(FrontMatterError::Unterminated)?;
            (&rest[..end_pos], &rest[end_pos + 4..])
        };

        // Drop the remainder of the closing delimiter line
        let remaining = match remaining.find('\n') {
            Some(pos) if remaining[..pos].trim().is_empty() => &remaining[pos + 1..],
            None if remaining.trim().is_empty() => "",
            _ => remaining,
        };
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        let fm: FrontMatter = if yaml_content.trim().is_empty() {
            FrontMatter::default()
        } else {
            serde_yaml::from_str(yaml_content)?
        };

        if fm.title.trim().is_empty() {
            return Err(FrontMatterError::MissingTitle);
        }

        Ok((fm, remaining))
    }

    /// Render the `---` delimited block, followed by a blank line
    pub fn to_block(&self) -> Result<String, FrontMatterError> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("---\n{}---\n\n", yaml))
    }

    /// Parse the date string into a comparable timestamp
    pub fn parse_date(&self) -> Option<chrono::NaiveDateTime> {
        self.date
            .as_deref()
            .and_then(crate::helpers::parse_date)
    }
}
