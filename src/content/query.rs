//! Listing, pagination and title search over index entries

use serde::Serialize;
use std::cmp::Reverse;

use super::PostMeta;

/// One page of the sorted post list
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub posts: Vec<PostMeta>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl PostPage {
    pub fn has_prev(&self) -> bool {
        self.page > 1 && self.page <= self.total_pages + 1
    }

    pub fn has_next(&self) -> bool {
        self.page >= 1 && self.page < self.total_pages
    }
}

/// Sort newest first. Undated posts go last; equal dates keep their order.
pub fn sort_newest_first(posts: &mut [PostMeta]) {
    posts.sort_by_cached_key(|p| Reverse(p.date_key()));
}

/// Slice out a 1-indexed page. Pages outside the list are empty.
pub fn paginate(posts: &[PostMeta], page: usize, page_size: usize) -> PostPage {
    let total = posts.len();
    let total_pages = if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    };

    let slice: &[PostMeta] = if page == 0 || page_size == 0 {
        &[][..]
    } else {
        let start = (page - 1).saturating_mul(page_size);
        if start >= total {
            &[][..]
        } else {
            let end = start.saturating_add(page_size).min(total);
            &posts[start..end]
        }
    };

    PostPage {
        posts: slice.to_vec(),
        total,
        page,
        page_size,
        total_pages,
    }
}

/// Case-insensitive substring match on titles. Queries shorter than
/// `min_chars` after trimming match nothing.
pub fn search(posts: &[PostMeta], query: &str, min_chars: usize) -> Vec<PostMeta> {
    let query = query.trim();
    if query.chars().count() < min_chars || query.is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    posts
        .iter()
        .filter(|p| p.title().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;

    fn post(slug: &str, title: &str, date: Option<&str>) -> PostMeta {
        PostMeta::new(
            slug,
            FrontMatter {
                title: title.to_string(),
                date: date.map(|d| d.to_string()),
                ..Default::default()
            },
        )
    }

    fn slugs(posts: &[PostMeta]) -> Vec<&str> {
        posts.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_june_before_january() {
        let mut posts = vec![
            post("jan", "January", Some("2024-01-01")),
            post("jun", "June", Some("2024-06-01")),
        ];
        sort_newest_first(&mut posts);
        assert_eq!(slugs(&posts), vec!["jun", "jan"]);
    }

    #[test]
    fn test_sort_is_stable_and_undated_last() {
        let mut posts = vec![
            post("undated", "U", None),
            post("tie-1", "T1", Some("2024-03-01")),
            post("garbage", "G", Some("not a date")),
            post("newest", "N", Some("2024-05-01T10:00:00")),
            post("tie-2", "T2", Some("2024-03-01T00:00:00")),
        ];
        sort_newest_first(&mut posts);
        assert_eq!(
            slugs(&posts),
            vec!["newest", "tie-1", "tie-2", "undated", "garbage"]
        );
    }

    #[test]
    fn test_mixed_date_formats_compare_by_time() {
        let mut posts = vec![
            post("morning", "M", Some("2024-03-01 08:00:00")),
            post("evening", "E", Some("2024-03-01T20:00:00")),
        ];
        sort_newest_first(&mut posts);
        assert_eq!(slugs(&posts), vec!["evening", "morning"]);
    }

    #[test]
    fn test_pages_cover_everything() {
        let posts: Vec<_> = (0..23)
            .map(|i| post(&format!("p{}", i), "t", None))
            .collect();

        for page_size in [1, 5, 10, 23, 50] {
            let first = paginate(&posts, 1, page_size);
            let mut seen = 0;
            for page in 1..=first.total_pages {
                let result = paginate(&posts, page, page_size);
                assert!(result.posts.len() <= page_size);
                assert_eq!(result.total, 23);
                seen += result.posts.len();
            }
            assert_eq!(seen, 23, "page_size {}", page_size);
        }
    }

    #[test]
    fn test_out_of_range_pages_are_empty() {
        let posts: Vec<_> = (0..3).map(|i| post(&format!("p{}", i), "t", None)).collect();
        assert!(paginate(&posts, 0, 2).posts.is_empty());
        assert!(paginate(&posts, 3, 2).posts.is_empty());
        assert!(paginate(&posts, usize::MAX, 2).posts.is_empty());
        assert!(paginate(&posts, 1, 0).posts.is_empty());

        let last = paginate(&posts, 2, 2);
        assert_eq!(slugs(&last.posts), vec!["p2"]);
        assert_eq!(last.total_pages, 2);
        assert!(last.has_prev());
        assert!(!last.has_next());
    }

    #[test]
    fn test_short_queries_match_nothing() {
        let posts = vec![post("a", "a b c", None)];
        assert!(search(&posts, "", 3).is_empty());
        assert!(search(&posts, "a", 3).is_empty());
        assert!(search(&posts, "  a  ", 3).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_on_title_only() {
        let posts = vec![
            post("rust-intro", "Getting Started With RUST", None),
            post("go", "Go Concurrency", None),
            post("rusty-slug", "Unrelated title", None),
        ];
        let found = search(&posts, "rust", 3);
        assert_eq!(slugs(&found), vec!["rust-intro"]);

        let found = search(&posts, "CONCURRENCY", 3);
        assert_eq!(slugs(&found), vec!["go"]);
    }
}
