//! Content access - read side of the blog
//!
//! Listing, pagination and search read the index; full posts are read from
//! the store by slug.

use super::query::{self, PostPage};
use super::store::decode_slug;
use super::{Post, PostMeta};
use crate::error::Result;
use crate::Blog;

/// Read-only queries against a blog
pub struct ContentAccess<'a> {
    blog: &'a Blog,
}

impl<'a> ContentAccess<'a> {
    pub fn new(blog: &'a Blog) -> Self {
        Self { blog }
    }

    /// All posts, newest first
    pub fn list_posts(&self) -> Result<Vec<PostMeta>> {
        let index = self.blog.index();
        index.ensure_built(self.blog.store())?;

        let mut posts = index.load()?;
        query::sort_newest_first(&mut posts);
        Ok(posts)
    }

    /// One 1-indexed page of the sorted list
    pub fn paginated_posts(&self, page: usize, page_size: usize) -> Result<PostPage> {
        let posts = self.list_posts()?;
        Ok(query::paginate(&posts, page, page_size))
    }

    /// Full post for a URL slug; `None` when there is no such post
    pub fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let Some(slug) = decode_slug(slug) else {
            return Ok(None);
        };
        self.blog.store().read_post(&slug)
    }

    /// Title search over the full list
    pub fn search_posts(&self, query: &str) -> Result<Vec<PostMeta>> {
        let posts = self.list_posts()?;
        Ok(query::search(
            &posts,
            query,
            self.blog.config.search.min_query_chars,
        ))
    }
}
