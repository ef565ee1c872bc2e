//! List and search posts

use anyhow::Result;

use crate::content::PostMeta;
use crate::helpers::short_date;
use crate::Blog;

fn print_posts(posts: &[PostMeta]) {
    for post in posts {
        let date = if post.date().is_empty() {
            "undated".to_string()
        } else {
            short_date(post.date())
        };
        println!("  {} - {} [{}]", date, post.title(), post.slug);
    }
}

/// List posts newest first
pub fn run(blog: &Blog) -> Result<()> {
    let posts = blog.content().list_posts()?;
    println!("Posts ({}):", posts.len());
    print_posts(&posts);
    Ok(())
}

/// Title search, same rules as the search endpoint
pub fn search(blog: &Blog, query: &str) -> Result<()> {
    let min = blog.config.search.min_query_chars;
    if query.trim().chars().count() < min {
        println!("Search needs at least {} characters", min);
        return Ok(());
    }

    let posts = blog.content().search_posts(query)?;
    println!("Matches for {:?} ({}):", query, posts.len());
    print_posts(&posts);
    Ok(())
}
