//! Share-ready text blocks for clipboard copy.
//!
//! The exact layout is a user-visible contract: quoted text, an em-dash
//! attribution line, and the permalink; the copy-all variant appends an
//! engagement summary to each block and separates blocks with a rule.

use crate::ranking::DisplayPost;

/// Format one post as a share-ready block.
#[must_use]
pub fn format_post(post: &DisplayPost) -> String {
    format!(
        "\"{}\"\n— {} (@{})\n{}",
        post.text,
        post.author,
        post.handle,
        post.url.as_deref().unwrap_or("")
    )
}

/// Format every post for a bulk copy, each block carrying its engagement
/// summary, separated by a horizontal rule.
#[must_use]
pub fn format_all(posts: &[DisplayPost]) -> String {
    posts
        .iter()
        .map(|post| {
            format!(
                "{}\n({} reposts, {} likes)\n",
                format_post(post),
                post.reposts,
                post.likes
            )
        })
        .collect::<Vec<_>>()
        .join("\n---\n\n")
}
