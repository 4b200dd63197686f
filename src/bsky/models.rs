//! Wire types for the Bluesky XRPC endpoints we call.
//!
//! Every field tolerates absence: the search upstream routinely omits counts,
//! display names, and occasionally whole records, and a degraded post must
//! deserialize rather than fail the request.

use serde::Deserialize;

/// Response from the searchPosts API.
#[derive(Debug, Deserialize)]
pub struct SearchPostsResponse {
    #[serde(default)]
    pub posts: Vec<RawPost>,
}

/// A single post as returned by searchPosts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPost {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub record: PostRecord,
    #[serde(default, rename = "repostCount")]
    pub repost_count: u64,
    #[serde(default, rename = "likeCount")]
    pub like_count: u64,
    #[serde(default)]
    pub author: Author,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostRecord {
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub handle: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

/// Response from the createSession API.
#[derive(Debug, Deserialize)]
pub struct SessionResponse {
    #[serde(rename = "accessJwt")]
    pub access_jwt: Option<String>,
}

/// Error body Bluesky attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct UpstreamErrorBody {
    pub message: Option<String>,
}
