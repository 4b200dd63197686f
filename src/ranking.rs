//! Engagement ranking for fetched posts.
//!
//! The pipeline is a pure function of the fetched posts, the caller's
//! parameters, and a wall-clock instant captured once per request: filter by
//! recency window and repost threshold, score by reposts plus likes, sort
//! descending, reshape into display records. Degraded input never fails the
//! pipeline; every missing field falls back to a safe default.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::bsky::RawPost;
use crate::constants::{DEFAULT_HOURS, DEFAULT_LIMIT, DEFAULT_MIN_REPOSTS, PERMALINK_BASE};

/// Caller-supplied search parameters with defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Recency window in hours.
    pub hours: i64,
    /// Minimum repost count for a post to be eligible.
    pub min_reposts: u64,
    /// Requested page size; the fetch layer caps what actually goes upstream.
    pub limit: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            hours: DEFAULT_HOURS,
            min_reposts: DEFAULT_MIN_REPOSTS,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl SearchParams {
    /// Coerce raw query-string values, falling back to defaults for anything
    /// absent or unparseable. Coercion never errors.
    #[must_use]
    pub fn coerce(hours: Option<&str>, min_reposts: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            hours: parse_or(hours, DEFAULT_HOURS),
            min_reposts: parse_or(min_reposts, DEFAULT_MIN_REPOSTS),
            limit: parse_or(limit, DEFAULT_LIMIT),
        }
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// A post reshaped for display and serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayPost {
    pub text: String,
    /// Display name, falling back to handle, falling back to empty.
    pub author: String,
    pub handle: String,
    pub reposts: u64,
    pub likes: u64,
    /// Permalink, present only when both handle and record key are known.
    pub url: Option<String>,
    /// The original ISO timestamp string, passed through unmodified.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Filter, score, sort, and reshape fetched posts.
///
/// Retains a post iff its creation time falls within the recency window and
/// its repost count meets the threshold, then sorts by engagement (reposts
/// plus likes) descending. The sort is stable: equal scores keep their
/// original fetch order. The full filtered list is returned; `params.limit`
/// only bounds the upstream request, never this output.
#[must_use]
pub fn rank(posts: Vec<RawPost>, params: &SearchParams, now: DateTime<Utc>) -> Vec<DisplayPost> {
    // An absurdly large window overflows the cutoff arithmetic; degrade to
    // "no cutoff" rather than panic.
    let cutoff = Duration::try_hours(params.hours)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::UNIX_EPOCH);

    let mut scored: Vec<(u64, DisplayPost)> = posts
        .into_iter()
        .filter(|p| {
            parse_created_at(&p.record.created_at) >= cutoff
                && p.repost_count >= params.min_reposts
        })
        .map(|p| (p.repost_count + p.like_count, to_display(p)))
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, post)| post).collect()
}

/// Parse an ISO-8601 timestamp, defaulting to the epoch when absent or
/// malformed so that any positive recency window excludes the post.
fn parse_created_at(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

fn to_display(post: RawPost) -> DisplayPost {
    let url = permalink(&post.uri, &post.author.handle);
    let handle = post.author.handle;
    let author = post
        .author
        .display_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| handle.clone());

    DisplayPost {
        text: post.record.text,
        author,
        handle,
        reposts: post.repost_count,
        likes: post.like_count,
        url,
        created_at: post.record.created_at,
    }
}

/// Build the public permalink from the record key (the final URI segment) and
/// the author handle. Returns `None` when either part is missing.
fn permalink(uri: &str, handle: &str) -> Option<String> {
    let rkey = uri.rsplit('/').next().unwrap_or("");
    if handle.is_empty() || rkey.is_empty() {
        return None;
    }
    Some(format!("{PERMALINK_BASE}/{handle}/post/{rkey}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsky::{Author, PostRecord};

    fn frozen_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn make_post(handle: &str, rkey: &str, created_at: &str, reposts: u64, likes: u64) -> RawPost {
        RawPost {
            uri: format!("at://did:plc:abc/app.bsky.feed.post/{rkey}"),
            record: PostRecord {
                text: format!("post {rkey}"),
                created_at: created_at.to_string(),
            },
            repost_count: reposts,
            like_count: likes,
            author: Author {
                handle: handle.to_string(),
                display_name: None,
            },
        }
    }

    #[test]
    fn test_excludes_posts_below_repost_threshold() {
        let posts = vec![
            make_post("a.bsky.social", "k1", "2024-06-01T11:00:00Z", 15, 5),
            make_post("b.bsky.social", "k2", "2024-06-01T11:00:00Z", 2, 100),
        ];
        let params = SearchParams {
            min_reposts: 10,
            ..SearchParams::default()
        };

        let ranked = rank(posts, &params, frozen_now());

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].reposts, 15);
    }

    #[test]
    fn test_excludes_posts_outside_recency_window() {
        let posts = vec![
            make_post("a.bsky.social", "k1", "2024-06-01T11:00:00Z", 20, 0),
            make_post("b.bsky.social", "k2", "2024-05-30T11:00:00Z", 20, 0),
        ];
        let params = SearchParams {
            hours: 24,
            min_reposts: 0,
            ..SearchParams::default()
        };

        let ranked = rank(posts, &params, frozen_now());

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].handle, "a.bsky.social");
    }

    #[test]
    fn test_missing_created_at_is_excluded_by_positive_window() {
        let posts = vec![make_post("a.bsky.social", "k1", "", 20, 0)];
        let params = SearchParams {
            min_reposts: 0,
            ..SearchParams::default()
        };

        assert!(rank(posts, &params, frozen_now()).is_empty());
    }

    #[test]
    fn test_malformed_created_at_is_excluded_not_an_error() {
        let posts = vec![make_post("a.bsky.social", "k1", "yesterday-ish", 20, 0)];
        let params = SearchParams {
            min_reposts: 0,
            ..SearchParams::default()
        };

        assert!(rank(posts, &params, frozen_now()).is_empty());
    }

    #[test]
    fn test_sorts_descending_by_engagement() {
        let posts = vec![
            make_post("a.bsky.social", "k1", "2024-06-01T11:00:00Z", 5, 5),
            make_post("b.bsky.social", "k2", "2024-06-01T11:00:00Z", 30, 10),
            make_post("c.bsky.social", "k3", "2024-06-01T11:00:00Z", 10, 15),
        ];
        let params = SearchParams {
            min_reposts: 0,
            ..SearchParams::default()
        };

        let ranked = rank(posts, &params, frozen_now());

        let scores: Vec<u64> = ranked.iter().map(|p| p.reposts + p.likes).collect();
        assert_eq!(scores, vec![40, 25, 10]);
    }

    #[test]
    fn test_equal_scores_keep_fetch_order() {
        let posts = vec![
            make_post("first.bsky.social", "k1", "2024-06-01T11:00:00Z", 10, 5),
            make_post("second.bsky.social", "k2", "2024-06-01T11:00:00Z", 5, 10),
            make_post("third.bsky.social", "k3", "2024-06-01T11:00:00Z", 15, 0),
        ];
        let params = SearchParams {
            min_reposts: 0,
            ..SearchParams::default()
        };

        let ranked = rank(posts, &params, frozen_now());

        let handles: Vec<&str> = ranked.iter().map(|p| p.handle.as_str()).collect();
        assert_eq!(
            handles,
            vec!["first.bsky.social", "second.bsky.social", "third.bsky.social"]
        );
    }

    #[test]
    fn test_author_falls_back_display_name_then_handle() {
        let mut with_name = make_post("a.bsky.social", "k1", "2024-06-01T11:00:00Z", 10, 0);
        with_name.author.display_name = Some("Alice".to_string());
        let without_name = make_post("b.bsky.social", "k2", "2024-06-01T11:00:00Z", 10, 0);
        let mut anonymous = make_post("", "k3", "2024-06-01T11:00:00Z", 10, 0);
        anonymous.author.display_name = None;

        let params = SearchParams {
            min_reposts: 0,
            ..SearchParams::default()
        };
        let ranked = rank(vec![with_name, without_name, anonymous], &params, frozen_now());

        assert_eq!(ranked[0].author, "Alice");
        assert_eq!(ranked[1].author, "b.bsky.social");
        assert_eq!(ranked[2].author, "");
    }

    #[test]
    fn test_permalink_construction() {
        assert_eq!(
            permalink("at://did:plc:abc/app.bsky.feed.post/3k1", "alice.bsky.social"),
            Some("https://bsky.app/profile/alice.bsky.social/post/3k1".to_string())
        );
    }

    #[test]
    fn test_missing_handle_yields_no_url() {
        let post = make_post("", "k1", "2024-06-01T11:00:00Z", 10, 0);
        let params = SearchParams {
            min_reposts: 0,
            ..SearchParams::default()
        };

        let ranked = rank(vec![post], &params, frozen_now());

        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].url.is_none());
    }

    #[test]
    fn test_uri_without_final_segment_yields_no_url() {
        let mut post = make_post("a.bsky.social", "k1", "2024-06-01T11:00:00Z", 10, 0);
        post.uri = "at://did:plc:abc/app.bsky.feed.post/".to_string();
        let params = SearchParams {
            min_reposts: 0,
            ..SearchParams::default()
        };

        let ranked = rank(vec![post], &params, frozen_now());

        assert!(ranked[0].url.is_none());
    }

    #[test]
    fn test_created_at_passes_through_unmodified() {
        let post = make_post("a.bsky.social", "k1", "2024-06-01T11:00:00+02:00", 10, 0);
        let params = SearchParams {
            hours: 48,
            min_reposts: 0,
            ..SearchParams::default()
        };

        let ranked = rank(vec![post], &params, frozen_now());

        assert_eq!(ranked[0].created_at, "2024-06-01T11:00:00+02:00");
    }

    #[test]
    fn test_idempotent_with_frozen_clock() {
        let posts = vec![
            make_post("a.bsky.social", "k1", "2024-06-01T11:00:00Z", 15, 5),
            make_post("b.bsky.social", "k2", "2024-06-01T10:00:00Z", 12, 40),
        ];
        let params = SearchParams::default();

        let first = rank(posts.clone(), &params, frozen_now());
        let second = rank(posts, &params, frozen_now());

        assert_eq!(first, second);
    }

    #[test]
    fn test_coerce_defaults() {
        let params = SearchParams::coerce(None, None, None);
        assert_eq!(params.hours, 24);
        assert_eq!(params.min_reposts, 10);
        assert_eq!(params.limit, 100);
    }

    #[test]
    fn test_coerce_garbage_falls_back() {
        let params = SearchParams::coerce(Some("soon"), Some("-3"), Some(""));
        assert_eq!(params.hours, 24);
        assert_eq!(params.min_reposts, 10);
        assert_eq!(params.limit, 100);
    }

    #[test]
    fn test_coerce_valid_values() {
        let params = SearchParams::coerce(Some("6"), Some("0"), Some("25"));
        assert_eq!(params.hours, 6);
        assert_eq!(params.min_reposts, 0);
        assert_eq!(params.limit, 25);
    }

    #[test]
    fn test_serializes_with_camel_case_created_at() {
        let post = make_post("a.bsky.social", "k1", "2024-06-01T11:00:00Z", 10, 2);
        let params = SearchParams {
            min_reposts: 0,
            ..SearchParams::default()
        };
        let ranked = rank(vec![post], &params, frozen_now());

        let json = serde_json::to_value(&ranked[0]).unwrap();
        assert_eq!(json["createdAt"], "2024-06-01T11:00:00Z");
        assert_eq!(json["reposts"], 10);
        assert_eq!(json["likes"], 2);
        assert_eq!(
            json["url"],
            "https://bsky.app/profile/a.bsky.social/post/k1"
        );
    }
}
