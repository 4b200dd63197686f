//! Maud page templates for the browser UI.
//!
//! One page: a search form, the ranked result cards, and copy buttons. The
//! share text for each copy button is rendered server-side into a
//! `data-clipboard` attribute; the inline script only moves it to the
//! clipboard and flips the button label for feedback.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::ranking::{DisplayPost, SearchParams};
use crate::share;

/// Clipboard wiring for the copy buttons.
const COPY_SCRIPT: &str = r#"(function() {
    document.querySelectorAll('[data-clipboard]').forEach(function(btn) {
        btn.addEventListener('click', function() {
            navigator.clipboard.writeText(btn.getAttribute('data-clipboard'));
            var original = btn.textContent;
            btn.textContent = '✓ Copied!';
            setTimeout(function() { btn.textContent = original; }, 2000);
        });
    });
})();"#;

/// Base page layout.
fn base_layout(content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="color-scheme" content="light dark";
                title { "Bluesky Reaction Compiler" }
                link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";
                style { (PreEscaped(".post-text { white-space: pre-wrap; } .card-footer { display: flex; gap: 1em; flex-wrap: wrap; align-items: center; font-size: 0.875em; }")) }
            }
            body {
                main class="container" {
                    (content)
                }
                footer class="container" {
                    small { "Bluesky Reaction Compiler | results ranked by reposts + likes" }
                }
                script { (PreEscaped(COPY_SCRIPT)) }
            }
        }
    }
}

/// Render the home page: the search form plus, after a search, either the
/// ranked results or an error banner.
pub fn render_home(
    q: &str,
    params: &SearchParams,
    outcome: Option<Result<Vec<DisplayPost>, String>>,
) -> Markup {
    let content = html! {
        hgroup {
            h1 { "🏀 Bluesky Reaction Compiler" }
            p { "Search for reactions and compile the most engaged posts" }
        }

        form method="get" action="/" {
            label {
                "Search Query"
                input type="text" name="q" value=(q) placeholder="Enter your search term..." required;
            }
            div class="grid" {
                label {
                    "Hours Back"
                    input type="number" name="hours" value=(params.hours) min="1" max="168";
                }
                label {
                    "Minimum Reposts"
                    input type="number" name="minReposts" value=(params.min_reposts) min="0";
                }
            }
            button type="submit" { "Search Bluesky" }
        }

        @if let Some(outcome) = outcome {
            @match outcome {
                Err(message) => {
                    article class="error-banner" {
                        p { (message) }
                    }
                }
                Ok(posts) => {
                    @if posts.is_empty() {
                        article {
                            p {
                                "No posts found matching your criteria. Try lowering the \
                                 minimum reposts or expanding the time range."
                            }
                        }
                    } @else {
                        (results_section(&posts))
                    }
                }
            }
        }
    };

    base_layout(content)
}

/// The ranked results with per-post and copy-all actions.
fn results_section(posts: &[DisplayPost]) -> Markup {
    html! {
        section {
            header class="card-footer" {
                h2 { "Found " (posts.len()) " posts" }
                button class="outline" data-clipboard=(share::format_all(posts)) {
                    "Copy All"
                }
            }
            @for post in posts {
                (post_card(post))
            }
        }
    }
}

fn post_card(post: &DisplayPost) -> Markup {
    html! {
        article {
            p class="post-text" { (post.text) }
            p {
                strong { (post.author) }
                " "
                small { "@" (post.handle) }
            }
            footer class="card-footer" {
                span { (post.reposts) " reposts" }
                span { (post.likes) " likes" }
                span { (post.created_at) }
                @if let Some(url) = &post.url {
                    a href=(url) target="_blank" rel="noopener noreferrer" {
                        "View on Bluesky →"
                    }
                }
                button class="outline" data-clipboard=(share::format_post(post)) {
                    "📋 Copy"
                }
            }
        }
    }
}
