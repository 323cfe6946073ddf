//! Server-Rendered Views
//!
//! Leptos components rendered to HTML strings. Views only read page
//! snapshots; they never issue queries themselves.

pub mod cards;
mod detail;
mod list;

pub use detail::DetailView;
pub use list::{ListView, REPO_URL};

use leptos::*;

use crate::pages::{DetailSnapshot, ListSnapshot};

pub const TITLE: &str = "item-dao!";
pub const ICON_URL: &str = "https://moonphase.is/image.svg";

/// Seconds before a page with loading sections asks to be reloaded
pub const REFRESH_SECS: u32 = 2;

const STYLE: &str = r#"
html {
    font-family: sans-serif;
    max-width: 600px;
    padding: 6px;
    line-height: 1.5;
    margin: auto;
}
h1 { font-size: 225%; }
p, ul, ol { font-size: 18px; }
a { color: #0000bb; }
.item-card, .proposal-card { margin: 16px 0px; padding: 2px; margin-left: 16px; }
.item-card h3, .proposal-card h3 { margin: 4px 0px; }
.item-card h4, .proposal-card h4 { margin: 0; }
.item-card p, .proposal-card p { margin: 8px 0px; }
.proposal-card a { color: inherit; }
.breadcrumb { font-weight: bold; margin-top: 8px; }
.action { font-family: monospace; padding: 16px; background: #333; color: white; overflow: auto; }
.vote-card { margin: 8px 0px; padding: 8px; }
.vote-yes { background: #d8f5d8; }
.vote-no { background: #f5d8d8; }
.vote-abstain { background: #e8e8e8; }
.address { word-break: break-all; }
.loading { color: #666; }
.error { border: 1px solid #bb0000; color: #bb0000; padding: 8px; }
.error-message { white-space: pre-wrap; margin: 4px 0px; }
"#;

/// Render the list page
pub fn render_list_page(snapshot: ListSnapshot) -> String {
    let refresh = !snapshot.is_settled();
    let body = leptos::ssr::render_to_string(move || view! { <ListView snapshot=snapshot /> });
    document(&body, refresh)
}

/// Render the proposal detail page
pub fn render_detail_page(snapshot: DetailSnapshot) -> String {
    let refresh = snapshot.proposal.is_loading();
    let body = leptos::ssr::render_to_string(move || view! { <DetailView snapshot=snapshot /> });
    document(&body, refresh)
}

pub fn render_not_found(path: &str) -> String {
    let path = path.to_string();
    let body = leptos::ssr::render_to_string(move || view! { <NotFound path=path /> });
    document(&body, false)
}

#[component]
fn NotFound(path: String) -> impl IntoView {
    view! {
        <h1>"Nothing here"</h1>
        <p>"No page at " <code>{path}</code></p>
        <p><a href="/">"Back to item-dao"</a></p>
    }
}

/// Wrap a rendered body in the HTML document shell
fn document(body: &str, refresh: bool) -> String {
    let mut html = String::with_capacity(body.len() + STYLE.len() + 512);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    if refresh {
        html.push_str(&format!(
            "<meta http-equiv=\"refresh\" content=\"{}\">\n",
            REFRESH_SECS
        ));
    }
    html.push_str(&format!("<title>{}</title>\n", TITLE));
    html.push_str(&format!("<link rel=\"icon\" href=\"{}\">\n", ICON_URL));
    html.push_str("<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<main>\n");
    html.push_str(body);
    html.push_str("\n</main>\n</body>\n</html>\n");
    html
}
