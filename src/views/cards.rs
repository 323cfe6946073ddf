//! Cards and Status Widgets
//!
//! Stateless pieces shared by both pages. Nothing in here touches the
//! network or page state.

use leptos::*;

use crate::model::{Item, ProposalStatus, ProposalSummary, Vote};

/// Colors cycled through by list position
const PALETTE: [&str; 5] = ["#9400D3", "indigo", "#0047AB", "#378642", "#e3b104"];

/// Glyph shown next to a proposal's title
pub fn status_glyph(status: &ProposalStatus) -> &'static str {
    match status {
        ProposalStatus::Passed => "👍",
        ProposalStatus::Failed => "👎",
        ProposalStatus::Pending => "🤷",
        ProposalStatus::Other(_) => "🦄",
    }
}

/// [`status_glyph`] for a raw status string
pub fn glyph_for(status: &str) -> &'static str {
    status_glyph(&ProposalStatus::from(status))
}

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[component]
pub fn ItemCard(item: Item, index: usize) -> impl IntoView {
    let style = format!("color: {}", palette_color(index));

    view! {
        <div class="item-card" style=style>
            <h3>{item.name}</h3>
            <p>{item.contents}</p>
        </div>
    }
}

/// Summary card linking to the proposal's detail page
#[component]
pub fn ProposalCard(proposal: ProposalSummary, index: usize) -> impl IntoView {
    let style = format!("color: {}", palette_color(index));
    let href = format!("/proposal/{}", proposal.id);
    let glyph = status_glyph(&proposal.status);
    let status = proposal.status.to_string();

    view! {
        <div class="proposal-card" style=style>
            <h3><a href=href>{proposal.title}</a></h3>
            <h4 title=status>"status " {glyph}</h4>
            <p>{proposal.body}</p>
        </div>
    }
}

#[component]
pub fn VoteCard(vote: Vote) -> impl IntoView {
    let position = vote.position.as_str();
    let class = format!("vote-card vote-{}", position);

    view! {
        <div class=class>
            <h4>{position}</h4>
            <p>"tokens: " {vote.amount.to_string()}</p>
            <p class="address">"address: " {vote.address}</p>
        </div>
    }
}

#[component]
pub fn Spinner(#[prop(into)] label: String) -> impl IntoView {
    view! {
        <div class="loading" role="status">
            <span class="spinner" />
            <span>"Loading " {label} "..."</span>
        </div>
    }
}

/// Failure box carrying the raw error message
#[component]
pub fn ErrorBox(message: String) -> impl IntoView {
    view! {
        <div class="error" role="alert">
            <strong>"Something went wrong"</strong>
            <pre class="error-message">{message}</pre>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_glyphs() {
        assert_eq!(glyph_for("Passed"), "👍");
        assert_eq!(glyph_for("Failed"), "👎");
        assert_eq!(glyph_for("Pending"), "🤷");
        assert_eq!(glyph_for("Unknown"), "🦄");
        assert_eq!(glyph_for(""), "🦄");
        assert_eq!(glyph_for("passed"), "🦄");
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(palette_color(0), "#9400D3");
        assert_eq!(palette_color(4), "#e3b104");
        assert_eq!(palette_color(5), "#9400D3");
    }
}
