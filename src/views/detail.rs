//! Proposal Detail View

use leptos::*;

use super::cards::{status_glyph, ErrorBox, Spinner, VoteCard};
use crate::model::ProposalDetail;
use crate::pages::{DetailSnapshot, LoadState};

#[component]
pub fn DetailView(snapshot: DetailSnapshot) -> impl IntoView {
    let label = snapshot.route_param.unwrap_or_default();

    let body = match snapshot.proposal {
        LoadState::Loading => view! { <Spinner label="proposal" /> }.into_view(),
        LoadState::Error(message) => view! { <ErrorBox message=message /> }.into_view(),
        LoadState::Loaded(proposal) => view! { <ProposalBody proposal=proposal /> }.into_view(),
    };

    view! {
        <nav class="breadcrumb">
            <a href="/">"item-dao"</a>
            " | "
            <span>"proposal " {label}</span>
        </nav>
        {body}
    }
}

#[component]
fn ProposalBody(proposal: ProposalDetail) -> impl IntoView {
    let heading = if proposal.title.is_empty() {
        format!("Proposal {}", proposal.id)
    } else {
        proposal.title.clone()
    };
    let glyph = status_glyph(&proposal.status);
    let status = proposal.status.to_string();
    let action = proposal.action_json();
    let votes = proposal.votes();
    let yes = proposal.yes.total().to_string();
    let no = proposal.no.total().to_string();
    let abstain = proposal.abstain.total().to_string();
    let text = proposal.body;

    view! {
        <article class="proposal-detail">
            <h1 class="proposal-title">{heading}</h1>
            <h4 class="status" title=status>{glyph}</h4>
            <p class="proposal-body">{text}</p>

            <h3>"action"</h3>
            <pre class="action">{action}</pre>

            <h3>"votes"</h3>
            <ul class="tallies">
                <li>"yes: " {yes}</li>
                <li>"no: " {no}</li>
                <li>"abstain: " {abstain}</li>
            </ul>
            {votes.into_iter().map(|vote| view! { <VoteCard vote=vote /> }).collect_view()}
        </article>
    }
}
