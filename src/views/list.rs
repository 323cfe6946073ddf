//! List Page View

use leptos::*;

use super::cards::{ErrorBox, ItemCard, ProposalCard, Spinner};
use crate::model::{GovernanceParams, Item, ProposalSummary};
use crate::pages::{ListSnapshot, LoadState};

pub const REPO_URL: &str = "https://github.com/ezekiiel/item-dao";

#[component]
pub fn ListView(snapshot: ListSnapshot) -> impl IntoView {
    let ListSnapshot {
        items,
        proposals,
        params,
    } = snapshot;

    // Proposal colors continue where the item colors left off
    let offset = items.loaded().map(Vec::len).unwrap_or(0);

    view! {
        <h1>"Welcome to " <a href=REPO_URL target="_blank">"item-dao!"</a></h1>

        <section class="items">
            <h2>"Items"</h2>
            {items_section(items)}
        </section>

        <section class="proposals">
            <h2>"Proposals"</h2>
            {proposals_section(proposals, offset)}
        </section>

        <section class="governance">
            <h2>"Governance"</h2>
            {governance_section(params)}
        </section>
    }
}

fn items_section(state: LoadState<Vec<Item>>) -> View {
    match state {
        LoadState::Loading => view! { <Spinner label="items" /> }.into_view(),
        LoadState::Error(message) => view! { <ErrorBox message=message /> }.into_view(),
        LoadState::Loaded(items) if items.is_empty() => {
            view! { <p class="empty">"No items yet."</p> }.into_view()
        }
        LoadState::Loaded(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| view! { <ItemCard item=item index=index /> })
            .collect_view(),
    }
}

fn proposals_section(state: LoadState<Vec<ProposalSummary>>, offset: usize) -> View {
    match state {
        LoadState::Loading => view! { <Spinner label="proposals" /> }.into_view(),
        LoadState::Error(message) => view! { <ErrorBox message=message /> }.into_view(),
        LoadState::Loaded(proposals) if proposals.is_empty() => {
            view! { <p class="empty">"No proposals yet."</p> }.into_view()
        }
        LoadState::Loaded(proposals) => proposals
            .into_iter()
            .enumerate()
            .map(|(index, proposal)| view! { <ProposalCard proposal=proposal index={index + offset} /> })
            .collect_view(),
    }
}

fn governance_section(state: LoadState<GovernanceParams>) -> View {
    match state {
        LoadState::Loading => view! { <Spinner label="governance parameters" /> }.into_view(),
        LoadState::Error(message) => view! { <ErrorBox message=message /> }.into_view(),
        LoadState::Loaded(params) => view! {
            <dl class="params">
                <dt>"quorum"</dt>
                <dd>{params.quorum.to_string()}</dd>
                <dt>"proposal cost"</dt>
                <dd>{params.proposal_cost.to_string()}</dd>
            </dl>
        }
        .into_view(),
    }
}
