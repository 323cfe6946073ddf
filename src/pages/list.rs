//! List Page Controller
//!
//! Items, proposals and governance parameters are fetched by independent
//! tasks. Each section settles on its own, so the page can be rendered
//! with whatever has arrived.

use std::sync::Arc;

use super::state::{deliver, LoadState, PageCell};
use crate::chain::DaoQueries;
use crate::model::{GovernanceParams, Item, ProposalSummary};

/// One mounted instance of the list page
pub struct ListPage {
    items: Arc<PageCell<Vec<Item>>>,
    proposals: Arc<PageCell<Vec<ProposalSummary>>>,
    params: Arc<PageCell<GovernanceParams>>,
}

/// Everything the list view needs at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot {
    pub items: LoadState<Vec<Item>>,
    pub proposals: LoadState<Vec<ProposalSummary>>,
    pub params: LoadState<GovernanceParams>,
}

impl ListSnapshot {
    pub fn is_settled(&self) -> bool {
        !self.items.is_loading() && !self.proposals.is_loading() && !self.params.is_loading()
    }
}

impl ListPage {
    /// Mount the page and issue its queries
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(queries: Arc<dyn DaoQueries>) -> Self {
        let page = Self {
            items: PageCell::new(),
            proposals: PageCell::new(),
            params: PageCell::new(),
        };

        let ticket = page.items.begin();
        let cell = Arc::downgrade(&page.items);
        let q = Arc::clone(&queries);
        tokio::spawn(async move {
            let result = q.list_items().await;
            deliver(&cell, ticket, result, "items");
        });

        let ticket = page.proposals.begin();
        let cell = Arc::downgrade(&page.proposals);
        let q = Arc::clone(&queries);
        tokio::spawn(async move {
            let result = q.list_proposals().await;
            deliver(&cell, ticket, result, "proposals");
        });

        let ticket = page.params.begin();
        let cell = Arc::downgrade(&page.params);
        tokio::spawn(async move {
            let result = queries.governance_params().await;
            deliver(&cell, ticket, result, "governance");
        });

        page
    }

    pub fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            items: self.items.snapshot(),
            proposals: self.proposals.snapshot(),
            params: self.params.snapshot(),
        }
    }

    /// Resolves once no section is loading
    pub async fn settled(&self) {
        tokio::join!(
            self.items.settled(),
            self.proposals.settled(),
            self.params.settled()
        );
    }
}
