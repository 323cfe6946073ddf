//! Proposal Detail Page Controller
//!
//! The target proposal comes from the route parameter. Until the parameter
//! is known the page stays in `Loading` and issues nothing; a parameter that
//! is not a proposal id fails the page without touching the chain.

use std::sync::{Arc, Mutex, PoisonError};

use super::state::{deliver, LoadState, PageCell};
use crate::chain::DaoQueries;
use crate::model::ProposalDetail;

/// Parse the `{id}` segment of `/proposal/{id}`
pub fn parse_proposal_id(raw: &str) -> Result<u64, String> {
    raw.parse::<u64>()
        .map_err(|_| format!("invalid proposal id `{}`", raw))
}

/// One mounted instance of the detail page
pub struct DetailPage {
    queries: Arc<dyn DaoQueries>,
    route_param: Mutex<Option<String>>,
    proposal: Arc<PageCell<ProposalDetail>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailSnapshot {
    /// Raw route parameter, if routing has resolved
    pub route_param: Option<String>,
    pub proposal: LoadState<ProposalDetail>,
}

impl DetailPage {
    /// Mount the page; `route_param` is `None` while routing is unresolved
    pub fn mount(queries: Arc<dyn DaoQueries>, route_param: Option<&str>) -> Self {
        let page = Self {
            queries,
            route_param: Mutex::new(None),
            proposal: PageCell::new(),
        };

        if let Some(raw) = route_param {
            page.set_route_param(raw);
        }

        page
    }

    /// Route parameter became available or changed
    ///
    /// Re-issues the query when the parameter differs from the last one
    /// seen. An earlier in-flight query for another id is superseded.
    pub fn set_route_param(&self, raw: &str) {
        // Held until the new ticket is taken, so the stored parameter and
        // the latest request always agree
        let mut current = self.route_param.lock().unwrap_or_else(PoisonError::into_inner);
        if current.as_deref() == Some(raw) {
            return;
        }
        *current = Some(raw.to_string());

        let proposal_id = match parse_proposal_id(raw) {
            Ok(id) => id,
            Err(msg) => {
                tracing::debug!(route_param = raw, "Not querying with invalid proposal id");
                self.proposal.fail(msg);
                return;
            }
        };

        let ticket = self.proposal.begin();
        let cell = Arc::downgrade(&self.proposal);
        let queries = Arc::clone(&self.queries);
        tokio::spawn(async move {
            let result = queries.get_proposal(proposal_id).await;
            deliver(&cell, ticket, result, "proposal");
        });
    }

    pub fn snapshot(&self) -> DetailSnapshot {
        DetailSnapshot {
            route_param: self
                .route_param
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            proposal: self.proposal.snapshot(),
        }
    }

    /// Resolves once the proposal is no longer loading
    pub async fn settled(&self) {
        self.proposal.settled().await;
    }
}
