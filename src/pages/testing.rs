//! Canned query layer for controller, view and router tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use crate::chain::{ChainError, ChainResult, DaoQueries};
use crate::model::{
    GovernanceParams, Item, ProposalDetail, ProposalStatus, ProposalSummary, Tally, TokenAmount,
};

type Held<T> = Mutex<Option<oneshot::Receiver<ChainResult<T>>>>;

pub(crate) struct MockQueries {
    items: ChainResult<Vec<Item>>,
    proposals: ChainResult<Vec<ProposalSummary>>,
    details: HashMap<u64, ChainResult<ProposalDetail>>,
    params: ChainResult<GovernanceParams>,
    held_items: Held<Vec<Item>>,
    held_details: Mutex<HashMap<u64, oneshot::Receiver<ChainResult<ProposalDetail>>>>,
    calls: Mutex<Vec<String>>,
}

impl MockQueries {
    pub(crate) fn new() -> Self {
        Self {
            items: Ok(Vec::new()),
            proposals: Ok(Vec::new()),
            details: HashMap::new(),
            params: Ok(GovernanceParams {
                quorum: TokenAmount(100),
                proposal_cost: TokenAmount(10),
            }),
            held_items: Mutex::new(None),
            held_details: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn items(mut self, items: Vec<Item>) -> Self {
        self.items = Ok(items);
        self
    }

    pub(crate) fn proposals(mut self, proposals: Vec<ProposalSummary>) -> Self {
        self.proposals = Ok(proposals);
        self
    }

    pub(crate) fn fail_items(mut self, message: &str) -> Self {
        self.items = Err(ChainError::Connection(message.to_string()));
        self
    }

    pub(crate) fn fail_proposals(mut self, message: &str) -> Self {
        self.proposals = Err(ChainError::Connection(message.to_string()));
        self
    }

    pub(crate) fn detail(mut self, id: u64, detail: ProposalDetail) -> Self {
        self.details.insert(id, Ok(detail));
        self
    }

    /// `list_items` waits until the returned sender fires
    pub(crate) fn hold_items(self) -> (Self, oneshot::Sender<ChainResult<Vec<Item>>>) {
        let (tx, rx) = oneshot::channel();
        *self.held_items.lock().unwrap() = Some(rx);
        (self, tx)
    }

    /// `get_proposal(id)` waits until the returned sender fires
    pub(crate) fn hold_proposal(self, id: u64) -> (Self, oneshot::Sender<ChainResult<ProposalDetail>>) {
        let (tx, rx) = oneshot::channel();
        self.held_details.lock().unwrap().insert(id, rx);
        (self, tx)
    }

    pub(crate) fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

async fn released<T>(rx: oneshot::Receiver<ChainResult<T>>) -> ChainResult<T> {
    rx.await
        .unwrap_or_else(|_| Err(ChainError::Connection("request abandoned".to_string())))
}

#[async_trait]
impl DaoQueries for MockQueries {
    async fn list_items(&self) -> ChainResult<Vec<Item>> {
        self.record("list_items".to_string());
        let held = self.held_items.lock().unwrap().take();
        match held {
            Some(rx) => released(rx).await,
            None => self.items.clone(),
        }
    }

    async fn list_proposals(&self) -> ChainResult<Vec<ProposalSummary>> {
        self.record("list_proposals".to_string());
        self.proposals.clone()
    }

    async fn get_proposal(&self, proposal_id: u64) -> ChainResult<ProposalDetail> {
        self.record(format!("get_proposal({})", proposal_id));
        let held = self.held_details.lock().unwrap().remove(&proposal_id);
        match held {
            Some(rx) => released(rx).await,
            None => self
                .details
                .get(&proposal_id)
                .cloned()
                .unwrap_or_else(|| Err(ChainError::Query(format!("proposal {} not found", proposal_id)))),
        }
    }

    async fn governance_params(&self) -> ChainResult<GovernanceParams> {
        self.record("governance_params".to_string());
        self.params.clone()
    }
}

pub(crate) fn summary(id: u64, title: &str, status: &str) -> ProposalSummary {
    ProposalSummary {
        id,
        title: title.to_string(),
        status: ProposalStatus::from(status),
        body: format!("{} body", title),
    }
}

pub(crate) fn detail(
    id: u64,
    title: &str,
    body: &str,
    status: &str,
    action: serde_json::Value,
) -> ProposalDetail {
    ProposalDetail {
        id,
        title: title.to_string(),
        status: ProposalStatus::from(status),
        body: body.to_string(),
        action,
        yes: Tally::default(),
        no: Tally::default(),
        abstain: Tally::default(),
    }
}
