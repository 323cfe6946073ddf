//! Contract Query Functions
//!
//! Typed wrappers over smart queries against the item-dao contract. Every
//! function takes the client, the contract address and builds the query
//! message; nothing is cached between calls.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::client::{ClientProvider, ContractQuerier};
use super::error::{ChainError, ChainResult};
use crate::model::{GovernanceParams, Item, ProposalDetail, ProposalSummary, TokenAmount, WireProposal};

/// Characters allowed in the data part of a bech32 string
const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Query messages understood by the item-dao contract
///
/// Unit variants serialize as bare strings (`"list_items"`), struct
/// variants as single-key objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    ListItems,
    ListProposals,
    GetProposal { proposal_id: u64 },
    GetQuorum,
    GetProposalCost,
}

/// Validated bech32 contract address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractAddress(String);

impl ContractAddress {
    /// Validate the textual form of an address
    pub fn parse(address: &str) -> ChainResult<Self> {
        let invalid = |reason: &str| ChainError::Query(format!("invalid contract address `{}`: {}", address, reason));

        if address != address.to_lowercase() {
            return Err(invalid("must be lowercase"));
        }

        let (prefix, data) = address
            .rsplit_once('1')
            .ok_or_else(|| invalid("missing bech32 separator"))?;

        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(invalid("bad human-readable prefix"));
        }
        if data.len() < 6 {
            return Err(invalid("data part too short"));
        }
        if !data.chars().all(|c| BECH32_CHARSET.contains(c)) {
            return Err(invalid("data part has characters outside the bech32 alphabet"));
        }

        Ok(Self(address.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Run a smart query and decode the answer into `T`
pub async fn query_contract<T: DeserializeOwned>(
    client: &dyn ContractQuerier,
    contract: &ContractAddress,
    msg: &QueryMsg,
) -> ChainResult<T> {
    let query = serde_json::to_vec(msg).map_err(|e| ChainError::Query(e.to_string()))?;

    tracing::debug!(contract = %contract, query = %String::from_utf8_lossy(&query), "Smart query");

    let data = client.query_smart_raw(contract, &query).await?;

    serde_json::from_slice(&data).map_err(|e| {
        ChainError::Decode(format!("unexpected response to {}: {}", String::from_utf8_lossy(&query), e))
    })
}

/// `"list_items"`
pub async fn list_items(client: &dyn ContractQuerier, contract: &ContractAddress) -> ChainResult<Vec<Item>> {
    query_contract(client, contract, &QueryMsg::ListItems).await
}

/// `"list_proposals"`; ids are assigned by list position
pub async fn list_proposals(
    client: &dyn ContractQuerier,
    contract: &ContractAddress,
) -> ChainResult<Vec<ProposalSummary>> {
    let proposals: Vec<WireProposal> = query_contract(client, contract, &QueryMsg::ListProposals).await?;

    Ok(proposals
        .into_iter()
        .enumerate()
        .map(|(idx, p)| p.into_summary(idx as u64))
        .collect())
}

/// `{"get_proposal": {"proposal_id": N}}`
pub async fn get_proposal(
    client: &dyn ContractQuerier,
    contract: &ContractAddress,
    proposal_id: u64,
) -> ChainResult<ProposalDetail> {
    let proposal: WireProposal =
        query_contract(client, contract, &QueryMsg::GetProposal { proposal_id }).await?;

    Ok(proposal.into_detail(proposal_id))
}

/// `"get_quorum"`
pub async fn get_quorum(client: &dyn ContractQuerier, contract: &ContractAddress) -> ChainResult<TokenAmount> {
    query_contract(client, contract, &QueryMsg::GetQuorum).await
}

/// `"get_proposal_cost"`
pub async fn get_proposal_cost(
    client: &dyn ContractQuerier,
    contract: &ContractAddress,
) -> ChainResult<TokenAmount> {
    query_contract(client, contract, &QueryMsg::GetProposalCost).await
}

/// The queries page controllers depend on
#[async_trait]
pub trait DaoQueries: Send + Sync {
    async fn list_items(&self) -> ChainResult<Vec<Item>>;

    async fn list_proposals(&self) -> ChainResult<Vec<ProposalSummary>>;

    async fn get_proposal(&self, proposal_id: u64) -> ChainResult<ProposalDetail>;

    async fn governance_params(&self) -> ChainResult<GovernanceParams>;
}

/// [`DaoQueries`] against one deployed contract
pub struct ContractReader {
    provider: Arc<ClientProvider>,
    contract: ContractAddress,
}

impl ContractReader {
    pub fn new(provider: Arc<ClientProvider>, contract: ContractAddress) -> Self {
        Self { provider, contract }
    }
}

#[async_trait]
impl DaoQueries for ContractReader {
    async fn list_items(&self) -> ChainResult<Vec<Item>> {
        let client = self.provider.get().await?;
        list_items(client.as_ref(), &self.contract).await
    }

    async fn list_proposals(&self) -> ChainResult<Vec<ProposalSummary>> {
        let client = self.provider.get().await?;
        list_proposals(client.as_ref(), &self.contract).await
    }

    async fn get_proposal(&self, proposal_id: u64) -> ChainResult<ProposalDetail> {
        let client = self.provider.get().await?;
        get_proposal(client.as_ref(), &self.contract, proposal_id).await
    }

    async fn governance_params(&self) -> ChainResult<GovernanceParams> {
        let client = self.provider.get().await?;
        let (quorum, proposal_cost) = tokio::try_join!(
            get_quorum(client.as_ref(), &self.contract),
            get_proposal_cost(client.as_ref(), &self.contract),
        )?;

        Ok(GovernanceParams { quorum, proposal_cost })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::client::Connector;
    use crate::model::ProposalStatus;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const CONTRACT: &str = "juno1eu70kcgh0d2rlm0n88dgtry9wpqnerf5n2fdzt5sxm6d3vrqq3xqa5e9x8";

    /// Answers queries from a table keyed by the JSON query text
    #[derive(Default)]
    struct TableQuerier {
        answers: HashMap<String, String>,
        seen: Mutex<Vec<String>>,
    }

    impl TableQuerier {
        fn with(mut self, query: &str, answer: &str) -> Self {
            self.answers.insert(query.to_string(), answer.to_string());
            self
        }
    }

    #[async_trait]
    impl ContractQuerier for TableQuerier {
        fn chain_id(&self) -> &str {
            "testing-1"
        }

        fn moniker(&self) -> &str {
            "table-node"
        }

        async fn query_smart_raw(&self, _contract: &ContractAddress, query: &[u8]) -> ChainResult<Vec<u8>> {
            let query = String::from_utf8(query.to_vec()).unwrap();
            self.seen.lock().unwrap().push(query.clone());
            self.answers
                .get(&query)
                .map(|a| a.as_bytes().to_vec())
                .ok_or_else(|| ChainError::Query(format!("unknown query {}", query)))
        }
    }

    fn contract() -> ContractAddress {
        ContractAddress::parse(CONTRACT).unwrap()
    }

    #[test]
    fn test_query_msg_wire_form() {
        assert_eq!(serde_json::to_string(&QueryMsg::ListItems).unwrap(), r#""list_items""#);
        assert_eq!(serde_json::to_string(&QueryMsg::ListProposals).unwrap(), r#""list_proposals""#);
        assert_eq!(serde_json::to_string(&QueryMsg::GetQuorum).unwrap(), r#""get_quorum""#);
        assert_eq!(
            serde_json::to_string(&QueryMsg::GetProposal { proposal_id: 3 }).unwrap(),
            r#"{"get_proposal":{"proposal_id":3}}"#
        );
    }

    #[test]
    fn test_contract_address_validation() {
        assert!(ContractAddress::parse(CONTRACT).is_ok());
        assert!(ContractAddress::parse("").is_err());
        assert!(ContractAddress::parse("juno").is_err());
        assert!(ContractAddress::parse("juno1abc").is_err());
        assert!(ContractAddress::parse("JUNO1EU70KCGH0D2RLM0N88").is_err());
        // 'b', 'i', 'o' are not in the bech32 data alphabet
        assert!(ContractAddress::parse("juno1bbbbbbbbbb").is_err());
        assert!(matches!(ContractAddress::parse("nope"), Err(ChainError::Query(_))));
    }

    #[tokio::test]
    async fn test_list_items() {
        let querier = TableQuerier::default().with(r#""list_items""#, r#"[{"name":"a","contents":"b"}]"#);

        let items = list_items(&querier, &contract()).await.unwrap();
        assert_eq!(
            items,
            vec![Item {
                name: "a".to_string(),
                contents: "b".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_list_proposals_assigns_positional_ids() {
        let querier = TableQuerier::default().with(
            r#""list_proposals""#,
            r#"[
                {"title":"first","body":"x","status":"Passed","action":{"remove_item":{"name":"a"}},"yes":"5","no":"0","abstain":"0"},
                {"title":"second","body":"y","status":"Exploded","action":{},"yes":"0","no":"0","abstain":"0"}
            ]"#,
        );

        let proposals = list_proposals(&querier, &contract()).await.unwrap();
        assert_eq!(proposals.len(), 2);
        assert_eq!(proposals[0].id, 0);
        assert_eq!(proposals[0].status, ProposalStatus::Passed);
        assert_eq!(proposals[1].id, 1);
        assert_eq!(proposals[1].status, ProposalStatus::Other("Exploded".to_string()));
    }

    #[tokio::test]
    async fn test_get_proposal_sends_id() {
        let querier = TableQuerier::default().with(
            r#"{"get_proposal":{"proposal_id":2}}"#,
            r#"{"title":"T","body":"B","status":"Pending","action":{"type":"x"}}"#,
        );

        let detail = get_proposal(&querier, &contract(), 2).await.unwrap();
        assert_eq!(detail.id, 2);
        assert_eq!(detail.title, "T");
        assert_eq!(detail.action_json(), r#"{"type":"x"}"#);
        assert_eq!(
            *querier.seen.lock().unwrap(),
            vec![r#"{"get_proposal":{"proposal_id":2}}"#.to_string()]
        );
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_decode_error() {
        let querier = TableQuerier::default().with(r#""list_items""#, r#"{"items":"nope"}"#);

        let err = list_items(&querier, &contract()).await.unwrap_err();
        assert!(matches!(err, ChainError::Decode(_)));
    }

    #[tokio::test]
    async fn test_rejected_query_is_query_error() {
        let querier = TableQuerier::default();

        let err = get_quorum(&querier, &contract()).await.unwrap_err();
        assert!(matches!(err, ChainError::Query(_)));
    }

    struct TableConnector(Arc<TableQuerier>);

    #[async_trait]
    impl Connector for TableConnector {
        async fn connect(&self) -> ChainResult<Arc<dyn ContractQuerier>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_reader_governance_params() {
        let querier = Arc::new(
            TableQuerier::default()
                .with(r#""get_quorum""#, r#""100""#)
                .with(r#""get_proposal_cost""#, r#""7""#),
        );
        let provider = Arc::new(ClientProvider::new(TableConnector(querier)));
        let reader = ContractReader::new(Arc::clone(&provider), contract());

        let params = reader.governance_params().await.unwrap();
        assert_eq!(params.quorum, TokenAmount(100));
        assert_eq!(params.proposal_cost, TokenAmount(7));
        assert_eq!(provider.connect_attempts(), 1);
    }
}
