//! Contract Data Model
//!
//! Items, proposals and votes as decoded from the item-dao contract's JSON
//! query responses. Nothing here is mutated after it is fetched.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// A web item held by the DAO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub contents: String,
}

/// Governance outcome of a proposal
///
/// The contract serializes the status as a bare string. Values this
/// front-end does not know about decode to [`ProposalStatus::Other`]
/// instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProposalStatus {
    Pending,
    Passed,
    Failed,
    Other(String),
}

impl From<String> for ProposalStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Pending" => ProposalStatus::Pending,
            "Passed" => ProposalStatus::Passed,
            "Failed" => ProposalStatus::Failed,
            _ => ProposalStatus::Other(value),
        }
    }
}

impl From<&str> for ProposalStatus {
    fn from(value: &str) -> Self {
        ProposalStatus::from(value.to_string())
    }
}

impl From<ProposalStatus> for String {
    fn from(status: ProposalStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProposalStatus::Pending => write!(f, "Pending"),
            ProposalStatus::Passed => write!(f, "Passed"),
            ProposalStatus::Failed => write!(f, "Failed"),
            ProposalStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Token amount (`Uint128` on chain)
///
/// Decodes from the decimal-string wire form as well as plain JSON numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct TokenAmount(pub u128);

impl From<TokenAmount> for String {
    fn from(amount: TokenAmount) -> Self {
        amount.0.to_string()
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AmountVisitor;

        impl<'de> de::Visitor<'de> for AmountVisitor {
            type Value = TokenAmount;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a token amount as a decimal string or unsigned integer")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(TokenAmount(v as u128))
            }

            fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
                Ok(TokenAmount(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse::<u128>()
                    .map(TokenAmount)
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

/// Proposal as it appears in the `list_proposals` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposalSummary {
    /// Position in the contract's proposal list
    pub id: u64,
    pub title: String,
    pub status: ProposalStatus,
    pub body: String,
}

/// Shape of one proposal on the wire; ids are implied by position
#[derive(Debug, Deserialize)]
pub(crate) struct WireProposal {
    #[serde(default)]
    title: String,
    #[serde(default = "unknown_status")]
    status: ProposalStatus,
    #[serde(default)]
    body: String,
    #[serde(default)]
    action: serde_json::Value,
    #[serde(default)]
    yes: Option<Tally>,
    #[serde(default)]
    no: Option<Tally>,
    #[serde(default)]
    abstain: Option<Tally>,
}

fn unknown_status() -> ProposalStatus {
    ProposalStatus::Other(String::new())
}

impl WireProposal {
    pub(crate) fn into_summary(self, id: u64) -> ProposalSummary {
        ProposalSummary {
            id,
            title: self.title,
            status: self.status,
            body: self.body,
        }
    }

    pub(crate) fn into_detail(self, id: u64) -> ProposalDetail {
        ProposalDetail {
            id,
            title: self.title,
            status: self.status,
            body: self.body,
            action: self.action,
            yes: self.yes.unwrap_or_default(),
            no: self.no.unwrap_or_default(),
            abstain: self.abstain.unwrap_or_default(),
        }
    }
}

/// Proposal returned by `get_proposal`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProposalDetail {
    pub id: u64,
    pub title: String,
    pub status: ProposalStatus,
    pub body: String,
    /// Opaque description of the on-chain action the proposal would execute
    pub action: serde_json::Value,
    pub yes: Tally,
    pub no: Tally,
    pub abstain: Tally,
}

impl ProposalDetail {
    /// Compact JSON form of the action, empty when the contract sent none
    pub fn action_json(&self) -> String {
        if self.action.is_null() {
            String::new()
        } else {
            self.action.to_string()
        }
    }

    /// Individual ballots, yes votes first, then no, then abstain
    pub fn votes(&self) -> Vec<Vote> {
        [
            (&self.yes, VotePosition::Yes),
            (&self.no, VotePosition::No),
            (&self.abstain, VotePosition::Abstain),
        ]
        .into_iter()
        .flat_map(|(tally, position)| tally.ballots(position))
        .collect()
    }
}

/// Vote tally for one position
///
/// Current contracts report a single total. Older deployments report the
/// individual `[address, amount]` ballots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tally {
    Total(TokenAmount),
    Ballots(Vec<(String, TokenAmount)>),
}

impl Default for Tally {
    fn default() -> Self {
        Tally::Total(TokenAmount::default())
    }
}

impl Tally {
    pub fn total(&self) -> TokenAmount {
        match self {
            Tally::Total(amount) => *amount,
            // Caps at u128::MAX
            Tally::Ballots(ballots) => TokenAmount(
                ballots
                    .iter()
                    .fold(0u128, |total, (_, amount)| total.saturating_add(amount.0)),
            ),
        }
    }

    fn ballots(&self, position: VotePosition) -> Vec<Vote> {
        match self {
            Tally::Total(_) => Vec::new(),
            Tally::Ballots(ballots) => ballots
                .iter()
                .map(|(address, amount)| Vote {
                    address: address.clone(),
                    amount: *amount,
                    position,
                })
                .collect(),
        }
    }
}

/// Position a token holder locked their tokens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotePosition {
    Yes,
    No,
    Abstain,
}

impl VotePosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            VotePosition::Yes => "yes",
            VotePosition::No => "no",
            VotePosition::Abstain => "abstain",
        }
    }
}

/// A single ballot on a proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vote {
    pub address: String,
    pub amount: TokenAmount,
    pub position: VotePosition,
}

/// DAO-wide governance parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GovernanceParams {
    /// Tokens that must participate for a vote to complete
    pub quorum: TokenAmount,
    /// Tokens that must be locked to create a proposal
    pub proposal_cost: TokenAmount,
}
