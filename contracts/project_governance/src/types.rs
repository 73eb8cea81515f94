//! Governance data structures.

use soroban_sdk::{contracttype, Address, String, Symbol, Val, Vec};

/// Voting parameters, set at initialization and adjustable only through a
/// passed proposal targeting this contract.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GovernanceConfig {
    /// Seconds between proposal creation and voting opening.
    pub voting_delay: u64,
    /// Seconds the voting window stays open.
    pub voting_period: u64,
    /// Minimum token balance required to create a proposal.
    pub proposal_threshold: i128,
    /// Quorum as a percentage of total supply (numerator over 100).
    pub quorum_numerator: u32,
    pub is_active: bool,
}

/// One call a passed proposal will make. The target contract authenticates
/// the invocation by the direct-invoker rule, so `args` must carry this
/// governance contract's address wherever the target expects a caller.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalAction {
    pub target: Address,
    pub function: Symbol,
    pub args: Vec<Val>,
}

/// Where a proposal stands. `Succeeded` and `Defeated` are computed from the
/// tally once the window closes; `Queued`, `Executed`, `Expired` and
/// `Canceled` are reached through explicit transitions.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProposalStatus {
    Pending,
    Active,
    Succeeded,
    Defeated,
    Queued,
    Executed,
    Expired,
    Canceled,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VoteChoice {
    Against,
    For,
    Abstain,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Proposal {
    pub id: u64,
    pub proposer: Address,
    pub description: String,
    pub actions: Vec<ProposalAction>,
    pub start_time: u64,
    pub end_time: u64,
    pub for_votes: i128,
    pub against_votes: i128,
    pub abstain_votes: i128,
    /// Execution timestamp set at queueing; zero until then.
    pub eta: u64,
    pub executed: bool,
    pub canceled: bool,
}

/// One ballot, kept for the record. At most one per (proposal, voter).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VoteReceipt {
    pub voter: Address,
    pub choice: VoteChoice,
    /// Voter's token balance at the moment the ballot was cast.
    pub weight: i128,
    pub reason: String,
}
