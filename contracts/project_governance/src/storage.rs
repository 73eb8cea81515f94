//! Storage helpers. Config and the proposal counter live in instance
//! storage; proposals and ballots are persistent, keyed by id.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{GovernanceConfig, Proposal, VoteReceipt};
use crate::GovernanceError;

const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Project sponsor, the only address that may retire governance (Instance).
    Sponsor,
    /// Project token whose balances weigh votes (Instance).
    Token,
    /// Voting parameters (Instance).
    Config,
    /// Next proposal id (Instance).
    ProposalCount,
    /// Proposal record keyed by id (Persistent).
    Proposal(u64),
    /// Ballot keyed by (proposal, voter) (Persistent).
    Receipt(u64, Address),
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn read_config(env: &Env) -> Result<GovernanceConfig, GovernanceError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(GovernanceError::NotInitialized)
}

pub fn write_config(env: &Env, config: &GovernanceConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn read_handle(env: &Env, key: &DataKey) -> Result<Address, GovernanceError> {
    env.storage()
        .instance()
        .get(key)
        .ok_or(GovernanceError::NotInitialized)
}

pub fn read_proposal(env: &Env, id: u64) -> Result<Proposal, GovernanceError> {
    env.storage()
        .persistent()
        .get(&DataKey::Proposal(id))
        .ok_or(GovernanceError::ProposalNotFound)
}

pub fn write_proposal(env: &Env, proposal: &Proposal) {
    let key = DataKey::Proposal(proposal.id);
    env.storage().persistent().set(&key, proposal);
    bump_persistent(env, &key);
}

pub fn read_receipt(env: &Env, id: u64, voter: &Address) -> Option<VoteReceipt> {
    env.storage()
        .persistent()
        .get(&DataKey::Receipt(id, voter.clone()))
}

pub fn write_receipt(env: &Env, id: u64, receipt: &VoteReceipt) {
    let key = DataKey::Receipt(id, receipt.voter.clone());
    env.storage().persistent().set(&key, receipt);
    bump_persistent(env, &key);
}

pub fn next_proposal_id(env: &Env) -> u64 {
    let id: u64 = env
        .storage()
        .instance()
        .get(&DataKey::ProposalCount)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::ProposalCount, &(id + 1));
    // Ids run from 1 so that 0 never names a proposal.
    id + 1
}

pub fn proposal_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ProposalCount)
        .unwrap_or(0)
}
