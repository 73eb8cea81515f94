//! Storage helpers, following the config/state split from `types`.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{InvestorPosition, OfferingConfig, OfferingState};
use crate::OfferingError;

const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Immutable round parameters (Instance).
    Config,
    /// Mutable round state (Instance).
    State,
    /// Collaborator handles (Instance).
    PlatformRegistry,
    IdentityRegistry,
    Token,
    Treasury,
    /// Investor position keyed by address (Persistent).
    Position(Address),
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

pub fn read_config(env: &Env) -> Result<OfferingConfig, OfferingError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(OfferingError::NotInitialized)
}

pub fn read_state(env: &Env) -> Result<OfferingState, OfferingError> {
    env.storage()
        .instance()
        .get(&DataKey::State)
        .ok_or(OfferingError::NotInitialized)
}

pub fn write_state(env: &Env, state: &OfferingState) {
    env.storage().instance().set(&DataKey::State, state);
    bump_instance(env);
}

pub fn read_position(env: &Env, investor: &Address) -> InvestorPosition {
    let key = DataKey::Position(investor.clone());
    let position: Option<InvestorPosition> = env.storage().persistent().get(&key);
    match position {
        Some(p) => {
            bump_persistent(env, &key);
            p
        }
        None => InvestorPosition::empty(),
    }
}

pub fn write_position(env: &Env, investor: &Address, position: &InvestorPosition) {
    let key = DataKey::Position(investor.clone());
    env.storage().persistent().set(&key, position);
    bump_persistent(env, &key);
}

pub fn read_handle(env: &Env, key: &DataKey) -> Result<Address, OfferingError> {
    env.storage()
        .instance()
        .get(key)
        .ok_or(OfferingError::NotInitialized)
}
