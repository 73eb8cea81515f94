//! Typed helpers over the registry's two storage tiers.
//!
//! Instance tier holds the admin and the injected registry handles; the
//! persistent tier holds one [`Claim`] entry per `(identity, topic_id)` pair
//! with the usual TTL bumps.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::Claim;

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Registry admin (Instance).
    Admin,
    /// Claim topics registry handle (Instance).
    TopicsRegistry,
    /// Trusted issuers registry handle (Instance).
    IssuersRegistry,
    /// Claim keyed by `(identity, topic_id)` (Persistent).
    Claim(Address, u32),
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

pub fn read_claim(env: &Env, identity: &Address, topic_id: u32) -> Option<Claim> {
    let key = DataKey::Claim(identity.clone(), topic_id);
    let claim: Option<Claim> = env.storage().persistent().get(&key);
    if claim.is_some() {
        bump_persistent(env, &key);
    }
    claim
}

pub fn write_claim(env: &Env, claim: &Claim) {
    let key = DataKey::Claim(claim.identity.clone(), claim.topic_id);
    env.storage().persistent().set(&key, claim);
    bump_persistent(env, &key);
}
