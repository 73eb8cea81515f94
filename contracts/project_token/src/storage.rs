//! Balance, allowance and metadata storage.
//!
//! Balances and allowances live in the persistent tier; everything written
//! once at initialization (metadata, cap, registry handle) sits in instance
//! storage alongside the supply counters.

use soroban_sdk::{contracttype, Address, Env};

const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Sponsor admin (Instance).
    Admin,
    /// Governance contract, wired once by the factory (Instance).
    Governance,
    /// Project treasury contract, wired once by the factory (Instance).
    Treasury,
    /// Identity registry handle (Instance).
    IdentityRegistry,
    /// Token metadata (Instance).
    Name,
    Symbol,
    Decimals,
    /// Supply accounting (Instance).
    SupplyCap,
    Minted,
    Burned,
    /// Global transfer switch (Instance).
    TransfersEnabled,
    /// Authorized minter flag (Persistent).
    Minter(Address),
    /// Holder balance (Persistent).
    Balance(Address),
    /// Allowance keyed by (owner, spender) (Persistent).
    Allowance(Address, Address),
    /// Snapshot counter; ids start at 1 (Instance).
    SnapshotCount,
    /// Holder balance as of a snapshot id, written on the first balance
    /// change after that snapshot was taken (Persistent).
    BalanceAt(Address, u32),
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

pub fn read_balance(env: &Env, addr: &Address) -> i128 {
    let key = DataKey::Balance(addr.clone());
    let balance: Option<i128> = env.storage().persistent().get(&key);
    match balance {
        Some(b) => {
            bump_persistent(env, &key);
            b
        }
        None => 0,
    }
}

pub fn write_balance(env: &Env, addr: &Address, amount: i128) {
    let key = DataKey::Balance(addr.clone());
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

pub fn read_allowance(env: &Env, owner: &Address, spender: &Address) -> i128 {
    let key = DataKey::Allowance(owner.clone(), spender.clone());
    env.storage().persistent().get(&key).unwrap_or(0)
}

pub fn write_allowance(env: &Env, owner: &Address, spender: &Address, amount: i128) {
    let key = DataKey::Allowance(owner.clone(), spender.clone());
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

pub fn is_minter(env: &Env, addr: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Minter(addr.clone()))
        .unwrap_or(false)
}

pub fn write_minter(env: &Env, addr: &Address, flag: bool) {
    let key = DataKey::Minter(addr.clone());
    env.storage().persistent().set(&key, &flag);
    bump_persistent(env, &key);
}

pub fn read_snapshot_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::SnapshotCount)
        .unwrap_or(0)
}

pub fn write_snapshot_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::SnapshotCount, &count);
}

/// Record `addr`'s current balance under the latest snapshot id, right
/// before the balance changes. A no-op when no snapshot exists yet or one
/// is already recorded for this id.
pub fn checkpoint_balance(env: &Env, addr: &Address) {
    let current = read_snapshot_count(env);
    if current == 0 {
        return;
    }
    let key = DataKey::BalanceAt(addr.clone(), current);
    if env.storage().persistent().has(&key) {
        return;
    }
    env.storage().persistent().set(&key, &read_balance(env, addr));
    bump_persistent(env, &key);
}

/// Balance `addr` held when snapshot `id` was taken: the first checkpoint
/// recorded at or after `id`. With none recorded the balance has not
/// changed since, so the live value stands.
pub fn read_balance_at(env: &Env, addr: &Address, id: u32) -> i128 {
    let current = read_snapshot_count(env);
    for snap in id..=current {
        let key = DataKey::BalanceAt(addr.clone(), snap);
        if let Some(balance) = env.storage().persistent().get(&key) {
            bump_persistent(env, &key);
            return balance;
        }
    }
    read_balance(env, addr)
}

pub fn read_minted(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::Minted).unwrap_or(0)
}

pub fn read_burned(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::Burned).unwrap_or(0)
}

pub fn transfers_enabled(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::TransfersEnabled)
        .unwrap_or(false)
}
