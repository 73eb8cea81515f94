//! Storage keys and typed accessors.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{InvestorRecord, PlatformConfig, SpvRecord};
use crate::RegistryError;

const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Platform admin (Instance).
    Admin,
    /// Config singleton (Instance).
    Config,
    /// Operator flag per address (Persistent).
    Operator(Address),
    /// Authorized factory flag per address (Persistent).
    Factory(Address),
    /// SPV record keyed by address (Persistent).
    Spv(Address),
    /// Investor record keyed by address (Persistent).
    Investor(Address),
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

pub fn read_admin(env: &Env) -> Result<Address, RegistryError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(RegistryError::NotInitialized)
}

pub fn read_config(env: &Env) -> Result<PlatformConfig, RegistryError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(RegistryError::NotInitialized)
}

pub fn write_config(env: &Env, config: &PlatformConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn is_operator(env: &Env, addr: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Operator(addr.clone()))
        .unwrap_or(false)
}

pub fn write_operator(env: &Env, addr: &Address, flag: bool) {
    let key = DataKey::Operator(addr.clone());
    env.storage().persistent().set(&key, &flag);
    bump_persistent(env, &key);
}

pub fn is_factory(env: &Env, addr: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Factory(addr.clone()))
        .unwrap_or(false)
}

pub fn write_factory(env: &Env, addr: &Address, flag: bool) {
    let key = DataKey::Factory(addr.clone());
    env.storage().persistent().set(&key, &flag);
    bump_persistent(env, &key);
}

pub fn read_spv(env: &Env, addr: &Address) -> Option<SpvRecord> {
    let key = DataKey::Spv(addr.clone());
    let record: Option<SpvRecord> = env.storage().persistent().get(&key);
    if record.is_some() {
        bump_persistent(env, &key);
    }
    record
}

pub fn write_spv(env: &Env, record: &SpvRecord) {
    let key = DataKey::Spv(record.address.clone());
    env.storage().persistent().set(&key, record);
    bump_persistent(env, &key);
}

pub fn read_investor(env: &Env, addr: &Address) -> Option<InvestorRecord> {
    let key = DataKey::Investor(addr.clone());
    let record: Option<InvestorRecord> = env.storage().persistent().get(&key);
    if record.is_some() {
        bump_persistent(env, &key);
    }
    record
}

pub fn write_investor(env: &Env, record: &InvestorRecord) {
    let key = DataKey::Investor(record.address.clone());
    env.storage().persistent().set(&key, record);
    bump_persistent(env, &key);
}
