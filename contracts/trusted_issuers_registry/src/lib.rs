//! # Trusted Issuers Registry
//!
//! Tracks which issuer addresses are authorized to assert each claim topic.
//! The identity registry consults [`TrustedIssuersRegistry::is_trusted_issuer`]
//! both when a claim is added and when a claim is re-checked for validity, so
//! removing an issuer here retroactively invalidates every claim it signed.
//!
//! Issuance counting: the identity registry reports each successful claim
//! addition back through [`TrustedIssuersRegistry::record_issuance`], which is
//! gated to the single wired registry address.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Env, String, Vec,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum IssuersError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    IssuerAlreadyExists = 4,
    IssuerNotFound = 5,
    EmptyTopicList = 6,
    RegistryNotSet = 7,
}

/// An issuer authorized for a set of claim topics.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrustedIssuer {
    pub address: Address,
    pub name: String,
    pub topics: Vec<u32>,
    pub issuance_count: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Platform admin (Instance).
    Admin,
    /// Identity registry allowed to call `record_issuance` (Instance).
    IdentityRegistry,
    /// All registered issuer addresses (Instance).
    Issuers,
    /// Issuer record keyed by address (Persistent).
    Issuer(Address),
}

const DAY_IN_LEDGERS: u32 = 17_280;
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

fn bump_issuer(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn read_admin(env: &Env) -> Result<Address, IssuersError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(IssuersError::NotInitialized)
}

fn require_admin(env: &Env, caller: &Address) -> Result<(), IssuersError> {
    caller.require_auth();
    if *caller != read_admin(env)? {
        return Err(IssuersError::Unauthorized);
    }
    Ok(())
}

fn read_issuer(env: &Env, issuer: &Address) -> Result<TrustedIssuer, IssuersError> {
    let key = DataKey::Issuer(issuer.clone());
    let record: TrustedIssuer = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(IssuersError::IssuerNotFound)?;
    bump_issuer(env, &key);
    Ok(record)
}

fn write_issuer(env: &Env, record: &TrustedIssuer) {
    let key = DataKey::Issuer(record.address.clone());
    env.storage().persistent().set(&key, record);
    bump_issuer(env, &key);
}

#[contract]
pub struct TrustedIssuersRegistry;

#[contractimpl]
impl TrustedIssuersRegistry {
    /// Set the admin. Must be called exactly once after deployment.
    pub fn initialize(env: Env, admin: Address) -> Result<(), IssuersError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(IssuersError::AlreadyInitialized);
        }
        admin.require_auth();
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::Issuers, &Vec::<Address>::new(&env));
        Ok(())
    }

    /// Wire the identity registry that reports claim issuances. Admin only.
    pub fn set_identity_registry(
        env: Env,
        caller: Address,
        registry: Address,
    ) -> Result<(), IssuersError> {
        require_admin(&env, &caller)?;
        env.storage()
            .instance()
            .set(&DataKey::IdentityRegistry, &registry);
        Ok(())
    }

    /// Authorize `issuer` for `topics`. Admin only.
    pub fn add_trusted_issuer(
        env: Env,
        caller: Address,
        issuer: Address,
        name: String,
        topics: Vec<u32>,
    ) -> Result<(), IssuersError> {
        require_admin(&env, &caller)?;
        if topics.is_empty() {
            return Err(IssuersError::EmptyTopicList);
        }
        if env
            .storage()
            .persistent()
            .has(&DataKey::Issuer(issuer.clone()))
        {
            return Err(IssuersError::IssuerAlreadyExists);
        }

        write_issuer(
            &env,
            &TrustedIssuer {
                address: issuer.clone(),
                name,
                topics: topics.clone(),
                issuance_count: 0,
            },
        );

        let mut issuers: Vec<Address> = env
            .storage()
            .instance()
            .get(&DataKey::Issuers)
            .unwrap_or_else(|| Vec::new(&env));
        issuers.push_back(issuer.clone());
        env.storage().instance().set(&DataKey::Issuers, &issuers);

        env.events()
            .publish((symbol_short!("iss_add"), issuer), topics);
        Ok(())
    }

    /// Remove an issuer entirely. Admin only. Claims already signed by the
    /// issuer become invalid on the next validity check.
    pub fn remove_trusted_issuer(
        env: Env,
        caller: Address,
        issuer: Address,
    ) -> Result<(), IssuersError> {
        require_admin(&env, &caller)?;
        let key = DataKey::Issuer(issuer.clone());
        if !env.storage().persistent().has(&key) {
            return Err(IssuersError::IssuerNotFound);
        }
        env.storage().persistent().remove(&key);

        let issuers: Vec<Address> = env
            .storage()
            .instance()
            .get(&DataKey::Issuers)
            .unwrap_or_else(|| Vec::new(&env));
        if let Some(index) = issuers.iter().position(|a| a == issuer) {
            let mut issuers = issuers;
            issuers.remove(index as u32);
            env.storage().instance().set(&DataKey::Issuers, &issuers);
        }

        env.events()
            .publish((symbol_short!("iss_rem"), issuer), ());
        Ok(())
    }

    /// Replace the topic set an issuer may assert. Admin only.
    pub fn update_issuer_topics(
        env: Env,
        caller: Address,
        issuer: Address,
        topics: Vec<u32>,
    ) -> Result<(), IssuersError> {
        require_admin(&env, &caller)?;
        if topics.is_empty() {
            return Err(IssuersError::EmptyTopicList);
        }
        let mut record = read_issuer(&env, &issuer)?;
        record.topics = topics.clone();
        write_issuer(&env, &record);

        env.events()
            .publish((symbol_short!("iss_upd"), issuer), topics);
        Ok(())
    }

    /// Bump the issuance counter for `issuer`. Only the wired identity
    /// registry may call this; it is invoked once per successful `add_claim`.
    pub fn record_issuance(
        env: Env,
        registry: Address,
        issuer: Address,
    ) -> Result<(), IssuersError> {
        registry.require_auth();
        let wired: Address = env
            .storage()
            .instance()
            .get(&DataKey::IdentityRegistry)
            .ok_or(IssuersError::RegistryNotSet)?;
        if registry != wired {
            return Err(IssuersError::Unauthorized);
        }
        let mut record = read_issuer(&env, &issuer)?;
        record.issuance_count += 1;
        write_issuer(&env, &record);
        Ok(())
    }

    /// True iff `issuer` is registered and authorized for `topic_id`.
    pub fn is_trusted_issuer(env: Env, issuer: Address, topic_id: u32) -> bool {
        match read_issuer(&env, &issuer) {
            Ok(record) => record.topics.contains(&topic_id),
            Err(_) => false,
        }
    }

    pub fn get_trusted_issuers(env: Env) -> Vec<Address> {
        env.storage()
            .instance()
            .get(&DataKey::Issuers)
            .unwrap_or_else(|| Vec::new(&env))
    }

    pub fn get_issuer(env: Env, issuer: Address) -> Result<TrustedIssuer, IssuersError> {
        read_issuer(&env, &issuer)
    }

    pub fn get_admin(env: Env) -> Result<Address, IssuersError> {
        read_admin(&env)
    }
}
