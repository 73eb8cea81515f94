//! # Identity Registry
//!
//! Stores per-address compliance claims and answers the one question every
//! token movement on the platform hangs on: *is this address currently
//! verified?* An address is verified iff it holds a valid claim for every
//! topic the [`claim_topics_registry`] currently requires, where *valid*
//! means active, not revoked, not expired, and signed by an issuer the
//! [`trusted_issuers_registry`] still trusts for that topic.
//!
//! Both registries are injected as handles at initialization; there is no
//! ambient global to reach for.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, Address, Bytes, Env, Vec,
};

mod storage;
mod types;


use claim_topics_registry::ClaimTopicsRegistryClient;
use trusted_issuers_registry::TrustedIssuersRegistryClient;

use storage::{bump_instance, read_claim, write_claim, DataKey};
pub use types::Claim;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum IdentityError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    /// Caller is not trusted for the claim topic, or not issuer/admin.
    Unauthorized = 3,
    ClaimNotFound = 4,
    AlreadyRevoked = 5,
    /// Expiry must be in the future (or zero for no expiry).
    InvalidExpiry = 6,
}

fn read_admin(env: &Env) -> Result<Address, IdentityError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(IdentityError::NotInitialized)
}

fn topics_client(env: &Env) -> Result<ClaimTopicsRegistryClient, IdentityError> {
    let addr: Address = env
        .storage()
        .instance()
        .get(&DataKey::TopicsRegistry)
        .ok_or(IdentityError::NotInitialized)?;
    Ok(ClaimTopicsRegistryClient::new(env, &addr))
}

fn issuers_client(env: &Env) -> Result<TrustedIssuersRegistryClient, IdentityError> {
    let addr: Address = env
        .storage()
        .instance()
        .get(&DataKey::IssuersRegistry)
        .ok_or(IdentityError::NotInitialized)?;
    Ok(TrustedIssuersRegistryClient::new(env, &addr))
}

/// Claim validity, re-checked on every read: a claim issued by a since-removed
/// issuer is invalid even though the stored record is untouched.
fn claim_is_valid(env: &Env, claim: &Claim) -> bool {
    if !claim.active || claim.revoked {
        return false;
    }
    if claim.expires_at != 0 && env.ledger().timestamp() >= claim.expires_at {
        return false;
    }
    match issuers_client(env) {
        Ok(client) => client.is_trusted_issuer(&claim.issuer, &claim.topic_id),
        Err(_) => false,
    }
}

fn verified(env: &Env, identity: &Address) -> Result<bool, IdentityError> {
    let required = topics_client(env)?.get_claim_topics();
    for topic_id in required.iter() {
        match read_claim(env, identity, topic_id) {
            Some(claim) if claim_is_valid(env, &claim) => {}
            _ => return Ok(false),
        }
    }
    Ok(true)
}

#[contract]
pub struct IdentityRegistry;

#[contractimpl]
impl IdentityRegistry {
    /// Wire the registry to its collaborators. Must be called exactly once.
    pub fn initialize(
        env: Env,
        admin: Address,
        claim_topics_registry: Address,
        trusted_issuers_registry: Address,
    ) -> Result<(), IdentityError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(IdentityError::AlreadyInitialized);
        }
        admin.require_auth();
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::TopicsRegistry, &claim_topics_registry);
        env.storage()
            .instance()
            .set(&DataKey::IssuersRegistry, &trusted_issuers_registry);
        bump_instance(&env);
        Ok(())
    }

    /// Assert a claim for `identity`.
    ///
    /// `issuer` must be currently trusted for `topic_id`. A prior claim for
    /// the same `(identity, topic_id)` pair is overwritten, including a
    /// revoked one, which is how a participant regains verification after a
    /// revocation.
    pub fn add_claim(
        env: Env,
        issuer: Address,
        identity: Address,
        topic_id: u32,
        data: Bytes,
        expires_at: u64,
    ) -> Result<(), IdentityError> {
        issuer.require_auth();

        let issuers = issuers_client(&env)?;
        if !issuers.is_trusted_issuer(&issuer, &topic_id) {
            return Err(IdentityError::Unauthorized);
        }

        let now = env.ledger().timestamp();
        if expires_at != 0 && expires_at <= now {
            return Err(IdentityError::InvalidExpiry);
        }

        write_claim(
            &env,
            &Claim {
                identity: identity.clone(),
                topic_id,
                issuer: issuer.clone(),
                data,
                issued_at: now,
                expires_at,
                revoked: false,
                active: true,
            },
        );

        issuers.record_issuance(&env.current_contract_address(), &issuer);

        env.events()
            .publish((symbol_short!("clm_add"), identity, topic_id), issuer);
        Ok(())
    }

    /// Revoke a claim. Only the claim's issuer or the registry admin may do
    /// this. The record is flagged, never removed.
    pub fn revoke_claim(
        env: Env,
        caller: Address,
        identity: Address,
        topic_id: u32,
    ) -> Result<(), IdentityError> {
        caller.require_auth();

        let mut claim =
            read_claim(&env, &identity, topic_id).ok_or(IdentityError::ClaimNotFound)?;
        if caller != claim.issuer && caller != read_admin(&env)? {
            return Err(IdentityError::Unauthorized);
        }
        if claim.revoked {
            return Err(IdentityError::AlreadyRevoked);
        }
        claim.revoked = true;
        write_claim(&env, &claim);

        env.events()
            .publish((symbol_short!("clm_rev"), identity, topic_id), caller);
        Ok(())
    }

    pub fn get_claim(env: Env, identity: Address, topic_id: u32) -> Result<Claim, IdentityError> {
        read_claim(&env, &identity, topic_id).ok_or(IdentityError::ClaimNotFound)
    }

    /// True iff the stored claim for `(identity, topic_id)` is currently valid.
    pub fn is_claim_valid(env: Env, identity: Address, topic_id: u32) -> bool {
        match read_claim(&env, &identity, topic_id) {
            Some(claim) => claim_is_valid(&env, &claim),
            None => false,
        }
    }

    /// True iff `identity` holds a valid claim for every required topic.
    pub fn is_verified(env: Env, identity: Address) -> Result<bool, IdentityError> {
        verified(&env, &identity)
    }

    /// One independent verification boolean per address. A failure on one
    /// address never aborts the batch.
    pub fn batch_check_verification(
        env: Env,
        identities: Vec<Address>,
    ) -> Result<Vec<bool>, IdentityError> {
        let mut results = Vec::new(&env);
        for identity in identities.iter() {
            results.push_back(verified(&env, &identity)?);
        }
        Ok(results)
    }

    pub fn get_admin(env: Env) -> Result<Address, IdentityError> {
        read_admin(&env)
    }
}
