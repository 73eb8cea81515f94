//! # Claim Topics Registry
//!
//! Enumerates the claim topics every participant must satisfy before the
//! identity registry will report them as verified. Topics are small integer
//! identifiers (e.g. `1` = KYC approved, `2` = accreditation) chosen by the
//! platform admin; the set is read by [`identity_registry`] on every
//! verification check, so additions and removals take effect immediately.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Env, String, Vec,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum TopicsError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    TopicAlreadyExists = 4,
    TopicNotFound = 5,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Platform admin allowed to mutate the topic set (Instance).
    Admin,
    /// Ordered list of required topic ids (Instance).
    Topics,
    /// Human-readable label for a topic id (Instance).
    TopicName(u32),
}

fn read_admin(env: &Env) -> Result<Address, TopicsError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(TopicsError::NotInitialized)
}

fn require_admin(env: &Env, caller: &Address) -> Result<(), TopicsError> {
    caller.require_auth();
    if *caller != read_admin(env)? {
        return Err(TopicsError::Unauthorized);
    }
    Ok(())
}

fn read_topics(env: &Env) -> Vec<u32> {
    env.storage()
        .instance()
        .get(&DataKey::Topics)
        .unwrap_or_else(|| Vec::new(env))
}

#[contract]
pub struct ClaimTopicsRegistry;

#[contractimpl]
impl ClaimTopicsRegistry {
    /// Set the admin. Must be called exactly once after deployment.
    pub fn initialize(env: Env, admin: Address) -> Result<(), TopicsError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(TopicsError::AlreadyInitialized);
        }
        admin.require_auth();
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::Topics, &Vec::<u32>::new(&env));
        Ok(())
    }

    /// Add a required claim topic. Admin only.
    pub fn add_claim_topic(
        env: Env,
        caller: Address,
        topic_id: u32,
        name: String,
    ) -> Result<(), TopicsError> {
        require_admin(&env, &caller)?;

        let mut topics = read_topics(&env);
        if topics.contains(&topic_id) {
            return Err(TopicsError::TopicAlreadyExists);
        }
        topics.push_back(topic_id);
        env.storage().instance().set(&DataKey::Topics, &topics);
        env.storage()
            .instance()
            .set(&DataKey::TopicName(topic_id), &name);

        env.events()
            .publish((symbol_short!("tpc_add"), topic_id), name);
        Ok(())
    }

    /// Remove a required claim topic. Admin only. The label is kept for
    /// audit trails; only the requirement is dropped.
    pub fn remove_claim_topic(env: Env, caller: Address, topic_id: u32) -> Result<(), TopicsError> {
        require_admin(&env, &caller)?;

        let topics = read_topics(&env);
        let index = topics
            .iter()
            .position(|t| t == topic_id)
            .ok_or(TopicsError::TopicNotFound)?;
        let mut topics = topics;
        topics.remove(index as u32);
        env.storage().instance().set(&DataKey::Topics, &topics);

        env.events()
            .publish((symbol_short!("tpc_rem"), topic_id), ());
        Ok(())
    }

    /// All topic ids a participant currently needs a valid claim for.
    pub fn get_claim_topics(env: Env) -> Vec<u32> {
        read_topics(&env)
    }

    pub fn has_claim_topic(env: Env, topic_id: u32) -> bool {
        read_topics(&env).contains(&topic_id)
    }

    pub fn get_topic_name(env: Env, topic_id: u32) -> Result<String, TopicsError> {
        env.storage()
            .instance()
            .get(&DataKey::TopicName(topic_id))
            .ok_or(TopicsError::TopicNotFound)
    }

    pub fn get_admin(env: Env) -> Result<Address, TopicsError> {
        read_admin(&env)
    }
}
