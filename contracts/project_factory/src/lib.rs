//! # Project Factory
//!
//! Deploys a project's four contracts (token, offering, treasury,
//! governance) as one atomic bundle and wires their cross-references
//! before the call returns. Any precondition failure reverts the whole
//! call, so a half-linked bundle is never reachable on the ledger.
//!
//! The factory holds the wasm hashes of the bundle contracts; the platform
//! admin uploads the code and hands the hashes over once at bootstrap.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Bytes, BytesN,
    Env, String, Vec,
};

#[cfg(test)]
mod test;

use platform_registry::PlatformRegistryClient;
use platform_treasury::{FeeCategory, PlatformTreasuryClient};
use project_governance::ProjectGovernanceClient;
use project_offering::{OfferingTerms, ProjectOfferingClient};
use project_token::ProjectTokenClient;
use project_treasury::ProjectTreasuryClient;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum FactoryError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    /// Bundle wasm hashes have not been handed to the factory yet.
    WasmHashesNotSet = 4,
    /// Caller is not an active, registered SPV.
    NotAuthorizedSpv = 5,
    PlatformPaused = 6,
    EmergencyActive = 7,
    InvalidParams = 8,
    /// Payment below the platform's listing fee.
    InsufficientFee = 9,
    ProjectNotFound = 10,
    ProjectAlreadyInactive = 11,
}

/// Governance defaults applied to every bundle. The sponsor can adjust them
/// later through governance itself.
const DEFAULT_VOTING_DELAY: u64 = 24 * 60 * 60;
const DEFAULT_VOTING_PERIOD: u64 = 7 * 24 * 60 * 60;
const DEFAULT_QUORUM_NUMERATOR: u32 = 10;

const TOKEN_DECIMALS: u32 = 7;

const DAY_IN_LEDGERS: u32 = 17_280;
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

/// One deployed bundle. Ids are assigned monotonically from 1.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectRecord {
    pub id: u64,
    pub creator: Address,
    pub name: String,
    pub symbol: String,
    pub token: Address,
    pub offering: Address,
    pub treasury: Address,
    pub governance: Address,
    pub is_active: bool,
    pub created_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WasmHashes {
    pub token: BytesN<32>,
    pub offering: BytesN<32>,
    pub treasury: BytesN<32>,
    pub governance: BytesN<32>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Admin,
    PlatformRegistry,
    PlatformTreasury,
    IdentityRegistry,
    WasmHashes,
    /// Number of projects created so far (Instance).
    ProjectCount,
    /// Project record keyed by id (Persistent).
    Project(u64),
}

fn read_admin(env: &Env) -> Result<Address, FactoryError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(FactoryError::NotInitialized)
}

fn require_admin(env: &Env, caller: &Address) -> Result<(), FactoryError> {
    caller.require_auth();
    if *caller != read_admin(env)? {
        return Err(FactoryError::Unauthorized);
    }
    Ok(())
}

fn read_handle(env: &Env, key: &DataKey) -> Result<Address, FactoryError> {
    env.storage()
        .instance()
        .get(key)
        .ok_or(FactoryError::NotInitialized)
}

fn read_project(env: &Env, id: u64) -> Result<ProjectRecord, FactoryError> {
    env.storage()
        .persistent()
        .get(&DataKey::Project(id))
        .ok_or(FactoryError::ProjectNotFound)
}

fn write_project(env: &Env, record: &ProjectRecord) {
    let key = DataKey::Project(record.id);
    env.storage().persistent().set(&key, record);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Deterministic per-contract salt: hash of (project id, role index).
fn bundle_salt(env: &Env, id: u64, role: u8) -> BytesN<32> {
    let mut preimage = Bytes::new(env);
    preimage.extend_from_array(&id.to_be_bytes());
    preimage.push_back(role);
    env.crypto().sha256(&preimage).to_bytes()
}

fn deploy(env: &Env, hash: &BytesN<32>, id: u64, role: u8) -> Address {
    env.deployer()
        .with_current_contract(bundle_salt(env, id, role))
        .deploy_v2(hash.clone(), ())
}

#[contract]
pub struct ProjectFactory;

#[contractimpl]
impl ProjectFactory {
    pub fn initialize(
        env: Env,
        admin: Address,
        platform_registry: Address,
        platform_treasury: Address,
        identity_registry: Address,
    ) -> Result<(), FactoryError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(FactoryError::AlreadyInitialized);
        }
        admin.require_auth();
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::PlatformRegistry, &platform_registry);
        env.storage()
            .instance()
            .set(&DataKey::PlatformTreasury, &platform_treasury);
        env.storage()
            .instance()
            .set(&DataKey::IdentityRegistry, &identity_registry);
        env.storage().instance().set(&DataKey::ProjectCount, &0u64);
        Ok(())
    }

    /// Hand the bundle wasm hashes to the factory. Admin only; repeatable
    /// so the platform can roll out new bundle code.
    pub fn set_wasm_hashes(
        env: Env,
        caller: Address,
        hashes: WasmHashes,
    ) -> Result<(), FactoryError> {
        require_admin(&env, &caller)?;
        env.storage().instance().set(&DataKey::WasmHashes, &hashes);
        Ok(())
    }

    /// Deploy and wire one project bundle. The sponsor pays the listing fee
    /// up front; any overpayment is kept as fee, not returned.
    #[allow(clippy::too_many_arguments)]
    pub fn create_project(
        env: Env,
        sponsor: Address,
        name: String,
        symbol: String,
        total_supply: i128,
        token_price: i128,
        soft_cap: i128,
        start_time: u64,
        end_time: u64,
        fee_paid: i128,
    ) -> Result<u64, FactoryError> {
        sponsor.require_auth();

        let hashes: WasmHashes = env
            .storage()
            .instance()
            .get(&DataKey::WasmHashes)
            .ok_or(FactoryError::WasmHashesNotSet)?;

        let registry_addr = read_handle(&env, &DataKey::PlatformRegistry)?;
        let registry = PlatformRegistryClient::new(&env, &registry_addr);
        if registry.is_paused() {
            return Err(FactoryError::PlatformPaused);
        }
        if registry.is_emergency() {
            return Err(FactoryError::EmergencyActive);
        }
        if !registry.is_spv_authorized(&sponsor) {
            return Err(FactoryError::NotAuthorizedSpv);
        }

        if total_supply <= 0 || token_price <= 0 {
            return Err(FactoryError::InvalidParams);
        }
        let hard_cap = total_supply * token_price;
        if soft_cap <= 0 || soft_cap > hard_cap {
            return Err(FactoryError::InvalidParams);
        }
        if start_time >= end_time || end_time <= env.ledger().timestamp() {
            return Err(FactoryError::InvalidParams);
        }

        let config = registry.get_config();
        if fee_paid < config.listing_fee {
            return Err(FactoryError::InsufficientFee);
        }
        let platform_treasury = read_handle(&env, &DataKey::PlatformTreasury)?;
        PlatformTreasuryClient::new(&env, &platform_treasury).deposit_fee(
            &sponsor,
            &FeeCategory::Listing,
            &fee_paid,
        );

        let id: u64 = env
            .storage()
            .instance()
            .get(&DataKey::ProjectCount)
            .unwrap_or(0)
            + 1;

        let token = deploy(&env, &hashes.token, id, 0);
        let offering = deploy(&env, &hashes.offering, id, 1);
        let treasury = deploy(&env, &hashes.treasury, id, 2);
        let governance = deploy(&env, &hashes.governance, id, 3);

        let identity_registry = read_handle(&env, &DataKey::IdentityRegistry)?;

        let token_client = ProjectTokenClient::new(&env, &token);
        token_client.initialize(
            &sponsor,
            &name,
            &symbol,
            &TOKEN_DECIMALS,
            &total_supply,
            &identity_registry,
        );
        token_client.add_minter(&sponsor, &offering);
        token_client.set_governance(&sponsor, &governance);
        token_client.set_treasury(&sponsor, &treasury);

        ProjectTreasuryClient::new(&env, &treasury).initialize(
            &sponsor,
            &token,
            &config.payment_token,
            &registry_addr,
            &platform_treasury,
            // Emergency rescues are capped at a tenth of the raise ceiling.
            &(hard_cap / 10).max(1),
        );
        let treasury_client = ProjectTreasuryClient::new(&env, &treasury);
        treasury_client.set_offering(&sponsor, &offering);
        treasury_client.set_governance(&sponsor, &governance);

        ProjectOfferingClient::new(&env, &offering).initialize(
            &sponsor,
            &registry_addr,
            &identity_registry,
            &token,
            &treasury,
            &OfferingTerms {
                payment_token: config.payment_token.clone(),
                token_price,
                total_supply,
                soft_cap,
                hard_cap,
                start_time,
                end_time,
            },
        );

        ProjectGovernanceClient::new(&env, &governance).initialize(
            &sponsor,
            &token,
            &DEFAULT_VOTING_DELAY,
            &DEFAULT_VOTING_PERIOD,
            // Proposal threshold defaults to 1% of supply.
            &(total_supply / 100).max(1),
            &DEFAULT_QUORUM_NUMERATOR,
        );

        registry.record_project_created(&env.current_contract_address(), &sponsor);

        write_project(
            &env,
            &ProjectRecord {
                id,
                creator: sponsor.clone(),
                name,
                symbol,
                token,
                offering,
                treasury,
                governance,
                is_active: true,
                created_at: env.ledger().timestamp(),
            },
        );
        env.storage().instance().set(&DataKey::ProjectCount, &id);

        env.events().publish((symbol_short!("prj_new"), sponsor), id);
        Ok(id)
    }

    /// Retire a project from the platform listing. The bundle contracts
    /// keep running; this only flips the registry flag.
    pub fn deactivate_project(env: Env, caller: Address, id: u64) -> Result<(), FactoryError> {
        caller.require_auth();
        let mut record = read_project(&env, id)?;
        if caller != read_admin(&env)? && caller != record.creator {
            return Err(FactoryError::Unauthorized);
        }
        if !record.is_active {
            return Err(FactoryError::ProjectAlreadyInactive);
        }
        record.is_active = false;
        write_project(&env, &record);

        env.events().publish((symbol_short!("prj_off"), id), ());
        Ok(())
    }

    // ── Read side ────────────────────────────────────────────────────

    pub fn get_project(env: Env, id: u64) -> Result<ProjectRecord, FactoryError> {
        read_project(&env, id)
    }

    pub fn get_project_count(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::ProjectCount)
            .unwrap_or(0)
    }

    /// Ids of every project, oldest first.
    pub fn get_project_ids(env: Env) -> Vec<u64> {
        let count: u64 = env
            .storage()
            .instance()
            .get(&DataKey::ProjectCount)
            .unwrap_or(0);
        let mut ids = Vec::new(&env);
        for id in 1..=count {
            ids.push_back(id);
        }
        ids
    }

    /// Ids of every project created by `creator`, oldest first.
    pub fn get_projects_by_creator(env: Env, creator: Address) -> Vec<u64> {
        let count: u64 = env
            .storage()
            .instance()
            .get(&DataKey::ProjectCount)
            .unwrap_or(0);
        let mut ids = Vec::new(&env);
        for id in 1..=count {
            if let Ok(record) = read_project(&env, id) {
                if record.creator == creator {
                    ids.push_back(id);
                }
            }
        }
        ids
    }

    pub fn get_admin(env: Env) -> Result<Address, FactoryError> {
        read_admin(&env)
    }
}
