//! # Platform Registry
//!
//! Root trust anchor for the platform: the config singleton, the SPV and
//! investor authorization lists, factory authorization, and the two kill
//! switches. Every custody contract holds a handle to this registry and asks
//! it before acting.
//!
//! Authorization is layered: `is_spv_authorized` / `is_investor_authorized`
//! require the raw record flag AND `platform_active` AND `!emergency_mode`,
//! so flipping either switch instantly gates the whole platform without
//! touching individual records.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, Address, Env, String,
};

mod storage;
mod types;


use storage::{
    bump_instance, is_factory, is_operator, read_admin, read_config, read_investor, read_spv,
    write_config, write_factory, write_investor, write_operator, write_spv, DataKey,
};
pub use types::{InvestorRecord, PlatformConfig, SpvRecord};

/// Hard ceiling on the platform's management fee: 10%.
pub const MAX_MANAGEMENT_FEE_BPS: u32 = 1_000;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum RegistryError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    SpvNotFound = 4,
    SpvAlreadyActive = 5,
    SpvNotActive = 6,
    InvestorNotFound = 7,
    InvalidFeeRate = 8,
    InvalidInvestmentBounds = 9,
    PlatformPaused = 10,
    AlreadyPaused = 11,
    NotPaused = 12,
    EmergencyActive = 13,
    EmergencyAlreadyActive = 14,
    EmergencyNotActive = 15,
}

fn require_admin(env: &Env, caller: &Address) -> Result<(), RegistryError> {
    caller.require_auth();
    if *caller != read_admin(env)? {
        return Err(RegistryError::Unauthorized);
    }
    Ok(())
}

fn require_operator(env: &Env, caller: &Address) -> Result<(), RegistryError> {
    caller.require_auth();
    if *caller == read_admin(env)? || is_operator(env, caller) {
        return Ok(());
    }
    Err(RegistryError::Unauthorized)
}

/// Gate shared by every routine mutating entry point: both switches must be
/// in their normal position.
fn require_operational(env: &Env) -> Result<(), RegistryError> {
    let config = read_config(env)?;
    if !config.platform_active {
        return Err(RegistryError::PlatformPaused);
    }
    if config.emergency_mode {
        return Err(RegistryError::EmergencyActive);
    }
    Ok(())
}

fn validate_bounds(
    management_fee_rate_bps: u32,
    min_investment: i128,
    max_investment: i128,
) -> Result<(), RegistryError> {
    if management_fee_rate_bps > MAX_MANAGEMENT_FEE_BPS {
        return Err(RegistryError::InvalidFeeRate);
    }
    if min_investment <= 0 || min_investment > max_investment {
        return Err(RegistryError::InvalidInvestmentBounds);
    }
    Ok(())
}

#[contract]
pub struct PlatformRegistry;

#[contractimpl]
impl PlatformRegistry {
    /// Bootstrap the registry with its admin and initial config.
    pub fn initialize(
        env: Env,
        admin: Address,
        payment_token: Address,
        listing_fee: i128,
        management_fee_rate_bps: u32,
        min_investment: i128,
        max_investment: i128,
    ) -> Result<(), RegistryError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(RegistryError::AlreadyInitialized);
        }
        admin.require_auth();
        validate_bounds(management_fee_rate_bps, min_investment, max_investment)?;

        env.storage().instance().set(&DataKey::Admin, &admin);
        write_config(
            &env,
            &PlatformConfig {
                payment_token,
                listing_fee,
                management_fee_rate_bps,
                min_investment,
                max_investment,
                platform_active: true,
                emergency_mode: false,
                emergency_activated_at: 0,
            },
        );
        bump_instance(&env);
        Ok(())
    }

    // ── Operators ────────────────────────────────────────────────────

    pub fn add_operator(env: Env, caller: Address, operator: Address) -> Result<(), RegistryError> {
        require_admin(&env, &caller)?;
        require_operational(&env)?;
        write_operator(&env, &operator, true);
        Ok(())
    }

    pub fn remove_operator(
        env: Env,
        caller: Address,
        operator: Address,
    ) -> Result<(), RegistryError> {
        require_admin(&env, &caller)?;
        write_operator(&env, &operator, false);
        Ok(())
    }

    pub fn is_operator(env: Env, addr: Address) -> bool {
        is_operator(&env, &addr)
    }

    // ── SPV lifecycle ────────────────────────────────────────────────

    /// Register a sponsor, or reactivate a previously deactivated one.
    pub fn register_spv(
        env: Env,
        caller: Address,
        spv: Address,
        name: String,
        registration_id: String,
    ) -> Result<(), RegistryError> {
        require_operator(&env, &caller)?;
        require_operational(&env)?;

        let record = match read_spv(&env, &spv) {
            Some(existing) if existing.is_active => return Err(RegistryError::SpvAlreadyActive),
            Some(mut existing) => {
                // Reactivation keeps the historical projects_created count.
                existing.is_active = true;
                existing.name = name;
                existing.registration_id = registration_id;
                existing
            }
            None => SpvRecord {
                address: spv.clone(),
                name,
                registration_id,
                is_active: true,
                projects_created: 0,
            },
        };
        write_spv(&env, &record);

        env.events().publish((symbol_short!("spv_reg"), spv), ());
        Ok(())
    }

    /// Flag a sponsor inactive. The record is kept for audit.
    pub fn deactivate_spv(env: Env, caller: Address, spv: Address) -> Result<(), RegistryError> {
        require_operator(&env, &caller)?;
        let mut record = read_spv(&env, &spv).ok_or(RegistryError::SpvNotFound)?;
        if !record.is_active {
            return Err(RegistryError::SpvNotActive);
        }
        record.is_active = false;
        write_spv(&env, &record);

        env.events().publish((symbol_short!("spv_off"), spv), ());
        Ok(())
    }

    /// Called by an authorized factory after each successful project creation.
    pub fn record_project_created(
        env: Env,
        factory: Address,
        spv: Address,
    ) -> Result<(), RegistryError> {
        factory.require_auth();
        if !is_factory(&env, &factory) {
            return Err(RegistryError::Unauthorized);
        }
        let mut record = read_spv(&env, &spv).ok_or(RegistryError::SpvNotFound)?;
        record.projects_created += 1;
        write_spv(&env, &record);

        env.events()
            .publish((symbol_short!("prj_cnt"), spv), record.projects_created);
        Ok(())
    }

    // ── Investor lifecycle ───────────────────────────────────────────

    pub fn verify_investor(
        env: Env,
        caller: Address,
        investor: Address,
    ) -> Result<(), RegistryError> {
        require_operator(&env, &caller)?;
        require_operational(&env)?;
        write_investor(
            &env,
            &InvestorRecord {
                address: investor.clone(),
                kyc_verified: true,
                is_active: true,
            },
        );
        env.events().publish((symbol_short!("inv_ver"), investor), ());
        Ok(())
    }

    pub fn deactivate_investor(
        env: Env,
        caller: Address,
        investor: Address,
    ) -> Result<(), RegistryError> {
        require_operator(&env, &caller)?;
        let mut record =
            read_investor(&env, &investor).ok_or(RegistryError::InvestorNotFound)?;
        record.is_active = false;
        write_investor(&env, &record);
        env.events().publish((symbol_short!("inv_off"), investor), ());
        Ok(())
    }

    // ── Config ───────────────────────────────────────────────────────

    pub fn update_platform_config(
        env: Env,
        caller: Address,
        listing_fee: i128,
        management_fee_rate_bps: u32,
        min_investment: i128,
        max_investment: i128,
    ) -> Result<(), RegistryError> {
        require_admin(&env, &caller)?;
        require_operational(&env)?;
        validate_bounds(management_fee_rate_bps, min_investment, max_investment)?;

        let mut config = read_config(&env)?;
        config.listing_fee = listing_fee;
        config.management_fee_rate_bps = management_fee_rate_bps;
        config.min_investment = min_investment;
        config.max_investment = max_investment;
        write_config(&env, &config);

        env.events().publish((symbol_short!("cfg_upd"),), listing_fee);
        Ok(())
    }

    // ── Factories ────────────────────────────────────────────────────

    pub fn authorize_factory(
        env: Env,
        caller: Address,
        factory: Address,
    ) -> Result<(), RegistryError> {
        require_admin(&env, &caller)?;
        require_operational(&env)?;
        write_factory(&env, &factory, true);
        env.events().publish((symbol_short!("fct_auth"), factory), ());
        Ok(())
    }

    pub fn deauthorize_factory(
        env: Env,
        caller: Address,
        factory: Address,
    ) -> Result<(), RegistryError> {
        require_admin(&env, &caller)?;
        write_factory(&env, &factory, false);
        env.events()
            .publish((symbol_short!("fct_dea"), factory), ());
        Ok(())
    }

    pub fn is_factory_authorized(env: Env, factory: Address) -> bool {
        is_factory(&env, &factory)
    }

    // ── Kill switches ────────────────────────────────────────────────
    //
    // Idempotency-checked on purpose: a double-activate is treated as an
    // operator mistake, not a no-op.

    pub fn pause(env: Env, caller: Address) -> Result<(), RegistryError> {
        require_admin(&env, &caller)?;
        let mut config = read_config(&env)?;
        if !config.platform_active {
            return Err(RegistryError::AlreadyPaused);
        }
        config.platform_active = false;
        write_config(&env, &config);
        env.events().publish((symbol_short!("paused"),), caller);
        Ok(())
    }

    pub fn unpause(env: Env, caller: Address) -> Result<(), RegistryError> {
        require_admin(&env, &caller)?;
        let mut config = read_config(&env)?;
        if config.platform_active {
            return Err(RegistryError::NotPaused);
        }
        config.platform_active = true;
        write_config(&env, &config);
        env.events().publish((symbol_short!("unpaused"),), caller);
        Ok(())
    }

    pub fn activate_emergency_mode(env: Env, caller: Address) -> Result<(), RegistryError> {
        require_admin(&env, &caller)?;
        let mut config = read_config(&env)?;
        if config.emergency_mode {
            return Err(RegistryError::EmergencyAlreadyActive);
        }
        config.emergency_mode = true;
        config.emergency_activated_at = env.ledger().timestamp();
        write_config(&env, &config);
        env.events().publish((symbol_short!("emg_on"),), caller);
        Ok(())
    }

    pub fn deactivate_emergency_mode(env: Env, caller: Address) -> Result<(), RegistryError> {
        require_admin(&env, &caller)?;
        let mut config = read_config(&env)?;
        if !config.emergency_mode {
            return Err(RegistryError::EmergencyNotActive);
        }
        config.emergency_mode = false;
        write_config(&env, &config);
        env.events().publish((symbol_short!("emg_off"),), caller);
        Ok(())
    }

    // ── Read side ────────────────────────────────────────────────────

    /// Raw flag AND platform active AND no emergency.
    pub fn is_spv_authorized(env: Env, spv: Address) -> bool {
        let config = match read_config(&env) {
            Ok(c) => c,
            Err(_) => return false,
        };
        if !config.platform_active || config.emergency_mode {
            return false;
        }
        read_spv(&env, &spv).map(|r| r.is_active).unwrap_or(false)
    }

    pub fn is_investor_authorized(env: Env, investor: Address) -> bool {
        let config = match read_config(&env) {
            Ok(c) => c,
            Err(_) => return false,
        };
        if !config.platform_active || config.emergency_mode {
            return false;
        }
        read_investor(&env, &investor)
            .map(|r| r.kyc_verified && r.is_active)
            .unwrap_or(false)
    }

    pub fn get_config(env: Env) -> Result<PlatformConfig, RegistryError> {
        read_config(&env)
    }

    pub fn get_spv(env: Env, spv: Address) -> Result<SpvRecord, RegistryError> {
        read_spv(&env, &spv).ok_or(RegistryError::SpvNotFound)
    }

    pub fn get_investor(env: Env, investor: Address) -> Result<InvestorRecord, RegistryError> {
        read_investor(&env, &investor).ok_or(RegistryError::InvestorNotFound)
    }

    pub fn is_paused(env: Env) -> bool {
        read_config(&env).map(|c| !c.platform_active).unwrap_or(true)
    }

    pub fn is_emergency(env: Env) -> bool {
        read_config(&env).map(|c| c.emergency_mode).unwrap_or(false)
    }

    pub fn get_admin(env: Env) -> Result<Address, RegistryError> {
        read_admin(&env)
    }
}
