//! # Platform Treasury
//!
//! Custodies platform-level fees (listing fees forwarded by the factory,
//! management fees skimmed from project profit deposits) and keeps a running
//! ledger with per-category subtotals.
//!
//! The treasury holds a mutable back-reference to the platform registry. The
//! registry is deployed first, then the treasury, then the reference is wired
//! with [`PlatformTreasury::set_platform_registry`], the one admin-gated
//! mutation that breaks the circular construction.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, token, Address, Env,
};

use platform_registry::PlatformRegistryClient;


#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum TreasuryError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    RegistryNotSet = 4,
    InvalidAmount = 5,
    /// Liquidity problem, deliberately distinct from authorization failures.
    InsufficientBalance = 6,
    PlatformPaused = 7,
    EmergencyActive = 8,
    EmergencyNotActive = 9,
    ExceedsEmergencyLimit = 10,
}

/// Fee ledger buckets.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FeeCategory {
    Listing,
    Management,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Treasury admin (Instance).
    Admin,
    /// Payment asset (Instance).
    PaymentToken,
    /// Platform registry back-reference (Instance).
    Registry,
    /// Per-call cap on emergency withdrawals (Instance).
    EmergencyLimit,
    /// Grand total of fees ever collected (Instance).
    TotalFees,
    /// Running subtotal per category (Instance).
    CategoryTotal(FeeCategory),
}

fn read_admin(env: &Env) -> Result<Address, TreasuryError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(TreasuryError::NotInitialized)
}

fn require_admin(env: &Env, caller: &Address) -> Result<(), TreasuryError> {
    caller.require_auth();
    if *caller != read_admin(env)? {
        return Err(TreasuryError::Unauthorized);
    }
    Ok(())
}

fn payment_token(env: &Env) -> Result<Address, TreasuryError> {
    env.storage()
        .instance()
        .get(&DataKey::PaymentToken)
        .ok_or(TreasuryError::NotInitialized)
}

fn registry_client(env: &Env) -> Result<PlatformRegistryClient, TreasuryError> {
    let addr: Address = env
        .storage()
        .instance()
        .get(&DataKey::Registry)
        .ok_or(TreasuryError::RegistryNotSet)?;
    Ok(PlatformRegistryClient::new(env, &addr))
}

fn ledger_balance(env: &Env) -> Result<i128, TreasuryError> {
    let token = payment_token(env)?;
    Ok(token::Client::new(env, &token).balance(&env.current_contract_address()))
}

#[contract]
pub struct PlatformTreasury;

#[contractimpl]
impl PlatformTreasury {
    pub fn initialize(
        env: Env,
        admin: Address,
        payment_token: Address,
        emergency_withdrawal_limit: i128,
    ) -> Result<(), TreasuryError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(TreasuryError::AlreadyInitialized);
        }
        admin.require_auth();
        if emergency_withdrawal_limit <= 0 {
            return Err(TreasuryError::InvalidAmount);
        }
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::PaymentToken, &payment_token);
        env.storage()
            .instance()
            .set(&DataKey::EmergencyLimit, &emergency_withdrawal_limit);
        env.storage().instance().set(&DataKey::TotalFees, &0i128);
        Ok(())
    }

    /// Wire the platform registry back-reference. Admin only; used once at
    /// bootstrap.
    pub fn set_platform_registry(
        env: Env,
        caller: Address,
        registry: Address,
    ) -> Result<(), TreasuryError> {
        require_admin(&env, &caller)?;
        env.storage().instance().set(&DataKey::Registry, &registry);
        Ok(())
    }

    /// Pull `amount` of the payment token from `from` and book it under
    /// `category`.
    pub fn deposit_fee(
        env: Env,
        from: Address,
        category: FeeCategory,
        amount: i128,
    ) -> Result<(), TreasuryError> {
        from.require_auth();
        if amount <= 0 {
            return Err(TreasuryError::InvalidAmount);
        }

        // Ledger first, transfer last.
        let total: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalFees)
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&DataKey::TotalFees, &(total + amount));

        let cat_key = DataKey::CategoryTotal(category.clone());
        let cat_total: i128 = env.storage().instance().get(&cat_key).unwrap_or(0);
        env.storage().instance().set(&cat_key, &(cat_total + amount));

        let token = payment_token(&env)?;
        token::Client::new(&env, &token).transfer(
            &from,
            &env.current_contract_address(),
            &amount,
        );

        env.events()
            .publish((symbol_short!("fee_dep"), from), (category, amount));
        Ok(())
    }

    /// Routine withdrawal. Admin only; blocked while paused or in emergency.
    pub fn withdraw(
        env: Env,
        caller: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), TreasuryError> {
        require_admin(&env, &caller)?;
        if amount <= 0 {
            return Err(TreasuryError::InvalidAmount);
        }

        let registry = registry_client(&env)?;
        if registry.is_paused() {
            return Err(TreasuryError::PlatformPaused);
        }
        if registry.is_emergency() {
            return Err(TreasuryError::EmergencyActive);
        }
        if ledger_balance(&env)? < amount {
            return Err(TreasuryError::InsufficientBalance);
        }

        let token = payment_token(&env)?;
        token::Client::new(&env, &token).transfer(
            &env.current_contract_address(),
            &to,
            &amount,
        );

        env.events().publish((symbol_short!("wdraw"), to), amount);
        Ok(())
    }

    /// Circuit-breaker withdrawal: only while emergency mode is active, and
    /// never more than the configured per-call limit.
    pub fn emergency_withdraw(
        env: Env,
        caller: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), TreasuryError> {
        require_admin(&env, &caller)?;
        if amount <= 0 {
            return Err(TreasuryError::InvalidAmount);
        }

        let registry = registry_client(&env)?;
        if !registry.is_emergency() {
            return Err(TreasuryError::EmergencyNotActive);
        }

        let limit: i128 = env
            .storage()
            .instance()
            .get(&DataKey::EmergencyLimit)
            .ok_or(TreasuryError::NotInitialized)?;
        if amount > limit {
            return Err(TreasuryError::ExceedsEmergencyLimit);
        }
        if ledger_balance(&env)? < amount {
            return Err(TreasuryError::InsufficientBalance);
        }

        let token = payment_token(&env)?;
        token::Client::new(&env, &token).transfer(
            &env.current_contract_address(),
            &to,
            &amount,
        );

        env.events().publish((symbol_short!("emg_wd"), to), amount);
        Ok(())
    }

    // ── Read side ────────────────────────────────────────────────────

    pub fn get_total_fees(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::TotalFees)
            .unwrap_or(0)
    }

    pub fn get_fees_by_category(env: Env, category: FeeCategory) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::CategoryTotal(category))
            .unwrap_or(0)
    }

    pub fn get_balance(env: Env) -> Result<i128, TreasuryError> {
        ledger_balance(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, TreasuryError> {
        read_admin(&env)
    }
}
