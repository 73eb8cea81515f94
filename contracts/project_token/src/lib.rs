//! # Project Token
//!
//! Fungible ownership token for one project, with every movement gated on
//! identity verification: mint requires a verified recipient, burn a verified
//! holder, and transfers require both counterparties verified *and* the
//! global transfer switch on.
//!
//! The switch starts off. The offering (an authorized minter) flips it on
//! when the raise succeeds; only governance can flip it back off.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, Address, Env, String,
};

mod storage;


use identity_registry::IdentityRegistryClient;

use storage::{
    bump_instance, checkpoint_balance, is_minter, read_allowance, read_balance, read_balance_at,
    read_burned, read_minted, read_snapshot_count, transfers_enabled, write_allowance,
    write_balance, write_minter, write_snapshot_count, DataKey,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum TokenError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InsufficientBalance = 5,
    InsufficientAllowance = 6,
    SupplyCapExceeded = 7,
    TransfersDisabled = 8,
    /// One or both counterparties fail identity verification.
    NotVerified = 9,
    GovernanceNotSet = 10,
    GovernanceAlreadySet = 11,
    TreasuryAlreadySet = 12,
    SnapshotNotFound = 13,
}

fn read_admin(env: &Env) -> Result<Address, TokenError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(TokenError::NotInitialized)
}

fn require_admin(env: &Env, caller: &Address) -> Result<(), TokenError> {
    caller.require_auth();
    if *caller != read_admin(env)? {
        return Err(TokenError::Unauthorized);
    }
    Ok(())
}

fn identity_client(env: &Env) -> Result<IdentityRegistryClient, TokenError> {
    let addr: Address = env
        .storage()
        .instance()
        .get(&DataKey::IdentityRegistry)
        .ok_or(TokenError::NotInitialized)?;
    Ok(IdentityRegistryClient::new(env, &addr))
}

fn is_verified(env: &Env, addr: &Address) -> Result<bool, TokenError> {
    Ok(identity_client(env)?.is_verified(addr))
}

/// Shared by `transfer` and `transfer_from`: gate, then move.
fn do_transfer(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), TokenError> {
    if amount <= 0 {
        return Err(TokenError::InvalidAmount);
    }
    if !transfers_enabled(env) {
        return Err(TokenError::TransfersDisabled);
    }
    if !is_verified(env, from)? || !is_verified(env, to)? {
        return Err(TokenError::NotVerified);
    }
    let from_balance = read_balance(env, from);
    if from_balance < amount {
        return Err(TokenError::InsufficientBalance);
    }
    checkpoint_balance(env, from);
    checkpoint_balance(env, to);
    write_balance(env, from, from_balance - amount);
    write_balance(env, to, read_balance(env, to) + amount);

    env.events().publish(
        (symbol_short!("transfer"), from.clone(), to.clone()),
        amount,
    );
    Ok(())
}

#[contract]
pub struct ProjectToken;

#[contractimpl]
impl ProjectToken {
    pub fn initialize(
        env: Env,
        admin: Address,
        name: String,
        symbol: String,
        decimals: u32,
        supply_cap: i128,
        identity_registry: Address,
    ) -> Result<(), TokenError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(TokenError::AlreadyInitialized);
        }
        if supply_cap <= 0 {
            return Err(TokenError::InvalidAmount);
        }
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Name, &name);
        env.storage().instance().set(&DataKey::Symbol, &symbol);
        env.storage().instance().set(&DataKey::Decimals, &decimals);
        env.storage().instance().set(&DataKey::SupplyCap, &supply_cap);
        env.storage().instance().set(&DataKey::Minted, &0i128);
        env.storage().instance().set(&DataKey::Burned, &0i128);
        env.storage()
            .instance()
            .set(&DataKey::IdentityRegistry, &identity_registry);
        env.storage()
            .instance()
            .set(&DataKey::TransfersEnabled, &false);
        bump_instance(&env);
        Ok(())
    }

    // ── Wiring ───────────────────────────────────────────────────────

    /// Wire the governance contract. Admin only; one-shot.
    pub fn set_governance(env: Env, caller: Address, governance: Address) -> Result<(), TokenError> {
        require_admin(&env, &caller)?;
        if env.storage().instance().has(&DataKey::Governance) {
            return Err(TokenError::GovernanceAlreadySet);
        }
        env.storage().instance().set(&DataKey::Governance, &governance);
        Ok(())
    }

    /// Wire the project treasury, the contract allowed to take balance
    /// snapshots for profit distributions. Admin only; one-shot.
    pub fn set_treasury(env: Env, caller: Address, treasury: Address) -> Result<(), TokenError> {
        require_admin(&env, &caller)?;
        if env.storage().instance().has(&DataKey::Treasury) {
            return Err(TokenError::TreasuryAlreadySet);
        }
        env.storage().instance().set(&DataKey::Treasury, &treasury);
        Ok(())
    }

    pub fn add_minter(env: Env, caller: Address, minter: Address) -> Result<(), TokenError> {
        require_admin(&env, &caller)?;
        write_minter(&env, &minter, true);
        Ok(())
    }

    pub fn remove_minter(env: Env, caller: Address, minter: Address) -> Result<(), TokenError> {
        require_admin(&env, &caller)?;
        write_minter(&env, &minter, false);
        Ok(())
    }

    // ── Supply ───────────────────────────────────────────────────────

    /// Mint to a verified recipient. Authorized minters only; the minted
    /// total can never exceed the supply cap.
    pub fn mint(env: Env, minter: Address, to: Address, amount: i128) -> Result<(), TokenError> {
        minter.require_auth();
        if !is_minter(&env, &minter) {
            return Err(TokenError::Unauthorized);
        }
        if amount <= 0 {
            return Err(TokenError::InvalidAmount);
        }
        if !is_verified(&env, &to)? {
            return Err(TokenError::NotVerified);
        }

        let cap: i128 = env
            .storage()
            .instance()
            .get(&DataKey::SupplyCap)
            .ok_or(TokenError::NotInitialized)?;
        let minted = read_minted(&env);
        if minted + amount > cap {
            return Err(TokenError::SupplyCapExceeded);
        }

        env.storage()
            .instance()
            .set(&DataKey::Minted, &(minted + amount));
        checkpoint_balance(&env, &to);
        write_balance(&env, &to, read_balance(&env, &to) + amount);

        env.events().publish((symbol_short!("mint"), to), amount);
        Ok(())
    }

    /// Burn from a verified holder.
    pub fn burn(env: Env, from: Address, amount: i128) -> Result<(), TokenError> {
        from.require_auth();
        if amount <= 0 {
            return Err(TokenError::InvalidAmount);
        }
        if !is_verified(&env, &from)? {
            return Err(TokenError::NotVerified);
        }
        let balance = read_balance(&env, &from);
        if balance < amount {
            return Err(TokenError::InsufficientBalance);
        }
        checkpoint_balance(&env, &from);
        write_balance(&env, &from, balance - amount);
        env.storage()
            .instance()
            .set(&DataKey::Burned, &(read_burned(&env) + amount));

        env.events().publish((symbol_short!("burn"), from), amount);
        Ok(())
    }

    // ── Movement ─────────────────────────────────────────────────────

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), TokenError> {
        from.require_auth();
        do_transfer(&env, &from, &to, amount)
    }

    pub fn approve(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
    ) -> Result<(), TokenError> {
        from.require_auth();
        if amount < 0 {
            return Err(TokenError::InvalidAmount);
        }
        write_allowance(&env, &from, &spender, amount);
        env.events()
            .publish((symbol_short!("approve"), from, spender), amount);
        Ok(())
    }

    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        read_allowance(&env, &from, &spender)
    }

    /// Spend an allowance. The identity/switch gate applies to the movement,
    /// not to the approval that preceded it.
    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), TokenError> {
        spender.require_auth();
        let allowance = read_allowance(&env, &from, &spender);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance);
        }
        // Debit the allowance before moving value.
        write_allowance(&env, &from, &spender, allowance - amount);
        do_transfer(&env, &from, &to, amount)
    }

    /// Pure transfer predicate: no auth, no state change.
    pub fn can_transfer(env: Env, from: Address, to: Address, amount: i128) -> bool {
        if !transfers_enabled(&env) || amount <= 0 {
            return false;
        }
        let verified_both = match (is_verified(&env, &from), is_verified(&env, &to)) {
            (Ok(a), Ok(b)) => a && b,
            _ => false,
        };
        verified_both && read_balance(&env, &from) >= amount
    }

    // ── Snapshots ────────────────────────────────────────────────────

    /// Freeze every holder's balance under a new snapshot id and return it.
    /// Callable by the admin, governance, or the wired treasury; the
    /// treasury takes one per profit distribution.
    pub fn snapshot(env: Env, caller: Address) -> Result<u32, TokenError> {
        caller.require_auth();
        let admin = read_admin(&env)?;
        let governance: Option<Address> = env.storage().instance().get(&DataKey::Governance);
        let treasury: Option<Address> = env.storage().instance().get(&DataKey::Treasury);
        let allowed = caller == admin
            || governance.as_ref() == Some(&caller)
            || treasury.as_ref() == Some(&caller);
        if !allowed {
            return Err(TokenError::Unauthorized);
        }
        let id = read_snapshot_count(&env) + 1;
        write_snapshot_count(&env, id);
        env.events().publish((symbol_short!("snapshot"),), id);
        Ok(id)
    }

    /// Balance `addr` held when snapshot `snapshot_id` was taken.
    pub fn balance_at(env: Env, addr: Address, snapshot_id: u32) -> Result<i128, TokenError> {
        if snapshot_id == 0 || snapshot_id > read_snapshot_count(&env) {
            return Err(TokenError::SnapshotNotFound);
        }
        Ok(read_balance_at(&env, &addr, snapshot_id))
    }

    // ── Transfer switch ──────────────────────────────────────────────

    /// Enable transfers. Allowed for the sponsor admin, governance, or an
    /// authorized minter; the offering flips this on finalized success.
    pub fn enable_transfers(env: Env, caller: Address) -> Result<(), TokenError> {
        caller.require_auth();
        let admin = read_admin(&env)?;
        let governance: Option<Address> = env.storage().instance().get(&DataKey::Governance);
        let allowed =
            caller == admin || governance.as_ref() == Some(&caller) || is_minter(&env, &caller);
        if !allowed {
            return Err(TokenError::Unauthorized);
        }
        env.storage()
            .instance()
            .set(&DataKey::TransfersEnabled, &true);
        env.events().publish((symbol_short!("xfer_on"),), caller);
        Ok(())
    }

    /// Disable transfers again. Governance only.
    pub fn disable_transfers(env: Env, caller: Address) -> Result<(), TokenError> {
        caller.require_auth();
        let governance: Address = env
            .storage()
            .instance()
            .get(&DataKey::Governance)
            .ok_or(TokenError::GovernanceNotSet)?;
        if caller != governance {
            return Err(TokenError::Unauthorized);
        }
        env.storage()
            .instance()
            .set(&DataKey::TransfersEnabled, &false);
        env.events().publish((symbol_short!("xfer_off"),), caller);
        Ok(())
    }

    // ── Read side ────────────────────────────────────────────────────

    pub fn balance(env: Env, addr: Address) -> i128 {
        read_balance(&env, &addr)
    }

    /// Circulating supply: minted minus burned.
    pub fn total_supply(env: Env) -> i128 {
        read_minted(&env) - read_burned(&env)
    }

    pub fn snapshot_count(env: Env) -> u32 {
        read_snapshot_count(&env)
    }

    pub fn supply_cap(env: Env) -> Result<i128, TokenError> {
        env.storage()
            .instance()
            .get(&DataKey::SupplyCap)
            .ok_or(TokenError::NotInitialized)
    }

    pub fn name(env: Env) -> Result<String, TokenError> {
        env.storage()
            .instance()
            .get(&DataKey::Name)
            .ok_or(TokenError::NotInitialized)
    }

    pub fn symbol(env: Env) -> Result<String, TokenError> {
        env.storage()
            .instance()
            .get(&DataKey::Symbol)
            .ok_or(TokenError::NotInitialized)
    }

    pub fn decimals(env: Env) -> Result<u32, TokenError> {
        env.storage()
            .instance()
            .get(&DataKey::Decimals)
            .ok_or(TokenError::NotInitialized)
    }

    pub fn transfers_enabled(env: Env) -> bool {
        transfers_enabled(&env)
    }

    pub fn is_minter(env: Env, addr: Address) -> bool {
        is_minter(&env, &addr)
    }

    pub fn get_admin(env: Env) -> Result<Address, TokenError> {
        read_admin(&env)
    }
}
