//! # Project Offering
//!
//! The fundraising state machine for one project:
//!
//! ```text
//! Scheduled ──► Active ──► Closed ──► Succeeded (raise ≥ soft cap)
//!                  │                └► Failed    (raise < soft cap)
//!                  └──────────────────► Succeeded (hard cap hit: auto-finalize)
//! ```
//!
//! Investments are accepted only inside the time window, only from investors
//! who are both platform-authorized and identity-verified, and only while the
//! raise stays at or under the hard cap. An investment that would cross the
//! cap is rejected whole, never partially filled; one that lands exactly on
//! it finalizes the round on the spot.
//!
//! On success the raise moves to the project treasury and token transfers
//! open up; on failure every investor gets their exact payment back, once.
//! All bookkeeping is written before any token moves.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, token, Address, Env,
};

mod storage;
mod types;


use identity_registry::IdentityRegistryClient;
use platform_registry::PlatformRegistryClient;
use project_token::ProjectTokenClient;
use project_treasury::ProjectTreasuryClient;

use storage::{
    bump_instance, read_config, read_handle, read_position, read_state, write_position,
    write_state, DataKey,
};
pub use types::{InvestorPosition, OfferingConfig, OfferingState, OfferingStatus, OfferingTerms};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum OfferingError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidParams = 4,
    InvalidAmount = 5,
    /// Investment attempted outside the active window.
    OfferingNotActive = 6,
    /// Finalize attempted before the window closed.
    OfferingNotEnded = 7,
    AlreadyFinalized = 8,
    /// Caller is not on the platform's authorized investor list.
    NotAuthorizedInvestor = 9,
    /// Caller fails identity verification.
    NotVerified = 10,
    BelowMinInvestment = 11,
    AboveMaxInvestment = 12,
    /// The investment would push the raise past the hard cap.
    ExceedsHardCap = 13,
    OfferingNotSucceeded = 14,
    OfferingNotFailed = 15,
    NothingToClaim = 16,
    AlreadyRefunded = 17,
    NothingToRefund = 18,
}

fn status_of(env: &Env) -> Result<OfferingStatus, OfferingError> {
    let config = read_config(env)?;
    let state = read_state(env)?;
    if state.is_finalized {
        return Ok(if state.succeeded {
            OfferingStatus::Succeeded
        } else {
            OfferingStatus::Failed
        });
    }
    let now = env.ledger().timestamp();
    if now < config.start_time {
        Ok(OfferingStatus::Scheduled)
    } else if now >= config.end_time {
        Ok(OfferingStatus::Closed)
    } else {
        Ok(OfferingStatus::Active)
    }
}

/// Success path shared by the hard-cap auto-finalize and the explicit
/// sponsor finalize: record the outcome, hand the raise to the treasury,
/// open up transfers. State is written before any value moves.
fn finalize_success(env: &Env) -> Result<(), OfferingError> {
    let config = read_config(env)?;
    let mut state = read_state(env)?;

    state.is_finalized = true;
    state.succeeded = true;
    write_state(env, &state);

    let treasury = read_handle(env, &DataKey::Treasury)?;
    token::Client::new(env, &config.payment_token).transfer(
        &env.current_contract_address(),
        &treasury,
        &state.total_raised,
    );
    ProjectTreasuryClient::new(env, &treasury)
        .receive_raise(&env.current_contract_address(), &state.total_raised);

    let token_addr = read_handle(env, &DataKey::Token)?;
    ProjectTokenClient::new(env, &token_addr).enable_transfers(&env.current_contract_address());

    env.events()
        .publish((symbol_short!("final_ok"),), state.total_raised);
    Ok(())
}

#[contract]
pub struct ProjectOffering;

#[contractimpl]
impl ProjectOffering {
    /// Wire the offering. Called once by the factory right after deployment.
    pub fn initialize(
        env: Env,
        sponsor: Address,
        platform_registry: Address,
        identity_registry: Address,
        token: Address,
        treasury: Address,
        terms: OfferingTerms,
    ) -> Result<(), OfferingError> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(OfferingError::AlreadyInitialized);
        }
        if terms.token_price <= 0 || terms.total_supply <= 0 {
            return Err(OfferingError::InvalidParams);
        }
        if terms.soft_cap <= 0
            || terms.soft_cap > terms.hard_cap
            || terms.hard_cap != terms.total_supply * terms.token_price
        {
            return Err(OfferingError::InvalidParams);
        }
        if terms.start_time >= terms.end_time || terms.end_time <= env.ledger().timestamp() {
            return Err(OfferingError::InvalidParams);
        }

        env.storage().instance().set(
            &DataKey::Config,
            &OfferingConfig {
                sponsor,
                payment_token: terms.payment_token,
                token_price: terms.token_price,
                total_supply: terms.total_supply,
                soft_cap: terms.soft_cap,
                hard_cap: terms.hard_cap,
                start_time: terms.start_time,
                end_time: terms.end_time,
            },
        );
        write_state(
            &env,
            &OfferingState {
                total_raised: 0,
                total_investors: 0,
                is_finalized: false,
                succeeded: false,
            },
        );
        env.storage()
            .instance()
            .set(&DataKey::PlatformRegistry, &platform_registry);
        env.storage()
            .instance()
            .set(&DataKey::IdentityRegistry, &identity_registry);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::Treasury, &treasury);
        bump_instance(&env);
        Ok(())
    }

    /// Invest `amount` of the payment token.
    pub fn invest(env: Env, investor: Address, amount: i128) -> Result<(), OfferingError> {
        investor.require_auth();

        if status_of(&env)? != OfferingStatus::Active {
            return Err(OfferingError::OfferingNotActive);
        }
        if amount <= 0 {
            return Err(OfferingError::InvalidAmount);
        }

        let registry_addr = read_handle(&env, &DataKey::PlatformRegistry)?;
        let registry = PlatformRegistryClient::new(&env, &registry_addr);
        if !registry.is_investor_authorized(&investor) {
            return Err(OfferingError::NotAuthorizedInvestor);
        }

        let identity_addr = read_handle(&env, &DataKey::IdentityRegistry)?;
        if !IdentityRegistryClient::new(&env, &identity_addr).is_verified(&investor) {
            return Err(OfferingError::NotVerified);
        }

        let platform_config = registry.get_config();
        if amount < platform_config.min_investment {
            return Err(OfferingError::BelowMinInvestment);
        }

        let config = read_config(&env)?;
        let mut state = read_state(&env)?;
        let mut position = read_position(&env, &investor);

        // The max bound applies to the investor's cumulative position.
        if position.total_invested + amount > platform_config.max_investment {
            return Err(OfferingError::AboveMaxInvestment);
        }
        // Whole-call rejection: no partial fill up to the cap.
        if state.total_raised + amount > config.hard_cap {
            return Err(OfferingError::ExceedsHardCap);
        }

        if !position.has_invested {
            position.has_invested = true;
            state.total_investors += 1;
        }
        position.total_invested += amount;
        position.tokens_allocated = position.total_invested / config.token_price;
        state.total_raised += amount;

        write_position(&env, &investor, &position);
        write_state(&env, &state);

        token::Client::new(&env, &config.payment_token).transfer(
            &investor,
            &env.current_contract_address(),
            &amount,
        );

        env.events()
            .publish((symbol_short!("invested"), investor), amount);

        // An investment landing exactly on the hard cap locks in success
        // immediately; there is nothing left to wait for.
        if state.total_raised == config.hard_cap {
            finalize_success(&env)?;
        }
        Ok(())
    }

    /// Lock in the outcome after the window has closed. Sponsor only.
    pub fn finalize_offering(env: Env, caller: Address) -> Result<(), OfferingError> {
        caller.require_auth();
        let config = read_config(&env)?;
        if caller != config.sponsor {
            return Err(OfferingError::Unauthorized);
        }

        let state = read_state(&env)?;
        if state.is_finalized {
            return Err(OfferingError::AlreadyFinalized);
        }
        if env.ledger().timestamp() < config.end_time {
            return Err(OfferingError::OfferingNotEnded);
        }

        if state.total_raised >= config.soft_cap {
            finalize_success(&env)?;
        } else {
            let mut state = state;
            state.is_finalized = true;
            state.succeeded = false;
            write_state(&env, &state);
            env.events()
                .publish((symbol_short!("final_no"),), state.total_raised);
        }
        Ok(())
    }

    /// Mint the investor's allocated tokens after a successful round.
    pub fn claim_tokens(env: Env, investor: Address) -> Result<i128, OfferingError> {
        investor.require_auth();
        if status_of(&env)? != OfferingStatus::Succeeded {
            return Err(OfferingError::OfferingNotSucceeded);
        }

        let mut position = read_position(&env, &investor);
        let claimable = position.tokens_allocated - position.tokens_claimed;
        if claimable <= 0 {
            return Err(OfferingError::NothingToClaim);
        }
        position.tokens_claimed = position.tokens_allocated;
        write_position(&env, &investor, &position);

        let token_addr = read_handle(&env, &DataKey::Token)?;
        ProjectTokenClient::new(&env, &token_addr).mint(
            &env.current_contract_address(),
            &investor,
            &claimable,
        );

        env.events()
            .publish((symbol_short!("claimed"), investor), claimable);
        Ok(claimable)
    }

    /// Return the investor's full payment after a failed round.
    pub fn refund(env: Env, investor: Address) -> Result<i128, OfferingError> {
        investor.require_auth();
        if status_of(&env)? != OfferingStatus::Failed {
            return Err(OfferingError::OfferingNotFailed);
        }

        let mut position = read_position(&env, &investor);
        if position.refunded {
            return Err(OfferingError::AlreadyRefunded);
        }
        if position.total_invested == 0 {
            return Err(OfferingError::NothingToRefund);
        }

        let amount = position.total_invested;
        position.refunded = true;
        position.tokens_allocated = 0;
        write_position(&env, &investor, &position);

        let config = read_config(&env)?;
        token::Client::new(&env, &config.payment_token).transfer(
            &env.current_contract_address(),
            &investor,
            &amount,
        );

        env.events()
            .publish((symbol_short!("refunded"), investor), amount);
        Ok(amount)
    }

    // ── Read side ────────────────────────────────────────────────────

    pub fn status(env: Env) -> Result<OfferingStatus, OfferingError> {
        status_of(&env)
    }

    pub fn get_config(env: Env) -> Result<OfferingConfig, OfferingError> {
        read_config(&env)
    }

    pub fn get_state(env: Env) -> Result<OfferingState, OfferingError> {
        read_state(&env)
    }

    pub fn get_investor(env: Env, investor: Address) -> InvestorPosition {
        read_position(&env, &investor)
    }
}
