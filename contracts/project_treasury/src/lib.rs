//! # Project Treasury
//!
//! Custodies one project's raised capital and the profits the sponsor later
//! deposits. Profit deposits are skimmed for the platform's management fee on
//! the way in; the remainder lands in a distributable pool the sponsor carves
//! into distributions. Holders claim their pro-rata slice of each
//! distribution exactly once; claimed-vs-entitled bookkeeping mirrors the
//! offering's claim pattern.
//!
//! Each distribution takes a token balance snapshot at creation; pro-rata
//! shares divide the holder's balance *at that snapshot* by the supply
//! frozen alongside it, so transferring tokens afterwards neither moves nor
//! duplicates an entitlement.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, token, Address, Env, Vec,
};


use platform_registry::PlatformRegistryClient;
use platform_treasury::{FeeCategory, PlatformTreasuryClient};
use project_token::ProjectTokenClient;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ProjectTreasuryError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    OfferingNotSet = 4,
    OfferingAlreadySet = 5,
    GovernanceAlreadySet = 6,
    RaiseAlreadyReceived = 7,
    InvalidAmount = 8,
    InsufficientBalance = 9,
    DistributionNotFound = 10,
    NothingToClaim = 11,
    PlatformPaused = 12,
    EmergencyActive = 13,
    EmergencyNotActive = 14,
    ExceedsEmergencyLimit = 15,
}

/// One profit distribution. `snapshot_id` fixes every holder's numerator at
/// creation time and `supply_at_creation` freezes the denominator, so later
/// transfers cannot replay a share and later mints cannot dilute one.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Distribution {
    pub id: u64,
    pub total_amount: i128,
    pub supply_at_creation: i128,
    pub snapshot_id: u32,
    pub created_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Sponsor (Instance).
    Sponsor,
    /// Collaborator handles (Instance).
    Token,
    PaymentToken,
    PlatformRegistry,
    PlatformTreasury,
    Offering,
    Governance,
    /// Per-call cap on emergency withdrawals (Instance).
    EmergencyLimit,
    /// Raise accounting (Instance).
    RaisedTotal,
    RaiseWithdrawn,
    /// Net profit awaiting distribution (Instance).
    Distributable,
    /// Distribution counter (Instance).
    DistributionCount,
    /// Distribution record keyed by id (Persistent).
    Distribution(u64),
    /// Amount already claimed, keyed by (distribution, holder) (Persistent).
    Claimed(u64, Address),
}

const DAY_IN_LEDGERS: u32 = 17_280;
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn read_sponsor(env: &Env) -> Result<Address, ProjectTreasuryError> {
    env.storage()
        .instance()
        .get(&DataKey::Sponsor)
        .ok_or(ProjectTreasuryError::NotInitialized)
}

fn require_sponsor(env: &Env, caller: &Address) -> Result<(), ProjectTreasuryError> {
    caller.require_auth();
    if *caller != read_sponsor(env)? {
        return Err(ProjectTreasuryError::Unauthorized);
    }
    Ok(())
}

fn read_handle(env: &Env, key: &DataKey) -> Result<Address, ProjectTreasuryError> {
    env.storage()
        .instance()
        .get(key)
        .ok_or(ProjectTreasuryError::NotInitialized)
}

fn read_i128(env: &Env, key: &DataKey) -> i128 {
    env.storage().instance().get(key).unwrap_or(0)
}

fn registry_client(env: &Env) -> Result<PlatformRegistryClient, ProjectTreasuryError> {
    let addr = read_handle(env, &DataKey::PlatformRegistry)?;
    Ok(PlatformRegistryClient::new(env, &addr))
}

fn require_operational(env: &Env) -> Result<(), ProjectTreasuryError> {
    let registry = registry_client(env)?;
    if registry.is_paused() {
        return Err(ProjectTreasuryError::PlatformPaused);
    }
    if registry.is_emergency() {
        return Err(ProjectTreasuryError::EmergencyActive);
    }
    Ok(())
}

#[contract]
pub struct ProjectTreasury;

#[contractimpl]
impl ProjectTreasury {
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        sponsor: Address,
        token: Address,
        payment_token: Address,
        platform_registry: Address,
        platform_treasury: Address,
        emergency_withdrawal_limit: i128,
    ) -> Result<(), ProjectTreasuryError> {
        if env.storage().instance().has(&DataKey::Sponsor) {
            return Err(ProjectTreasuryError::AlreadyInitialized);
        }
        if emergency_withdrawal_limit <= 0 {
            return Err(ProjectTreasuryError::InvalidAmount);
        }
        env.storage().instance().set(&DataKey::Sponsor, &sponsor);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage()
            .instance()
            .set(&DataKey::PaymentToken, &payment_token);
        env.storage()
            .instance()
            .set(&DataKey::PlatformRegistry, &platform_registry);
        env.storage()
            .instance()
            .set(&DataKey::PlatformTreasury, &platform_treasury);
        env.storage()
            .instance()
            .set(&DataKey::EmergencyLimit, &emergency_withdrawal_limit);
        env.storage().instance().set(&DataKey::RaisedTotal, &0i128);
        env.storage()
            .instance()
            .set(&DataKey::DistributionCount, &0u64);
        Ok(())
    }

    /// Wire the offering allowed to deliver the raise. Sponsor-gated, one-shot.
    pub fn set_offering(
        env: Env,
        caller: Address,
        offering: Address,
    ) -> Result<(), ProjectTreasuryError> {
        require_sponsor(&env, &caller)?;
        if env.storage().instance().has(&DataKey::Offering) {
            return Err(ProjectTreasuryError::OfferingAlreadySet);
        }
        env.storage().instance().set(&DataKey::Offering, &offering);
        Ok(())
    }

    /// Wire the governance contract. Sponsor-gated, one-shot.
    pub fn set_governance(
        env: Env,
        caller: Address,
        governance: Address,
    ) -> Result<(), ProjectTreasuryError> {
        require_sponsor(&env, &caller)?;
        if env.storage().instance().has(&DataKey::Governance) {
            return Err(ProjectTreasuryError::GovernanceAlreadySet);
        }
        env.storage()
            .instance()
            .set(&DataKey::Governance, &governance);
        Ok(())
    }

    /// Book the finalized raise. Callable once, only by the wired offering
    /// (which transfers the funds in the same transaction).
    pub fn receive_raise(
        env: Env,
        offering: Address,
        amount: i128,
    ) -> Result<(), ProjectTreasuryError> {
        offering.require_auth();
        let wired = read_handle(&env, &DataKey::Offering)
            .map_err(|_| ProjectTreasuryError::OfferingNotSet)?;
        if offering != wired {
            return Err(ProjectTreasuryError::Unauthorized);
        }
        if read_i128(&env, &DataKey::RaisedTotal) != 0 {
            return Err(ProjectTreasuryError::RaiseAlreadyReceived);
        }
        if amount <= 0 {
            return Err(ProjectTreasuryError::InvalidAmount);
        }
        env.storage().instance().set(&DataKey::RaisedTotal, &amount);

        env.events().publish((symbol_short!("raise_in"),), amount);
        Ok(())
    }

    /// Sponsor draws project capital from the unspent raise.
    pub fn withdraw_raise(
        env: Env,
        caller: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), ProjectTreasuryError> {
        require_sponsor(&env, &caller)?;
        require_operational(&env)?;
        if amount <= 0 {
            return Err(ProjectTreasuryError::InvalidAmount);
        }

        let raised = read_i128(&env, &DataKey::RaisedTotal);
        let withdrawn = read_i128(&env, &DataKey::RaiseWithdrawn);
        if withdrawn + amount > raised {
            return Err(ProjectTreasuryError::InsufficientBalance);
        }
        env.storage()
            .instance()
            .set(&DataKey::RaiseWithdrawn, &(withdrawn + amount));

        let payment = read_handle(&env, &DataKey::PaymentToken)?;
        token::Client::new(&env, &payment).transfer(&env.current_contract_address(), &to, &amount);

        env.events().publish((symbol_short!("raise_wd"), to), amount);
        Ok(())
    }

    /// Deposit project profit. The platform's management fee is skimmed to
    /// the platform treasury; the net lands in the distributable pool.
    pub fn deposit_profit(
        env: Env,
        from: Address,
        amount: i128,
    ) -> Result<i128, ProjectTreasuryError> {
        from.require_auth();
        require_operational(&env)?;
        if amount <= 0 {
            return Err(ProjectTreasuryError::InvalidAmount);
        }

        let registry = registry_client(&env)?;
        let fee_bps = registry.get_config().management_fee_rate_bps;
        let fee = amount * i128::from(fee_bps) / 10_000;
        let net = amount - fee;

        let distributable = read_i128(&env, &DataKey::Distributable);
        env.storage()
            .instance()
            .set(&DataKey::Distributable, &(distributable + net));

        let payment = read_handle(&env, &DataKey::PaymentToken)?;
        token::Client::new(&env, &payment).transfer(
            &from,
            &env.current_contract_address(),
            &net,
        );
        if fee > 0 {
            let platform_treasury = read_handle(&env, &DataKey::PlatformTreasury)?;
            PlatformTreasuryClient::new(&env, &platform_treasury).deposit_fee(
                &from,
                &FeeCategory::Management,
                &fee,
            );
        }

        env.events()
            .publish((symbol_short!("profit"), from), (amount, fee));
        Ok(net)
    }

    /// Carve `amount` of the distributable pool into a new distribution.
    /// Holder balances and the token supply are snapshotted here, fixing
    /// every pro-rata share at creation time.
    pub fn create_distribution(
        env: Env,
        caller: Address,
        amount: i128,
    ) -> Result<u64, ProjectTreasuryError> {
        require_sponsor(&env, &caller)?;
        require_operational(&env)?;
        if amount <= 0 {
            return Err(ProjectTreasuryError::InvalidAmount);
        }

        let distributable = read_i128(&env, &DataKey::Distributable);
        if amount > distributable {
            return Err(ProjectTreasuryError::InsufficientBalance);
        }

        let token_addr = read_handle(&env, &DataKey::Token)?;
        let token_client = ProjectTokenClient::new(&env, &token_addr);
        let supply = token_client.total_supply();
        if supply <= 0 {
            return Err(ProjectTreasuryError::InvalidAmount);
        }
        let snapshot_id = token_client.snapshot(&env.current_contract_address());

        env.storage()
            .instance()
            .set(&DataKey::Distributable, &(distributable - amount));

        let id: u64 = env
            .storage()
            .instance()
            .get(&DataKey::DistributionCount)
            .unwrap_or(0);
        let distribution = Distribution {
            id,
            total_amount: amount,
            supply_at_creation: supply,
            snapshot_id,
            created_at: env.ledger().timestamp(),
        };
        let key = DataKey::Distribution(id);
        env.storage().persistent().set(&key, &distribution);
        bump_persistent(&env, &key);
        env.storage()
            .instance()
            .set(&DataKey::DistributionCount, &(id + 1));

        env.events().publish((symbol_short!("dist_new"), id), amount);
        Ok(id)
    }

    /// Claim the caller's remaining pro-rata share of a distribution.
    /// Idempotent: once fully claimed, further calls fail `NothingToClaim`.
    pub fn claim_distribution(
        env: Env,
        holder: Address,
        dist_id: u64,
    ) -> Result<i128, ProjectTreasuryError> {
        holder.require_auth();

        let distribution: Distribution = env
            .storage()
            .persistent()
            .get(&DataKey::Distribution(dist_id))
            .ok_or(ProjectTreasuryError::DistributionNotFound)?;

        let token_addr = read_handle(&env, &DataKey::Token)?;
        let balance = ProjectTokenClient::new(&env, &token_addr)
            .balance_at(&holder, &distribution.snapshot_id);

        let entitled = distribution.total_amount * balance / distribution.supply_at_creation;
        let claimed_key = DataKey::Claimed(dist_id, holder.clone());
        let claimed: i128 = env.storage().persistent().get(&claimed_key).unwrap_or(0);
        let payout = entitled - claimed;
        if payout <= 0 {
            return Err(ProjectTreasuryError::NothingToClaim);
        }

        env.storage().persistent().set(&claimed_key, &entitled);
        bump_persistent(&env, &claimed_key);

        let payment = read_handle(&env, &DataKey::PaymentToken)?;
        token::Client::new(&env, &payment).transfer(
            &env.current_contract_address(),
            &holder,
            &payout,
        );

        env.events()
            .publish((symbol_short!("dist_clm"), holder), (dist_id, payout));
        Ok(payout)
    }

    /// Circuit-breaker withdrawal by the platform admin, only during
    /// emergency mode and capped per call.
    pub fn emergency_withdraw(
        env: Env,
        caller: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), ProjectTreasuryError> {
        caller.require_auth();
        let registry = registry_client(&env)?;
        if caller != registry.get_admin() {
            return Err(ProjectTreasuryError::Unauthorized);
        }
        if !registry.is_emergency() {
            return Err(ProjectTreasuryError::EmergencyNotActive);
        }
        if amount <= 0 {
            return Err(ProjectTreasuryError::InvalidAmount);
        }
        let limit = read_i128(&env, &DataKey::EmergencyLimit);
        if amount > limit {
            return Err(ProjectTreasuryError::ExceedsEmergencyLimit);
        }

        let payment = read_handle(&env, &DataKey::PaymentToken)?;
        let holdings =
            token::Client::new(&env, &payment).balance(&env.current_contract_address());
        if holdings < amount {
            return Err(ProjectTreasuryError::InsufficientBalance);
        }
        token::Client::new(&env, &payment).transfer(&env.current_contract_address(), &to, &amount);

        env.events().publish((symbol_short!("emg_wd"), to), amount);
        Ok(())
    }

    // ── Read side ────────────────────────────────────────────────────

    pub fn get_raised_total(env: Env) -> i128 {
        read_i128(&env, &DataKey::RaisedTotal)
    }

    pub fn get_distributable(env: Env) -> i128 {
        read_i128(&env, &DataKey::Distributable)
    }

    pub fn get_distribution(env: Env, id: u64) -> Result<Distribution, ProjectTreasuryError> {
        env.storage()
            .persistent()
            .get(&DataKey::Distribution(id))
            .ok_or(ProjectTreasuryError::DistributionNotFound)
    }

    pub fn get_distribution_count(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::DistributionCount)
            .unwrap_or(0)
    }

    pub fn get_claimed(env: Env, dist_id: u64, holder: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::Claimed(dist_id, holder))
            .unwrap_or(0)
    }

    /// Ids of every distribution so far, oldest first.
    pub fn get_distribution_history(env: Env) -> Vec<u64> {
        let count: u64 = env
            .storage()
            .instance()
            .get(&DataKey::DistributionCount)
            .unwrap_or(0);
        let mut ids = Vec::new(&env);
        for id in 0..count {
            ids.push_back(id);
        }
        ids
    }

    pub fn get_sponsor(env: Env) -> Result<Address, ProjectTreasuryError> {
        read_sponsor(&env)
    }
}
