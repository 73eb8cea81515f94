//! Offering data structures.
//!
//! The offering is stored as two ledger entries: [`OfferingConfig`], written
//! once at initialization and never mutated, and [`OfferingState`], the small
//! mutable entry rewritten on every investment. Splitting them keeps the
//! per-investment write cost down and makes the immutability of the round
//! parameters structural rather than disciplinary.

use soroban_sdk::{contracttype, Address};

/// Where the round currently stands. `Closed` is the window between the end
/// time passing and the sponsor calling finalize; `Succeeded`/`Failed` are
/// the two terminal outcomes.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OfferingStatus {
    Scheduled,
    Active,
    Closed,
    Succeeded,
    Failed,
}

/// Round economics and window, passed whole to `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OfferingTerms {
    pub payment_token: Address,
    /// Payment-token units per project token.
    pub token_price: i128,
    /// Project tokens on offer; `hard_cap = total_supply * token_price`.
    pub total_supply: i128,
    pub soft_cap: i128,
    pub hard_cap: i128,
    pub start_time: u64,
    pub end_time: u64,
}

/// Immutable round parameters.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OfferingConfig {
    pub sponsor: Address,
    pub payment_token: Address,
    /// Payment-token units per project token.
    pub token_price: i128,
    /// Project tokens on offer; `hard_cap = total_supply * token_price`.
    pub total_supply: i128,
    pub soft_cap: i128,
    pub hard_cap: i128,
    pub start_time: u64,
    pub end_time: u64,
}

/// Mutable round state, rewritten on every investment and at finalization.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OfferingState {
    pub total_raised: i128,
    pub total_investors: u32,
    pub is_finalized: bool,
    pub succeeded: bool,
}

/// Per-investor position. `tokens_allocated` is always
/// `total_invested / token_price` (integer division; the truncation dust
/// stays with the investor's payment balance, it is never collected).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvestorPosition {
    pub total_invested: i128,
    pub tokens_allocated: i128,
    pub tokens_claimed: i128,
    pub has_invested: bool,
    pub refunded: bool,
}

impl InvestorPosition {
    pub fn empty() -> Self {
        Self {
            total_invested: 0,
            tokens_allocated: 0,
            tokens_claimed: 0,
            has_invested: false,
            refunded: false,
        }
    }
}
