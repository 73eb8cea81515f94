//! Platform-level records and the config singleton.

use soroban_sdk::{contracttype, Address, String};

/// Platform configuration, mutated only through `update_platform_config` and
/// the kill-switch entry points.
///
/// `platform_active` and `emergency_mode` are deliberately two independent
/// booleans combined per-operation, not a single tri-state flag: pause is the
/// routine maintenance switch, emergency is the incident switch that also
/// unlocks threshold-capped withdrawals from custody contracts.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlatformConfig {
    /// Asset all fees and investments are denominated in.
    pub payment_token: Address,
    /// One-time fee charged by the factory per project creation.
    pub listing_fee: i128,
    /// Platform cut of project profit deposits, in basis points (max 1000).
    pub management_fee_rate_bps: u32,
    pub min_investment: i128,
    pub max_investment: i128,
    pub platform_active: bool,
    pub emergency_mode: bool,
    /// Timestamp of the last emergency activation; `0` before the first.
    pub emergency_activated_at: u64,
}

/// A sponsor entity authorized to create projects. Deactivation is a flag,
/// never a deletion.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpvRecord {
    pub address: Address,
    pub name: String,
    pub registration_id: String,
    pub is_active: bool,
    pub projects_created: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvestorRecord {
    pub address: Address,
    pub kyc_verified: bool,
    pub is_active: bool,
}
