//! The two kill switches and the platform fee ledger, exercised across
//! contract boundaries.

use soroban_sdk::{testutils::Address as _, Address};

use platform_registry::RegistryError;
use platform_treasury::{FeeCategory, TreasuryError};
use project_offering::OfferingError;
use project_treasury::ProjectTreasuryError;

use crate::common::{Platform, Terms, EMERGENCY_LIMIT, MANAGEMENT_FEE_BPS, START};

fn platform() -> Platform<'static> {
    Platform::new(&Terms {
        total_supply: 1_000,
        token_price: 10_000,
        soft_cap: 1_000_000,
    })
}

#[test]
fn pause_blocks_mutations_without_touching_emergency() {
    let p = platform();
    let investor = p.verified_investor(2_000_000);
    p.warp_to(START);

    p.registry.pause(&p.admin);
    assert!(p.registry.is_paused());
    assert!(!p.registry.is_emergency());

    // Registry mutations stop.
    let other = Address::generate(&p.env);
    let result = p.registry.try_verify_investor(&p.admin, &other);
    assert_eq!(result, Err(Ok(RegistryError::PlatformPaused)));

    // Investor authorization evaporates while paused, so invest fails.
    let result = p.offering.try_invest(&investor, &1_000_000);
    assert_eq!(result, Err(Ok(OfferingError::NotAuthorizedInvestor)));

    // Double pause is an error, not a no-op.
    let result = p.registry.try_pause(&p.admin);
    assert_eq!(result, Err(Ok(RegistryError::AlreadyPaused)));

    p.registry.unpause(&p.admin);
    p.offering.invest(&investor, &1_000_000);
}

#[test]
fn emergency_mode_is_idempotency_checked_and_reversible() {
    let p = platform();

    let result = p.registry.try_deactivate_emergency_mode(&p.admin);
    assert_eq!(result, Err(Ok(RegistryError::EmergencyNotActive)));

    p.registry.activate_emergency_mode(&p.admin);
    let result = p.registry.try_activate_emergency_mode(&p.admin);
    assert_eq!(result, Err(Ok(RegistryError::EmergencyAlreadyActive)));

    p.registry.deactivate_emergency_mode(&p.admin);
    assert!(!p.registry.is_emergency());
}

#[test]
fn fee_ledger_tracks_deposits_by_category() {
    let p = platform();
    let payer = Address::generate(&p.env);
    p.payment_admin.mint(&payer, &1_000_000);

    p.platform_treasury
        .deposit_fee(&payer, &FeeCategory::Listing, &100_000);
    p.platform_treasury
        .deposit_fee(&payer, &FeeCategory::Management, &40_000);
    p.platform_treasury
        .deposit_fee(&payer, &FeeCategory::Listing, &100_000);

    assert_eq!(p.platform_treasury.get_total_fees(), 240_000);
    assert_eq!(
        p.platform_treasury.get_fees_by_category(&FeeCategory::Listing),
        200_000
    );
    assert_eq!(
        p.platform_treasury
            .get_fees_by_category(&FeeCategory::Management),
        40_000
    );
    assert_eq!(p.platform_treasury.get_balance(), 240_000);

    // The fee total is a running ledger: withdrawals move funds but never
    // rewrite fee history.
    let payout = Address::generate(&p.env);
    p.platform_treasury.withdraw(&p.admin, &payout, &240_000);
    assert_eq!(p.platform_treasury.get_total_fees(), 240_000);
    assert_eq!(p.platform_treasury.get_balance(), 0);
}

#[test]
fn management_fee_flows_from_project_profit_to_the_platform() {
    let p = platform();
    p.payment_admin.mint(&p.sponsor, &10_000_000);

    let net = p.treasury.deposit_profit(&p.sponsor, &1_000_000);
    let fee = 1_000_000 * i128::from(MANAGEMENT_FEE_BPS) / 10_000;
    assert_eq!(net, 1_000_000 - fee);
    assert_eq!(
        p.platform_treasury
            .get_fees_by_category(&FeeCategory::Management),
        fee
    );
    assert_eq!(p.payment.balance(&p.treasury_id), net);
}

#[test]
fn emergency_withdrawals_are_capped_across_both_treasuries() {
    let p = platform();
    let rescue = Address::generate(&p.env);

    // Fund both treasuries.
    p.payment_admin.mint(&p.sponsor, &10_000_000);
    p.treasury.deposit_profit(&p.sponsor, &4_000_000);
    let payer = Address::generate(&p.env);
    p.payment_admin.mint(&payer, &3_000_000);
    p.platform_treasury
        .deposit_fee(&payer, &FeeCategory::Listing, &3_000_000);

    // Outside emergency mode nothing moves.
    let result = p
        .platform_treasury
        .try_emergency_withdraw(&p.admin, &rescue, &100);
    assert_eq!(result, Err(Ok(TreasuryError::EmergencyNotActive)));
    let result = p.treasury.try_emergency_withdraw(&p.admin, &rescue, &100);
    assert_eq!(result, Err(Ok(ProjectTreasuryError::EmergencyNotActive)));

    p.registry.activate_emergency_mode(&p.admin);

    // Routine withdrawals are blocked while the emergency stands.
    let result = p.platform_treasury.try_withdraw(&p.admin, &rescue, &100);
    assert_eq!(result, Err(Ok(TreasuryError::EmergencyActive)));

    // Per-call cap on both custody contracts.
    let result = p
        .platform_treasury
        .try_emergency_withdraw(&p.admin, &rescue, &(EMERGENCY_LIMIT + 1));
    assert_eq!(result, Err(Ok(TreasuryError::ExceedsEmergencyLimit)));
    let result = p
        .treasury
        .try_emergency_withdraw(&p.admin, &rescue, &(EMERGENCY_LIMIT + 1));
    assert_eq!(result, Err(Ok(ProjectTreasuryError::ExceedsEmergencyLimit)));

    p.platform_treasury
        .emergency_withdraw(&p.admin, &rescue, &EMERGENCY_LIMIT);
    p.treasury
        .emergency_withdraw(&p.admin, &rescue, &EMERGENCY_LIMIT);
    assert_eq!(p.payment.balance(&rescue), 2 * EMERGENCY_LIMIT);
}
