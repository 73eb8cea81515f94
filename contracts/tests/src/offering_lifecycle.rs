//! End-to-end offering rounds: hard-cap fills, failed raises, and the
//! compliance gate lifting mid-round.

use soroban_sdk::{testutils::Address as _, Address};

use project_offering::{OfferingError, OfferingStatus};

use crate::common::{Platform, Terms, END, KYC_TOPIC, START};

#[test]
fn two_investors_fill_the_hard_cap_and_claim() {
    // 1_000 tokens at 10_000 stroops each: hard cap 10_000_000.
    let terms = Terms {
        total_supply: 1_000,
        token_price: 10_000,
        soft_cap: 10_000_000,
    };
    let p = Platform::new(&terms);
    let alice = p.verified_investor(5_000_000);
    let bob = p.verified_investor(5_000_000);

    p.warp_to(START);
    p.offering.invest(&alice, &5_000_000);
    assert_eq!(p.offering.status(), OfferingStatus::Active);

    // The second half fills the cap and finalizes without anyone calling
    // finalize explicitly.
    p.offering.invest(&bob, &5_000_000);
    assert_eq!(p.offering.status(), OfferingStatus::Succeeded);
    assert_eq!(p.offering.get_state().total_raised, 10_000_000);
    assert_eq!(p.offering.get_state().total_investors, 2);

    // The raise moved to the project treasury in full.
    assert_eq!(p.treasury.get_raised_total(), 10_000_000);
    assert_eq!(p.payment.balance(&p.treasury_id), 10_000_000);
    assert_eq!(p.payment.balance(&p.offering_id), 0);

    // Success opened up transfers.
    assert!(p.token.transfers_enabled());

    // Each investor claims exactly once.
    assert_eq!(p.offering.claim_tokens(&alice), 500);
    assert_eq!(p.offering.claim_tokens(&bob), 500);
    assert_eq!(p.token.balance(&alice), 500);
    assert_eq!(p.token.balance(&bob), 500);
    assert_eq!(p.token.total_supply(), 1_000);

    let result = p.offering.try_claim_tokens(&alice);
    assert_eq!(result, Err(Ok(OfferingError::NothingToClaim)));
}

#[test]
fn undersubscribed_round_fails_and_refunds() {
    // Soft cap 1_000_000, hard cap 10_000_000, only half the soft cap lands.
    let terms = Terms {
        total_supply: 1_000,
        token_price: 10_000,
        soft_cap: 1_000_000,
    };
    let p = Platform::new(&terms);
    let alice = p.verified_investor(500_000);

    p.warp_to(START);
    p.offering.invest(&alice, &500_000);

    p.warp_to(END);
    p.offering.finalize_offering(&p.sponsor);
    assert_eq!(p.offering.status(), OfferingStatus::Failed);

    // Nothing reached the treasury, no tokens exist, transfers stay shut.
    assert_eq!(p.treasury.get_raised_total(), 0);
    assert_eq!(p.token.total_supply(), 0);
    assert!(!p.token.transfers_enabled());

    // The refund is the exact payment; a second attempt fails.
    assert_eq!(p.offering.refund(&alice), 500_000);
    assert_eq!(p.payment.balance(&alice), 500_000);
    let result = p.offering.try_refund(&alice);
    assert_eq!(result, Err(Ok(OfferingError::AlreadyRefunded)));
}

#[test]
fn kyc_claim_lifts_the_gate_mid_round() {
    let terms = Terms {
        total_supply: 1_000,
        token_price: 10_000,
        soft_cap: 1_000_000,
    };
    let p = Platform::new(&terms);

    // Platform-authorized but no KYC claim yet.
    let investor = Address::generate(&p.env);
    p.payment_admin.mint(&investor, &2_000_000);
    p.registry.verify_investor(&p.admin, &investor);

    p.warp_to(START);
    let result = p.offering.try_invest(&investor, &1_000_000);
    assert_eq!(result, Err(Ok(OfferingError::NotVerified)));

    // A trusted issuer attests, and the same call succeeds.
    p.add_kyc_claim(&investor);
    p.offering.invest(&investor, &1_000_000);
    assert_eq!(p.offering.get_investor(&investor).total_invested, 1_000_000);

    // Revocation closes the gate again for further investments.
    p.identity.revoke_claim(&p.issuer, &investor, &KYC_TOPIC);
    let result = p.offering.try_invest(&investor, &500_000);
    assert_eq!(result, Err(Ok(OfferingError::NotVerified)));
}

#[test]
fn allocations_truncate_and_dust_stays_with_the_investor() {
    let terms = Terms {
        total_supply: 1_000,
        token_price: 10_000,
        soft_cap: 10_000,
    };
    let p = Platform::new(&terms);
    let alice = p.verified_investor(50_000);

    p.warp_to(START);
    // 15_000 buys one token; the 5_000 remainder buys nothing back.
    p.offering.invest(&alice, &15_000);
    assert_eq!(p.offering.get_investor(&alice).tokens_allocated, 1);

    // A later 7_000 tops the position up to 22_000, which still truncates
    // to two tokens.
    p.offering.invest(&alice, &7_000);
    assert_eq!(p.offering.get_investor(&alice).tokens_allocated, 2);

    p.warp_to(END);
    p.offering.finalize_offering(&p.sponsor);
    assert_eq!(p.offering.status(), OfferingStatus::Succeeded);
    assert_eq!(p.offering.claim_tokens(&alice), 2);
}
