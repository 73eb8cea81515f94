//! Governance across the bundle: proposal threshold at the boundary, and a
//! passed proposal shutting token transfers back off.

use soroban_sdk::{vec, IntoVal, String, Symbol, Val, Vec};

use project_governance::{GovernanceError, ProposalAction, ProposalStatus, VoteChoice};
use project_offering::OfferingStatus;
use project_token::TokenError;

use crate::common::{Platform, Terms, START, VOTING_DELAY, VOTING_PERIOD};

/// Run a full successful raise so holders exist and transfers are enabled.
/// Returns two holders with 600 and 400 tokens.
fn raised_platform() -> (Platform<'static>, soroban_sdk::Address, soroban_sdk::Address) {
    let terms = Terms {
        total_supply: 1_000,
        token_price: 10_000,
        soft_cap: 10_000_000,
    };
    let p = Platform::new(&terms);
    let alice = p.verified_investor(6_000_000);
    let bob = p.verified_investor(4_000_000);

    p.warp_to(START);
    p.offering.invest(&alice, &6_000_000);
    p.offering.invest(&bob, &4_000_000);
    assert_eq!(p.offering.status(), OfferingStatus::Succeeded);
    p.offering.claim_tokens(&alice);
    p.offering.claim_tokens(&bob);

    (p, alice, bob)
}

#[test]
fn proposal_threshold_is_an_exact_boundary() {
    let (p, alice, _bob) = raised_platform();
    // Threshold is 1% of the 1_000 supply.
    let threshold = p.governance.get_config().proposal_threshold;
    assert_eq!(threshold, 10);

    let nine = p.verified_investor(0);
    let ten = p.verified_investor(0);
    p.token.transfer(&alice, &nine, &9);
    p.token.transfer(&alice, &ten, &10);

    let args: Vec<Val> = (p.governance_id.clone(),).into_val(&p.env);
    let actions = vec![
        &p.env,
        ProposalAction {
            target: p.token_id.clone(),
            function: Symbol::new(&p.env, "disable_transfers"),
            args,
        },
    ];

    let result = p
        .governance
        .try_propose(&nine, &String::from_str(&p.env, "motion"), &actions);
    assert_eq!(result, Err(Ok(GovernanceError::BelowProposalThreshold)));

    // A motion that would do nothing is rejected outright.
    let result = p.governance.try_propose(
        &ten,
        &String::from_str(&p.env, "motion"),
        &Vec::<ProposalAction>::new(&p.env),
    );
    assert_eq!(result, Err(Ok(GovernanceError::InvalidParams)));

    let id = p
        .governance
        .propose(&ten, &String::from_str(&p.env, "motion"), &actions);
    assert_eq!(id, 1);
}

#[test]
fn passed_proposal_disables_transfers_through_the_token() {
    let (p, alice, bob) = raised_platform();
    let now = p.env.ledger().timestamp();

    let args: Vec<Val> = (p.governance_id.clone(),).into_val(&p.env);
    let actions = vec![
        &p.env,
        ProposalAction {
            target: p.token_id.clone(),
            function: Symbol::new(&p.env, "disable_transfers"),
            args,
        },
    ];
    let id = p
        .governance
        .propose(&alice, &String::from_str(&p.env, "halt trading"), &actions);

    p.warp_to(now + VOTING_DELAY);
    p.governance.cast_vote(
        &alice,
        &id,
        &VoteChoice::For,
        &String::from_str(&p.env, "pending audit"),
    );
    p.governance.cast_vote(
        &bob,
        &id,
        &VoteChoice::Against,
        &String::from_str(&p.env, ""),
    );

    p.warp_to(now + VOTING_DELAY + VOTING_PERIOD + 1);
    assert_eq!(p.governance.proposal_status(&id), ProposalStatus::Succeeded);

    let eta = p.governance.queue(&id);
    p.warp_to(eta);
    assert!(p.token.transfers_enabled());
    p.governance.execute(&id);
    assert!(!p.token.transfers_enabled());

    // Holders can no longer move tokens, and only governance can reopen.
    let result = p.token.try_transfer(&alice, &bob, &1);
    assert_eq!(result, Err(Ok(TokenError::TransfersDisabled)));
    let result = p.token.try_disable_transfers(&alice);
    assert_eq!(result, Err(Ok(TokenError::Unauthorized)));
}

#[test]
fn sponsor_cannot_disable_transfers_directly() {
    let (p, _alice, _bob) = raised_platform();

    // The sponsor enables but does not disable; shutting the switch is a
    // governance decision.
    let result = p.token.try_disable_transfers(&p.sponsor);
    assert_eq!(result, Err(Ok(TokenError::Unauthorized)));
}
