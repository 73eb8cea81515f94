//! Exhaustive gating checks: a transfer goes through iff the switch is on,
//! both parties are verified, and the sender holds enough tokens.

use soroban_sdk::{testutils::Address as _, Address};

use project_token::TokenError;

use crate::common::{Platform, Terms, KYC_TOPIC};

const BALANCE: i128 = 100;

fn platform() -> Platform<'static> {
    Platform::new(&Terms {
        total_supply: 100_000,
        token_price: 100,
        soft_cap: 100,
    })
}

/// Build one (from, to) pair in the requested verification states. `from`
/// always holds `BALANCE` tokens, minted while still verified.
fn pair(p: &Platform, from_verified: bool, to_verified: bool) -> (Address, Address) {
    let from = Address::generate(&p.env);
    let to = Address::generate(&p.env);
    p.add_kyc_claim(&from);
    p.token.mint(&p.sponsor, &from, &BALANCE);
    if !from_verified {
        p.identity.revoke_claim(&p.issuer, &from, &KYC_TOPIC);
    }
    if to_verified {
        p.add_kyc_claim(&to);
    }
    (from, to)
}

#[test]
fn can_transfer_is_the_conjunction_of_all_four_gates() {
    let p = platform();
    p.token.add_minter(&p.sponsor, &p.sponsor);

    // The switch starts disabled, so iterate the disabled half first and
    // flip it on once.
    for enabled in [false, true] {
        if enabled {
            p.token.enable_transfers(&p.sponsor);
        }
        for from_verified in [false, true] {
            for to_verified in [false, true] {
                for sufficient in [false, true] {
                    let (from, to) = pair(&p, from_verified, to_verified);
                    let amount = if sufficient { BALANCE } else { BALANCE + 1 };

                    let expected = enabled && from_verified && to_verified && sufficient;
                    assert_eq!(
                        p.token.can_transfer(&from, &to, &amount),
                        expected,
                        "enabled={} from_verified={} to_verified={} sufficient={}",
                        enabled,
                        from_verified,
                        to_verified,
                        sufficient
                    );

                    let result = p.token.try_transfer(&from, &to, &amount);
                    if expected {
                        assert_eq!(result, Ok(Ok(())));
                        assert_eq!(p.token.balance(&to), BALANCE);
                    } else {
                        assert!(result.is_err());
                        assert_eq!(p.token.balance(&to), 0);
                    }
                }
            }
        }
    }
}

#[test]
fn transfer_failures_name_the_first_failing_gate() {
    let p = platform();
    p.token.add_minter(&p.sponsor, &p.sponsor);

    // Switch off beats everything else.
    let (from, to) = pair(&p, true, true);
    let result = p.token.try_transfer(&from, &to, &BALANCE);
    assert_eq!(result, Err(Ok(TokenError::TransfersDisabled)));

    p.token.enable_transfers(&p.sponsor);

    // Verification beats balance.
    let (from, to) = pair(&p, false, true);
    let result = p.token.try_transfer(&from, &to, &(BALANCE + 1));
    assert_eq!(result, Err(Ok(TokenError::NotVerified)));

    let (from, to) = pair(&p, true, false);
    let result = p.token.try_transfer(&from, &to, &BALANCE);
    assert_eq!(result, Err(Ok(TokenError::NotVerified)));

    // Everything verified, not enough tokens.
    let (from, to) = pair(&p, true, true);
    let result = p.token.try_transfer(&from, &to, &(BALANCE + 1));
    assert_eq!(result, Err(Ok(TokenError::InsufficientBalance)));
}

#[test]
fn allowance_spend_is_gated_like_a_direct_transfer() {
    let p = platform();
    p.token.add_minter(&p.sponsor, &p.sponsor);
    p.token.enable_transfers(&p.sponsor);

    let (from, to) = pair(&p, true, true);
    let spender = Address::generate(&p.env);

    p.token.approve(&from, &spender, &60);
    assert_eq!(p.token.allowance(&from, &spender), 60);

    let result = p.token.try_transfer_from(&spender, &from, &to, &80);
    assert_eq!(result, Err(Ok(TokenError::InsufficientAllowance)));

    p.token.transfer_from(&spender, &from, &to, &60);
    assert_eq!(p.token.balance(&to), 60);
    assert_eq!(p.token.allowance(&from, &spender), 0);

    // Revoking the sender's claim blocks the spend even with allowance left.
    p.token.approve(&from, &spender, &10);
    p.identity.revoke_claim(&p.issuer, &from, &KYC_TOPIC);
    let result = p.token.try_transfer_from(&spender, &from, &to, &10);
    assert_eq!(result, Err(Ok(TokenError::NotVerified)));
}
