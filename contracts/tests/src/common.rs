//! Shared fixture: the whole platform plus one project bundle, wired in the
//! same order the factory wires a deployed bundle.

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, vec, Address, Bytes, Env, String,
};

use claim_topics_registry::{ClaimTopicsRegistry, ClaimTopicsRegistryClient};
use identity_registry::{IdentityRegistry, IdentityRegistryClient};
use platform_registry::{PlatformRegistry, PlatformRegistryClient};
use platform_treasury::{PlatformTreasury, PlatformTreasuryClient};
use project_governance::{ProjectGovernance, ProjectGovernanceClient};
use project_offering::{OfferingTerms, ProjectOffering, ProjectOfferingClient};
use project_token::{ProjectToken, ProjectTokenClient};
use project_treasury::{ProjectTreasury, ProjectTreasuryClient};
use trusted_issuers_registry::{TrustedIssuersRegistry, TrustedIssuersRegistryClient};

pub const KYC_TOPIC: u32 = 1;
pub const LISTING_FEE: i128 = 100_000;
pub const MANAGEMENT_FEE_BPS: u32 = 250;
pub const MIN_INVESTMENT: i128 = 1_000;
pub const MAX_INVESTMENT: i128 = 100_000_000;
pub const EMERGENCY_LIMIT: i128 = 1_000_000;

pub const VOTING_DELAY: u64 = 24 * 60 * 60;
pub const VOTING_PERIOD: u64 = 7 * 24 * 60 * 60;
pub const QUORUM_NUMERATOR: u32 = 10;

pub const START: u64 = 1_000_000;
pub const END: u64 = 2_000_000;

/// Offering terms for one test run.
pub struct Terms {
    pub total_supply: i128,
    pub token_price: i128,
    pub soft_cap: i128,
}

impl Terms {
    pub fn hard_cap(&self) -> i128 {
        self.total_supply * self.token_price
    }
}

pub struct Platform<'a> {
    pub env: Env,
    pub admin: Address,
    pub sponsor: Address,
    pub issuer: Address,
    pub token_id: Address,
    pub offering_id: Address,
    pub treasury_id: Address,
    pub governance_id: Address,
    pub topics: ClaimTopicsRegistryClient<'a>,
    pub issuers: TrustedIssuersRegistryClient<'a>,
    pub identity: IdentityRegistryClient<'a>,
    pub registry: PlatformRegistryClient<'a>,
    pub platform_treasury: PlatformTreasuryClient<'a>,
    pub token: ProjectTokenClient<'a>,
    pub offering: ProjectOfferingClient<'a>,
    pub treasury: ProjectTreasuryClient<'a>,
    pub governance: ProjectGovernanceClient<'a>,
    pub payment: token::Client<'a>,
    pub payment_admin: token::StellarAssetClient<'a>,
}

impl Platform<'_> {
    pub fn new(terms: &Terms) -> Platform<'static> {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().set_timestamp(START - 10_000);

        let admin = Address::generate(&env);
        let sponsor = Address::generate(&env);
        let issuer = Address::generate(&env);

        let sac = env.register_stellar_asset_contract_v2(admin.clone());
        let payment = token::Client::new(&env, &sac.address());
        let payment_admin = token::StellarAssetClient::new(&env, &sac.address());

        let topics_id = env.register(ClaimTopicsRegistry, ());
        let issuers_id = env.register(TrustedIssuersRegistry, ());
        let identity_id = env.register(IdentityRegistry, ());
        let registry_id = env.register(PlatformRegistry, ());
        let platform_treasury_id = env.register(PlatformTreasury, ());
        let token_id = env.register(ProjectToken, ());
        let offering_id = env.register(ProjectOffering, ());
        let treasury_id = env.register(ProjectTreasury, ());
        let governance_id = env.register(ProjectGovernance, ());

        let topics = ClaimTopicsRegistryClient::new(&env, &topics_id);
        let issuers = TrustedIssuersRegistryClient::new(&env, &issuers_id);
        let identity = IdentityRegistryClient::new(&env, &identity_id);
        let registry = PlatformRegistryClient::new(&env, &registry_id);
        let platform_treasury = PlatformTreasuryClient::new(&env, &platform_treasury_id);
        let token = ProjectTokenClient::new(&env, &token_id);
        let offering = ProjectOfferingClient::new(&env, &offering_id);
        let treasury = ProjectTreasuryClient::new(&env, &treasury_id);
        let governance = ProjectGovernanceClient::new(&env, &governance_id);

        // Claims stack.
        topics.initialize(&admin);
        issuers.initialize(&admin);
        identity.initialize(&admin, &topics_id, &issuers_id);
        topics.add_claim_topic(&admin, &KYC_TOPIC, &String::from_str(&env, "KYC_APPROVED"));
        issuers.add_trusted_issuer(
            &admin,
            &issuer,
            &String::from_str(&env, "Acme KYC"),
            &vec![&env, KYC_TOPIC],
        );
        issuers.set_identity_registry(&admin, &identity_id);

        // Platform layer.
        registry.initialize(
            &admin,
            &sac.address(),
            &LISTING_FEE,
            &MANAGEMENT_FEE_BPS,
            &MIN_INVESTMENT,
            &MAX_INVESTMENT,
        );
        registry.register_spv(
            &admin,
            &sponsor,
            &String::from_str(&env, "Harbor Bridge SPV"),
            &String::from_str(&env, "SPV-001"),
        );
        platform_treasury.initialize(&admin, &sac.address(), &EMERGENCY_LIMIT);
        platform_treasury.set_platform_registry(&admin, &registry_id);

        // Project bundle, wired in factory order.
        token.initialize(
            &sponsor,
            &String::from_str(&env, "Harbor Bridge Shares"),
            &String::from_str(&env, "HBS"),
            &7,
            &terms.total_supply,
            &identity_id,
        );
        token.add_minter(&sponsor, &offering_id);
        token.set_governance(&sponsor, &governance_id);
        token.set_treasury(&sponsor, &treasury_id);

        treasury.initialize(
            &sponsor,
            &token_id,
            &sac.address(),
            &registry_id,
            &platform_treasury_id,
            &EMERGENCY_LIMIT,
        );
        treasury.set_offering(&sponsor, &offering_id);
        treasury.set_governance(&sponsor, &governance_id);

        offering.initialize(
            &sponsor,
            &registry_id,
            &identity_id,
            &token_id,
            &treasury_id,
            &OfferingTerms {
                payment_token: sac.address(),
                token_price: terms.token_price,
                total_supply: terms.total_supply,
                soft_cap: terms.soft_cap,
                hard_cap: terms.hard_cap(),
                start_time: START,
                end_time: END,
            },
        );

        governance.initialize(
            &sponsor,
            &token_id,
            &VOTING_DELAY,
            &VOTING_PERIOD,
            &(terms.total_supply / 100).max(1),
            &QUORUM_NUMERATOR,
        );

        Platform {
            env,
            admin,
            sponsor,
            issuer,
            token_id,
            offering_id,
            treasury_id,
            governance_id,
            topics,
            issuers,
            identity,
            registry,
            platform_treasury,
            token,
            offering,
            treasury,
            governance,
            payment,
            payment_admin,
        }
    }

    pub fn add_kyc_claim(&self, identity: &Address) {
        self.identity.add_claim(
            &self.issuer,
            identity,
            &KYC_TOPIC,
            &Bytes::from_array(&self.env, &[0u8; 4]),
            &0,
        );
    }

    /// A funded address cleared through both compliance gates.
    pub fn verified_investor(&self, funding: i128) -> Address {
        let investor = Address::generate(&self.env);
        if funding > 0 {
            self.payment_admin.mint(&investor, &funding);
        }
        self.registry.verify_investor(&self.admin, &investor);
        self.add_kyc_claim(&investor);
        investor
    }

    pub fn warp_to(&self, timestamp: u64) {
        self.env.ledger().set_timestamp(timestamp);
    }
}
