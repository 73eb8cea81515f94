//! Precondition coverage for the factory. Full bundle deployment runs on
//! uploaded wasm and is exercised end to end in the workspace's
//! integration tests; everything here fails before any deployment.

extern crate std;

use soroban_sdk::{testutils::Address as _, testutils::BytesN as _, Address, BytesN, Env, String};

use platform_registry::{PlatformRegistry, PlatformRegistryClient};
use platform_treasury::{PlatformTreasury, PlatformTreasuryClient};

use crate::{FactoryError, ProjectFactory, ProjectFactoryClient, WasmHashes};

const LISTING_FEE: i128 = 500;
const TOTAL_SUPPLY: i128 = 1_000;
const TOKEN_PRICE: i128 = 10;
const SOFT_CAP: i128 = 4_000;
const START: u64 = 1_000_000;
const END: u64 = 2_000_000;

struct Fixture<'a> {
    env: Env,
    admin: Address,
    sponsor: Address,
    registry: PlatformRegistryClient<'a>,
    factory: ProjectFactoryClient<'a>,
}

impl Fixture<'_> {
    fn dummy_hashes(&self) -> WasmHashes {
        WasmHashes {
            token: BytesN::random(&self.env),
            offering: BytesN::random(&self.env),
            treasury: BytesN::random(&self.env),
            governance: BytesN::random(&self.env),
        }
    }

    fn create(
        &self,
        sponsor: &Address,
        fee_paid: i128,
    ) -> Result<Result<u64, soroban_sdk::Error>, Result<FactoryError, soroban_sdk::InvokeError>>
    {
        self.factory.try_create_project(
            sponsor,
            &String::from_str(&self.env, "Harbor Bridge"),
            &String::from_str(&self.env, "HBS"),
            &TOTAL_SUPPLY,
            &TOKEN_PRICE,
            &SOFT_CAP,
            &START,
            &END,
            &fee_paid,
        )
    }
}

fn setup() -> Fixture<'static> {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let sponsor = Address::generate(&env);

    let sac = env.register_stellar_asset_contract_v2(admin.clone());

    let registry_id = env.register(PlatformRegistry, ());
    let treasury_id = env.register(PlatformTreasury, ());
    let factory_id = env.register(ProjectFactory, ());

    let registry = PlatformRegistryClient::new(&env, &registry_id);
    let treasury = PlatformTreasuryClient::new(&env, &treasury_id);
    let factory = ProjectFactoryClient::new(&env, &factory_id);

    registry.initialize(&admin, &sac.address(), &LISTING_FEE, &250, &100, &8_000);
    registry.register_spv(
        &admin,
        &sponsor,
        &String::from_str(&env, "Harbor Bridge SPV"),
        &String::from_str(&env, "SPV-001"),
    );
    registry.authorize_factory(&admin, &factory_id);

    treasury.initialize(&admin, &sac.address(), &1_000);
    treasury.set_platform_registry(&admin, &registry_id);

    factory.initialize(&admin, &registry_id, &treasury_id, &Address::generate(&env));

    Fixture {
        env,
        admin,
        sponsor,
        registry,
        factory,
    }
}

#[test]
fn initialize_only_once() {
    let f = setup();
    let result = f.factory.try_initialize(
        &f.admin,
        &Address::generate(&f.env),
        &Address::generate(&f.env),
        &Address::generate(&f.env),
    );
    assert_eq!(result, Err(Ok(FactoryError::AlreadyInitialized)));
}

#[test]
fn wasm_hashes_are_admin_gated_and_required() {
    let f = setup();

    // No bundle code registered yet.
    let result = f.create(&f.sponsor, LISTING_FEE);
    assert_eq!(result, Err(Ok(FactoryError::WasmHashesNotSet)));

    let stranger = Address::generate(&f.env);
    let result = f.factory.try_set_wasm_hashes(&stranger, &f.dummy_hashes());
    assert_eq!(result, Err(Ok(FactoryError::Unauthorized)));

    f.factory.set_wasm_hashes(&f.admin, &f.dummy_hashes());
}

#[test]
fn create_project_requires_authorized_spv() {
    let f = setup();
    f.factory.set_wasm_hashes(&f.admin, &f.dummy_hashes());

    let stranger = Address::generate(&f.env);
    let result = f.create(&stranger, LISTING_FEE);
    assert_eq!(result, Err(Ok(FactoryError::NotAuthorizedSpv)));

    // A deactivated SPV loses the right too.
    f.registry.deactivate_spv(&f.admin, &f.sponsor);
    let result = f.create(&f.sponsor, LISTING_FEE);
    assert_eq!(result, Err(Ok(FactoryError::NotAuthorizedSpv)));
}

#[test]
fn create_project_blocked_by_kill_switches() {
    let f = setup();
    f.factory.set_wasm_hashes(&f.admin, &f.dummy_hashes());

    f.registry.pause(&f.admin);
    let result = f.create(&f.sponsor, LISTING_FEE);
    assert_eq!(result, Err(Ok(FactoryError::PlatformPaused)));
    f.registry.unpause(&f.admin);

    f.registry.activate_emergency_mode(&f.admin);
    let result = f.create(&f.sponsor, LISTING_FEE);
    assert_eq!(result, Err(Ok(FactoryError::EmergencyActive)));
}

#[test]
fn create_project_validates_economics() {
    let f = setup();
    f.factory.set_wasm_hashes(&f.admin, &f.dummy_hashes());

    let bad = |supply: i128, price: i128, soft: i128, start: u64, end: u64| {
        f.factory.try_create_project(
            &f.sponsor,
            &String::from_str(&f.env, "Harbor Bridge"),
            &String::from_str(&f.env, "HBS"),
            &supply,
            &price,
            &soft,
            &start,
            &end,
            &LISTING_FEE,
        )
    };

    // Zero supply or price.
    assert_eq!(
        bad(0, TOKEN_PRICE, SOFT_CAP, START, END),
        Err(Ok(FactoryError::InvalidParams))
    );
    assert_eq!(
        bad(TOTAL_SUPPLY, 0, SOFT_CAP, START, END),
        Err(Ok(FactoryError::InvalidParams))
    );
    // Soft cap above the hard cap (supply * price).
    assert_eq!(
        bad(TOTAL_SUPPLY, TOKEN_PRICE, TOTAL_SUPPLY * TOKEN_PRICE + 1, START, END),
        Err(Ok(FactoryError::InvalidParams))
    );
    // Window ends before it starts.
    assert_eq!(
        bad(TOTAL_SUPPLY, TOKEN_PRICE, SOFT_CAP, END, START),
        Err(Ok(FactoryError::InvalidParams))
    );
}

#[test]
fn create_project_requires_listing_fee() {
    let f = setup();
    f.factory.set_wasm_hashes(&f.admin, &f.dummy_hashes());

    let result = f.create(&f.sponsor, LISTING_FEE - 1);
    assert_eq!(result, Err(Ok(FactoryError::InsufficientFee)));
}

#[test]
fn deactivate_unknown_project_fails() {
    let f = setup();
    let result = f.factory.try_deactivate_project(&f.admin, &1);
    assert_eq!(result, Err(Ok(FactoryError::ProjectNotFound)));
}

#[test]
fn read_side_is_empty_before_any_project() {
    let f = setup();
    assert_eq!(f.factory.get_project_count(), 0);
    assert!(f.factory.get_project_ids().is_empty());
    assert!(f.factory.get_projects_by_creator(&f.sponsor).is_empty());
}
