//! Integration tests for the limit-yield order engine.
//!
//! These tests verify:
//! 1. Conservation holds across long randomized placement histories
//! 2. Failed placements leave every ledger bit-identical
//! 3. Deposits accumulate per key without cross-key interference
//! 4. The lending market holds exactly what the orders record
//! 5. Identical seeded histories produce identical state roots
//!
//! ## Running
//!
//! ```bash
//! cargo test --release --test placement_test -- --nocapture
//! ```

use std::collections::{BTreeMap, HashSet};

use limit_yield::assets::{AssetLedger, InMemoryAssetLedger};
use limit_yield::error::{AdapterError, AssetError};
use limit_yield::market::{InMemoryLendingMarket, LendingMarket};
use limit_yield::types::tick::{max_usable_tick, min_usable_tick};
use limit_yield::{Address, EngineConfig, EngineError, OrderEngine, OrderId, PoolKey, Side};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

const TOKEN_A: Address = Address::with_last_byte(0x0a);
const TOKEN_B: Address = Address::with_last_byte(0x0b);
const TOKEN_C: Address = Address::with_last_byte(0x0c);
const MARKET: Address = Address::with_last_byte(0xaa);

/// 1e18, one whole token at 18 decimals
const ONE: u128 = 1_000_000_000_000_000_000;

/// Starting balance of every user in every token
const FUNDING: u128 = 1_000_000 * ONE;

const USER_COUNT: u8 = 16;

type Engine = OrderEngine<InMemoryAssetLedger, InMemoryLendingMarket>;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn user(i: u8) -> Address {
    Address::with_last_byte(0x10 + i)
}

fn pools() -> Vec<PoolKey> {
    vec![
        PoolKey::new(TOKEN_A, TOKEN_B, 3000, 60, Address::ZERO),
        PoolKey::new(TOKEN_A, TOKEN_B, 500, 10, Address::ZERO),
        PoolKey::new(TOKEN_B, TOKEN_C, 10_000, 200, Address::with_last_byte(0x77)),
    ]
}

/// Engine whose users all hold `FUNDING` of every token and have approved
/// the engine without limit
fn funded_engine() -> Engine {
    let config = EngineConfig::default();
    let engine_account = config.engine_account;
    let mut assets = InMemoryAssetLedger::new();
    for i in 0..USER_COUNT {
        for token in [TOKEN_A, TOKEN_B, TOKEN_C] {
            assets.mint(token, user(i), FUNDING).unwrap();
            assets.approve(token, user(i), engine_account, u128::MAX);
        }
    }
    OrderEngine::new(config, assets, InMemoryLendingMarket::new(MARKET))
}

/// Random tick that is a multiple of the pool's spacing and within range
fn random_tick(rng: &mut ChaCha8Rng, pool: &PoolKey) -> i32 {
    let spacing = pool.tick_spacing;
    // Narrow band so orders collide and accumulate
    let lo = (min_usable_tick(spacing) / spacing).max(-20);
    let hi = (max_usable_tick(spacing) / spacing).min(20);
    rng.gen_range(lo..=hi) * spacing
}

fn random_side(rng: &mut ChaCha8Rng) -> Side {
    if rng.gen_bool(0.5) {
        Side::AtoB
    } else {
        Side::BtoA
    }
}

/// Snapshot of everything a placement may touch
fn observe(engine: &Engine) -> ([u8; 32], Vec<u128>, Vec<u128>) {
    let account = engine.account();
    let mut balances = Vec::new();
    let mut allowances = Vec::new();
    for token in [TOKEN_A, TOKEN_B, TOKEN_C] {
        balances.push(engine.assets().balance_of(token, account));
        balances.push(engine.assets().balance_of(token, MARKET));
        balances.push(engine.market_balance(token));
        allowances.push(engine.assets().allowance(token, account, MARKET));
        for i in 0..USER_COUNT {
            balances.push(engine.assets().balance_of(token, user(i)));
            allowances.push(engine.assets().allowance(token, user(i), account));
        }
    }
    (engine.state_root().unwrap(), balances, allowances)
}

/// Run a seeded history of successful placements and return the state root
fn run_history(seed: u64, count: usize) -> [u8; 32] {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let pools = pools();
    let mut engine = funded_engine();
    for _ in 0..count {
        let pool = &pools[rng.gen_range(0..pools.len())];
        let tick = random_tick(&mut rng, pool);
        let side = random_side(&mut rng);
        let caller = user(rng.gen_range(0..USER_COUNT));
        let amount = rng.gen_range(1..=10 * ONE);
        engine.place_order(caller, pool, tick, side, amount).unwrap();
    }
    engine.state_root().unwrap()
}

// ============================================================================
// END TO END
// ============================================================================

#[test]
fn test_single_placement_end_to_end() {
    let mut engine = funded_engine();
    let pools = pools();
    let pool = &pools[0];
    let caller = user(0);

    engine.place_order(caller, pool, 120, Side::AtoB, ONE).unwrap();

    let id = engine.order_id(pool, 120, Side::AtoB);
    assert_eq!(engine.limit_orders(pool.id(), 120, Side::AtoB), ONE);
    assert_eq!(engine.claims_minted(&id), ONE);
    assert_eq!(engine.assets().balance_of(TOKEN_A, caller), FUNDING - ONE);
    assert_eq!(engine.balance_of(caller, &id), ONE);
    assert_eq!(engine.market_balance(TOKEN_A), ONE);

    // Tokens sit with the market, not the engine
    assert_eq!(engine.assets().balance_of(TOKEN_A, engine.account()), 0);
    assert_eq!(engine.assets().balance_of(TOKEN_A, MARKET), ONE);
    engine.check_invariants().unwrap();
}

// ============================================================================
// RANDOMIZED HISTORIES
// ============================================================================

/// Random placements, some of which fail, checked against a model after
/// every step.
#[test]
fn test_randomized_history_conserves() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let pools = pools();
    let mut engine = funded_engine();
    let account = engine.account();

    // Half the users get a tight allowance on TOKEN_B so some pulls fail
    for i in 0..USER_COUNT / 2 {
        engine.assets_mut().approve(TOKEN_B, user(i), account, 50 * ONE);
    }

    let mut expected: BTreeMap<OrderId, u128> = BTreeMap::new();
    let mut expected_holdings: BTreeMap<(OrderId, Address), u128> = BTreeMap::new();
    let mut per_asset: BTreeMap<Address, u128> = BTreeMap::new();
    let mut failures = 0usize;

    for step in 0..2_000 {
        let pool = &pools[rng.gen_range(0..pools.len())];
        let tick = random_tick(&mut rng, pool);
        let side = random_side(&mut rng);
        let caller = user(rng.gen_range(0..USER_COUNT));
        let amount = rng.gen_range(1..=20 * ONE);

        // Occasionally pause the market for a single placement
        let paused = rng.gen_ratio(1, 20);
        engine.market_mut().set_paused(paused);

        let before = observe(&engine);
        let id = engine.order_id(pool, tick, side);
        match engine.place_order(caller, pool, tick, side, amount) {
            Ok(receipt) => {
                assert!(!paused, "step {step}: placed while paused");
                let total = expected.entry(id).or_insert(0);
                *total += amount;
                assert_eq!(receipt.total_deposited, *total);
                *expected_holdings.entry((id, caller)).or_insert(0) += amount;
                *per_asset.entry(pool.sell_token(side)).or_insert(0) += amount;
            }
            Err(err) => {
                failures += 1;
                assert!(matches!(
                    err,
                    EngineError::TransferFailed(_) | EngineError::AdapterDepositFailed(AdapterError::Paused)
                ));
                assert_eq!(observe(&engine), before, "step {step}: failed placement mutated state");
            }
        }
        engine.check_invariants().unwrap();
    }
    assert!(failures > 0, "history never exercised a failure path");

    // Ledger matches the model
    assert_eq!(engine.resting_orders().count(), expected.len());
    for (key, order) in engine.resting_orders() {
        let id = key.order_id();
        assert_eq!(order.total_deposited, expected[&id]);
        assert_eq!(engine.claims_minted(&id), expected[&id]);
        let sum: u128 = engine.holders(&id).map(|(_, b)| *b).sum();
        assert_eq!(sum, expected[&id]);
    }
    for ((id, holder), amount) in &expected_holdings {
        assert_eq!(engine.balance_of(*holder, id), *amount);
    }

    // Mock market holds exactly the sum of deposits per asset
    for token in [TOKEN_A, TOKEN_B, TOKEN_C] {
        let deposited = per_asset.get(&token).copied().unwrap_or(0);
        assert_eq!(engine.total_deposited_in(token).unwrap(), deposited);
        assert_eq!(engine.market_balance(token), deposited);
        assert_eq!(engine.market().total_supplied(token), deposited);
    }
}

#[test]
fn test_same_seed_same_state_root() {
    assert_eq!(run_history(7, 500), run_history(7, 500));
    assert_ne!(run_history(7, 500), run_history(8, 500));
}

// ============================================================================
// IDS
// ============================================================================

#[test]
fn test_order_ids_distinct_across_pools_ticks_sides() {
    let engine = funded_engine();
    let mut seen = HashSet::new();
    let mut count = 0;
    for pool in pools() {
        let spacing = pool.tick_spacing;
        for tick in [-10 * spacing, -spacing, 0, spacing, 10 * spacing] {
            for side in [Side::AtoB, Side::BtoA] {
                let id = engine.order_id(&pool, tick, side);
                assert_eq!(id, engine.order_id(&pool, tick, side));
                seen.insert(id);
                count += 1;
            }
        }
    }
    assert_eq!(seen.len(), count);
}

// ============================================================================
// ACCUMULATION
// ============================================================================

#[test]
fn test_accumulation_does_not_leak_across_keys() {
    let mut engine = funded_engine();
    let pools = pools();
    let (p, q) = (&pools[0], &pools[1]);

    engine.place_order(user(0), p, 120, Side::AtoB, 3 * ONE).unwrap();
    engine.place_order(user(1), p, 120, Side::AtoB, 2 * ONE).unwrap();
    engine.place_order(user(0), p, 120, Side::BtoA, 7).unwrap();
    engine.place_order(user(0), p, 180, Side::AtoB, 11).unwrap();
    engine.place_order(user(0), q, 120, Side::AtoB, 13).unwrap();

    assert_eq!(engine.limit_orders(p.id(), 120, Side::AtoB), 5 * ONE);
    assert_eq!(engine.limit_orders(p.id(), 120, Side::BtoA), 7);
    assert_eq!(engine.limit_orders(p.id(), 180, Side::AtoB), 11);
    assert_eq!(engine.limit_orders(q.id(), 120, Side::AtoB), 13);
    assert_eq!(engine.limit_orders(q.id(), 120, Side::BtoA), 0);

    // Both pools sell TOKEN_A on AtoB; one market position covers both
    assert_eq!(engine.market_balance(TOKEN_A), 5 * ONE + 11 + 13);
    assert_eq!(engine.market_balance(TOKEN_B), 7);
    assert_eq!(engine.placement_count(), 5);
}

#[test]
fn test_extreme_usable_ticks_accepted() {
    let mut engine = funded_engine();
    for pool in pools() {
        let lo = min_usable_tick(pool.tick_spacing);
        let hi = max_usable_tick(pool.tick_spacing);
        engine.place_order(user(2), &pool, lo, Side::AtoB, 1).unwrap();
        engine.place_order(user(2), &pool, hi, Side::BtoA, 1).unwrap();
        assert!(matches!(
            engine.place_order(user(2), &pool, hi + pool.tick_spacing, Side::BtoA, 1),
            Err(EngineError::InvalidTick { .. })
        ));
    }
    engine.check_invariants().unwrap();
}

// ============================================================================
// REJECTIONS AND ATOMICITY
// ============================================================================

#[test]
fn test_rejections_leave_state_untouched() {
    let mut engine = funded_engine();
    let pool = pools()[0].clone();
    engine.place_order(user(0), &pool, 120, Side::AtoB, ONE).unwrap();
    let before = observe(&engine);

    let zero = engine.place_order(user(0), &pool, 120, Side::AtoB, 0);
    assert_eq!(zero, Err(EngineError::InvalidAmount { amount: 0, minimum: 1 }));

    let misaligned = engine.place_order(user(0), &pool, 90, Side::AtoB, ONE);
    assert_eq!(misaligned, Err(EngineError::InvalidTick { tick: 90, tick_spacing: 60 }));

    let unordered = PoolKey::new(TOKEN_B, TOKEN_A, 3000, 60, Address::ZERO);
    assert!(matches!(
        engine.place_order(user(0), &unordered, 120, Side::AtoB, ONE),
        Err(EngineError::InvalidPool(_))
    ));

    let no_spacing = PoolKey::new(TOKEN_A, TOKEN_B, 3000, 0, Address::ZERO);
    assert!(matches!(
        engine.place_order(user(0), &no_spacing, 0, Side::AtoB, ONE),
        Err(EngineError::InvalidPool(_))
    ));

    assert_eq!(observe(&engine), before);
}

#[test]
fn test_failed_pull_is_atomic() {
    let mut engine = funded_engine();
    let pool = pools()[0].clone();
    let account = engine.account();
    engine.assets_mut().approve(TOKEN_A, user(3), account, ONE - 1);
    let before = observe(&engine);

    let result = engine.place_order(user(3), &pool, 120, Side::AtoB, ONE);
    assert_eq!(
        result,
        Err(EngineError::TransferFailed(AssetError::InsufficientAuthorization {
            allowance: ONE - 1,
            requested: ONE
        }))
    );
    assert_eq!(observe(&engine), before);
}

#[test]
fn test_supply_cap_rejection_is_atomic() {
    let mut engine = funded_engine();
    let pool = pools()[0].clone();
    engine.market_mut().set_supply_cap(TOKEN_A, 3 * ONE);
    engine.place_order(user(0), &pool, 120, Side::AtoB, 2 * ONE).unwrap();
    let before = observe(&engine);

    let result = engine.place_order(user(1), &pool, 120, Side::AtoB, 2 * ONE);
    assert_eq!(
        result,
        Err(EngineError::AdapterDepositFailed(AdapterError::SupplyCapExceeded {
            cap: 3 * ONE,
            requested: 4 * ONE
        }))
    );
    assert_eq!(observe(&engine), before);

    // Other asset is uncapped
    engine.place_order(user(1), &pool, 120, Side::BtoA, 2 * ONE).unwrap();
    engine.check_invariants().unwrap();
}

#[test]
fn test_min_order_amount_from_config() {
    let config = EngineConfig::from_json_str(r#"{ "min_order_amount": "1000" }"#).unwrap();
    let account = config.engine_account;
    let mut assets = InMemoryAssetLedger::new();
    assets.mint(TOKEN_A, user(0), 10_000).unwrap();
    assets.approve(TOKEN_A, user(0), account, u128::MAX);
    let mut engine = OrderEngine::new(config, assets, InMemoryLendingMarket::new(MARKET));
    let pool = pools()[0].clone();

    assert_eq!(
        engine.place_order(user(0), &pool, 0, Side::AtoB, 999),
        Err(EngineError::InvalidAmount { amount: 999, minimum: 1000 })
    );
    engine.place_order(user(0), &pool, 0, Side::AtoB, 1000).unwrap();
    assert_eq!(engine.market_balance(TOKEN_A), 1000);
}

#[test]
fn test_large_ledger_placements_keep_no_journal() {
    let mut engine = funded_engine();
    for i in 0..50_000u32 {
        let mut bytes = [0u8; 20];
        bytes[..4].copy_from_slice(&i.to_be_bytes());
        bytes[19] = 0xbb;
        engine.assets_mut().mint(TOKEN_A, Address(bytes), ONE).unwrap();
    }
    let pool = pools()[0].clone();

    for step in 0..200u128 {
        engine.place_order(user(0), &pool, 120, Side::AtoB, step + 1).unwrap();
        assert_eq!(engine.assets().pending_changes(), 0);
        assert_eq!(engine.market().pending_changes(), 0);
    }

    engine.market_mut().set_paused(true);
    let before = observe(&engine);
    assert!(engine.place_order(user(0), &pool, 120, Side::AtoB, ONE).is_err());
    assert_eq!(observe(&engine), before);
    assert_eq!(engine.assets().pending_changes(), 0);
    assert_eq!(engine.limit_orders(pool.id(), 120, Side::AtoB), 200 * 201 / 2);
}

// ============================================================================
// CUSTODY
// ============================================================================

#[test]
fn test_custody_survives_yield_and_detects_shortfall() {
    let mut engine = funded_engine();
    let pool = pools()[2].clone();
    engine.place_order(user(4), &pool, -400, Side::AtoB, 5 * ONE).unwrap();
    engine.place_order(user(5), &pool, 400, Side::BtoA, 3 * ONE).unwrap();

    let account = engine.account();
    let (assets, market) = engine.collaborators_mut();
    market.accrue_yield(assets, TOKEN_B, account, ONE / 10).unwrap();
    assert_eq!(engine.market_balance(TOKEN_B), 5 * ONE + ONE / 10);
    engine.check_invariants().unwrap();

    // Pulling more than the yield out of the market breaks custody
    let (assets, market) = engine.collaborators_mut();
    market.withdraw(assets, TOKEN_C, 1, account, user(5)).unwrap();
    assert!(matches!(engine.check_invariants(), Err(EngineError::InvariantViolation(_))));
}
