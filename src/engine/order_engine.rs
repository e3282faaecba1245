//! The order engine: composition root of the accounting core.
//!
//! ## Placement Pipeline
//!
//! ```text
//! validate -> pre-check overflow -> checkpoint collaborators
//!          -> pull sell asset -> market deposit -> ledger += -> claims mint
//!          -> commit collaborators, or revert them on any error
//! ```
//!
//! Ledger and claim writes happen only after both external calls succeed,
//! and their overflow checks run before anything is touched, so a failed
//! placement leaves every observable balance exactly as it was.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::assets::AssetLedger;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::ledger::{compute_state_root, ClaimLedger, OrderKey, OrderLedger, RestingOrder};
use crate::market::LendingMarket;
use crate::types::amount::{display_units, DEFAULT_DECIMALS};
use crate::types::{Address, OrderId, PlacementReceipt, PoolId, PoolKey, Side};

/// Id of the resting order for `(pool, tick, side)`; pure, no lookup
#[inline]
pub fn order_id(pool: &PoolKey, tick: i32, side: Side) -> OrderId {
    pool.order_id(tick, side)
}

/// Asset an order on `side` of `pool` sells
#[inline]
pub fn sell_token(pool: &PoolKey, side: Side) -> Address {
    pool.sell_token(side)
}

/// Resting limit-order engine.
///
/// Generic over its two collaborators, both injected at construction:
/// the asset ledger the sell asset is pulled from, and the lending market
/// idle capital is parked in.
#[derive(Debug)]
pub struct OrderEngine<A: AssetLedger, M: LendingMarket> {
    config: EngineConfig,
    assets: A,
    market: M,
    orders: OrderLedger,
    claims: ClaimLedger,
    /// Pools seen so far, to resolve the asset of each order
    pools: BTreeMap<PoolId, PoolKey>,
    placements: u64,
}

impl<A: AssetLedger, M: LendingMarket> OrderEngine<A, M> {
    pub fn new(config: EngineConfig, assets: A, market: M) -> Self {
        Self {
            config,
            assets,
            market,
            orders: OrderLedger::new(),
            claims: ClaimLedger::new(),
            pools: BTreeMap::new(),
            placements: 0,
        }
    }

    // ========================================================================
    // Placement
    // ========================================================================

    /// Deposit `amount` of the side's sell asset into the order at
    /// `(pool, tick, side)` and mint the same number of claims to `caller`.
    ///
    /// `caller` must have approved the engine account for at least `amount`
    /// on the asset ledger.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount` is below the configured minimum (zero always is)
    /// - `InvalidPool` / `InvalidTick` for bad pool configuration or target tick
    /// - `Overflow` if any total would exceed `u128`
    /// - `TransferFailed` if the asset pull fails
    /// - `AdapterDepositFailed` if the lending market rejects the deposit
    ///
    /// On error nothing has changed: ledgers, claims, asset balances and
    /// market balances are as before the call.
    pub fn place_order(
        &mut self,
        caller: Address,
        pool: &PoolKey,
        tick: i32,
        side: Side,
        amount: u128,
    ) -> Result<PlacementReceipt> {
        let result = self.try_place_order(caller, pool, tick, side, amount);
        match &result {
            Ok(receipt) => info!(
                order_id = %receipt.order_id(),
                %caller,
                tick,
                %side,
                amount = %display_units(amount, DEFAULT_DECIMALS),
                total_deposited = receipt.total_deposited,
                sequence = receipt.sequence,
                "order placed"
            ),
            Err(err) => warn!(%caller, tick, %side, amount, error = %err, "order placement rejected"),
        }
        result
    }

    fn try_place_order(
        &mut self,
        caller: Address,
        pool: &PoolKey,
        tick: i32,
        side: Side,
        amount: u128,
    ) -> Result<PlacementReceipt> {
        let minimum = self.config.min_order_amount;
        if amount == 0 || amount < minimum {
            return Err(EngineError::InvalidAmount { amount, minimum });
        }
        pool.validate()?;
        pool.validate_tick(tick)?;

        let pool_id = pool.id();
        let key = OrderKey::new(pool_id, tick, side);
        let id = key.order_id();

        // Everything below the external calls must be infallible
        self.orders.checked_total_after(&key, amount)?;
        self.claims.check_mint(&id, caller, amount)?;
        let sequence = self.placements.checked_add(1).ok_or(EngineError::Overflow)?;

        let asset = pool.sell_token(side);
        self.take_custody(caller, asset, amount)?;

        let total_deposited = self.orders.increment(key, amount)?;
        let claims_minted = self.claims.mint(id, caller, amount)?;
        self.pools.entry(pool_id).or_insert_with(|| pool.clone());
        self.placements = sequence;

        debug_assert_eq!(total_deposited, claims_minted);
        Ok(PlacementReceipt::new(id, caller, amount, total_deposited, claims_minted, sequence))
    }

    /// Pull from `caller` and deposit into the market as one unit
    fn take_custody(&mut self, caller: Address, asset: Address, amount: u128) -> Result<()> {
        let assets_checkpoint = self.assets.checkpoint();
        let market_checkpoint = self.market.checkpoint();

        let result = self.pull_and_deposit(caller, asset, amount);
        match result {
            Ok(()) => {
                self.assets.checkpoint_commit();
                self.market.checkpoint_commit();
            }
            Err(_) => {
                debug!(%caller, %asset, amount, "reverting collaborators");
                self.assets.checkpoint_revert(assets_checkpoint);
                self.market.checkpoint_revert(market_checkpoint);
            }
        }
        result
    }

    fn pull_and_deposit(&mut self, caller: Address, asset: Address, amount: u128) -> Result<()> {
        let engine = self.config.engine_account;

        self.assets
            .transfer_from(asset, engine, caller, engine, amount)
            .map_err(EngineError::TransferFailed)?;

        let market = self.market.address();
        self.assets.approve(asset, engine, market, amount);
        self.market
            .deposit(&mut self.assets, engine, asset, amount, engine)
            .map_err(EngineError::AdapterDepositFailed)?;

        debug!(%caller, %asset, amount, %market, "custody moved to lending market");
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Resting size of the order at `(pool_id, tick, side)`
    pub fn limit_orders(&self, pool_id: PoolId, tick: i32, side: Side) -> u128 {
        self.orders.total_deposited(&OrderKey::new(pool_id, tick, side))
    }

    pub fn claims_minted(&self, id: &OrderId) -> u128 {
        self.claims.total_minted(id)
    }

    /// Claim balance of `holder` in order `id`
    pub fn balance_of(&self, holder: Address, id: &OrderId) -> u128 {
        self.claims.balance_of(holder, id)
    }

    pub fn order_id(&self, pool: &PoolKey, tick: i32, side: Side) -> OrderId {
        order_id(pool, tick, side)
    }

    pub fn sell_token(&self, pool: &PoolKey, side: Side) -> Address {
        sell_token(pool, side)
    }

    pub fn resting_orders(&self) -> impl Iterator<Item = (&OrderKey, &RestingOrder)> {
        self.orders.iter()
    }

    /// Orders resting on one pool, in (tick, side) order
    pub fn resting_orders_in(&self, pool_id: PoolId) -> impl Iterator<Item = (&OrderKey, &RestingOrder)> {
        self.orders.orders_in_pool(pool_id)
    }

    pub fn holders(&self, id: &OrderId) -> impl Iterator<Item = (&Address, &u128)> {
        self.claims.holders(id)
    }

    /// Sum of `total_deposited` over every order that sells `asset`
    pub fn total_deposited_in(&self, asset: Address) -> Result<u128> {
        let mut total = 0u128;
        for (key, order) in self.orders.iter() {
            let pool = self.pool(&key.pool_id)?;
            if pool.sell_token(key.side) == asset {
                total = total.checked_add(order.total_deposited).ok_or(EngineError::Overflow)?;
            }
        }
        Ok(total)
    }

    /// Engine's balance of `asset` at the lending market
    pub fn market_balance(&self, asset: Address) -> u128 {
        self.market.balance_of(asset, self.config.engine_account)
    }

    /// Verify conservation and custody:
    ///
    /// - every order's `total_deposited` equals its `claims_minted`
    /// - every claim class sums to its `claims_minted` and belongs to an order
    /// - the market balance of each asset covers the orders sold in it
    pub fn check_invariants(&self) -> Result<()> {
        let mut required: BTreeMap<Address, u128> = BTreeMap::new();

        for (key, order) in self.orders.iter() {
            let id = key.order_id();
            let minted = self.claims.total_minted(&id);
            if order.total_deposited != minted {
                return Err(EngineError::InvariantViolation(format!(
                    "order {id}: total_deposited {} != claims_minted {minted}",
                    order.total_deposited
                )));
            }

            let asset = self.pool(&key.pool_id)?.sell_token(key.side);
            let entry = required.entry(asset).or_insert(0);
            *entry = entry.checked_add(order.total_deposited).ok_or(EngineError::Overflow)?;
        }

        for (id, minted) in self.claims.classes() {
            if self.claims.sum_of_balances(id) != Some(minted) {
                return Err(EngineError::InvariantViolation(format!(
                    "claim class {id}: holder balances do not sum to {minted}"
                )));
            }
        }
        if self.claims.class_count() != self.orders.len() {
            return Err(EngineError::InvariantViolation(format!(
                "{} claim classes for {} resting orders",
                self.claims.class_count(),
                self.orders.len()
            )));
        }

        for (asset, needed) in required {
            let held = self.market_balance(asset);
            if held < needed {
                return Err(EngineError::InvariantViolation(format!(
                    "market holds {held} of {asset}, orders require {needed}"
                )));
            }
        }
        Ok(())
    }

    /// Deterministic root over the order and claim ledgers
    pub fn state_root(&self) -> Result<[u8; 32]> {
        compute_state_root(&self.orders, &self.claims)
    }

    fn pool(&self, pool_id: &PoolId) -> Result<&PoolKey> {
        self.pools
            .get(pool_id)
            .ok_or_else(|| EngineError::InvariantViolation(format!("order on unknown pool {pool_id}")))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Account holding the engine's custody and market balances
    pub fn account(&self) -> Address {
        self.config.engine_account
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of successful placements
    pub fn placement_count(&self) -> u64 {
        self.placements
    }

    pub fn orders(&self) -> &OrderLedger {
        &self.orders
    }

    pub fn claims(&self) -> &ClaimLedger {
        &self.claims
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    /// Host access to the asset collaborator (funding, approvals)
    pub fn assets_mut(&mut self) -> &mut A {
        &mut self.assets
    }

    pub fn market(&self) -> &M {
        &self.market
    }

    /// Host access to the market collaborator (pausing, caps, yield)
    pub fn market_mut(&mut self) -> &mut M {
        &mut self.market
    }

    /// Both collaborators at once, for calls that need the asset ledger
    /// inside a market operation
    pub fn collaborators_mut(&mut self) -> (&mut A, &mut M) {
        (&mut self.assets, &mut self.market)
    }
}
