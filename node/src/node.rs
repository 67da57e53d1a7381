//! The GridPledge node: one verification engine, one pool ledger, one
//! distributor, and a clock.
//!
//! Every operation takes the caller's principal. Time-sensitive operations
//! read `now` from the node's clock. After each operation the node forwards
//! pending engine events and its own events to the [`EventBus`].

use gridpledge_crypto::{parse_public_key, Ed25519ReadingOracle, SignatureOracle};
use gridpledge_distributor::{DistributionReport, Payout, RewardDistributor};
use gridpledge_pool::RewardLedger;
use gridpledge_store::MemoryBalanceStore;
use gridpledge_types::{Amount, Clock, EventId, Kwh, Nonce, PoolId, Principal, SystemClock, Timestamp};
use gridpledge_verification::{BatchOutcome, OracleOutcome, VerificationEngine};

use crate::events::{EventBus, NodeEvent};
use crate::{NodeConfig, NodeError};

pub struct RewardNode<C: Clock = SystemClock> {
    config: NodeConfig,
    clock: C,
    engine: VerificationEngine,
    ledger: RewardLedger<MemoryBalanceStore>,
    distributor: RewardDistributor,
    events: EventBus,
}

impl RewardNode<SystemClock> {
    /// Build a node on the system clock, verifying readings against the
    /// configured Ed25519 oracle key.
    pub fn from_config(config: NodeConfig) -> Result<Self, NodeError> {
        let key_hex = config
            .oracle_public_key
            .as_deref()
            .ok_or_else(|| NodeError::Config("oracle_public_key is required".into()))?;
        let oracle = Ed25519ReadingOracle::new(parse_public_key(key_hex)?);
        Self::new(config, SystemClock, Box::new(oracle))
    }
}

impl<C: Clock> RewardNode<C> {
    /// Wire up the components from `config`.
    ///
    /// The distributor's operator identity is registered with the ledger so
    /// it can claim on participants' behalf.
    pub fn new(
        config: NodeConfig,
        clock: C,
        signature_oracle: Box<dyn SignatureOracle>,
    ) -> Result<Self, NodeError> {
        config.validate()?;
        let engine = VerificationEngine::with_params(
            config.oracle.clone(),
            config.treasury.clone(),
            signature_oracle,
            config.engine.clone(),
        )?;
        let mut ledger = RewardLedger::with_store(
            config.admin.clone(),
            config.treasury.clone(),
            config.ledger.clone(),
            MemoryBalanceStore::new(),
        );
        ledger.add_operator(&config.admin, config.distributor_operator.clone())?;
        let distributor = RewardDistributor::with_params(
            config.admin.clone(),
            config.distributor_operator.clone(),
            config.distributor.clone(),
        )?;
        tracing::info!(
            oracle = %config.oracle,
            admin = %config.admin,
            treasury = %config.treasury,
            "node initialized"
        );
        Ok(Self {
            config,
            clock,
            engine,
            ledger,
            distributor,
            events: EventBus::new(),
        })
    }

    fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Forward pending engine events to subscribers.
    fn flush_engine_events(&mut self) {
        for event in self.engine.drain_events() {
            self.events.emit(&NodeEvent::Engine(event));
        }
    }

    // ── Verification ───────────────────────────────────────────────────

    pub fn create_event(
        &mut self,
        caller: &Principal,
        id: EventId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<(), NodeError> {
        let now = self.now();
        self.engine.create_event(caller, id, start, end, now)?;
        self.flush_engine_events();
        Ok(())
    }

    pub fn end_event(&mut self, caller: &Principal, id: EventId) -> Result<(), NodeError> {
        self.engine.end_event(caller, id)?;
        self.flush_engine_events();
        Ok(())
    }

    pub fn submit_commitment(
        &mut self,
        caller: &Principal,
        event: EventId,
        committed_kwh: Kwh,
        staked: Amount,
        baseline_kwh: Kwh,
    ) -> Result<Nonce, NodeError> {
        let now = self.now();
        let nonce = self
            .engine
            .submit_commitment(caller, event, committed_kwh, staked, baseline_kwh, now)?;
        self.flush_engine_events();
        Ok(nonce)
    }

    pub fn submit_oracle_data(
        &mut self,
        caller: &Principal,
        event: EventId,
        user: &Principal,
        actual_kwh: Kwh,
        signature: &[u8],
    ) -> Result<OracleOutcome, NodeError> {
        let outcome = self
            .engine
            .submit_oracle_data(caller, event, user, actual_kwh, signature)?;
        self.flush_engine_events();
        Ok(outcome)
    }

    /// Slash underperformers. Stakes move to the treasury through the ledger,
    /// which logs each movement.
    pub fn batch_verify_and_slash(
        &mut self,
        caller: &Principal,
        event: EventId,
        users: &[Principal],
    ) -> Result<BatchOutcome, NodeError> {
        let outcome = self
            .engine
            .batch_verify_and_slash(caller, event, users, &mut self.ledger)?;
        self.flush_engine_events();
        Ok(outcome)
    }

    // ── Ledger ─────────────────────────────────────────────────────────

    pub fn mint(&mut self, caller: &Principal, amount: Amount, recipient: &Principal) -> Result<(), NodeError> {
        Ok(self.ledger.mint(caller, amount, recipient)?)
    }

    pub fn burn(&mut self, caller: &Principal, amount: Amount) -> Result<(), NodeError> {
        Ok(self.ledger.burn(caller, amount)?)
    }

    pub fn transfer(
        &mut self,
        caller: &Principal,
        amount: Amount,
        sender: &Principal,
        recipient: &Principal,
    ) -> Result<(), NodeError> {
        Ok(self.ledger.transfer(caller, amount, sender, recipient)?)
    }

    pub fn create_reward_pool(
        &mut self,
        caller: &Principal,
        total_reward: Amount,
        lock_period: u64,
        reward_rate_bps: u32,
    ) -> Result<PoolId, NodeError> {
        let now = self.now();
        let pool = self
            .ledger
            .create_reward_pool(caller, total_reward, lock_period, reward_rate_bps, now)?;
        self.events.emit(&NodeEvent::PoolCreated { pool, total_reward });
        Ok(pool)
    }

    pub fn deposit_to_pool(&mut self, caller: &Principal, pool: PoolId, amount: Amount) -> Result<(), NodeError> {
        let now = self.now();
        Ok(self.ledger.deposit_to_pool(caller, pool, amount, now)?)
    }

    pub fn claim_reward(&mut self, caller: &Principal, pool: PoolId, amount: Amount) -> Result<(), NodeError> {
        let now = self.now();
        Ok(self.ledger.claim_reward(caller, pool, amount, now)?)
    }

    pub fn close_pool(&mut self, caller: &Principal, pool: PoolId) -> Result<Amount, NodeError> {
        let now = self.now();
        let swept = self.ledger.close_pool(caller, pool, now)?;
        self.events.emit(&NodeEvent::PoolClosed { pool, swept });
        Ok(swept)
    }

    pub fn get_claimable_reward(&self, pool: PoolId, user: &Principal, score: u8) -> Result<Amount, NodeError> {
        Ok(self.ledger.get_claimable_reward(pool, user, score)?)
    }

    // ── Distribution ───────────────────────────────────────────────────

    pub fn link_event_to_pool(&mut self, caller: &Principal, event: EventId, pool: PoolId) -> Result<(), NodeError> {
        Ok(self.distributor.link_event_to_pool(caller, event, pool)?)
    }

    pub fn distribute_rewards(
        &mut self,
        caller: &Principal,
        event: EventId,
        users: &[Principal],
    ) -> Result<DistributionReport, NodeError> {
        let now = self.now();
        let report = self
            .distributor
            .distribute_rewards(caller, event, users, &self.engine, &mut self.ledger, now)?;
        self.events.emit(&NodeEvent::RewardsDistributed {
            event,
            pool: report.pool,
            recipients: report.recipients.len(),
            total: report.total_distributed,
        });
        Ok(report)
    }

    pub fn preview_distribution(&self, event: EventId, users: &[Principal]) -> Result<Vec<Payout>, NodeError> {
        Ok(self
            .distributor
            .preview_distribution(event, users, &self.engine, &self.ledger)?)
    }

    pub fn get_pending_reward(&self, event: EventId, user: &Principal) -> Result<Amount, NodeError> {
        Ok(self
            .distributor
            .get_pending_reward(event, user, &self.engine, &self.ledger)?)
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn engine(&self) -> &VerificationEngine {
        &self.engine
    }

    /// Direct engine access for administrative setters.
    pub fn engine_mut(&mut self) -> &mut VerificationEngine {
        &mut self.engine
    }

    pub fn ledger(&self) -> &RewardLedger<MemoryBalanceStore> {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut RewardLedger<MemoryBalanceStore> {
        &mut self.ledger
    }

    pub fn distributor(&self) -> &RewardDistributor {
        &self.distributor
    }

    pub fn distributor_mut(&mut self) -> &mut RewardDistributor {
        &mut self.distributor
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }
}
