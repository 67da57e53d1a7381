//! Verification engine for events, commitments, oracle readings, and slashing.

use crate::commitment::{Commitment, StakeStatus, Verification};
use crate::error::VerificationError;
use crate::event::{Event, EventStatus};
use crate::scoring::{reward_multiplier, score_reading};
use gridpledge_crypto::SignatureOracle;
use gridpledge_store::BalanceStore;
use gridpledge_types::params::{MAX_BATCH_LIMIT, MAX_SCORE, SIGNATURE_LEN};
use gridpledge_types::{Amount, EngineParams, EventId, Kwh, Nonce, Principal, Timestamp};
use std::collections::{HashMap, HashSet};

/// Commitments and verifications are keyed by `(event, participant)`.
type ParticipantKey = (EventId, Principal);

/// Notifications emitted by the engine for the embedding node to process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    EventCreated {
        event: EventId,
        start: Timestamp,
        end: Timestamp,
    },
    EventEnded {
        event: EventId,
    },
    Committed {
        event: EventId,
        user: Principal,
        nonce: Nonce,
    },
    ReadingVerified {
        event: EventId,
        user: Principal,
        score: u8,
    },
    StakeSlashed {
        event: EventId,
        user: Principal,
        amount: Amount,
    },
}

/// Result of an accepted oracle reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OracleOutcome {
    pub score: u8,
    /// `score · reward_multiplier / 100`.
    pub multiplier: u128,
}

/// Aggregate result of a batch. Individual failures are not reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub processed: usize,
    pub succeeded: usize,
}

/// Owns every event, commitment, and verification.
///
/// All privileged operations compare the caller against the oracle principal.
/// Timing-sensitive operations take `now` from the caller's clock.
pub struct VerificationEngine<O = Box<dyn SignatureOracle>> {
    oracle: Principal,
    /// Receives slashed stakes.
    treasury: Principal,
    signature_oracle: O,
    paused: bool,
    params: EngineParams,
    next_nonce: Nonce,
    events: HashMap<EventId, Event>,
    commitments: HashMap<ParticipantKey, Commitment>,
    verifications: HashMap<ParticipantKey, Verification>,
    used_nonces: HashSet<Nonce>,
    pending_events: Vec<EngineEvent>,
}

impl<O: SignatureOracle> VerificationEngine<O> {
    /// Create an engine with default parameters.
    pub fn new(oracle: Principal, treasury: Principal, signature_oracle: O) -> Self {
        Self {
            oracle,
            treasury,
            signature_oracle,
            paused: false,
            params: EngineParams::default(),
            next_nonce: 1,
            events: HashMap::new(),
            commitments: HashMap::new(),
            verifications: HashMap::new(),
            used_nonces: HashSet::new(),
            pending_events: Vec::new(),
        }
    }

    /// Create an engine with explicit parameters, validating their bounds.
    pub fn with_params(
        oracle: Principal,
        treasury: Principal,
        signature_oracle: O,
        params: EngineParams,
    ) -> Result<Self, VerificationError> {
        if params.min_score > MAX_SCORE {
            return Err(VerificationError::InvalidScore(params.min_score));
        }
        if params.penalty_rate > 100 {
            return Err(VerificationError::InvalidPenalty(params.penalty_rate));
        }
        if params.reward_multiplier == 0 {
            return Err(VerificationError::InvalidMultiplier);
        }
        if params.batch_limit > MAX_BATCH_LIMIT {
            return Err(VerificationError::BatchLimitExceeded {
                len: params.batch_limit,
                limit: MAX_BATCH_LIMIT,
            });
        }
        let mut engine = Self::new(oracle, treasury, signature_oracle);
        engine.params = params;
        Ok(engine)
    }

    fn ensure_oracle(&self, caller: &Principal) -> Result<(), VerificationError> {
        if *caller != self.oracle {
            tracing::warn!(caller = %caller, "rejected oracle-only call");
            return Err(VerificationError::Unauthorized(caller.clone()));
        }
        Ok(())
    }

    fn ensure_not_paused(&self) -> Result<(), VerificationError> {
        if self.paused {
            return Err(VerificationError::Paused);
        }
        Ok(())
    }

    fn ensure_valid_event_id(event: EventId) -> Result<(), VerificationError> {
        if !event.is_valid() {
            return Err(VerificationError::InvalidEventId(event));
        }
        Ok(())
    }

    // ── Event lifecycle ────────────────────────────────────────────────

    /// Open a new event. Both bounds must lie at or after `now`, and `end` after `start`.
    pub fn create_event(
        &mut self,
        caller: &Principal,
        id: EventId,
        start: Timestamp,
        end: Timestamp,
        now: Timestamp,
    ) -> Result<(), VerificationError> {
        self.ensure_oracle(caller)?;
        Self::ensure_valid_event_id(id)?;
        if start < now || end < now || end <= start {
            return Err(VerificationError::InvalidSchedule { start, end, now });
        }
        if self.events.contains_key(&id) {
            return Err(VerificationError::EventExists(id));
        }
        self.events.insert(
            id,
            Event {
                id,
                start_time: start,
                end_time: end,
                status: EventStatus::Active,
            },
        );
        tracing::info!(event = %id, %start, %end, "event created");
        self.pending_events
            .push(EngineEvent::EventCreated { event: id, start, end });
        Ok(())
    }

    /// Close an event. One-way: a second call fails.
    pub fn end_event(&mut self, caller: &Principal, id: EventId) -> Result<(), VerificationError> {
        self.ensure_oracle(caller)?;
        Self::ensure_valid_event_id(id)?;
        let event = self
            .events
            .get_mut(&id)
            .ok_or(VerificationError::EventNotFound(id))?;
        if event.status == EventStatus::Ended {
            return Err(VerificationError::EventAlreadyEnded(id));
        }
        event.status = EventStatus::Ended;
        tracing::info!(event = %id, "event ended");
        self.pending_events.push(EngineEvent::EventEnded { event: id });
        Ok(())
    }

    // ── Commitments ────────────────────────────────────────────────────

    /// Record the caller's pledge for an event. Returns the nonce bound to it.
    ///
    /// A duplicate is reported as [`VerificationError::AlreadyCommitted`]
    /// whatever the field values of the second submission.
    pub fn submit_commitment(
        &mut self,
        caller: &Principal,
        event: EventId,
        committed_kwh: Kwh,
        staked: Amount,
        baseline_kwh: Kwh,
        now: Timestamp,
    ) -> Result<Nonce, VerificationError> {
        self.ensure_not_paused()?;
        Self::ensure_valid_event_id(event)?;
        if caller.is_null() {
            return Err(VerificationError::InvalidUser(caller.clone()));
        }
        let key = (event, caller.clone());
        if self.commitments.contains_key(&key) {
            return Err(VerificationError::AlreadyCommitted {
                event,
                user: caller.clone(),
            });
        }
        if committed_kwh == 0 {
            return Err(VerificationError::InvalidCommitted);
        }
        if staked == 0 {
            return Err(VerificationError::InvalidStake);
        }
        if baseline_kwh == 0 {
            return Err(VerificationError::InvalidBaseline);
        }
        let nonce = self.next_nonce;
        if self.used_nonces.contains(&nonce) {
            return Err(VerificationError::NonceUsed(nonce));
        }
        let status = self
            .events
            .get(&event)
            .ok_or(VerificationError::EventNotFound(event))?;
        if !status.accepts_commitments(now) {
            return Err(VerificationError::EventClosed(event));
        }
        let next_nonce = nonce.checked_add(1).ok_or(VerificationError::Overflow)?;

        self.commitments.insert(
            key,
            Commitment {
                committed_kwh,
                staked,
                baseline_kwh,
                nonce,
                stake: StakeStatus::Locked,
            },
        );
        self.used_nonces.insert(nonce);
        self.next_nonce = next_nonce;
        tracing::debug!(event = %event, user = %caller, nonce, staked, "commitment recorded");
        self.pending_events.push(EngineEvent::Committed {
            event,
            user: caller.clone(),
            nonce,
        });
        Ok(nonce)
    }

    // ── Oracle readings ────────────────────────────────────────────────

    /// Score a participant's attested reading for an ended event.
    pub fn submit_oracle_data(
        &mut self,
        caller: &Principal,
        event: EventId,
        user: &Principal,
        actual_kwh: Kwh,
        signature: &[u8],
    ) -> Result<OracleOutcome, VerificationError> {
        self.ensure_not_paused()?;
        self.ensure_oracle(caller)?;
        Self::ensure_valid_event_id(event)?;
        if user.is_null() {
            return Err(VerificationError::InvalidUser(user.clone()));
        }
        if signature.len() != SIGNATURE_LEN {
            return Err(VerificationError::InvalidSignatureLength {
                expected: SIGNATURE_LEN,
                got: signature.len(),
            });
        }
        let key = (event, user.clone());
        let commitment = self
            .commitments
            .get(&key)
            .ok_or_else(|| VerificationError::NotCommitted {
                event,
                user: user.clone(),
            })?;
        if self.verifications.contains_key(&key) {
            return Err(VerificationError::AlreadyVerified {
                event,
                user: user.clone(),
            });
        }
        let status = self
            .events
            .get(&event)
            .ok_or(VerificationError::EventNotFound(event))?;
        if status.is_active() {
            return Err(VerificationError::EventStillActive(event));
        }
        if !self
            .signature_oracle
            .verify(event, user, actual_kwh, signature, commitment.nonce)
        {
            tracing::warn!(event = %event, user = %user, "reading signature rejected");
            return Err(VerificationError::SignatureRejected);
        }
        let breakdown = score_reading(commitment.baseline_kwh, commitment.committed_kwh, actual_kwh)
            .ok_or(VerificationError::Overflow)?;
        let multiplier = reward_multiplier(breakdown.score, self.params.reward_multiplier);

        self.verifications.insert(
            key,
            Verification {
                actual_kwh,
                score: breakdown.score,
                verified: true,
                reduction_kwh: breakdown.reduction_kwh,
            },
        );
        tracing::info!(
            event = %event,
            user = %user,
            actual_kwh,
            reduction_pct = breakdown.reduction_pct,
            score = breakdown.score,
            "reading verified"
        );
        self.pending_events.push(EngineEvent::ReadingVerified {
            event,
            user: user.clone(),
            score: breakdown.score,
        });
        Ok(OracleOutcome {
            score: breakdown.score,
            multiplier,
        })
    }

    // ── Slashing ───────────────────────────────────────────────────────

    /// Slash every listed participant whose score is below the minimum.
    ///
    /// The stake moves from the participant to the treasury. A participant
    /// without a verification, already slashed, or unable to cover the stake
    /// is skipped; the batch itself still succeeds.
    pub fn batch_verify_and_slash<S: BalanceStore + ?Sized>(
        &mut self,
        caller: &Principal,
        event: EventId,
        users: &[Principal],
        balances: &mut S,
    ) -> Result<BatchOutcome, VerificationError> {
        self.ensure_oracle(caller)?;
        Self::ensure_valid_event_id(event)?;
        if users.len() > self.params.batch_limit {
            return Err(VerificationError::BatchLimitExceeded {
                len: users.len(),
                limit: self.params.batch_limit,
            });
        }

        let mut outcome = BatchOutcome {
            processed: users.len(),
            succeeded: 0,
        };
        for user in users {
            let key = (event, user.clone());
            let Some(verification) = self.verifications.get(&key) else {
                tracing::debug!(event = %event, user = %user, "skip slash: not verified");
                continue;
            };
            let Some(commitment) = self.commitments.get_mut(&key) else {
                continue;
            };
            if commitment.stake == StakeStatus::Slashed
                || verification.score >= self.params.min_score
            {
                continue;
            }
            match balances.transfer(user, &self.treasury, commitment.staked) {
                Ok(()) => {
                    commitment.stake = StakeStatus::Slashed;
                    outcome.succeeded += 1;
                    tracing::info!(
                        event = %event,
                        user = %user,
                        amount = commitment.staked,
                        score = verification.score,
                        "stake slashed"
                    );
                    self.pending_events.push(EngineEvent::StakeSlashed {
                        event,
                        user: user.clone(),
                        amount: commitment.staked,
                    });
                }
                Err(e) => {
                    tracing::debug!(event = %event, user = %user, error = %e, "skip slash");
                }
            }
        }
        Ok(outcome)
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn get_score(&self, event: EventId, user: &Principal) -> Result<u8, VerificationError> {
        self.verification(event, user)
            .map(|v| v.score)
            .ok_or_else(|| VerificationError::VerificationNotFound {
                event,
                user: user.clone(),
            })
    }

    /// `pool_share × (score · reward_multiplier / 100)`.
    pub fn calculate_reward(
        &self,
        event: EventId,
        user: &Principal,
        pool_share: Amount,
    ) -> Result<Amount, VerificationError> {
        let score = self.get_score(event, user)?;
        let multiplier = reward_multiplier(score, self.params.reward_multiplier);
        if multiplier == 0 {
            return Err(VerificationError::ZeroMultiplier);
        }
        pool_share
            .checked_mul(multiplier)
            .ok_or(VerificationError::Overflow)
    }

    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.get(&id)
    }

    pub fn commitment(&self, event: EventId, user: &Principal) -> Option<&Commitment> {
        self.commitments.get(&(event, user.clone()))
    }

    pub fn verification(&self, event: EventId, user: &Principal) -> Option<&Verification> {
        self.verifications.get(&(event, user.clone()))
    }

    pub fn is_verified(&self, event: EventId, user: &Principal) -> bool {
        self.verification(event, user).is_some_and(|v| v.verified)
    }

    pub fn oracle(&self) -> &Principal {
        &self.oracle
    }

    pub fn treasury(&self) -> &Principal {
        &self.treasury
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// The nonce the next accepted commitment will consume.
    pub fn next_nonce(&self) -> Nonce {
        self.next_nonce
    }

    pub fn is_nonce_used(&self, nonce: Nonce) -> bool {
        self.used_nonces.contains(&nonce)
    }

    /// Drain all pending engine events.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ── Administration ─────────────────────────────────────────────────

    pub fn set_oracle(
        &mut self,
        caller: &Principal,
        new_oracle: Principal,
    ) -> Result<(), VerificationError> {
        self.ensure_oracle(caller)?;
        if new_oracle.is_null() {
            return Err(VerificationError::InvalidUser(new_oracle));
        }
        tracing::info!(from = %self.oracle, to = %new_oracle, "oracle changed");
        self.oracle = new_oracle;
        Ok(())
    }

    pub fn set_paused(&mut self, caller: &Principal, paused: bool) -> Result<(), VerificationError> {
        self.ensure_oracle(caller)?;
        self.paused = paused;
        tracing::info!(paused, "pause state changed");
        Ok(())
    }

    pub fn set_min_score(&mut self, caller: &Principal, min_score: u8) -> Result<(), VerificationError> {
        self.ensure_oracle(caller)?;
        if min_score > MAX_SCORE {
            return Err(VerificationError::InvalidScore(min_score));
        }
        self.params.min_score = min_score;
        Ok(())
    }

    pub fn set_penalty_rate(&mut self, caller: &Principal, rate: u8) -> Result<(), VerificationError> {
        self.ensure_oracle(caller)?;
        if rate > 100 {
            return Err(VerificationError::InvalidPenalty(rate));
        }
        self.params.penalty_rate = rate;
        Ok(())
    }

    pub fn set_reward_multiplier(
        &mut self,
        caller: &Principal,
        multiplier: u32,
    ) -> Result<(), VerificationError> {
        self.ensure_oracle(caller)?;
        if multiplier == 0 {
            return Err(VerificationError::InvalidMultiplier);
        }
        self.params.reward_multiplier = multiplier;
        Ok(())
    }

    /// Lower the slashing batch limit. Raising it is rejected.
    pub fn set_batch_limit(&mut self, caller: &Principal, limit: usize) -> Result<(), VerificationError> {
        self.ensure_oracle(caller)?;
        if limit > self.params.batch_limit {
            return Err(VerificationError::BatchLimitExceeded {
                len: limit,
                limit: self.params.batch_limit,
            });
        }
        self.params.batch_limit = limit;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridpledge_nullables::NullOracle;
    use gridpledge_store::MemoryBalanceStore;
    use gridpledge_types::ErrorKind;
    use std::rc::Rc;

    const SIG: [u8; SIGNATURE_LEN] = [7u8; SIGNATURE_LEN];

    fn oracle() -> Principal {
        Principal::new("oracle")
    }

    fn treasury() -> Principal {
        Principal::new("treasury")
    }

    fn user(name: &str) -> Principal {
        Principal::new(name)
    }

    fn t(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn ev(id: u64) -> EventId {
        EventId::new(id)
    }

    fn make_engine() -> (VerificationEngine<Rc<NullOracle>>, Rc<NullOracle>) {
        let sig_oracle = Rc::new(NullOracle::accepting());
        let engine = VerificationEngine::new(oracle(), treasury(), Rc::clone(&sig_oracle));
        (engine, sig_oracle)
    }

    /// Event 1 open over [0, 100], alice committed (20% pledge, stake 50, baseline 100), event ended.
    fn ended_event_with_alice() -> (VerificationEngine<Rc<NullOracle>>, Rc<NullOracle>) {
        let (mut engine, sig_oracle) = make_engine();
        engine.create_event(&oracle(), ev(1), t(0), t(100), t(0)).unwrap();
        engine
            .submit_commitment(&user("alice"), ev(1), 20, 50, 100, t(10))
            .unwrap();
        engine.end_event(&oracle(), ev(1)).unwrap();
        (engine, sig_oracle)
    }

    #[test]
    fn creates_event() {
        let (mut engine, _) = make_engine();
        engine.create_event(&oracle(), ev(1), t(10), t(20), t(0)).unwrap();
        let event = engine.event(ev(1)).unwrap();
        assert!(event.is_active());
        assert_eq!(event.start_time, t(10));
        assert_eq!(event.end_time, t(20));
    }

    #[test]
    fn rejects_event_with_past_bounds() {
        let (mut engine, _) = make_engine();
        let err = engine
            .create_event(&oracle(), ev(1), t(10), t(12), t(15))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotEligible);
    }

    #[test]
    fn rejects_event_ending_before_it_starts() {
        let (mut engine, _) = make_engine();
        assert!(matches!(
            engine.create_event(&oracle(), ev(1), t(20), t(20), t(0)),
            Err(VerificationError::InvalidSchedule { .. })
        ));
    }

    #[test]
    fn rejects_zero_and_duplicate_event_ids() {
        let (mut engine, _) = make_engine();
        assert_eq!(
            engine.create_event(&oracle(), ev(0), t(1), t(2), t(0)),
            Err(VerificationError::InvalidEventId(ev(0)))
        );
        engine.create_event(&oracle(), ev(1), t(1), t(2), t(0)).unwrap();
        assert_eq!(
            engine.create_event(&oracle(), ev(1), t(5), t(9), t(0)),
            Err(VerificationError::EventExists(ev(1)))
        );
    }

    #[test]
    fn only_oracle_creates_events() {
        let (mut engine, _) = make_engine();
        let err = engine
            .create_event(&user("mallory"), ev(1), t(1), t(2), t(0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(engine.event(ev(1)).is_none());
    }

    #[test]
    fn ending_twice_is_rejected() {
        let (mut engine, _) = make_engine();
        engine.create_event(&oracle(), ev(1), t(10), t(20), t(0)).unwrap();
        engine.end_event(&oracle(), ev(1)).unwrap();
        assert!(!engine.event(ev(1)).unwrap().is_active());
        assert_eq!(
            engine.end_event(&oracle(), ev(1)),
            Err(VerificationError::EventAlreadyEnded(ev(1)))
        );
    }

    #[test]
    fn ending_unknown_event_is_not_found() {
        let (mut engine, _) = make_engine();
        let err = engine.end_event(&oracle(), ev(99)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn commitment_consumes_monotonic_nonces() {
        let (mut engine, _) = make_engine();
        engine.create_event(&oracle(), ev(1), t(0), t(100), t(0)).unwrap();
        let n1 = engine
            .submit_commitment(&user("alice"), ev(1), 20, 50, 100, t(1))
            .unwrap();
        let n2 = engine
            .submit_commitment(&user("bob"), ev(1), 10, 30, 80, t(2))
            .unwrap();
        assert_eq!(n1, 1);
        assert_eq!(n2, 2);
        assert!(engine.is_nonce_used(1));
        assert!(engine.is_nonce_used(2));
        assert_eq!(engine.next_nonce(), 3);
        assert_eq!(engine.commitment(ev(1), &user("alice")).unwrap().nonce, 1);
    }

    #[test]
    fn duplicate_commitment_is_already_done_even_with_invalid_fields() {
        let (mut engine, _) = make_engine();
        engine.create_event(&oracle(), ev(1), t(0), t(100), t(0)).unwrap();
        engine
            .submit_commitment(&user("alice"), ev(1), 20, 50, 100, t(1))
            .unwrap();
        let err = engine
            .submit_commitment(&user("alice"), ev(1), 0, 0, 0, t(2))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyDone);
        assert_eq!(engine.next_nonce(), 2);
    }

    #[test]
    fn failed_commitment_does_not_advance_nonce() {
        let (mut engine, _) = make_engine();
        engine.create_event(&oracle(), ev(1), t(0), t(100), t(0)).unwrap();
        assert_eq!(
            engine.submit_commitment(&user("alice"), ev(2), 20, 50, 100, t(1)),
            Err(VerificationError::EventNotFound(ev(2)))
        );
        assert_eq!(engine.next_nonce(), 1);
        assert!(!engine.is_nonce_used(1));
    }

    #[test]
    fn rejects_zero_fields() {
        let (mut engine, _) = make_engine();
        engine.create_event(&oracle(), ev(1), t(0), t(100), t(0)).unwrap();
        let alice = user("alice");
        assert_eq!(
            engine.submit_commitment(&alice, ev(1), 0, 50, 100, t(1)),
            Err(VerificationError::InvalidCommitted)
        );
        assert_eq!(
            engine.submit_commitment(&alice, ev(1), 20, 0, 100, t(1)),
            Err(VerificationError::InvalidStake)
        );
        assert_eq!(
            engine.submit_commitment(&alice, ev(1), 20, 50, 0, t(1)),
            Err(VerificationError::InvalidBaseline)
        );
    }

    #[test]
    fn rejects_commitment_from_null_identity() {
        let (mut engine, _) = make_engine();
        engine.create_event(&oracle(), ev(1), t(0), t(100), t(0)).unwrap();
        let err = engine
            .submit_commitment(&Principal::null(), ev(1), 20, 50, 100, t(1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIdentifier);
    }

    #[test]
    fn rejects_commitment_after_end_time_or_end() {
        let (mut engine, _) = make_engine();
        engine.create_event(&oracle(), ev(1), t(0), t(100), t(0)).unwrap();
        assert_eq!(
            engine.submit_commitment(&user("alice"), ev(1), 20, 50, 100, t(101)),
            Err(VerificationError::EventClosed(ev(1)))
        );
        engine.end_event(&oracle(), ev(1)).unwrap();
        assert_eq!(
            engine.submit_commitment(&user("bob"), ev(1), 20, 50, 100, t(50)),
            Err(VerificationError::EventClosed(ev(1)))
        );
    }

    #[test]
    fn rejects_commitment_while_paused() {
        let (mut engine, _) = make_engine();
        engine.set_paused(&oracle(), true).unwrap();
        assert_eq!(
            engine.submit_commitment(&user("alice"), ev(1), 20, 50, 100, t(1)),
            Err(VerificationError::Paused)
        );
    }

    #[test]
    fn oracle_data_rejected_while_paused() {
        let (mut engine, sig_oracle) = ended_event_with_alice();
        engine.set_paused(&oracle(), true).unwrap();
        assert_eq!(
            engine.submit_oracle_data(&oracle(), ev(1), &user("alice"), 80, &SIG),
            Err(VerificationError::Paused)
        );
        assert!(engine.verification(ev(1), &user("alice")).is_none());
        assert!(sig_oracle.calls().is_empty());

        engine.set_paused(&oracle(), false).unwrap();
        engine
            .submit_oracle_data(&oracle(), ev(1), &user("alice"), 80, &SIG)
            .unwrap();
    }

    #[test]
    fn oracle_data_scores_and_reports_multiplier() {
        let (mut engine, sig_oracle) = ended_event_with_alice();
        let outcome = engine
            .submit_oracle_data(&oracle(), ev(1), &user("alice"), 80, &SIG)
            .unwrap();
        assert_eq!(outcome.score, 100);
        assert_eq!(outcome.multiplier, 150);
        let v = engine.verification(ev(1), &user("alice")).unwrap();
        assert_eq!(v.reduction_kwh, 20);
        assert!(engine.is_verified(ev(1), &user("alice")));
        assert_eq!(sig_oracle.calls(), vec![(ev(1), user("alice"), 80, 1)]);
    }

    #[test]
    fn oracle_data_rejects_short_signature_before_oracle_call() {
        let (mut engine, sig_oracle) = ended_event_with_alice();
        let err = engine
            .submit_oracle_data(&oracle(), ev(1), &user("alice"), 80, &[0u8; 64])
            .unwrap_err();
        assert_eq!(
            err,
            VerificationError::InvalidSignatureLength {
                expected: SIGNATURE_LEN,
                got: 64
            }
        );
        assert!(sig_oracle.calls().is_empty());
    }

    #[test]
    fn oracle_data_requires_ended_event() {
        let (mut engine, _) = make_engine();
        engine.create_event(&oracle(), ev(1), t(0), t(100), t(0)).unwrap();
        engine
            .submit_commitment(&user("alice"), ev(1), 20, 50, 100, t(1))
            .unwrap();
        let err = engine
            .submit_oracle_data(&oracle(), ev(1), &user("alice"), 80, &SIG)
            .unwrap_err();
        assert_eq!(err, VerificationError::EventStillActive(ev(1)));
        assert!(engine.verification(ev(1), &user("alice")).is_none());
    }

    #[test]
    fn oracle_data_requires_commitment() {
        let (mut engine, _) = ended_event_with_alice();
        let err = engine
            .submit_oracle_data(&oracle(), ev(1), &user("bob"), 80, &SIG)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn oracle_data_is_written_once() {
        let (mut engine, _) = ended_event_with_alice();
        engine
            .submit_oracle_data(&oracle(), ev(1), &user("alice"), 80, &SIG)
            .unwrap();
        let err = engine
            .submit_oracle_data(&oracle(), ev(1), &user("alice"), 10, &SIG)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyDone);
        assert_eq!(engine.verification(ev(1), &user("alice")).unwrap().actual_kwh, 80);
    }

    #[test]
    fn rejected_signature_records_nothing() {
        let mut engine = VerificationEngine::new(oracle(), treasury(), NullOracle::rejecting());
        engine.create_event(&oracle(), ev(1), t(0), t(100), t(0)).unwrap();
        engine
            .submit_commitment(&user("alice"), ev(1), 20, 50, 100, t(10))
            .unwrap();
        engine.end_event(&oracle(), ev(1)).unwrap();
        let err = engine
            .submit_oracle_data(&oracle(), ev(1), &user("alice"), 80, &SIG)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VerificationFailed);
        assert!(engine.verification(ev(1), &user("alice")).is_none());
    }

    #[test]
    fn oracle_verdict_can_flip_between_readings() {
        let (mut engine, sig_oracle) = ended_event_with_alice();
        sig_oracle.set_accept(false);
        assert_eq!(
            engine.submit_oracle_data(&oracle(), ev(1), &user("alice"), 80, &SIG),
            Err(VerificationError::SignatureRejected)
        );
        sig_oracle.set_accept(true);
        assert!(engine
            .submit_oracle_data(&oracle(), ev(1), &user("alice"), 80, &SIG)
            .is_ok());
    }

    #[test]
    fn only_oracle_submits_readings() {
        let (mut engine, _) = ended_event_with_alice();
        let err = engine
            .submit_oracle_data(&user("alice"), ev(1), &user("alice"), 0, &SIG)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn batch_over_limit_is_rejected() {
        let (mut engine, _) = make_engine();
        let users = vec![user("user"); 201];
        let mut balances = MemoryBalanceStore::new();
        let err = engine
            .batch_verify_and_slash(&oracle(), ev(1), &users, &mut balances)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BatchLimitExceeded);
    }

    #[test]
    fn underperformer_is_slashed_once() {
        let (mut engine, _) = ended_event_with_alice();
        // 100 → 95 is a 5% reduction against a 20% pledge: score 5.
        engine
            .submit_oracle_data(&oracle(), ev(1), &user("alice"), 95, &SIG)
            .unwrap();
        let mut balances = MemoryBalanceStore::new();
        balances.credit(&user("alice"), 80).unwrap();

        let users = [user("alice")];
        let outcome = engine
            .batch_verify_and_slash(&oracle(), ev(1), &users, &mut balances)
            .unwrap();
        assert_eq!(outcome, BatchOutcome { processed: 1, succeeded: 1 });
        assert_eq!(balances.balance(&user("alice")), 30);
        assert_eq!(balances.balance(&treasury()), 50);
        assert_eq!(
            engine.commitment(ev(1), &user("alice")).unwrap().stake,
            StakeStatus::Slashed
        );

        let again = engine
            .batch_verify_and_slash(&oracle(), ev(1), &users, &mut balances)
            .unwrap();
        assert_eq!(again.succeeded, 0);
        assert_eq!(balances.balance(&user("alice")), 30);
    }

    #[test]
    fn slashing_skips_good_scores_unverified_and_unfunded_users() {
        let (mut engine, _) = make_engine();
        engine.create_event(&oracle(), ev(1), t(0), t(100), t(0)).unwrap();
        for name in ["good", "broke", "silent"] {
            engine
                .submit_commitment(&user(name), ev(1), 20, 50, 100, t(1))
                .unwrap();
        }
        engine.end_event(&oracle(), ev(1)).unwrap();
        engine
            .submit_oracle_data(&oracle(), ev(1), &user("good"), 70, &SIG)
            .unwrap();
        engine
            .submit_oracle_data(&oracle(), ev(1), &user("broke"), 100, &SIG)
            .unwrap();

        let mut balances = MemoryBalanceStore::new();
        balances.credit(&user("good"), 100).unwrap();
        balances.credit(&user("broke"), 10).unwrap();

        let users = [user("good"), user("broke"), user("silent"), user("stranger")];
        let outcome = engine
            .batch_verify_and_slash(&oracle(), ev(1), &users, &mut balances)
            .unwrap();
        assert_eq!(outcome, BatchOutcome { processed: 4, succeeded: 0 });
        assert_eq!(balances.balance(&user("good")), 100);
        assert_eq!(balances.balance(&user("broke")), 10);
        assert_eq!(
            engine.commitment(ev(1), &user("broke")).unwrap().stake,
            StakeStatus::Locked
        );
    }

    #[test]
    fn score_and_reward_queries() {
        let (mut engine, _) = ended_event_with_alice();
        assert_eq!(
            engine.get_score(ev(1), &user("alice")).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        // 10% reduction against a 20% pledge: score 10, multiplier 15.
        engine
            .submit_oracle_data(&oracle(), ev(1), &user("alice"), 90, &SIG)
            .unwrap();
        assert_eq!(engine.get_score(ev(1), &user("alice")), Ok(10));
        assert_eq!(engine.calculate_reward(ev(1), &user("alice"), 4), Ok(60));
    }

    #[test]
    fn zero_score_has_no_reward() {
        let (mut engine, _) = ended_event_with_alice();
        engine
            .submit_oracle_data(&oracle(), ev(1), &user("alice"), 100, &SIG)
            .unwrap();
        assert_eq!(
            engine.calculate_reward(ev(1), &user("alice"), 1000),
            Err(VerificationError::ZeroMultiplier)
        );
    }

    #[test]
    fn parameter_setters_enforce_bounds() {
        let (mut engine, _) = make_engine();
        let o = oracle();
        assert_eq!(engine.set_min_score(&o, 101), Err(VerificationError::InvalidScore(101)));
        assert_eq!(engine.set_penalty_rate(&o, 101), Err(VerificationError::InvalidPenalty(101)));
        assert_eq!(
            engine.set_reward_multiplier(&o, 0),
            Err(VerificationError::InvalidMultiplier)
        );
        engine.set_min_score(&o, 60).unwrap();
        engine.set_penalty_rate(&o, 30).unwrap();
        engine.set_reward_multiplier(&o, 200).unwrap();
        assert_eq!(engine.params().min_score, 60);
        assert_eq!(engine.params().penalty_rate, 30);
        assert_eq!(engine.params().reward_multiplier, 200);
    }

    #[test]
    fn batch_limit_can_only_be_lowered() {
        let (mut engine, _) = make_engine();
        engine.set_batch_limit(&oracle(), 50).unwrap();
        assert_eq!(engine.params().batch_limit, 50);
        assert_eq!(
            engine.set_batch_limit(&oracle(), 51).unwrap_err().kind(),
            ErrorKind::BatchLimitExceeded
        );
    }

    #[test]
    fn oracle_hand_over() {
        let (mut engine, _) = make_engine();
        engine.set_oracle(&oracle(), user("oracle2")).unwrap();
        assert_eq!(engine.oracle(), &user("oracle2"));
        assert_eq!(
            engine.set_oracle(&oracle(), user("x")).unwrap_err().kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            engine.set_oracle(&user("oracle2"), Principal::null()).unwrap_err().kind(),
            ErrorKind::InvalidIdentifier
        );
    }

    #[test]
    fn with_params_validates_bounds() {
        let params = EngineParams {
            min_score: 101,
            ..EngineParams::default()
        };
        assert!(VerificationEngine::with_params(
            oracle(),
            treasury(),
            NullOracle::accepting(),
            params
        )
        .is_err());
    }

    #[test]
    fn batch_limit_cannot_start_above_bound() {
        let params = EngineParams {
            batch_limit: 10_000,
            ..EngineParams::default()
        };
        let err = VerificationEngine::with_params(oracle(), treasury(), NullOracle::accepting(), params)
            .err()
            .expect("raised limit is rejected");
        assert_eq!(
            err,
            VerificationError::BatchLimitExceeded {
                len: 10_000,
                limit: MAX_BATCH_LIMIT
            }
        );
    }

    #[test]
    fn lifecycle_emits_events() {
        let (mut engine, _) = ended_event_with_alice();
        engine
            .submit_oracle_data(&oracle(), ev(1), &user("alice"), 90, &SIG)
            .unwrap();
        let events = engine.drain_events();
        assert_eq!(
            events,
            vec![
                EngineEvent::EventCreated {
                    event: ev(1),
                    start: t(0),
                    end: t(100)
                },
                EngineEvent::Committed {
                    event: ev(1),
                    user: user("alice"),
                    nonce: 1
                },
                EngineEvent::EventEnded { event: ev(1) },
                EngineEvent::ReadingVerified {
                    event: ev(1),
                    user: user("alice"),
                    score: 10
                },
            ]
        );
        assert!(engine.drain_events().is_empty());
    }
}
