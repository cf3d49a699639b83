// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{ElectionError, Proposal, VoterRegistry};
use tracing::{debug, warn};
use veil_acl::{AccessControlLedger, Handle, OperationId, Outcome, Principal};
use veil_arith::{Ciphertext, ConfidentialArithmetic, EncU64};
use veil_config::ElectionConfig;
use veil_events::{ElectionEvent, ElectionFailure, Stage};
use veil_fees::FeeCollector;

/// The election aggregate.
///
/// Owns the round state together with the arithmetic backend, the access-control ledger and the
/// fee collaborator. Every mutating entry point runs inside [`Election::run_operation`], which
/// makes it all-or-nothing: preconditions are checked first, new state is computed into locals,
/// and nothing is written back unless every step succeeded.
pub struct Election<B, F> {
    pub(crate) config: ElectionConfig,
    pub(crate) backend: B,
    pub(crate) acl: AccessControlLedger,
    pub(crate) fees: F,
    pub(crate) stage: Stage,
    pub(crate) round: u64,
    pub(crate) proposals: Vec<Proposal>,
    pub(crate) registry: VoterRegistry,
    pub(crate) total_votes: u64,
    pub(crate) encrypted_winner_id: Option<EncU64>,
    outbox: Vec<ElectionEvent>,
}

impl<B, F> Election<B, F>
where
    B: ConfidentialArithmetic,
    F: FeeCollector,
{
    /// Deploy an election with `config.num_proposals` fresh proposals.
    pub fn new(config: ElectionConfig, backend: B, fees: F) -> Result<Self, ElectionError> {
        let mut election = Self {
            config,
            backend,
            acl: AccessControlLedger::new(),
            fees,
            stage: Stage::Registration,
            round: 0,
            proposals: vec![],
            registry: VoterRegistry::default(),
            total_votes: 0,
            encrypted_winner_id: None,
            outbox: vec![],
        };

        let num_proposals = election.config.num_proposals;
        let op = election.acl.begin_operation()?;
        match election.create_proposals(num_proposals) {
            Ok(proposals) => {
                election.acl.end_operation(op, Outcome::Commit)?;
                election.proposals = proposals;
            }
            Err(err) => {
                election.acl.end_operation(op, Outcome::Abort)?;
                return Err(err);
            }
        }

        debug!(name = %election.config.name, num_proposals, "election deployed");
        Ok(election)
    }

    /// Run `f` as one atomic operation on behalf of `caller`.
    ///
    /// Persistent grants issued by `f` are committed only when it succeeds; transient grants are
    /// swept either way. On failure, events queued by `f` are discarded and a single
    /// [`ElectionFailure`] is queued instead.
    pub(crate) fn run_operation<T>(
        &mut self,
        caller: Principal,
        method: &'static str,
        f: impl FnOnce(&mut Self, OperationId) -> Result<T, ElectionError>,
    ) -> Result<T, ElectionError> {
        let op = self.acl.begin_operation()?;
        let queued = self.outbox.len();
        let result = f(self, op);

        match &result {
            Ok(_) => {
                self.acl.end_operation(op, Outcome::Commit)?;
            }
            Err(err) => {
                self.acl.end_operation(op, Outcome::Abort)?;
                self.outbox.truncate(queued);
                warn!(%op, %caller, method, kind = err.kind(), "operation rejected: {}", err);
                self.outbox.push(
                    ElectionFailure::new(op.value(), caller, method, err.kind(), err.to_string())
                        .into(),
                );
            }
        }

        result
    }

    pub(crate) fn emit(&mut self, event: impl Into<ElectionEvent>) {
        self.outbox.push(event.into());
    }

    /// Drain the events produced since the last call, in the order they happened.
    pub fn take_events(&mut self) -> Vec<ElectionEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub(crate) fn require_administrator(&self, caller: &Principal) -> Result<(), ElectionError> {
        if *caller != self.config.administrator {
            return Err(ElectionError::NotAuthorized { caller: *caller });
        }
        Ok(())
    }

    /// Grant holders may never take part, or they could decrypt running tallies.
    pub(crate) fn require_participant(&self, caller: &Principal) -> Result<(), ElectionError> {
        if *caller == self.config.administrator {
            return Err(ElectionError::AdministratorCannotParticipate);
        }
        if *caller == self.config.election_address {
            return Err(ElectionError::ElectionAddressCannotParticipate);
        }
        Ok(())
    }

    /// Grant a ciphertext that is about to be stored to the administrator and to the election
    /// itself. Staged until the operation commits.
    pub(crate) fn grant_stored(&mut self, handle: Handle) {
        self.acl.allow(handle, self.config.administrator);
        self.acl.allow(handle, self.config.election_address);
    }

    /// Grant an intermediate value for the rest of the current operation only.
    pub(crate) fn grant_transient(&mut self, handle: Handle) -> Result<(), ElectionError> {
        self.acl.allow_transient(handle, self.config.administrator)?;
        self.acl
            .allow_transient(handle, self.config.election_address)?;
        Ok(())
    }

    /// Trivially encrypt a public constant for use within the current operation.
    pub(crate) fn constant(&mut self, value: u64) -> Result<EncU64, ElectionError> {
        let ct = self.backend.encrypt(value)?;
        self.grant_transient(ct.handle())?;
        Ok(ct)
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Number of resets performed since deployment.
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Completed vote operations this round, including those that changed nothing.
    pub fn total_votes(&self) -> u64 {
        self.total_votes
    }

    pub fn voter_count(&self) -> usize {
        self.registry.len()
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_registered(&self, principal: &Principal) -> bool {
        self.registry.contains(principal)
    }

    pub fn encrypted_winner_id(&self) -> Option<EncU64> {
        self.encrypted_winner_id
    }

    pub fn required_fee(&self) -> u128 {
        self.config.required_fee
    }

    pub fn fee_balance(&self) -> u128 {
        self.fees.balance()
    }

    pub fn administrator(&self) -> Principal {
        self.config.administrator
    }

    pub fn election_address(&self) -> Principal {
        self.config.election_address
    }

    pub fn config(&self) -> &ElectionConfig {
        &self.config
    }

    pub fn acl(&self) -> &AccessControlLedger {
        &self.acl
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn fees(&self) -> &F {
        &self.fees
    }

    /// Encrypted running count of a proposal.
    pub fn encrypted_proposal_count(&self, id: usize) -> Result<EncU64, ElectionError> {
        self.proposals
            .get(id)
            .map(|p| p.count)
            .ok_or(ElectionError::InvalidProposalId {
                id,
                count: self.proposals.len(),
            })
    }

    /// Encrypted identifier a ballot must match to count for proposal `id`.
    pub fn encrypted_proposal_id(&self, id: usize) -> Result<EncU64, ElectionError> {
        self.proposals
            .get(id)
            .map(|p| p.id)
            .ok_or(ElectionError::InvalidProposalId {
                id,
                count: self.proposals.len(),
            })
    }

    /// Encrypted remaining quota of a registered voter.
    pub fn encrypted_remaining_votes(&self, voter: &Principal) -> Result<EncU64, ElectionError> {
        self.registry
            .get(voter)
            .map(|v| v.remaining_quota)
            .ok_or(ElectionError::NotRegistered(*voter))
    }
}
