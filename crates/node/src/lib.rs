//! # Shardnode
//!
//! Wires the epoch clock, guarded accounts, evidence gathering and the
//! proofs pool of a node from one [`Config`].
//!
//! ## Components
//!
//! - [`EpochClock`] - injected into every epoch-aware component at startup
//! - [`GuardedAccountHandler`] - the live service, or the disabled sentinel
//!   when `[guardian] enabled = false`
//! - [`MultipleProposalDetector`] - proposer evidence for the last
//!   `[slashing] max_rounds` rounds
//! - [`ProofsPool`] - aggregated header proofs per shard
//!
//! ## Example
//!
//! ```rust
//! use shardnode::Node;
//! use shardnode_config::Config;
//!
//! let config = Config::from_str("[epoch]\nrounds_per_epoch = 100\n").unwrap();
//! let node = Node::new(config).unwrap();
//!
//! node.on_round(250);
//! assert_eq!(node.current_epoch(), 2);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use shardnode_config::Config;
use shardnode_core::{EpochNotifier, RlpMarshaller};
use shardnode_datapool::ProofsPool;
use shardnode_epoch::{EpochClock, RoundSchedule};
use shardnode_guardian::{DisabledGuardedAccount, GuardedAccountHandler, GuardedAccountService};
use shardnode_slashing::{HeaderInfo, MultipleProposalDetector, MultipleProposalProof};
use shardnode_types::{Epoch, Nonce, Round, ShardId};

/// Node-side state shared by the processing pipelines.
pub struct Node {
    config: Config,
    clock: Arc<EpochClock>,
    schedule: RoundSchedule,
    guardians: Arc<dyn GuardedAccountHandler>,
    evidence: MultipleProposalDetector,
    proofs: Arc<ProofsPool>,
}

impl Node {
    /// Build every component from `config`.
    pub fn new(config: Config) -> Result<Self> {
        config.validate().context("invalid configuration")?;

        let schedule = RoundSchedule::new(config.epoch.rounds_per_epoch, config.epoch.start_round)
            .context("invalid round schedule")?;
        let clock = Arc::new(EpochClock::new(config.epoch.start_epoch));

        let guardians: Arc<dyn GuardedAccountHandler> = if config.guardian.enabled {
            GuardedAccountService::new(
                RlpMarshaller,
                clock.as_ref(),
                config.guardian.activation_delay_epochs,
            )
            .context("failed to create guarded account service")?
        } else {
            debug!("Guarded accounts disabled");
            Arc::new(DisabledGuardedAccount)
        };

        let evidence = MultipleProposalDetector::new(config.slashing.max_rounds)
            .context("failed to create evidence cache")?;

        info!(
            start_epoch = config.epoch.start_epoch,
            rounds_per_epoch = schedule.rounds_per_epoch(),
            guardians_enabled = !guardians.is_empty(),
            max_rounds = config.slashing.max_rounds,
            "Node components initialized"
        );

        Ok(Self {
            config,
            clock,
            schedule,
            guardians,
            evidence,
            proofs: Arc::new(ProofsPool::new()),
        })
    }

    /// Load the configuration at `path` and build the node.
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let config = Config::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?;
        Self::new(config)
    }

    /// Advance the epoch clock to the epoch of `round`.
    ///
    /// Returns `true` when a new epoch was confirmed.
    pub fn on_round(&self, round: Round) -> bool {
        self.clock.observe_round(&self.schedule, round)
    }

    /// Record a received header and check its proposer for multiple proposals.
    pub fn on_header(
        &self,
        header: HeaderInfo,
        current_round: Round,
    ) -> Result<Option<MultipleProposalProof>> {
        Ok(self.evidence.check_proposal(header, current_round)?)
    }

    /// Drop the proofs of `shard_id` below the finalized `nonce`.
    pub fn on_finalized_nonce(&self, shard_id: ShardId, nonce: Nonce) -> Result<()> {
        self.proofs
            .cleanup_proofs_behind_nonce(shard_id, nonce)
            .with_context(|| format!("failed to clean up proofs of shard {shard_id}"))
    }

    /// Current epoch.
    pub fn current_epoch(&self) -> Epoch {
        self.clock.current_epoch()
    }

    /// Loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Epoch clock.
    pub fn clock(&self) -> &Arc<EpochClock> {
        &self.clock
    }

    /// Round schedule.
    pub fn schedule(&self) -> &RoundSchedule {
        &self.schedule
    }

    /// Guarded account handler.
    pub fn guardians(&self) -> &Arc<dyn GuardedAccountHandler> {
        &self.guardians
    }

    /// Multiple-proposal detector.
    pub fn evidence(&self) -> &MultipleProposalDetector {
        &self.evidence
    }

    /// Proofs pool.
    pub fn proofs(&self) -> &Arc<ProofsPool> {
        &self.proofs
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("clock", &self.clock)
            .field("schedule", &self.schedule)
            .field("guardians_enabled", &!self.guardians.is_empty())
            .field("evidence", &self.evidence)
            .field("proofs", &self.proofs)
            .finish()
    }
}
