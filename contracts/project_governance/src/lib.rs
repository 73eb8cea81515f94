//! # Project Governance
//!
//! Token-weighted proposals and voting for one project. Each proposal walks
//! a fixed state machine:
//!
//! ```text
//! Pending ──► Active ──► Succeeded ──► Queued ──► Executed
//!                   └──► Defeated              └► Expired
//! (Canceled is reachable from any pre-execution state.)
//! ```
//!
//! Voting weight is the voter's token balance at the moment the ballot is
//! cast, not a snapshot taken at proposal creation. Tokens moved after
//! voting therefore do not retract the ballot, and tokens acquired during
//! the window can vote at full weight.
//!
//! A passed proposal executes a list of cross-contract calls. Targets
//! authenticate the governance contract by the direct-invoker rule, so the
//! encoded arguments name this contract wherever the target expects a
//! caller.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, symbol_short, Address, Env, String, Val, Vec};

mod storage;
mod types;


use project_token::ProjectTokenClient;

use storage::{
    bump_instance, next_proposal_id, proposal_count, read_config, read_handle, read_proposal,
    read_receipt, write_config, write_proposal, write_receipt, DataKey,
};
pub use types::{
    GovernanceConfig, Proposal, ProposalAction, ProposalStatus, VoteChoice, VoteReceipt,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum GovernanceError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidParams = 4,
    GovernanceInactive = 5,
    /// Proposer's token balance is below the proposal threshold.
    BelowProposalThreshold = 6,
    ProposalNotFound = 7,
    /// Vote attempted outside the proposal's voting window.
    ProposalNotActive = 8,
    AlreadyVoted = 9,
    /// Voter holds no tokens, so the ballot would weigh nothing.
    ZeroVoteWeight = 10,
    ProposalNotSucceeded = 11,
    ProposalNotQueued = 12,
    /// Execute attempted before the timelock ran out.
    TimelockNotExpired = 13,
    /// Cancel attempted on an executed or already-canceled proposal.
    AlreadyFinalized = 14,
}

/// Seconds between a proposal passing and becoming executable.
pub const EXECUTION_DELAY: u64 = 2 * 24 * 60 * 60;
/// Seconds a queued proposal stays executable before it lapses.
pub const GRACE_PERIOD: u64 = 14 * 24 * 60 * 60;

fn token_client(env: &Env) -> Result<ProjectTokenClient, GovernanceError> {
    let addr = read_handle(env, &DataKey::Token)?;
    Ok(ProjectTokenClient::new(env, &addr))
}

/// Quorum is measured across every ballot cast, abstentions included.
fn quorum_reached(env: &Env, proposal: &Proposal, quorum_numerator: u32) -> Result<bool, GovernanceError> {
    let supply = token_client(env)?.total_supply();
    let quorum_votes = supply * i128::from(quorum_numerator) / 100;
    let participating = proposal.for_votes + proposal.against_votes + proposal.abstain_votes;
    Ok(participating >= quorum_votes)
}

fn status_of(env: &Env, proposal: &Proposal) -> Result<ProposalStatus, GovernanceError> {
    if proposal.canceled {
        return Ok(ProposalStatus::Canceled);
    }
    if proposal.executed {
        return Ok(ProposalStatus::Executed);
    }
    let now = env.ledger().timestamp();
    if now < proposal.start_time {
        return Ok(ProposalStatus::Pending);
    }
    // The window is inclusive on both ends.
    if now <= proposal.end_time {
        return Ok(ProposalStatus::Active);
    }

    let config = read_config(env)?;
    let passed = quorum_reached(env, proposal, config.quorum_numerator)?
        && proposal.for_votes > proposal.against_votes;
    if !passed {
        return Ok(ProposalStatus::Defeated);
    }
    if proposal.eta == 0 {
        return Ok(ProposalStatus::Succeeded);
    }
    if now > proposal.eta + GRACE_PERIOD {
        Ok(ProposalStatus::Expired)
    } else {
        Ok(ProposalStatus::Queued)
    }
}

#[contract]
pub struct ProjectGovernance;

#[contractimpl]
impl ProjectGovernance {
    /// Wire governance to its token. Called once by the factory right after
    /// deployment.
    pub fn initialize(
        env: Env,
        sponsor: Address,
        token: Address,
        voting_delay: u64,
        voting_period: u64,
        proposal_threshold: i128,
        quorum_numerator: u32,
    ) -> Result<(), GovernanceError> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(GovernanceError::AlreadyInitialized);
        }
        if voting_period == 0 || proposal_threshold <= 0 || quorum_numerator > 100 {
            return Err(GovernanceError::InvalidParams);
        }
        env.storage().instance().set(&DataKey::Sponsor, &sponsor);
        env.storage().instance().set(&DataKey::Token, &token);
        write_config(
            &env,
            &GovernanceConfig {
                voting_delay,
                voting_period,
                proposal_threshold,
                quorum_numerator,
                is_active: true,
            },
        );
        Ok(())
    }

    /// Create a proposal. The proposer must hold at least the threshold
    /// balance when the proposal is created.
    pub fn propose(
        env: Env,
        proposer: Address,
        description: String,
        actions: Vec<ProposalAction>,
    ) -> Result<u64, GovernanceError> {
        proposer.require_auth();
        let config = read_config(&env)?;
        if !config.is_active {
            return Err(GovernanceError::GovernanceInactive);
        }
        if actions.is_empty() {
            return Err(GovernanceError::InvalidParams);
        }
        if token_client(&env)?.balance(&proposer) < config.proposal_threshold {
            return Err(GovernanceError::BelowProposalThreshold);
        }

        let id = next_proposal_id(&env);
        let now = env.ledger().timestamp();
        let start_time = now + config.voting_delay;
        write_proposal(
            &env,
            &Proposal {
                id,
                proposer: proposer.clone(),
                description,
                actions,
                start_time,
                end_time: start_time + config.voting_period,
                for_votes: 0,
                against_votes: 0,
                abstain_votes: 0,
                eta: 0,
                executed: false,
                canceled: false,
            },
        );
        bump_instance(&env);

        env.events()
            .publish((symbol_short!("prop_new"), proposer), id);
        Ok(id)
    }

    /// Cast one ballot. Weight is the voter's token balance right now.
    pub fn cast_vote(
        env: Env,
        voter: Address,
        proposal_id: u64,
        choice: VoteChoice,
        reason: String,
    ) -> Result<i128, GovernanceError> {
        voter.require_auth();
        let mut proposal = read_proposal(&env, proposal_id)?;
        if status_of(&env, &proposal)? != ProposalStatus::Active {
            return Err(GovernanceError::ProposalNotActive);
        }
        if read_receipt(&env, proposal_id, &voter).is_some() {
            return Err(GovernanceError::AlreadyVoted);
        }

        let weight = token_client(&env)?.balance(&voter);
        if weight <= 0 {
            return Err(GovernanceError::ZeroVoteWeight);
        }

        match choice {
            VoteChoice::For => proposal.for_votes += weight,
            VoteChoice::Against => proposal.against_votes += weight,
            VoteChoice::Abstain => proposal.abstain_votes += weight,
        }
        write_proposal(&env, &proposal);
        write_receipt(
            &env,
            proposal_id,
            &VoteReceipt {
                voter: voter.clone(),
                choice,
                weight,
                reason,
            },
        );

        env.events()
            .publish((symbol_short!("vote"), voter), (proposal_id, weight));
        Ok(weight)
    }

    /// Queue a passed proposal for execution after the timelock.
    /// Permissionless: anyone may move a Succeeded proposal along.
    pub fn queue(env: Env, proposal_id: u64) -> Result<u64, GovernanceError> {
        let mut proposal = read_proposal(&env, proposal_id)?;
        if status_of(&env, &proposal)? != ProposalStatus::Succeeded {
            return Err(GovernanceError::ProposalNotSucceeded);
        }
        let eta = env.ledger().timestamp() + EXECUTION_DELAY;
        proposal.eta = eta;
        write_proposal(&env, &proposal);

        env.events()
            .publish((symbol_short!("queued"), proposal_id), eta);
        Ok(eta)
    }

    /// Run a queued proposal's actions. Permissionless once the timelock
    /// has passed. The executed flag is set before any external call.
    pub fn execute(env: Env, proposal_id: u64) -> Result<(), GovernanceError> {
        let mut proposal = read_proposal(&env, proposal_id)?;
        if status_of(&env, &proposal)? != ProposalStatus::Queued {
            return Err(GovernanceError::ProposalNotQueued);
        }
        if env.ledger().timestamp() < proposal.eta {
            return Err(GovernanceError::TimelockNotExpired);
        }

        proposal.executed = true;
        write_proposal(&env, &proposal);

        for action in proposal.actions.iter() {
            env.invoke_contract::<Val>(&action.target, &action.function, action.args.clone());
        }

        env.events()
            .publish((symbol_short!("executed"),), proposal_id);
        Ok(())
    }

    /// Withdraw a proposal before it executes. Proposer or sponsor only.
    pub fn cancel(env: Env, caller: Address, proposal_id: u64) -> Result<(), GovernanceError> {
        caller.require_auth();
        let mut proposal = read_proposal(&env, proposal_id)?;
        let sponsor = read_handle(&env, &DataKey::Sponsor)?;
        if caller != proposal.proposer && caller != sponsor {
            return Err(GovernanceError::Unauthorized);
        }
        if proposal.executed || proposal.canceled {
            return Err(GovernanceError::AlreadyFinalized);
        }
        proposal.canceled = true;
        write_proposal(&env, &proposal);

        env.events()
            .publish((symbol_short!("prop_cxl"),), proposal_id);
        Ok(())
    }

    /// Adjust the voting parameters. Callable by the sponsor or by this
    /// contract itself (the path a passed proposal takes).
    pub fn update_config(
        env: Env,
        caller: Address,
        config: GovernanceConfig,
    ) -> Result<(), GovernanceError> {
        caller.require_auth();
        let sponsor = read_handle(&env, &DataKey::Sponsor)?;
        if caller != sponsor && caller != env.current_contract_address() {
            return Err(GovernanceError::Unauthorized);
        }
        if config.voting_period == 0 || config.proposal_threshold <= 0 || config.quorum_numerator > 100
        {
            return Err(GovernanceError::InvalidParams);
        }
        write_config(&env, &config);
        Ok(())
    }

    // ── Read side ────────────────────────────────────────────────────

    pub fn get_config(env: Env) -> Result<GovernanceConfig, GovernanceError> {
        read_config(&env)
    }

    pub fn get_proposal(env: Env, proposal_id: u64) -> Result<Proposal, GovernanceError> {
        read_proposal(&env, proposal_id)
    }

    pub fn get_proposal_count(env: Env) -> u64 {
        proposal_count(&env)
    }

    pub fn proposal_status(env: Env, proposal_id: u64) -> Result<ProposalStatus, GovernanceError> {
        let proposal = read_proposal(&env, proposal_id)?;
        status_of(&env, &proposal)
    }

    pub fn get_vote(env: Env, proposal_id: u64, voter: Address) -> Option<VoteReceipt> {
        read_receipt(&env, proposal_id, &voter)
    }

    pub fn has_voted(env: Env, proposal_id: u64, voter: Address) -> bool {
        read_receipt(&env, proposal_id, &voter).is_some()
    }
}
