// Copyright 2024 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Replication lag and vote share computation

use crate::error::VoteShareError;
use replwatch_topology::{MemberSnapshot, ReplicaSetConfig, ReplicaSetStatus};
use serde::Serialize;
use tracing::{debug, warn};

/// Replica-set metrics reported for one poll
///
/// Derived fields are `None` when their inputs were missing; they are never
/// defaulted to zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplSetMetrics {
    /// State code of the polled node, always present
    pub state: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<f64>,

    /// Seconds the polled node trails the primary; may be slightly negative
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replication_lag: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes: Option<i64>,

    /// Share of the configured election votes held by the polled node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_fraction: Option<f64>,
}

impl ReplSetMetrics {
    /// Record carrying only the node state
    pub fn state_only(state: i32) -> Self {
        Self {
            state,
            health: None,
            replication_lag: None,
            votes: None,
            vote_fraction: None,
        }
    }
}

/// Votes held by one member against the whole configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoteShare {
    pub votes: i64,
    pub total: i64,
    pub fraction: f64,
}

/// Lag of `current` behind `primary` in seconds
///
/// Returns `None` unless both members report an optime. Not clamped: cursor
/// skew can make it briefly negative.
pub fn replication_lag(primary: &MemberSnapshot, current: &MemberSnapshot) -> Option<f64> {
    let (Some(primary_optime), Some(current_optime)) = (primary.optime, current.optime) else {
        return None;
    };

    let lag = primary_optime - current_optime;
    // microseconds overflow only past ~292k years of skew
    let seconds = match lag.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => lag.num_seconds() as f64,
    };
    Some(seconds)
}

/// Vote share of `member_id` in the configuration
///
/// Members without a `votes` field count for one vote, and so does a member
/// missing from the configuration.
pub fn vote_share(config: Option<&ReplicaSetConfig>, member_id: i64) -> Result<VoteShare, VoteShareError> {
    let config = config.ok_or(VoteShareError::ConfigUnavailable)?;

    let total: i64 = config.members.iter().map(|member| member.votes()).sum();
    if total == 0 {
        return Err(VoteShareError::ZeroTotalVotes {
            members: config.members.len(),
        });
    }

    let votes = config
        .members
        .iter()
        .find(|member| member.id == member_id)
        .map(|member| member.votes())
        .unwrap_or(1);

    Ok(VoteShare {
        votes,
        total,
        fraction: votes as f64 / total as f64,
    })
}

/// Compute the replica-set metrics of the polled node
///
/// # Arguments
///
/// * `status` - Fresh `replSetGetStatus` snapshot
/// * `config` - Replica-set configuration, `None` if it could not be read
pub fn compute(status: &ReplicaSetStatus, config: Option<&ReplicaSetConfig>) -> ReplSetMetrics {
    let mut metrics = ReplSetMetrics::state_only(status.own_state);

    let current = status.current();
    let primary = status.primary();

    if let (Some(current), Some(primary)) = (current, primary) {
        metrics.replication_lag = replication_lag(primary, current);
    }

    let Some(current) = current else {
        debug!(set_name = %status.set_name, "Polled node not found among replica set members");
        return metrics;
    };

    metrics.health = current.health;

    match vote_share(config, current.id) {
        Ok(share) => {
            metrics.votes = Some(share.votes);
            metrics.vote_fraction = Some(share.fraction);
        }
        Err(e) => {
            warn!(set_name = %status.set_name, member_id = current.id, error = %e, "Skipping vote fraction");
        }
    }

    metrics
}
