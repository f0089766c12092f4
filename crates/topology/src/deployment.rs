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

//! Deployment classification and principal selection

use crate::states::{self, PRIMARY};
use crate::types::StatusPayload;
use serde::Serialize;
use tracing::warn;

/// `msg` value reported by a query router
pub const MEDIATOR_MSG: &str = "isdbgrid";

/// Shape of the deployment the monitored node belongs to
///
/// Descriptors compare structurally so the collector can detect topology
/// changes between two polls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeploymentDescriptor {
    /// Single node without replication
    Standalone,

    /// Stateless query router in front of a sharded cluster
    Mediator,

    /// Member of a replica set, possibly a shard of a routed cluster
    ReplicaMember {
        set_name: String,
        own_state_code: i32,
        /// Lower-cased short state name, e.g. `"secondary"`
        own_state_name: String,
        in_shard: bool,
        is_primary: bool,
    },
}

impl DeploymentDescriptor {
    /// Classify a node from its status payload
    ///
    /// # Arguments
    ///
    /// * `payload` - Status reported by the node
    /// * `in_shard` - Whether the deployment sits behind a query router
    pub fn classify(payload: &StatusPayload, in_shard: bool) -> Self {
        if payload.msg.as_deref() == Some(MEDIATOR_MSG) {
            return DeploymentDescriptor::Mediator;
        }

        let Some(set_name) = payload.set_name.as_ref() else {
            return DeploymentDescriptor::Standalone;
        };

        let own_state_code = payload.my_state.unwrap_or_else(|| {
            warn!(set_name = %set_name, "Replica set status without myState, assuming UNKNOWN");
            states::UNKNOWN
        });

        DeploymentDescriptor::ReplicaMember {
            set_name: set_name.clone(),
            own_state_code,
            own_state_name: states::state_name(own_state_code).to_lowercase(),
            in_shard,
            is_primary: own_state_code == PRIMARY,
        }
    }

    /// Whether this node is the single collection point of its deployment
    ///
    /// Inside a sharded cluster the router already plays that role, so shard
    /// primaries are never principal.
    pub fn is_principal(&self) -> bool {
        match self {
            DeploymentDescriptor::Standalone => true,
            DeploymentDescriptor::Mediator => true,
            DeploymentDescriptor::ReplicaMember {
                in_shard, own_state_code, ..
            } => !in_shard && *own_state_code == PRIMARY,
        }
    }

    /// Replica-set name, if the node is a replica member
    pub fn set_name(&self) -> Option<&str> {
        match self {
            DeploymentDescriptor::ReplicaMember { set_name, .. } => Some(set_name),
            _ => None,
        }
    }

    #[inline]
    pub fn is_replica_member(&self) -> bool {
        matches!(self, DeploymentDescriptor::ReplicaMember { .. })
    }

    /// Whether the node is the primary of its replica set
    #[inline]
    pub fn is_primary(&self) -> bool {
        matches!(self, DeploymentDescriptor::ReplicaMember { is_primary: true, .. })
    }
}
