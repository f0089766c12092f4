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

//! Core data types for replica-set snapshots
//!
//! Field names follow the documents returned by `replSetGetStatus` and the
//! `local.system.replset` collection, so payloads deserialize as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One member entry of a `replSetGetStatus` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSnapshot {
    /// Member id, stable for the lifetime of the member and never reused
    #[serde(rename = "_id")]
    pub id: i64,

    /// Raw replica-set state code
    pub state: i32,

    /// `host:port` the member is known by
    #[serde(rename = "name")]
    pub hostname: String,

    /// Whether this entry describes the node that answered the command
    #[serde(rename = "self", default)]
    pub is_self: bool,

    /// Member health as reported by the server (1 = up, 0 = down)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<f64>,

    /// Timestamp of the last applied operation
    #[serde(rename = "optimeDate", default, skip_serializing_if = "Option::is_none")]
    pub optime: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<i64>,
}

impl MemberSnapshot {
    /// Create a member with only the identity fields set
    pub fn new(id: i64, state: i32, hostname: impl Into<String>) -> Self {
        Self {
            id,
            state,
            hostname: hostname.into(),
            is_self: false,
            health: None,
            optime: None,
            votes: None,
        }
    }

    pub fn with_self(mut self) -> Self {
        self.is_self = true;
        self
    }

    pub fn with_health(mut self, health: f64) -> Self {
        self.health = Some(health);
        self
    }

    pub fn with_optime(mut self, optime: DateTime<Utc>) -> Self {
        self.optime = Some(optime);
        self
    }
}

/// A `replSetGetStatus` snapshot, produced fresh on every poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicaSetStatus {
    #[serde(rename = "set")]
    pub set_name: String,

    /// State code of the node that answered the command
    #[serde(rename = "myState")]
    pub own_state: i32,

    #[serde(default)]
    pub members: Vec<MemberSnapshot>,
}

impl ReplicaSetStatus {
    /// The member flagged as `self`, if the server reported one
    pub fn current(&self) -> Option<&MemberSnapshot> {
        self.members.iter().find(|member| member.is_self)
    }

    /// The member currently in PRIMARY state
    ///
    /// Two primaries can briefly coexist during an election; the last one
    /// listed wins, the same way a linear scan over the payload would.
    pub fn primary(&self) -> Option<&MemberSnapshot> {
        self.members
            .iter()
            .rev()
            .find(|member| member.state == crate::states::PRIMARY)
    }
}

/// Voting entry of the replica-set configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMember {
    #[serde(rename = "_id")]
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<i64>,
}

impl ConfigMember {
    /// Configured votes, defaulting to one when the field is absent
    #[inline]
    pub fn votes(&self) -> i64 {
        self.votes.unwrap_or(1)
    }
}

/// Replica-set configuration document, only used for vote shares
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaSetConfig {
    #[serde(default)]
    pub members: Vec<ConfigMember>,
}

/// Status payload used to classify the deployment a node belongs to
///
/// `msg` is `"isdbgrid"` on a query router; `set`/`myState` are only present
/// on replica-set members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,

    #[serde(rename = "set", default, skip_serializing_if = "Option::is_none")]
    pub set_name: Option<String>,

    #[serde(rename = "myState", default, skip_serializing_if = "Option::is_none")]
    pub my_state: Option<i32>,
}

impl StatusPayload {
    pub fn mediator() -> Self {
        Self {
            msg: Some(crate::deployment::MEDIATOR_MSG.to_string()),
            ..Self::default()
        }
    }

    pub fn standalone() -> Self {
        Self::default()
    }

    pub fn replica_member(set_name: impl Into<String>, my_state: i32) -> Self {
        Self {
            msg: None,
            set_name: Some(set_name.into()),
            my_state: Some(my_state),
        }
    }
}
