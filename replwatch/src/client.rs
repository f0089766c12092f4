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

//! Boundaries to the database driver and to the metrics/event backend

use anyhow::Result;
use async_trait::async_trait;
use replwatch_quorum::ReplSetMetrics;
use replwatch_topology::{ReplicaSetConfig, ReplicaSetStatus, StatusPayload, TransitionEvent};

/// Commands the collector issues against the monitored server
///
/// Any error aborts the current collection cycle.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Payload used to classify the deployment (`isMaster` merged with the
    /// replica-set identity when the node has one)
    async fn deployment_status(&self) -> Result<StatusPayload>;

    /// `replSetGetStatus`
    async fn replica_set_status(&self) -> Result<ReplicaSetStatus>;

    /// Replica-set configuration document, `Ok(None)` if the server has none
    async fn replica_set_config(&self) -> Result<Option<ReplicaSetConfig>>;
}

/// Destination of collected metrics and events
pub trait CheckSink: Send + Sync {
    fn submit_replset(&self, metrics: &ReplSetMetrics, tags: &[String]);

    fn submit_event(&self, event: TransitionEvent);
}
