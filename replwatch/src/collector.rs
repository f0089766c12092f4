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

//! Replica collector - one collection cycle per call
//!
//! Ties together:
//! - Deployment classification and principal selection
//! - Replication lag and vote share of the principal
//! - Member state transitions, reported by the replica-set primary only
//!
//! Scheduling belongs to the caller; at most one `collect` runs at a time per
//! collector since it takes `&mut self`.

use crate::client::{CheckSink, ClusterClient};
use crate::config::CollectorConfig;
use crate::identity::ServerIdentity;
use anyhow::{Context, Result};
use replwatch_quorum::{ReplSetMetrics, compute};
use replwatch_topology::{DeploymentDescriptor, StateTracker};
use tracing::{debug, info};

/// Outcome of one successful collection cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionReport {
    pub deployment: DeploymentDescriptor,

    /// Replica-set record handed to the sink, `None` outside replica sets
    pub metrics: Option<ReplSetMetrics>,

    /// Number of state-transition events handed to the sink
    pub events_emitted: usize,
}

/// Collector for one monitored server
///
/// Owns its own state tracker; collectors of different replica sets never
/// share state.
#[derive(Debug)]
pub struct ReplicaCollector {
    config: CollectorConfig,
    identity: ServerIdentity,
    tracker: StateTracker,
    deployment: Option<DeploymentDescriptor>,
}

impl ReplicaCollector {
    /// Create a collector for the configured server
    pub fn new(config: CollectorConfig) -> Self {
        let identity = ServerIdentity::from_uri(&config.server, config.agent_hostname.as_deref());
        info!(
            server = %identity.clean_server_name(),
            hostname = %identity.hostname(),
            in_shard = config.in_shard,
            "Initializing replica collector"
        );

        Self {
            config,
            identity,
            tracker: StateTracker::new(),
            deployment: None,
        }
    }

    /// Run one collection cycle
    ///
    /// Every command is issued before anything is committed or submitted: a
    /// failed command aborts the cycle and leaves the tracker untouched, so the
    /// next cycle compares against the last complete snapshot.
    ///
    /// # Arguments
    ///
    /// * `client` - Connection to the monitored server
    /// * `sink` - Receives the replica-set record and transition events
    pub async fn collect<C, S>(&mut self, client: &C, sink: &S) -> Result<CollectionReport>
    where
        C: ClusterClient,
        S: CheckSink,
    {
        let payload = client
            .deployment_status()
            .await
            .context("Failed to read deployment status")?;
        let deployment = DeploymentDescriptor::classify(&payload, self.config.in_shard);

        if !deployment.is_replica_member() {
            self.note_deployment(&deployment);
            return Ok(CollectionReport {
                deployment,
                metrics: None,
                events_emitted: 0,
            });
        }

        let status = client
            .replica_set_status()
            .await
            .context("replSetGetStatus failed")?;

        let principal = deployment.is_principal();
        let repl_config = if principal {
            client
                .replica_set_config()
                .await
                .context("Failed to read replica set configuration")?
        } else {
            None
        };

        // all reads succeeded, commit from here on
        self.note_deployment(&deployment);

        let metrics = if principal {
            compute(&status, repl_config.as_ref())
        } else {
            ReplSetMetrics::state_only(status.own_state)
        };
        sink.submit_replset(&metrics, &self.replset_tags(&deployment));

        let mut events_emitted = 0;
        if deployment.is_primary() {
            let events = self
                .tracker
                .observe(&status.members, &status.set_name, self.identity.clean_server_name());
            events_emitted = events.len();
            for event in events {
                sink.submit_event(event);
            }
        } else {
            self.tracker.record(&status.members);
        }

        debug!(
            set_name = %status.set_name,
            principal,
            members = status.members.len(),
            events = events_emitted,
            "Collection cycle completed"
        );

        Ok(CollectionReport {
            deployment,
            metrics: Some(metrics),
            events_emitted,
        })
    }

    /// Deployment observed on the last successful cycle
    pub fn deployment(&self) -> Option<&DeploymentDescriptor> {
        self.deployment.as_ref()
    }

    pub fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    pub fn tracker(&self) -> &StateTracker {
        &self.tracker
    }

    fn note_deployment(&mut self, deployment: &DeploymentDescriptor) {
        if self.deployment.as_ref() == Some(deployment) {
            return;
        }

        info!(
            server = %self.identity.clean_server_name(),
            old = ?self.deployment,
            new = ?deployment,
            "Deployment type changed"
        );
        self.deployment = Some(deployment.clone());
    }

    fn replset_tags(&self, deployment: &DeploymentDescriptor) -> Vec<String> {
        let mut tags = self.config.tags.clone();
        tags.push(format!("server:{}", self.identity.hostname()));
        if let DeploymentDescriptor::ReplicaMember {
            set_name, own_state_name, ..
        } = deployment
        {
            tags.push(format!("replset_name:{set_name}"));
            tags.push(format!("replset_state:{own_state_name}"));
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use replwatch_topology::states::{PRIMARY, SECONDARY};
    use replwatch_topology::{MemberSnapshot, ReplicaSetConfig, ReplicaSetStatus, StatusPayload, TransitionEvent};
    use std::sync::Mutex;

    struct FixedClient {
        payload: StatusPayload,
        status: ReplicaSetStatus,
    }

    #[async_trait]
    impl ClusterClient for FixedClient {
        async fn deployment_status(&self) -> Result<StatusPayload> {
            Ok(self.payload.clone())
        }

        async fn replica_set_status(&self) -> Result<ReplicaSetStatus> {
            Ok(self.status.clone())
        }

        async fn replica_set_config(&self) -> Result<Option<ReplicaSetConfig>> {
            Ok(None)
        }
    }

    #[derive(Default)]
    struct NullSink {
        tags: Mutex<Vec<String>>,
    }

    impl CheckSink for NullSink {
        fn submit_replset(&self, _metrics: &ReplSetMetrics, tags: &[String]) {
            *self.tags.lock().unwrap() = tags.to_vec();
        }

        fn submit_event(&self, _event: TransitionEvent) {}
    }

    #[test]
    fn test_collector_creation() {
        let collector = ReplicaCollector::new(CollectorConfig::default());

        assert!(collector.deployment().is_none());
        assert!(collector.tracker().memory().is_empty());
        assert_eq!(collector.identity().hostname(), "localhost");
    }

    #[tokio::test]
    async fn test_secondary_reports_state_only() {
        let config = CollectorConfig {
            server: "mongodb://db1:27017".to_string(),
            tags: vec!["env:test".to_string()],
            ..CollectorConfig::default()
        };
        let mut collector = ReplicaCollector::new(config);
        let client = FixedClient {
            payload: StatusPayload::replica_member("rs0", SECONDARY),
            status: ReplicaSetStatus {
                set_name: "rs0".to_string(),
                own_state: SECONDARY,
                members: vec![
                    MemberSnapshot::new(0, PRIMARY, "db0:27017"),
                    MemberSnapshot::new(1, SECONDARY, "db1:27017").with_self().with_health(1.0),
                ],
            },
        };
        let sink = NullSink::default();

        let report = collector.collect(&client, &sink).await.unwrap();

        assert_eq!(report.metrics, Some(ReplSetMetrics::state_only(SECONDARY)));
        assert_eq!(report.events_emitted, 0);
        assert_eq!(collector.tracker().memory().len(), 2);
        assert_eq!(
            *sink.tags.lock().unwrap(),
            vec![
                "env:test".to_string(),
                "server:db1".to_string(),
                "replset_name:rs0".to_string(),
                "replset_state:secondary".to_string(),
            ]
        );
    }
}
