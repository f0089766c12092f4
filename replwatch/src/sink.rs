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

//! Telemetry sink backed by the `metrics` facade
//!
//! Replica-set records become gauges (so any installed recorder, Prometheus or
//! OTLP, picks them up) and events are forwarded through a bounded mpsc
//! channel to whatever ships them. Events that do not fit are dropped with a
//! warning rather than blocking the collection cycle.

use crate::client::CheckSink;
use metrics::{Label, counter, gauge};
use replwatch_quorum::ReplSetMetrics;
use replwatch_topology::TransitionEvent;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

pub const GAUGE_STATE: &str = "mongodb.replset.state";
pub const GAUGE_HEALTH: &str = "mongodb.replset.health";
pub const GAUGE_REPLICATION_LAG: &str = "mongodb.replset.replicationlag";
pub const GAUGE_VOTES: &str = "mongodb.replset.votes";
pub const GAUGE_VOTE_FRACTION: &str = "mongodb.replset.votefraction";
pub const COUNTER_STATUS_CHANGES: &str = "mongodb.replset.member_status_changes";
pub const COUNTER_DROPPED_EVENTS: &str = "mongodb.replset.dropped_events";

/// Default number of undelivered events buffered by [`TelemetrySink`]
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Convert `key:value` tags into metric labels
///
/// Tags without a `:` keep their text under the `tag` key.
pub fn tags_to_labels(tags: &[String]) -> Vec<Label> {
    tags.iter()
        .map(|tag| match tag.split_once(':') {
            Some((key, value)) => Label::new(key.to_string(), value.to_string()),
            None => Label::new("tag", tag.clone()),
        })
        .collect()
}

/// Sink that reports through the `metrics` crate and an event channel
#[derive(Debug, Clone)]
pub struct TelemetrySink {
    events: mpsc::Sender<TransitionEvent>,
}

impl TelemetrySink {
    /// Build a sink and the receiving end of its event channel
    pub fn new() -> (Self, mpsc::Receiver<TransitionEvent>) {
        Self::with_capacity(EVENT_CHANNEL_CAPACITY)
    }

    /// Build a sink whose channel buffers at most `capacity` events
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> (Self, mpsc::Receiver<TransitionEvent>) {
        let (events, receiver) = mpsc::channel(capacity);
        (Self { events }, receiver)
    }
}

impl CheckSink for TelemetrySink {
    fn submit_replset(&self, metrics: &ReplSetMetrics, tags: &[String]) {
        let labels = tags_to_labels(tags);

        gauge!(GAUGE_STATE, labels.clone()).set(metrics.state as f64);
        if let Some(health) = metrics.health {
            gauge!(GAUGE_HEALTH, labels.clone()).set(health);
        }
        if let Some(lag) = metrics.replication_lag {
            gauge!(GAUGE_REPLICATION_LAG, labels.clone()).set(lag);
        }
        if let Some(votes) = metrics.votes {
            gauge!(GAUGE_VOTES, labels.clone()).set(votes as f64);
        }
        if let Some(fraction) = metrics.vote_fraction {
            gauge!(GAUGE_VOTE_FRACTION, labels).set(fraction);
        }
    }

    fn submit_event(&self, event: TransitionEvent) {
        counter!(COUNTER_STATUS_CHANGES, tags_to_labels(&event.tags.to_tag_list())).increment(1);

        match self.events.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                counter!(COUNTER_DROPPED_EVENTS).increment(1);
                warn!(title = %event.title, "Event channel full; discarding replica set event");
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Event receiver dropped; discarding replica set event");
            }
        }
    }
}
