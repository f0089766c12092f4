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

//! Member state tracking across polls
//!
//! Turns consecutive `replSetGetStatus` snapshots into discrete
//! state-transition events. Detection itself is the pure function
//! [`detect_transitions`]; [`StateTracker`] only owns the memory between
//! two polls and commits it once a full snapshot was processed.

use crate::states::{is_known_state, long_state_name, state_name};
use crate::types::MemberSnapshot;
use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use serde::Serialize;
use tracing::{debug, info};

/// Source attached to every emitted event
pub const SOURCE_TYPE_NAME: &str = "mongodb";

/// Action tag attached to every emitted event
pub const STATUS_CHANGE_ACTION: &str = "mongo_replset_member_status_change";

/// Host name that never gets attributed to an event
pub const LOCALHOST: &str = "localhost";

/// Last observed state code per member id
pub type StateMemory = HashMap<i64, i32>;

/// Tags describing a member state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventTags {
    pub action: &'static str,
    pub new_state: &'static str,
    pub old_state: &'static str,
    pub set_name: String,
}

impl EventTags {
    /// Render as `key:value` tags
    pub fn to_tag_list(&self) -> Vec<String> {
        vec![
            format!("action:{}", self.action),
            format!("member_status:{}", self.new_state),
            format!("previous_member_status:{}", self.old_state),
            format!("replset:{}", self.set_name),
        ]
    }
}

/// A member changed state between two polls
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionEvent {
    /// Unix timestamp in seconds
    pub timestamp: i64,
    pub source_type_name: &'static str,
    pub title: String,
    pub body: String,
    /// Host the event is attributed to, if it is meaningful fleet-wide
    pub host: Option<String>,
    pub tags: EventTags,
}

/// Host attribution for a member
///
/// A bare `localhost` means nothing once events from many monitored hosts are
/// merged, so such events carry no host at all.
pub fn event_host(hostname: &str) -> Option<String> {
    if hostname == LOCALHOST {
        None
    } else {
        Some(hostname.to_string())
    }
}

/// Compare a snapshot against the previous memory
///
/// Members seen for the first time never produce an event. The returned
/// memory contains exactly the members of `members`; ids absent from this
/// snapshot are forgotten.
///
/// # Arguments
///
/// * `members` - Members of the current snapshot
/// * `set_name` - Replica-set name used in titles and tags
/// * `connection` - Connection identity mentioned in the event body
/// * `memory` - States observed on the previous poll
/// * `now` - Timestamp stamped on emitted events
pub fn detect_transitions(
    members: &[MemberSnapshot],
    set_name: &str,
    connection: &str,
    memory: &StateMemory,
    now: DateTime<Utc>,
) -> (Vec<TransitionEvent>, StateMemory) {
    let mut events = Vec::new();

    for member in members {
        let Some(&old_state) = memory.get(&member.id) else {
            debug!(member_id = member.id, host = %member.hostname, "First sight of replica set member");
            continue;
        };

        if old_state == member.state {
            continue;
        }

        if !is_known_state(member.state) {
            debug!(member_id = member.id, state = member.state, "Member reported an unrecognized state code");
        }

        events.push(transition_event(member, old_state, set_name, connection, now));
    }

    (events, snapshot_memory(members))
}

fn snapshot_memory(members: &[MemberSnapshot]) -> StateMemory {
    members.iter().map(|member| (member.id, member.state)).collect()
}

fn transition_event(
    member: &MemberSnapshot,
    old_state: i32,
    set_name: &str,
    connection: &str,
    now: DateTime<Utc>,
) -> TransitionEvent {
    let new_short = state_name(member.state);
    let old_short = state_name(old_state);

    let title = format!("{} is {} for {}", member.hostname, new_short, set_name);
    let body = format!(
        "MongoDB {node} (_id: {id}, {connection}) just reported as {long} ({short}) for {set_name}; it was {old} before.",
        node = member.hostname,
        id = member.id,
        long = long_state_name(member.state),
        short = new_short,
        old = old_short,
    );

    TransitionEvent {
        timestamp: now.timestamp(),
        source_type_name: SOURCE_TYPE_NAME,
        title,
        body,
        host: event_host(&member.hostname),
        tags: EventTags {
            action: STATUS_CHANGE_ACTION,
            new_state: new_short,
            old_state: old_short,
            set_name: set_name.to_string(),
        },
    }
}

/// Owns the state memory of one replica set between polls
///
/// One tracker per monitored replica set; it is never shared between
/// collectors.
#[derive(Debug, Clone, Default)]
pub struct StateTracker {
    memory: StateMemory,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect transitions against the previous poll and commit the new memory
    pub fn observe(&mut self, members: &[MemberSnapshot], set_name: &str, connection: &str) -> Vec<TransitionEvent> {
        let (events, memory) = detect_transitions(members, set_name, connection, &self.memory, Utc::now());
        self.memory = memory;

        for event in &events {
            info!(
                set_name = %set_name,
                title = %event.title,
                old = event.tags.old_state,
                new = event.tags.new_state,
                "Replica set member changed state"
            );
        }

        events
    }

    /// Commit the snapshot without emitting anything
    ///
    /// Used by non-primary nodes so a later promotion compares against the
    /// latest known states.
    pub fn record(&mut self, members: &[MemberSnapshot]) {
        self.memory = snapshot_memory(members);
    }

    /// States observed on the last committed poll
    pub fn memory(&self) -> &StateMemory {
        &self.memory
    }
}
