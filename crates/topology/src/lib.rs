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

//! # Replwatch Topology
//!
//! Deployment classification and replica-set member state tracking.
//!
//! ## Features
//!
//! - **Deployment Classification**: Standalone / query router / replica member descriptors
//! - **Principal Selection**: Exactly one collection point per monitored deployment
//! - **State Tracking**: Member state transitions between polls surfaced as discrete events
//!
//! ## Example
//!
//! ```rust
//! use replwatch_topology::{DeploymentDescriptor, StatusPayload, states};
//!
//! let payload = StatusPayload::replica_member("rs0", states::PRIMARY);
//! let descriptor = DeploymentDescriptor::classify(&payload, false);
//! assert!(descriptor.is_principal());
//! ```

pub mod deployment;
pub mod states;
pub mod tracker;
pub mod types;

pub use deployment::DeploymentDescriptor;
pub use tracker::{EventTags, StateMemory, StateTracker, TransitionEvent, detect_transitions, event_host};
pub use types::*;
