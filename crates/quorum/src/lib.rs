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

//! # Replwatch Quorum
//!
//! Replication lag and election vote arithmetic for a replica-set member.
//!
//! ## Rules
//!
//! - **Replication lag**: primary optime minus own optime, in seconds
//! - **Vote fraction**: own configured votes over the sum of all configured votes
//!
//! ## Example
//!
//! ```rust
//! use replwatch_quorum::vote_share;
//! use replwatch_topology::{ConfigMember, ReplicaSetConfig};
//!
//! let config = ReplicaSetConfig {
//!     members: vec![
//!         ConfigMember { id: 1, votes: Some(1) },
//!         ConfigMember { id: 2, votes: Some(2) },
//!         ConfigMember { id: 3, votes: None },
//!     ],
//! };
//! let share = vote_share(Some(&config), 2).unwrap();
//! assert_eq!(share.fraction, 0.5);
//! ```

pub mod error;
pub mod replication;

pub use error::VoteShareError;
pub use replication::{ReplSetMetrics, VoteShare, compute, replication_lag, vote_share};
