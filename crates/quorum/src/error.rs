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

//! Vote share error types

use thiserror::Error;

/// Reasons the vote share of a member cannot be computed
///
/// None of these are fatal: the collector omits the vote fields and reports
/// the rest of the record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteShareError {
    /// The replica-set configuration document could not be read
    #[error("Replica set configuration is unavailable")]
    ConfigUnavailable,

    /// Every configured member has zero votes
    #[error("Replica set configuration has zero total votes across {members} members")]
    ZeroTotalVotes { members: usize },
}
