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

//! Replica-set member state codes and their human readable names
//!
//! Codes outside the table are expected when the server is newer than this
//! crate; they map to `UNKNOWN` instead of failing.

use std::borrow::Cow;

pub const STARTUP: i32 = 0;
pub const PRIMARY: i32 = 1;
pub const SECONDARY: i32 = 2;
pub const RECOVERING: i32 = 3;
pub const FATAL: i32 = 4;
pub const STARTUP2: i32 = 5;
pub const UNKNOWN: i32 = 6;
pub const ARBITER: i32 = 7;
pub const DOWN: i32 = 8;
pub const ROLLBACK: i32 = 9;
pub const REMOVED: i32 = 10;

/// `(short, long)` names indexed by state code
const MEMBER_STATES: [(&str, &str); 11] = [
    ("STARTUP", "Starting Up"),
    ("PRIMARY", "Primary"),
    ("SECONDARY", "Secondary"),
    ("RECOVERING", "Recovering"),
    // not part of the documented state list
    ("Fatal", "Fatal"),
    ("STARTUP2", "Starting up (forking threads)"),
    ("UNKNOWN", "Unknown to this replset member"),
    ("ARBITER", "Arbiter"),
    ("DOWN", "Down"),
    ("ROLLBACK", "Rollback"),
    ("REMOVED", "Removed"),
];

fn lookup(state: i32) -> Option<&'static (&'static str, &'static str)> {
    usize::try_from(state).ok().and_then(|idx| MEMBER_STATES.get(idx))
}

/// Short name of a state code, `"UNKNOWN"` for unrecognized codes
pub fn state_name(state: i32) -> &'static str {
    lookup(state).map(|(short, _)| *short).unwrap_or("UNKNOWN")
}

/// Long, sentence-friendly name of a state code
pub fn long_state_name(state: i32) -> Cow<'static, str> {
    match lookup(state) {
        Some((_, long)) => Cow::Borrowed(long),
        None => Cow::Owned(format!("Replset state {state} is unknown to the monitoring agent")),
    }
}

/// Whether the code is one of the known replica-set states
#[inline]
pub fn is_known_state(state: i32) -> bool {
    lookup(state).is_some()
}
