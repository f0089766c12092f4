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

//! Collector configuration

use serde::{Deserialize, Serialize};

/// Configuration of one replica-set collector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Connection URI of the monitored server, credentials included
    pub server: String,

    /// Whether the deployment sits behind a query router
    pub in_shard: bool,

    /// Custom `key:value` tags added to every submitted record
    pub tags: Vec<String>,

    /// Host name of the monitoring agent, used when the server is `localhost`
    pub agent_hostname: Option<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            server: String::from("mongodb://localhost:27017"),
            in_shard: false,
            tags: Vec::new(),
            agent_hostname: None,
        }
    }
}
