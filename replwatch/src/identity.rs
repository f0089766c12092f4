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

//! Connection identity of the monitored server

use http::Uri;
use replwatch_topology::tracker::LOCALHOST;
use tracing::debug;

const PASSWORD_MASK: &str = "*****";
const DEFAULT_SCHEME: &str = "mongodb";

/// How the monitored server is named in events and tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    clean_server_name: String,
    hostname: String,
}

impl ServerIdentity {
    /// Derive the identity from a connection URI
    ///
    /// # Arguments
    ///
    /// * `uri` - Connection URI, possibly carrying credentials
    /// * `agent_hostname` - Replacement for a `localhost` server host
    pub fn from_uri(uri: &str, agent_hostname: Option<&str>) -> Self {
        let parts = UriParts::split(uri);
        let clean_server_name = parts.masked();

        // only the credential-free authority is handed to the parser
        let scheme = if parts.scheme.is_empty() { DEFAULT_SCHEME } else { parts.scheme };
        let parsed_host = format!("{scheme}://{}", parts.hosts)
            .parse::<Uri>()
            .ok()
            .and_then(|parsed| parsed.host().map(str::to_string));

        let mut hostname = match parsed_host {
            Some(host) => host,
            None => {
                // seed lists (`host1,host2`) are not valid URI authorities
                debug!(server = %clean_server_name, "Falling back to manual host extraction");
                parts.first_host().to_string()
            }
        };

        if hostname == LOCALHOST
            && let Some(agent) = agent_hostname
        {
            hostname = agent.to_string();
        }

        Self {
            clean_server_name,
            hostname,
        }
    }

    /// URI with the password replaced by a mask
    pub fn clean_server_name(&self) -> &str {
        &self.clean_server_name
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }
}

/// Connection URI cut at its userinfo and host list
///
/// The userinfo ends at the last `@` ahead of the query, so a password may
/// carry `/` or `@` without being mistaken for the path.
struct UriParts<'a> {
    scheme: &'a str,
    userinfo: Option<&'a str>,
    hosts: &'a str,
    tail: &'a str,
}

impl<'a> UriParts<'a> {
    fn split(uri: &'a str) -> Self {
        let (scheme, rest) = match uri.split_once("://") {
            Some((scheme, rest)) => (scheme, rest),
            None => ("", uri),
        };

        let query_start = rest.find('?').unwrap_or(rest.len());
        let (userinfo, after_userinfo) = match rest[..query_start].rfind('@') {
            Some(at) => (Some(&rest[..at]), &rest[at + 1..]),
            None => (None, rest),
        };

        let end = after_userinfo.find(['/', '?']).unwrap_or(after_userinfo.len());
        let (hosts, tail) = after_userinfo.split_at(end);

        Self {
            scheme,
            userinfo,
            hosts,
            tail,
        }
    }

    fn masked(&self) -> String {
        let prefix = if self.scheme.is_empty() {
            String::new()
        } else {
            format!("{}://", self.scheme)
        };

        let userinfo = match self.userinfo {
            Some(userinfo) => match userinfo.split_once(':') {
                Some((user, _)) => format!("{user}:{PASSWORD_MASK}@"),
                None => format!("{userinfo}@"),
            },
            None => String::new(),
        };
        format!("{prefix}{userinfo}{}{}", self.hosts, self.tail)
    }

    fn first_host(&self) -> &'a str {
        let first = self.hosts.split(',').next().unwrap_or(self.hosts);
        first.split(':').next().unwrap_or(first)
    }
}
