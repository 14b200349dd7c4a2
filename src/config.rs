//! Process-wide configuration for the coordination layer.

use serde::{Deserialize, Serialize};

use crate::types::OtrPolicy;

/// Configuration passed to the coordinator at construction.
///
/// There is no ambient option storage in this layer; the host loads these
/// values however it likes and pushes updates through
/// [`crate::coordinator::Coordinator::set_policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtrConfig {
    /// Whether and how encryption is offered.
    pub policy: OtrPolicy,
    /// Silently drop the cryptographic session when a contact goes offline.
    pub end_when_offline: bool,
}

impl Default for OtrConfig {
    fn default() -> Self {
        Self {
            policy: OtrPolicy::Enabled,
            end_when_offline: false,
        }
    }
}
