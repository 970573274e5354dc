//! Permission gate: reduces the host's per-capability answers to one outcome.

use tracing::{debug, warn};

use super::collaborators::{Capability, PermissionHost};

/// Capabilities the client cannot run without.
pub const REQUIRED_CAPABILITIES: &[Capability] =
    &[Capability::Internet, Capability::AccessNetworkState];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    Granted,
    Denied,
}

pub struct PermissionGate<'a> {
    host: &'a dyn PermissionHost,
}

impl<'a> PermissionGate<'a> {
    pub fn new(host: &'a dyn PermissionHost) -> Self {
        Self { host }
    }

    pub async fn request(&self, capabilities: &[Capability]) -> PermissionOutcome {
        debug_assert!(!capabilities.is_empty(), "capability set must not be empty");

        let grants = self.host.request(capabilities).await;
        let outcome = reduce_grants(capabilities, &grants);
        debug!(
            "Permission request for {:?} answered with {:?}: {:?}",
            capabilities, grants, outcome
        );
        outcome
    }
}

/// All requested capabilities must be present and granted. A capability the
/// host did not answer for counts as denied.
pub fn reduce_grants(
    capabilities: &[Capability],
    grants: &[(Capability, bool)],
) -> PermissionOutcome {
    if capabilities.is_empty() {
        return PermissionOutcome::Denied;
    }

    for capability in capabilities {
        let granted = grants
            .iter()
            .any(|(answered, granted)| answered == capability && *granted);
        let rejected = grants
            .iter()
            .any(|(answered, granted)| answered == capability && !*granted);

        if !granted || rejected {
            warn!("Permission {} was not granted", capability.as_str());
            return PermissionOutcome::Denied;
        }
    }

    PermissionOutcome::Granted
}
