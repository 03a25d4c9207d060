use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::host::ShareHost;
use crate::models::{ShareRequest, TargetedShareRequest};
use crate::Result;

/// A request parked while the file-access prompt is outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    Share(ShareRequest),
    Targeted {
        request: TargetedShareRequest,
        target_app_id: String,
    },
}

#[derive(Debug, Default)]
enum GateState {
    #[default]
    Idle,
    AwaitingGrant(PendingRequest),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Suspended,
}

/// Holds at most one request while a permission prompt is outstanding.
///
/// A request admitted while another is pending replaces it; only the latest
/// request is replayed when the grant arrives.
#[derive(Debug, Default)]
pub struct PermissionGate {
    state: Mutex<GateState>,
}

impl PermissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets the request through, or parks it and asks the host for the
    /// permission.
    ///
    /// `pending` is only built when the request has to be parked.
    pub fn admit<H, F>(&self, host: &H, needs_file_access: bool, pending: F) -> Result<GateDecision>
    where
        H: ShareHost,
        F: FnOnce() -> PendingRequest,
    {
        if !needs_file_access || host.has_file_access_permission()? {
            return Ok(GateDecision::Proceed);
        }

        {
            let mut state = self.lock();
            if let GateState::AwaitingGrant(previous) = &*state {
                warn!("Replacing pending share request: {:?}", previous);
            }
            *state = GateState::AwaitingGrant(pending());
        }

        // The lock is released first so a host answering synchronously can
        // resolve the gate from inside this call.
        if let Err(e) = host.request_file_access_permission() {
            *self.lock() = GateState::Idle;
            return Err(e);
        }
        debug!("File access permission requested, share suspended");
        Ok(GateDecision::Suspended)
    }

    /// Takes the pending request out of the gate. It is returned only when the
    /// permission was granted.
    pub fn resolve(&self, granted: bool) -> Option<PendingRequest> {
        let previous = std::mem::take(&mut *self.lock());
        match previous {
            GateState::Idle => {
                debug!("Permission result arrived with no pending share request");
                None
            }
            GateState::AwaitingGrant(request) if granted => Some(request),
            GateState::AwaitingGrant(request) => {
                info!("File access permission denied, dropping {:?}", request);
                None
            }
        }
    }

    pub fn pending(&self) -> Option<PendingRequest> {
        match &*self.lock() {
            GateState::Idle => None,
            GateState::AwaitingGrant(request) => Some(request.clone()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
