use log::{info, warn};

use crate::dispatcher::ShareDispatcher;
use crate::host::ShareHost;
use crate::models::{
    AccessGrant, DirectiveBody, DispatchOutcome, LaunchResult, ShareDirective,
    TargetedShareRequest,
};
use crate::state::{GateDecision, PendingRequest};
use crate::{classifier, minter, Error, Result};

impl<H: ShareHost> ShareDispatcher<H> {
    /// Shares straight into `target_app_id`, or opens its store listing when
    /// the app is missing or refuses the directive.
    ///
    /// Only the first item is attached; the others are minted but not sent.
    pub fn share_to_target(
        &self,
        request: TargetedShareRequest,
        target_app_id: &str,
    ) -> Result<DispatchOutcome> {
        self.dispatch_to_target(request, target_app_id, false)
    }

    pub(crate) fn dispatch_to_target(
        &self,
        request: TargetedShareRequest,
        target_app_id: &str,
        granted: bool,
    ) -> Result<DispatchOutcome> {
        let mime_type = classifier::target_mime(request.media());

        let decision = self.gate.admit(&self.host, !granted, || PendingRequest::Targeted {
            request: request.clone(),
            target_app_id: target_app_id.to_string(),
        })?;
        if decision == GateDecision::Suspended {
            return Ok(DispatchOutcome::PermissionPending);
        }

        let references = minter::mint_all(&self.host, request.items())?;
        let first = references.into_iter().next().ok_or(Error::EmptyPayload)?;

        if self.host.is_app_installed(target_app_id)? {
            let directive = ShareDirective {
                mime_type: mime_type.to_string(),
                body: DirectiveBody::Single {
                    reference: first.clone(),
                },
                subject: None,
                target_app_id: Some(target_app_id.to_string()),
            };
            self.host
                .grant_access(&first, target_app_id, AccessGrant::READ_WRITE)?;

            match self.host.launch_app(&directive, target_app_id)? {
                LaunchResult::Launched => {
                    info!("Shared {} directly to {}", mime_type, target_app_id);
                    return Ok(DispatchOutcome::SharedToTarget {
                        app_id: target_app_id.to_string(),
                    });
                }
                LaunchResult::NotFound => {
                    warn!(
                        "{} could not handle the share, opening its store listing",
                        target_app_id
                    );
                }
            }
        }

        self.host.open_store_listing(target_app_id)?;
        info!("Opened store listing for {}", target_app_id);
        Ok(DispatchOutcome::StoreListingOpened {
            app_id: target_app_id.to_string(),
        })
    }
}
