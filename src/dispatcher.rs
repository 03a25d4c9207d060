use log::{debug, info};

use crate::host::ShareHost;
use crate::models::{
    AccessGrant, DirectiveBody, DispatchOutcome, DispatchShape, ShareDirective, ShareRequest,
};
use crate::state::{GateDecision, PendingRequest, PermissionGate};
use crate::{classifier, minter, resolver, Error, Result};

/// Turns share requests into host actions.
///
/// Owns the permission gate, so a request suspended by either the chooser or
/// the targeted path is replayed by [`ShareDispatcher::on_permission_result`].
pub struct ShareDispatcher<H: ShareHost> {
    pub(crate) host: H,
    pub(crate) gate: PermissionGate,
}

impl<H: ShareHost> ShareDispatcher<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            gate: PermissionGate::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// The request waiting for a permission grant, if any.
    pub fn pending(&self) -> Option<PendingRequest> {
        self.gate.pending()
    }

    /// Shares through the host's chooser surface.
    pub fn share(&self, request: ShareRequest) -> Result<DispatchOutcome> {
        self.dispatch_share(request, false)
    }

    /// `granted` is set when replaying a parked request; the gate is then
    /// skipped since the host has just answered the prompt.
    fn dispatch_share(&self, request: ShareRequest, granted: bool) -> Result<DispatchOutcome> {
        let tag = request.content_tag();
        let resolution = resolver::classify(request.items(), tag);

        let (directive, references) = if resolution.needs_file_access {
            let decision = self.gate.admit(&self.host, !granted, || {
                PendingRequest::Share(request.clone())
            })?;
            if decision == GateDecision::Suspended {
                return Ok(DispatchOutcome::PermissionPending);
            }

            let references = minter::mint_all(&self.host, request.items())?;
            let classification = classifier::classify(tag, references.len());
            debug!(
                "Classified {} item(s) as {} ({:?})",
                references.len(),
                classification.mime_type,
                classification.shape
            );
            let body = match classification.shape {
                DispatchShape::Single => DirectiveBody::Single {
                    reference: references.first().cloned().ok_or(Error::EmptyPayload)?,
                },
                DispatchShape::Multiple => DirectiveBody::Multiple {
                    references: references.clone(),
                },
            };
            let directive = ShareDirective {
                mime_type: classification.mime_type.to_string(),
                body,
                subject: request.subject().map(str::to_string),
                target_app_id: None,
            };
            (directive, references)
        } else {
            let text = request.items().first().ok_or(Error::EmptyPayload)?;
            let directive = ShareDirective::text(text.clone(), request.subject().map(str::to_string));
            (directive, Vec::new())
        };

        if !references.is_empty() {
            let receivers = self.host.resolve_receivers(&directive)?;
            minter::grant_all(&self.host, &references, &receivers, AccessGrant::READ_WRITE)?;
        }

        self.host
            .present_chooser(&directive, request.chooser_title())?;
        info!(
            "Presented chooser for {} ({:?})",
            directive.mime_type,
            directive.shape()
        );
        Ok(DispatchOutcome::ChooserPresented)
    }

    /// Delivers the answer to an outstanding permission prompt.
    ///
    /// On grant the parked request is replayed in full and its outcome
    /// returned. A denial, or a result with nothing pending, yields `None`.
    pub fn on_permission_result(&self, granted: bool) -> Result<Option<DispatchOutcome>> {
        let outcome = match self.gate.resolve(granted) {
            None => return Ok(None),
            Some(PendingRequest::Share(request)) => self.dispatch_share(request, true)?,
            Some(PendingRequest::Targeted {
                request,
                target_app_id,
            }) => self.dispatch_to_target(request, &target_app_id, true)?,
        };
        Ok(Some(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentReference, ContentTag};
    use crate::testing::{HostCall, RecordingHost};

    fn request(items: &[&str], tag: ContentTag) -> ShareRequest {
        ShareRequest::new(
            items.iter().map(|i| i.to_string()).collect(),
            tag,
            None,
            None,
        )
        .unwrap()
    }

    fn reference(path: &str) -> ContentReference {
        ContentReference::new(format!("content://test{path}"), path)
    }

    #[test]
    fn text_share_uses_only_first_item() {
        let dispatcher = ShareDispatcher::new(RecordingHost::new().without_permission());
        let request = ShareRequest::new(
            vec!["hello".to_string(), "ignored".to_string()],
            ContentTag::Text,
            Some("Share via".to_string()),
            Some("Hi".to_string()),
        )
        .unwrap();

        let outcome = dispatcher.share(request).unwrap();

        assert_eq!(outcome, DispatchOutcome::ChooserPresented);
        let host = dispatcher.host();
        assert_eq!(
            host.calls(),
            [HostCall::PresentChooser {
                directive: ShareDirective::text("hello", Some("Hi".to_string())),
                title: Some("Share via".to_string()),
            }]
        );
        assert!(host.minted_paths().is_empty());
    }

    #[test]
    fn single_image_is_sent_as_single_reference() {
        let dispatcher = ShareDispatcher::new(RecordingHost::new());
        dispatcher
            .share(request(&["/tmp/a.jpg"], ContentTag::Image))
            .unwrap();

        let host = dispatcher.host();
        assert_eq!(host.minted_paths(), ["/tmp/a.jpg"]);
        let directives = host.chooser_directives();
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].mime_type, "image/*");
        assert_eq!(
            directives[0].body,
            DirectiveBody::Single {
                reference: reference("/tmp/a.jpg")
            }
        );
    }

    #[test]
    fn several_items_keep_order_in_multiple_directive() {
        let dispatcher = ShareDispatcher::new(RecordingHost::new());
        dispatcher
            .share(request(&["/a", "/b", "/c"], ContentTag::Other))
            .unwrap();

        let directives = dispatcher.host().chooser_directives();
        assert_eq!(directives[0].mime_type, "application/*");
        assert_eq!(directives[0].shape(), DispatchShape::Multiple);
        assert_eq!(
            directives[0].references(),
            [reference("/a"), reference("/b"), reference("/c")]
        );
    }

    #[test]
    fn video_mime_and_shape() {
        let dispatcher = ShareDispatcher::new(RecordingHost::new());
        dispatcher
            .share(request(&["/v1.mp4", "/v2.mp4"], ContentTag::Video))
            .unwrap();
        let directive = &dispatcher.host().chooser_directives()[0];
        assert_eq!(directive.mime_type, "video/*");
        assert_eq!(directive.shape(), DispatchShape::Multiple);
    }

    #[test]
    fn references_are_granted_to_resolved_receivers_before_chooser() {
        let host = RecordingHost::new().with_receivers(&["com.chat", "com.mail"]);
        let dispatcher = ShareDispatcher::new(host);
        dispatcher
            .share(request(&["/a.pdf"], ContentTag::Other))
            .unwrap();

        let calls = dispatcher.host().calls();
        let chooser_at = calls
            .iter()
            .position(|c| matches!(c, HostCall::PresentChooser { .. }))
            .unwrap();
        let grants: Vec<_> = calls
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, HostCall::Grant { .. }))
            .collect();
        assert_eq!(grants.len(), 2);
        assert!(grants.iter().all(|(i, _)| *i < chooser_at));
        assert!(calls.contains(&HostCall::Grant {
            uri: "content://test/a.pdf".to_string(),
            receiver: "com.mail".to_string(),
            grant: AccessGrant::READ_WRITE,
        }));
    }

    #[test]
    fn invalid_path_fails_without_chooser() {
        let dispatcher = ShareDispatcher::new(RecordingHost::new().with_missing("/gone.png"));
        let err = dispatcher
            .share(request(&["/ok.png", "/gone.png"], ContentTag::Image))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
        assert!(dispatcher.host().chooser_directives().is_empty());
    }

    #[test]
    fn missing_permission_suspends_without_minting() {
        let dispatcher = ShareDispatcher::new(RecordingHost::new().without_permission());
        let original = request(&["/a.jpg", "/b.jpg"], ContentTag::Image);

        let outcome = dispatcher.share(original.clone()).unwrap();

        assert_eq!(outcome, DispatchOutcome::PermissionPending);
        let host = dispatcher.host();
        assert!(host.chooser_directives().is_empty());
        assert!(host.minted_paths().is_empty());
        assert_eq!(dispatcher.pending(), Some(PendingRequest::Share(original)));
    }

    #[test]
    fn grant_replays_original_request_once() {
        let dispatcher = ShareDispatcher::new(RecordingHost::new().without_permission());
        dispatcher
            .share(request(&["/a.jpg", "/b.jpg"], ContentTag::Image))
            .unwrap();

        dispatcher.host().set_permission(true);
        let outcome = dispatcher.on_permission_result(true).unwrap();

        assert_eq!(outcome, Some(DispatchOutcome::ChooserPresented));
        let directives = dispatcher.host().chooser_directives();
        assert_eq!(directives.len(), 1);
        assert_eq!(
            directives[0].references(),
            [reference("/a.jpg"), reference("/b.jpg")]
        );
        assert_eq!(dispatcher.pending(), None);

        assert_eq!(dispatcher.on_permission_result(true).unwrap(), None);
        assert_eq!(dispatcher.host().chooser_directives().len(), 1);
    }

    #[test]
    fn grant_replays_even_if_host_check_lags() {
        let dispatcher = ShareDispatcher::new(RecordingHost::new().without_permission());
        dispatcher
            .share(request(&["/a.jpg"], ContentTag::Image))
            .unwrap();

        let outcome = dispatcher.on_permission_result(true).unwrap();

        assert_eq!(outcome, Some(DispatchOutcome::ChooserPresented));
        let host = dispatcher.host();
        assert_eq!(host.chooser_directives().len(), 1);
        assert_eq!(host.count(&HostCall::RequestPermission), 1);
        assert_eq!(dispatcher.pending(), None);
    }

    #[test]
    fn failed_permission_request_propagates_and_clears_slot() {
        let host = RecordingHost::new()
            .without_permission()
            .with_request_failure();
        let dispatcher = ShareDispatcher::new(host);

        let err = dispatcher
            .share(request(&["/a.jpg"], ContentTag::Image))
            .unwrap_err();

        assert!(matches!(err, Error::NativeApi(_)));
        assert_eq!(dispatcher.pending(), None);
        assert!(dispatcher.host().chooser_directives().is_empty());
        assert_eq!(dispatcher.on_permission_result(true).unwrap(), None);
    }

    #[test]
    fn denial_never_presents_chooser() {
        let dispatcher = ShareDispatcher::new(RecordingHost::new().without_permission());
        dispatcher
            .share(request(&["/a.jpg"], ContentTag::Image))
            .unwrap();

        assert_eq!(dispatcher.on_permission_result(false).unwrap(), None);
        dispatcher.host().set_permission(true);
        assert_eq!(dispatcher.on_permission_result(true).unwrap(), None);

        assert!(dispatcher.host().chooser_directives().is_empty());
        assert_eq!(dispatcher.pending(), None);
    }
}
