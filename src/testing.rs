use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::host::ShareHost;
use crate::models::{AccessGrant, ContentReference, LaunchResult, ShareDirective};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    CheckPermission,
    RequestPermission,
    Mint { path: String },
    ResolveReceivers,
    Grant {
        uri: String,
        receiver: String,
        grant: AccessGrant,
    },
    PresentChooser {
        directive: ShareDirective,
        title: Option<String>,
    },
    LaunchApp {
        directive: ShareDirective,
        app_id: String,
    },
    IsInstalled { app_id: String },
    OpenStoreListing { app_id: String },
}

/// A [`ShareHost`] that records every call and answers from canned settings.
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
    has_permission: Mutex<bool>,
    missing: HashSet<String>,
    installed: HashSet<String>,
    receivers: Vec<String>,
    launch_result: LaunchResult,
    request_fails: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            has_permission: Mutex::new(true),
            missing: HashSet::new(),
            installed: HashSet::new(),
            receivers: Vec::new(),
            launch_result: LaunchResult::Launched,
            request_fails: false,
        }
    }

    pub fn without_permission(self) -> Self {
        self.set_permission(false);
        self
    }

    pub fn with_missing(mut self, path: &str) -> Self {
        self.missing.insert(path.to_string());
        self
    }

    pub fn with_installed(mut self, app_id: &str) -> Self {
        self.installed.insert(app_id.to_string());
        self
    }

    pub fn with_receivers(mut self, receivers: &[&str]) -> Self {
        self.receivers = receivers.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn with_launch_result(mut self, result: LaunchResult) -> Self {
        self.launch_result = result;
        self
    }

    pub fn with_request_failure(mut self) -> Self {
        self.request_fails = true;
        self
    }

    pub fn set_permission(&self, granted: bool) {
        *self
            .has_permission
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = granted;
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn minted_paths(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Mint { path } => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn chooser_directives(&self) -> Vec<ShareDirective> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::PresentChooser { directive, .. } => Some(directive),
                _ => None,
            })
            .collect()
    }

    pub fn launches(&self) -> Vec<(ShareDirective, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::LaunchApp { directive, app_id } => Some((directive, app_id)),
                _ => None,
            })
            .collect()
    }

    pub fn store_listings(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::OpenStoreListing { app_id } => Some(app_id),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &HostCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: HostCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl ShareHost for RecordingHost {
    fn has_file_access_permission(&self) -> Result<bool> {
        self.record(HostCall::CheckPermission);
        Ok(*self
            .has_permission
            .lock()
            .unwrap_or_else(PoisonError::into_inner))
    }

    fn request_file_access_permission(&self) -> Result<()> {
        self.record(HostCall::RequestPermission);
        if self.request_fails {
            return Err(Error::NativeApi("permission prompt unavailable".to_string()));
        }
        Ok(())
    }

    fn mint_shareable_reference(&self, path: &Path) -> Result<ContentReference> {
        let path = path.to_string_lossy().to_string();
        self.record(HostCall::Mint { path: path.clone() });
        if self.missing.contains(&path) {
            return Err(Error::InvalidPath(path));
        }
        Ok(ContentReference::new(format!("content://test{path}"), path))
    }

    fn resolve_receivers(&self, _directive: &ShareDirective) -> Result<Vec<String>> {
        self.record(HostCall::ResolveReceivers);
        Ok(self.receivers.clone())
    }

    fn grant_access(
        &self,
        reference: &ContentReference,
        receiver: &str,
        grant: AccessGrant,
    ) -> Result<()> {
        self.record(HostCall::Grant {
            uri: reference.uri().to_string(),
            receiver: receiver.to_string(),
            grant,
        });
        Ok(())
    }

    fn present_chooser(&self, directive: &ShareDirective, title: Option<&str>) -> Result<()> {
        self.record(HostCall::PresentChooser {
            directive: directive.clone(),
            title: title.map(str::to_string),
        });
        Ok(())
    }

    fn launch_app(&self, directive: &ShareDirective, app_id: &str) -> Result<LaunchResult> {
        self.record(HostCall::LaunchApp {
            directive: directive.clone(),
            app_id: app_id.to_string(),
        });
        Ok(self.launch_result)
    }

    fn is_app_installed(&self, app_id: &str) -> Result<bool> {
        self.record(HostCall::IsInstalled {
            app_id: app_id.to_string(),
        });
        Ok(self.installed.contains(app_id))
    }

    fn open_store_listing(&self, app_id: &str) -> Result<()> {
        self.record(HostCall::OpenStoreListing {
            app_id: app_id.to_string(),
        });
        Ok(())
    }
}
