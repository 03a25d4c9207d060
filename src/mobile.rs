use std::path::Path;

use log::{error, warn};
use serde::{Deserialize, Serialize};
use tauri::{
    plugin::{mobile::PluginInvokeError, PluginApi, PluginHandle},
    AppHandle, Runtime, Window,
};

use crate::config::Config;
use crate::host::ShareHost;
use crate::models::*;
use crate::{Error, Result, ShareDispatcher, ShareExtendExt};

const PLUGIN_IDENTIFIER: &str = "com.zt.shareextend";

// The host app ships the native `ShareExtendPlugin` class; it is not bundled here.
pub fn init<R: Runtime>(
    app: &AppHandle<R>,
    api: PluginApi<R, Option<Config>>,
) -> crate::Result<ShareExtend<R>> {
    let config = api.config().clone().unwrap_or_default();
    let handle = api.register_android_plugin(PLUGIN_IDENTIFIER, "ShareExtendPlugin")?;
    let host = AndroidHost {
        handle,
        app: app.clone(),
        config: config.clone(),
    };
    Ok(ShareExtend {
        dispatcher: ShareDispatcher::new(host),
        config,
    })
}

/// Access to the share APIs.
pub struct ShareExtend<R: Runtime> {
    dispatcher: ShareDispatcher<AndroidHost<R>>,
    config: Config,
}

impl<R: Runtime> ShareExtend<R> {
    pub fn share(&self, _window: Window<R>, options: ShareOptions) -> Result<DispatchOutcome> {
        self.dispatcher.share(ShareRequest::try_from(options)?)
    }

    pub fn share_to_target(
        &self,
        _window: Window<R>,
        options: ShareToTargetOptions,
    ) -> Result<DispatchOutcome> {
        let (request, target_app_id) = options.into_request(&self.config.default_target_app_id)?;
        self.dispatcher.share_to_target(request, &target_app_id)
    }

    pub fn can_share(&self) -> Result<CanShareResult> {
        Ok(CanShareResult { value: true })
    }

    /// Resumes the request parked behind the storage permission prompt.
    pub fn on_permission_result(&self, granted: bool) -> Result<Option<DispatchOutcome>> {
        self.dispatcher.on_permission_result(granted)
    }
}

#[derive(Debug, Deserialize)]
struct PermissionResponse {
    granted: bool,
}

#[derive(Debug, Deserialize)]
struct ReceiversResponse {
    packages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct InstalledResponse {
    installed: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MintArgs<'a> {
    path: &'a Path,
    authority: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DirectiveArgs<'a> {
    directive: &'a ShareDirective,
    title: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GrantArgs<'a> {
    uri: &'a str,
    receiver: &'a str,
    read: bool,
    write: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LaunchArgs<'a> {
    directive: &'a ShareDirective,
    app_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AppArgs<'a> {
    app_id: &'a str,
    fallback_url: Option<String>,
}

/// Forwards each host primitive to the native `ShareExtendPlugin`.
pub struct AndroidHost<R: Runtime> {
    handle: PluginHandle<R>,
    app: AppHandle<R>,
    config: Config,
}

impl<R: Runtime> AndroidHost<R> {
    /// Runs a native method whose response body carries nothing.
    fn run_unit<P: Serialize>(&self, command: &str, payload: P) -> Result<()> {
        self.handle
            .run_mobile_plugin::<serde_json::Value>(command, payload)
            .map(|_| ())
            .map_err(Into::into)
    }
}

impl<R: Runtime> ShareHost for AndroidHost<R> {
    fn has_file_access_permission(&self) -> Result<bool> {
        let response: PermissionResponse = self
            .handle
            .run_mobile_plugin("checkFileAccessPermission", ())?;
        Ok(response.granted)
    }

    fn request_file_access_permission(&self) -> Result<()> {
        let handle = self.handle.clone();
        let app = self.app.clone();
        // The native call resolves only once the user answers the prompt.
        tauri::async_runtime::spawn_blocking(move || {
            let granted = match handle
                .run_mobile_plugin::<PermissionResponse>("requestFileAccessPermission", ())
            {
                Ok(response) => response.granted,
                Err(e) => {
                    warn!("File access permission request failed: {}", e);
                    false
                }
            };
            if let Err(e) = app.share_extend().on_permission_result(granted) {
                error!("Failed to resume share after permission grant: {}", e);
            }
        });
        Ok(())
    }

    fn mint_shareable_reference(&self, path: &Path) -> Result<ContentReference> {
        let args = MintArgs {
            path,
            authority: self.config.file_provider_authority.as_deref(),
        };
        self.handle
            .run_mobile_plugin("mintShareableReference", args)
            .map_err(|e| map_mint_error(path, e))
    }

    fn resolve_receivers(&self, directive: &ShareDirective) -> Result<Vec<String>> {
        let response: ReceiversResponse = self.handle.run_mobile_plugin(
            "resolveReceivers",
            DirectiveArgs {
                directive,
                title: None,
            },
        )?;
        Ok(response.packages)
    }

    fn grant_access(
        &self,
        reference: &ContentReference,
        receiver: &str,
        grant: AccessGrant,
    ) -> Result<()> {
        self.run_unit(
            "grantAccess",
            GrantArgs {
                uri: reference.uri(),
                receiver,
                read: grant.read,
                write: grant.write,
            },
        )
    }

    fn present_chooser(&self, directive: &ShareDirective, title: Option<&str>) -> Result<()> {
        self.run_unit("presentChooser", DirectiveArgs { directive, title })
    }

    fn launch_app(&self, directive: &ShareDirective, app_id: &str) -> Result<LaunchResult> {
        match self.run_unit("launchApp", LaunchArgs { directive, app_id }) {
            Ok(()) => Ok(LaunchResult::Launched),
            Err(Error::PluginInvoke(msg)) if msg.contains("NOT_FOUND") => {
                Ok(LaunchResult::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    fn is_app_installed(&self, app_id: &str) -> Result<bool> {
        let response: InstalledResponse = self.handle.run_mobile_plugin(
            "isAppInstalled",
            AppArgs {
                app_id,
                fallback_url: None,
            },
        )?;
        Ok(response.installed)
    }

    fn open_store_listing(&self, app_id: &str) -> Result<()> {
        self.run_unit(
            "openStoreListing",
            AppArgs {
                app_id,
                fallback_url: Some(self.config.store_listing_url_for(app_id)),
            },
        )
    }
}

fn map_mint_error(path: &Path, err: PluginInvokeError) -> Error {
    let msg = err.to_string();
    if msg.contains("INVALID_PATH") {
        Error::InvalidPath(path.display().to_string())
    } else {
        Error::PluginInvoke(msg)
    }
}
