use std::marker::PhantomData;
use std::path::Path;

use log::debug;
use tauri::{plugin::PluginApi, AppHandle, Runtime, Window};
use url::Url;

use crate::config::Config;
use crate::host::ShareHost;
use crate::models::*;
use crate::{platform, Error, Result, ShareDispatcher};

pub fn init<R: Runtime>(
    _app: &AppHandle<R>,
    api: PluginApi<R, Option<Config>>,
) -> crate::Result<ShareExtend<R>> {
    Ok(ShareExtend {
        config: api.config().clone().unwrap_or_default(),
        _runtime: PhantomData,
    })
}

/// Access to the share APIs.
pub struct ShareExtend<R: Runtime> {
    config: Config,
    _runtime: PhantomData<fn() -> R>,
}

impl<R: Runtime> ShareExtend<R> {
    pub fn share(&self, window: Window<R>, options: ShareOptions) -> Result<DispatchOutcome> {
        let request = ShareRequest::try_from(options)?;
        self.dispatcher_for(window).share(request)
    }

    pub fn share_to_target(
        &self,
        window: Window<R>,
        options: ShareToTargetOptions,
    ) -> Result<DispatchOutcome> {
        let (request, target_app_id) = options.into_request(&self.config.default_target_app_id)?;
        self.dispatcher_for(window)
            .share_to_target(request, &target_app_id)
    }

    pub fn can_share(&self) -> Result<CanShareResult> {
        platform::can_share()
    }

    // The desktop host always holds file access, so its gate never parks a
    // request and a dispatcher can live for a single call.
    fn dispatcher_for(
        &self,
        window: Window<R>,
    ) -> ShareDispatcher<DesktopHost<'_, impl Fn(&ShareDirective, Option<&str>) -> Result<()> + Send + Sync>>
    {
        ShareDispatcher::new(DesktopHost::new(&self.config, move |directive, title| {
            platform::present_chooser(window.clone(), directive, title)
        }))
    }
}

/// In-process host for desktop platforms.
///
/// Desktop share brokers read files directly, so there is no permission to
/// request and no per-application grant to issue. Named mobile applications
/// are never installed here; targeted shares go to the store page.
///
/// `present` shows the chooser over the window the call came from.
pub struct DesktopHost<'a, P> {
    config: &'a Config,
    present: P,
}

impl<'a, P> DesktopHost<'a, P>
where
    P: Fn(&ShareDirective, Option<&str>) -> Result<()> + Send + Sync,
{
    fn new(config: &'a Config, present: P) -> Self {
        Self { config, present }
    }
}

impl<P> ShareHost for DesktopHost<'_, P>
where
    P: Fn(&ShareDirective, Option<&str>) -> Result<()> + Send + Sync,
{
    fn has_file_access_permission(&self) -> Result<bool> {
        Ok(true)
    }

    fn request_file_access_permission(&self) -> Result<()> {
        Ok(())
    }

    fn mint_shareable_reference(&self, path: &Path) -> Result<ContentReference> {
        mint_file_reference(path)
    }

    fn resolve_receivers(&self, _directive: &ShareDirective) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn grant_access(
        &self,
        reference: &ContentReference,
        receiver: &str,
        _grant: AccessGrant,
    ) -> Result<()> {
        debug!("No grant needed for {} to {}", reference.uri(), receiver);
        Ok(())
    }

    fn present_chooser(&self, directive: &ShareDirective, title: Option<&str>) -> Result<()> {
        (self.present)(directive, title)
    }

    fn launch_app(&self, _directive: &ShareDirective, _app_id: &str) -> Result<LaunchResult> {
        Ok(LaunchResult::NotFound)
    }

    fn is_app_installed(&self, _app_id: &str) -> Result<bool> {
        Ok(false)
    }

    fn open_store_listing(&self, app_id: &str) -> Result<()> {
        let url = self.config.store_listing_url_for(app_id);
        open::that(&url)
            .map_err(|e| Error::NativeApi(format!("Failed to open {}: {}", url, e)))
    }
}

/// Checks that `path` is a regular file and wraps it in a `file://` reference.
fn mint_file_reference(path: &Path) -> Result<ContentReference> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| Error::InvalidPath(format!("{}: {}", path.display(), e)))?;
    if !metadata.is_file() {
        return Err(Error::InvalidPath(format!(
            "{} is not a file",
            path.display()
        )));
    }
    let canonical = dunce::canonicalize(path)
        .map_err(|e| Error::InvalidPath(format!("{}: {}", path.display(), e)))?;
    let uri = Url::from_file_path(&canonical)
        .map_err(|_| Error::InvalidPath(format!("{} has no file URL", canonical.display())))?;
    Ok(ContentReference::new(uri, canonical))
}
