use std::path::Path;

use crate::models::{AccessGrant, ContentReference, LaunchResult, ShareDirective};
use crate::Result;

/// The primitives a platform must provide for the dispatcher to share content.
///
/// Implementations only perform what they are asked; every decision about
/// permissions, references, MIME types and fallbacks is made by the caller.
pub trait ShareHost: Send + Sync {
    /// Whether the app currently holds the file-access permission.
    fn has_file_access_permission(&self) -> Result<bool>;

    /// Issues the permission prompt and returns without waiting for it.
    ///
    /// The answer must be delivered later through
    /// [`ShareDispatcher::on_permission_result`](crate::ShareDispatcher::on_permission_result).
    fn request_file_access_permission(&self) -> Result<()>;

    /// Turns a file path into a reference another process may open. Fails
    /// with [`Error::InvalidPath`](crate::Error::InvalidPath) when the path is
    /// not an accessible file.
    fn mint_shareable_reference(&self, path: &Path) -> Result<ContentReference>;

    /// Lists the applications able to handle `directive`.
    fn resolve_receivers(&self, directive: &ShareDirective) -> Result<Vec<String>>;

    fn grant_access(
        &self,
        reference: &ContentReference,
        receiver: &str,
        grant: AccessGrant,
    ) -> Result<()>;

    fn present_chooser(&self, directive: &ShareDirective, title: Option<&str>) -> Result<()>;

    fn launch_app(&self, directive: &ShareDirective, app_id: &str) -> Result<LaunchResult>;

    fn is_app_installed(&self, app_id: &str) -> Result<bool>;

    fn open_store_listing(&self, app_id: &str) -> Result<()>;
}
