use tauri::{Runtime, Window};

use crate::models::{CanShareResult, ShareDirective};
use crate::Error;

// No native share surface exists here (Linux desktops, iOS without a Swift
// binding).

pub fn present_chooser<R: Runtime>(
    _window: Window<R>,
    directive: &ShareDirective,
    _title: Option<&str>,
) -> Result<(), Error> {
    Err(Error::Unsupported(format!(
        "no share surface for {}",
        directive.mime_type
    )))
}

pub fn can_share() -> Result<CanShareResult, Error> {
    Ok(CanShareResult { value: false })
}
