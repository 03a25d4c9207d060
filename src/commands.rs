use tauri::{command, AppHandle, Runtime, Window};

use crate::{error, models, ShareExtendExt};

#[command]
pub async fn share<R: Runtime>(
    app: AppHandle<R>,
    window: Window<R>,
    options: models::ShareOptions,
) -> Result<models::DispatchOutcome, error::Error> {
    app.share_extend().share(window, options)
}

#[command]
pub async fn share_to_target<R: Runtime>(
    app: AppHandle<R>,
    window: Window<R>,
    options: models::ShareToTargetOptions,
) -> Result<models::DispatchOutcome, error::Error> {
    app.share_extend().share_to_target(window, options)
}

#[command]
pub async fn can_share<R: Runtime>(
    app: AppHandle<R>,
) -> Result<models::CanShareResult, error::Error> {
    app.share_extend().can_share()
}
