//! # tauri-plugin-share-extend
//!
//! A Tauri plugin that hands text or files to the system share sheet, or shares
//! them straight into one named application (Instagram by default) and falls
//! back to that application's store page when it is not installed.
//!
//! On Android, file shares are gated on the storage permission. A share issued
//! without it is parked, the prompt is shown, and the same request is replayed
//! once the permission is granted. A denied prompt drops the request.
//!
//! ## Usage
//!
//! ```rust,ignore
//! fn main() {
//!     tauri::Builder::default()
//!         .plugin(tauri_plugin_share_extend::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
//!
//! ```js
//! import { invoke } from '@tauri-apps/api/core';
//!
//! await invoke('plugin:share-extend|share', {
//!   options: { items: ['/storage/emulated/0/DCIM/a.jpg'], contentType: 'image', sharePanelTitle: 'Share photo' },
//! });
//!
//! await invoke('plugin:share-extend|share_to_target', {
//!   options: { items: ['/storage/emulated/0/DCIM/a.jpg'], contentType: 'image' },
//! });
//! ```
//!
//! ## Configuration
//!
//! ```json
//! {
//!   "plugins": {
//!     "share-extend": {
//!       "defaultTargetAppId": "com.instagram.android",
//!       "fileProviderAuthority": "com.example.app.fileprovider"
//!     }
//!   }
//! }
//! ```

use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, Runtime,
};

pub use models::*;

#[cfg(not(target_os = "android"))]
mod desktop;
#[cfg(target_os = "android")]
mod mobile;
#[cfg(not(target_os = "android"))]
mod platform;

mod classifier;
mod commands;
mod config;
mod dispatcher;
mod error;
mod host;
mod minter;
mod models;
mod resolver;
mod state;
mod targeted;
#[cfg(test)]
mod testing;

pub use classifier::{classify, target_mime, Classification};
pub use config::Config;
pub use dispatcher::ShareDispatcher;
pub use error::{Error, Result};
pub use host::ShareHost;
pub use state::{GateDecision, PendingRequest, PermissionGate};

#[cfg(not(target_os = "android"))]
use desktop::ShareExtend;
#[cfg(target_os = "android")]
use mobile::ShareExtend;

/// Extensions to [`tauri::App`], [`tauri::AppHandle`] and [`tauri::Window`] to access the share APIs.
pub trait ShareExtendExt<R: Runtime> {
    fn share_extend(&self) -> &ShareExtend<R>;
}

impl<R: Runtime, T: Manager<R>> crate::ShareExtendExt<R> for T {
    fn share_extend(&self) -> &ShareExtend<R> {
        self.state::<ShareExtend<R>>().inner()
    }
}

/// Initializes the plugin.
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<Config>> {
    Builder::<R, Option<Config>>::new("share-extend")
        .invoke_handler(tauri::generate_handler![
            commands::share,
            commands::share_to_target,
            commands::can_share,
        ])
        .setup(|app, api| {
            #[cfg(target_os = "android")]
            let share = mobile::init(app, api)?;
            #[cfg(not(target_os = "android"))]
            let share = desktop::init(app, api)?;
            app.manage(share);
            Ok(())
        })
        .build()
}
