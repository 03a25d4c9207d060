use serde::Deserialize;

const DEFAULT_TARGET_APP_ID: &str = "com.instagram.android";
const DEFAULT_STORE_LISTING_URL: &str = "https://play.google.com/store/apps/details?id={appId}";

/// Plugin configuration, read from `plugins.share-extend` in `tauri.conf.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Application used by `share_to_target` when the call names none.
    pub default_target_app_id: String,
    /// Store page template; `{appId}` is replaced with the target id.
    pub store_listing_url: String,
    /// FileProvider authority used to mint `content://` references on Android.
    pub file_provider_authority: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_target_app_id: DEFAULT_TARGET_APP_ID.to_string(),
            store_listing_url: DEFAULT_STORE_LISTING_URL.to_string(),
            file_provider_authority: None,
        }
    }
}

impl Config {
    pub fn store_listing_url_for(&self, app_id: &str) -> String {
        self.store_listing_url.replace("{appId}", app_id)
    }
}
