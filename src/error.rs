use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

// Errors returned to the frontend. Permission denial and a missing target app
// are not errors: the first drops the request, the second falls back to the
// store listing.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
    #[error("Malformed request: non-empty item list expected")]
    EmptyPayload,
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Failed to interact with native sharing API: {0}")]
    NativeApi(String),
    #[error("Sharing is not supported on this platform: {0}")]
    Unsupported(String),
    #[cfg(target_os = "android")]
    #[error("Plugin invoke error: {0}")]
    PluginInvoke(String),
    #[error("Tauri API error: {0}")]
    Tauri(#[from] tauri::Error),
}

impl Error {
    /// True for errors caused by the shape of the caller's arguments.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedRequest(_) | Error::EmptyPayload)
    }
}

#[cfg(target_os = "android")]
impl From<tauri::plugin::mobile::PluginInvokeError> for Error {
    fn from(err: tauri::plugin::mobile::PluginInvokeError) -> Self {
        Error::PluginInvoke(err.to_string())
    }
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}
