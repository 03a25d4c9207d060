use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The declared kind of content in a share call.
///
/// Unknown tags deserialize to [`ContentTag::Other`] and are shared as
/// generic documents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentTag {
    Text,
    Image,
    Video,
    #[serde(other)]
    Other,
}

/// Media kinds accepted by a targeted share. Anything that isn't an image is
/// handed over as video.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetMedia {
    Image,
    #[serde(other)]
    Video,
}

/// Raw arguments of the `share` command, before validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareOptions {
    #[serde(default, alias = "list")]
    pub items: Vec<String>,
    #[serde(alias = "type")]
    pub content_type: ContentTag,
    pub share_panel_title: Option<String>,
    pub subject: Option<String>,
}

/// Raw arguments of the `share_to_target` command, before validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareToTargetOptions {
    #[serde(default, alias = "list")]
    pub items: Vec<String>,
    #[serde(alias = "type")]
    pub content_type: TargetMedia,
    /// Falls back to the configured default target when absent.
    pub target_app_id: Option<String>,
}

impl ShareToTargetOptions {
    /// Validates the options and picks the target, using `default_target`
    /// when the call names none.
    pub fn into_request(self, default_target: &str) -> Result<(TargetedShareRequest, String)> {
        let target_app_id = match self.target_app_id {
            Some(id) if id.trim().is_empty() => {
                return Err(Error::MalformedRequest("`targetAppId` is blank".to_string()))
            }
            Some(id) => id,
            None => default_target.to_string(),
        };
        let request = TargetedShareRequest::new(self.items, self.content_type)?;
        Ok((request, target_app_id))
    }
}

/// A validated request for the generic chooser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    items: Vec<String>,
    content_tag: ContentTag,
    chooser_title: Option<String>,
    subject: Option<String>,
}

impl ShareRequest {
    pub fn new(
        items: Vec<String>,
        content_tag: ContentTag,
        chooser_title: Option<String>,
        subject: Option<String>,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::EmptyPayload);
        }
        Ok(Self {
            items,
            content_tag,
            chooser_title,
            subject,
        })
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn content_tag(&self) -> ContentTag {
        self.content_tag
    }

    pub fn chooser_title(&self) -> Option<&str> {
        self.chooser_title.as_deref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }
}

impl TryFrom<ShareOptions> for ShareRequest {
    type Error = Error;

    fn try_from(options: ShareOptions) -> Result<Self> {
        ShareRequest::new(
            options.items,
            options.content_type,
            options.share_panel_title,
            options.subject,
        )
    }
}

/// A validated request aimed at one named application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetedShareRequest {
    items: Vec<String>,
    media: TargetMedia,
}

impl TargetedShareRequest {
    pub fn new(items: Vec<String>, media: TargetMedia) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::EmptyPayload);
        }
        Ok(Self { items, media })
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn media(&self) -> TargetMedia {
        self.media
    }
}

/// An access-scoped handle standing in for a file path.
///
/// `uri` is what receiving applications see (a `content://` URI on Android, a
/// `file://` URL on desktop). `path` is the source file it was minted from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentReference {
    uri: String,
    path: PathBuf,
}

impl ContentReference {
    pub fn new(uri: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            uri: uri.into(),
            path: path.into(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Access granted on a [`ContentReference`] to a receiving application.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    pub read: bool,
    pub write: bool,
}

impl AccessGrant {
    pub const READ_WRITE: AccessGrant = AccessGrant {
        read: true,
        write: true,
    };
}

/// Whether a directive carries one attachment or several.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DispatchShape {
    Single,
    Multiple,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DirectiveBody {
    Text { text: String },
    Single { reference: ContentReference },
    Multiple { references: Vec<ContentReference> },
}

/// What to share, as what MIME type, and optionally to whom.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareDirective {
    pub mime_type: String,
    pub body: DirectiveBody,
    pub subject: Option<String>,
    pub target_app_id: Option<String>,
}

impl ShareDirective {
    pub fn text(text: impl Into<String>, subject: Option<String>) -> Self {
        Self {
            mime_type: "text/plain".to_string(),
            body: DirectiveBody::Text { text: text.into() },
            subject,
            target_app_id: None,
        }
    }

    pub fn shape(&self) -> DispatchShape {
        match self.body {
            DirectiveBody::Multiple { .. } => DispatchShape::Multiple,
            _ => DispatchShape::Single,
        }
    }

    /// The attached references, in dispatch order. Empty for text directives.
    pub fn references(&self) -> &[ContentReference] {
        match &self.body {
            DirectiveBody::Text { .. } => &[],
            DirectiveBody::Single { reference } => std::slice::from_ref(reference),
            DirectiveBody::Multiple { references } => references,
        }
    }
}

/// Result of a host attempt to open a directive in a named application.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LaunchResult {
    Launched,
    NotFound,
}

/// How a share call completed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DispatchOutcome {
    /// The chooser surface was shown. What the user picks is not observed.
    ChooserPresented,
    /// A permission prompt is outstanding; the request resumes on grant.
    PermissionPending,
    #[serde(rename_all = "camelCase")]
    SharedToTarget { app_id: String },
    #[serde(rename_all = "camelCase")]
    StoreListingOpened { app_id: String },
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanShareResult {
    pub value: bool,
}
