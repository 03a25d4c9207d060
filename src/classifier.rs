use crate::models::{ContentTag, DispatchShape, TargetMedia};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub mime_type: &'static str,
    pub shape: DispatchShape,
}

/// Maps a content tag and item count to the MIME category and dispatch shape
/// of the chooser directive.
pub fn classify(tag: ContentTag, count: usize) -> Classification {
    let mime_type = match tag {
        ContentTag::Text => "text/plain",
        ContentTag::Image => "image/*",
        ContentTag::Video => "video/*",
        ContentTag::Other => "application/*",
    };
    let shape = if count == 1 {
        DispatchShape::Single
    } else {
        DispatchShape::Multiple
    };
    Classification { mime_type, shape }
}

/// MIME type used when sharing straight into a named application.
pub fn target_mime(media: TargetMedia) -> &'static str {
    match media {
        TargetMedia::Image => "image/jpeg",
        TargetMedia::Video => "video/*",
    }
}
