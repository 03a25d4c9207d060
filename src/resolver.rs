use crate::models::ContentTag;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub needs_file_access: bool,
}

/// Decides whether a payload is plain text or file-backed.
///
/// Every item of a non-text payload is a filesystem path, so the whole payload
/// needs file access before references can be minted.
pub fn classify(_items: &[String], tag: ContentTag) -> Resolution {
    Resolution {
        needs_file_access: tag != ContentTag::Text,
    }
}
