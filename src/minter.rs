use std::path::Path;

use log::debug;

use crate::host::ShareHost;
use crate::models::{AccessGrant, ContentReference};
use crate::Result;

/// Mints one reference per item, in input order. Stops at the first path the
/// host rejects.
pub fn mint_all<H: ShareHost>(host: &H, items: &[String]) -> Result<Vec<ContentReference>> {
    let references = items
        .iter()
        .map(|item| host.mint_shareable_reference(Path::new(item)))
        .collect::<Result<Vec<_>>>()?;
    debug!("Minted {} content reference(s)", references.len());
    Ok(references)
}

/// Grants every reference to every receiver.
pub fn grant_all<H: ShareHost>(
    host: &H,
    references: &[ContentReference],
    receivers: &[String],
    grant: AccessGrant,
) -> Result<()> {
    for receiver in receivers {
        for reference in references {
            host.grant_access(reference, receiver, grant)?;
        }
    }
    debug!(
        "Granted {} reference(s) to {} receiver(s)",
        references.len(),
        receivers.len()
    );
    Ok(())
}
