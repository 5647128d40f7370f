//! Collection reference normalization.
//!
//! Users paste whatever the Steam client or browser gave them: a bare numeric
//! collection ID, a full `filedetails` URL, or that URL without a scheme.
//! Everything normalizes to the canonical collection URL; anything else is
//! rejected before a single request is made.

use url::Url;

use crate::error::{SteamError, SteamResult};

const COLLECTION_URL_BASE: &str = "https://steamcommunity.com/sharedfiles/filedetails/?id=";

/// Normalize a collection reference into the canonical page URL.
pub(crate) fn canonical_collection_url(reference: &str) -> SteamResult<Url> {
    let reference = reference.trim();

    if !reference.is_empty() && reference.chars().all(|c| c.is_ascii_digit()) {
        let url = Url::parse(&format!("{COLLECTION_URL_BASE}{reference}"))?;
        return Ok(url);
    }

    // Tolerate a pasted URL missing its scheme.
    let candidate = if reference.starts_with("http://") || reference.starts_with("https://") {
        reference.to_string()
    } else if reference.starts_with("steamcommunity.com/") {
        format!("https://{reference}")
    } else {
        return Err(invalid(reference));
    };

    let url = Url::parse(&candidate)?;
    let host_ok = url
        .host_str()
        .is_some_and(|h| h == "steamcommunity.com" || h.ends_with(".steamcommunity.com"));
    if !host_ok {
        return Err(invalid(reference));
    }

    let id = url
        .query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
        .ok_or_else(|| invalid(reference))?;

    Ok(Url::parse(&format!("{COLLECTION_URL_BASE}{id}"))?)
}

fn invalid(reference: &str) -> SteamError {
    SteamError::InvalidReference {
        reference: reference.to_string(),
    }
}
