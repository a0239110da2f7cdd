//! Photo URLs and address locations.

use kore_persistence::models::Address;
use serde_json::{Value, json};

const FINNA_RECORD: &str = ".finna.fi/Record/";
const FINNA_THUMBNAIL: &str = ".finna.fi/thumbnail.php?id=";

/// Rewrites a Finna record page URL to the record's large thumbnail.
/// Other URLs are returned unchanged.
pub fn photo_url(url: &str) -> String {
    if url.contains(FINNA_RECORD) {
        format!("{}&size=large", url.replace(FINNA_RECORD, FINNA_THUMBNAIL))
    } else {
        url.to_string()
    }
}

/// Renders an address location as a GeoJSON point, or null when either
/// coordinate is missing.
pub fn location(address: &Address) -> Value {
    match (address.longitude, address.latitude) {
        (Some(lon), Some(lat)) => json!({
            "type": "Point",
            "coordinates": [lon, lat],
        }),
        _ => Value::Null,
    }
}
