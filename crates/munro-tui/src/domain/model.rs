//! Domain model for munro records.

use serde::{Deserialize, Serialize};

/// One entry in the fetched collection, describing a named peak.
///
/// Records are plain value objects taken wholesale from the API response;
/// they carry no identity beyond their fields. Unknown payload fields are
/// ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Munro {
    pub name: String,
    pub height: u32,
    pub region: String,
    pub meaning: String,
}
