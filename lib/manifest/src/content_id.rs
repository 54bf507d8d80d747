use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier returned by the content store for an uploaded payload.
///
/// The value is opaque: nothing in the manifest depends on its length, alphabet or encoding.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ContentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ContentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for ContentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::ContentId;

    #[test]
    fn should_serialize_as_plain_string() {
        let id = ContentId::new("bNbA3TEQVL60xlgCcqdz4ZPHFZ711cZ3hmkpGttDt_U");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!("\"bNbA3TEQVL60xlgCcqdz4ZPHFZ711cZ3hmkpGttDt_U\"", json);

        let parsed: ContentId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
