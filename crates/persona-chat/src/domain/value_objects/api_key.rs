//! ApiKey - Model provider credential

/// Value shipped in sample configuration files. Treated as "not configured".
pub const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

/// A provider credential that passed basic validation.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Accept a raw credential, rejecting missing, blank and placeholder values
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let key = raw?.trim();
        if key.is_empty() || key == PLACEHOLDER_API_KEY {
            return None;
        }
        Some(Self(key.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
