use super::RegistryError;
use std::fmt;

/// Fallback bucket used when no specific extension matches
pub const WILDCARD: &str = "*";

/// Canonical extension key
///
/// Every key except the wildcard carries a leading dot, so `md` and `.md`
/// address the same bucket in register, get, and clear alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExtKey(String);

impl ExtKey {
    /// The wildcard key, exempt from dot-prefixing
    pub fn wildcard() -> Self {
        ExtKey(WILDCARD.to_string())
    }

    /// Canonicalize an extension key
    ///
    /// Empty and dot-only keys are structurally invalid.
    pub fn new(ext: &str) -> Result<Self, RegistryError> {
        let ext = ext.trim();
        if ext.is_empty() || ext.chars().all(|c| c == '.') {
            return Err(RegistryError::InvalidExtension(ext.to_string()));
        }
        if ext == WILDCARD {
            return Ok(Self::wildcard());
        }
        if ext.starts_with('.') {
            Ok(ExtKey(ext.to_string()))
        } else {
            Ok(ExtKey(format!(".{ext}")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.0 == WILDCARD
    }
}

impl fmt::Display for ExtKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for ExtKey {
    type Error = RegistryError;

    fn try_from(ext: &str) -> Result<Self, Self::Error> {
        ExtKey::new(ext)
    }
}
