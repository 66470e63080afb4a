//! Domain primitive types used across the confine workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Device number (`st_dev`) of the filesystem backing a mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceNumber {
    /// Major device number.
    pub major: u32,
    /// Minor device number.
    pub minor: u32,
}

impl DeviceNumber {
    /// Creates a device number from its parts.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for DeviceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_major_colon_minor() {
        assert_eq!(DeviceNumber::new(98, 0).to_string(), "98:0");
    }
}
