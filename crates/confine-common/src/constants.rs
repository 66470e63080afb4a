//! System-wide constants and default paths.

/// Mount table of the calling process, used when no explicit path is given.
pub const DEFAULT_MOUNTINFO_PATH: &str = "/proc/self/mountinfo";

/// Token that terminates the optional-fields run of a mountinfo line.
pub const OPTIONAL_FIELDS_SEPARATOR: &[u8] = b"-";

/// Optional-field tag marking a mount as a member of a shared peer group.
pub const TAG_SHARED: &str = "shared";

/// Optional-field tag marking a mount as a slave of a peer group.
pub const TAG_MASTER: &str = "master";

/// Optional-field tag naming the closest dominant peer group.
pub const TAG_PROPAGATE_FROM: &str = "propagate_from";

/// Optional-field tag marking a mount as unbindable.
pub const TAG_UNBINDABLE: &str = "unbindable";
