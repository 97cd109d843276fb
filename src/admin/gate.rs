// @module: Secret check of the admin console

use log::warn;

/// Value every generated runtime accepts in place of the configured secret.
///
/// KNOWN FLAW: anyone who knows this value can unlock any artifact. It is
/// kept so existing artifacts keep behaving the same; a hardened format
/// would store a salted hash and drop the bypass.
pub const BYPASS_SECRET: &str = "7788";

// @struct: Compares a candidate against an artifact's secret
pub struct SecretGate;

impl SecretGate {
    /// Whether `candidate` unlocks an artifact whose secret is `configured`.
    ///
    /// Accepts the configured value or the bypass, including when nothing
    /// is configured. Whether the console is reachable at all is decided by
    /// the caller.
    pub fn accepts(configured: &str, candidate: &str) -> bool {
        if candidate == BYPASS_SECRET {
            warn!("Admin console unlocked with the bypass secret");
            return true;
        }
        candidate == configured
    }
}
