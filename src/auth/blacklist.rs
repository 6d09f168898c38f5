//! Token Revocation Store
//! Mission: Track tokens invalidated by logout before their natural expiry

use parking_lot::RwLock;
use std::collections::HashSet;
use tracing::debug;

/// Process-wide set of revoked token strings.
///
/// Shared via `Arc` and consulted by the token validator on every protected
/// request. Entries live for the lifetime of the process; nothing is ever
/// expunged, and a restart starts from an empty set.
#[derive(Default)]
pub struct TokenBlacklist {
    revoked: RwLock<HashSet<String>>,
}

impl TokenBlacklist {
    pub fn new() -> Self {
        Self {
            revoked: RwLock::new(HashSet::new()),
        }
    }

    /// Revoke a token by its exact string representation. Idempotent.
    pub fn revoke(&self, token: &str) {
        let inserted = self.revoked.write().insert(token.to_string());
        if inserted {
            debug!("token added to revocation store");
        }
    }

    /// Exact-match membership test.
    pub fn is_revoked(&self, token: &str) -> bool {
        self.revoked.read().contains(token)
    }

    /// Number of revoked tokens currently held.
    pub fn len(&self) -> usize {
        self.revoked.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.revoked.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_starts_empty() {
        let blacklist = TokenBlacklist::new();
        assert!(blacklist.is_empty());
        assert!(!blacklist.is_revoked("anything"));
    }

    #[test]
    fn test_revoke_and_membership() {
        let blacklist = TokenBlacklist::new();
        blacklist.revoke("token-a");

        assert!(blacklist.is_revoked("token-a"));
        assert!(!blacklist.is_revoked("token-b"));
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let blacklist = TokenBlacklist::new();
        blacklist.revoke("token-a");
        blacklist.revoke("token-a");

        assert!(blacklist.is_revoked("token-a"));
        assert_eq!(blacklist.len(), 1);
    }

    #[test]
    fn test_exact_match_only() {
        let blacklist = TokenBlacklist::new();
        blacklist.revoke("token-a");

        assert!(!blacklist.is_revoked("token-a "));
        assert!(!blacklist.is_revoked("Token-a"));
        assert!(!blacklist.is_revoked("token"));
    }

    #[test]
    fn test_concurrent_revokes_and_reads() {
        let blacklist = Arc::new(TokenBlacklist::new());

        let writers: Vec<_> = (0..8)
            .map(|i| {
                let bl = blacklist.clone();
                std::thread::spawn(move || {
                    for j in 0..100 {
                        bl.revoke(&format!("token-{}-{}", i, j));
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let bl = blacklist.clone();
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let _ = bl.is_revoked("token-0-0");
                    }
                })
            })
            .collect();

        for handle in writers.into_iter().chain(readers) {
            handle.join().unwrap();
        }

        // Every revoke must be observed once the writers are done.
        assert_eq!(blacklist.len(), 8 * 100);
        for i in 0..8 {
            for j in 0..100 {
                assert!(blacklist.is_revoked(&format!("token-{}-{}", i, j)));
            }
        }
    }
}
