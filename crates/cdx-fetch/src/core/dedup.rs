use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Seen {
    UrlKey(String),
    Digest(String),
}

/// Admits each piece of content once per run.
///
/// An entry is a duplicate when its `urlkey` *or* its `digest` has been
/// recorded before. Both fields are recorded on every call, admitted or not.
/// The memo lives as long as the gate and has no eviction.
#[derive(Debug, Default)]
pub struct DedupGate {
    seen: Mutex<HashSet<Seen>>,
}

impl DedupGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` the first time neither `urlkey` nor `digest` has been seen.
    ///
    /// The check and both inserts happen under one lock, so concurrent
    /// callers with overlapping keys cannot both be admitted.
    ///
    /// ```
    /// use cdx_fetch::DedupGate;
    ///
    /// let gate = DedupGate::new();
    /// assert!(gate.admit("com,example)/a", "SHA1:AAA"));
    /// assert!(!gate.admit("com,example)/b", "SHA1:AAA"));
    /// assert!(!gate.admit("com,example)/a", "SHA1:CCC"));
    /// ```
    pub fn admit(&self, urlkey: &str, digest: &str) -> bool {
        let key = Seen::UrlKey(urlkey.to_string());
        let digest = Seen::Digest(digest.to_string());

        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        let duplicate = seen.contains(&key) || seen.contains(&digest);
        seen.insert(key);
        seen.insert(digest);
        !duplicate
    }

    /// Number of distinct keys and digests recorded.
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn first_sighting_is_admitted() {
        let gate = DedupGate::new();
        assert!(gate.admit("a", "d1"));
        assert!(gate.admit("b", "d2"));
        assert_eq!(gate.len(), 4);
    }

    #[test]
    fn matching_either_field_suppresses() {
        let gate = DedupGate::new();
        assert!(gate.admit("a", "d1"));
        assert!(!gate.admit("a", "d2"), "same urlkey");
        assert!(!gate.admit("b", "d1"), "same digest");
    }

    #[test]
    fn denied_entries_are_still_recorded() {
        let gate = DedupGate::new();
        assert!(gate.admit("a", "d1"));
        // Denied because of "a", but "d2" is now recorded too.
        assert!(!gate.admit("a", "d2"));
        assert!(!gate.admit("c", "d2"));
        // Reapplying the same entry keeps reporting a duplicate.
        assert!(!gate.admit("a", "d2"));
    }

    #[test]
    fn keys_and_digests_do_not_collide() {
        let gate = DedupGate::new();
        assert!(gate.admit("same", "x"));
        assert!(gate.admit("y", "same"));
    }

    #[test]
    fn concurrent_callers_admit_overlapping_entries_once() {
        for _ in 0..20 {
            let gate = Arc::new(DedupGate::new());
            let admitted = Arc::new(AtomicUsize::new(0));
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let gate = Arc::clone(&gate);
                    let admitted = Arc::clone(&admitted);
                    std::thread::spawn(move || {
                        // Every thread shares the digest, keys differ.
                        if gate.admit(&format!("key-{i}"), "shared") {
                            admitted.fetch_add(1, Ordering::SeqCst);
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
            assert_eq!(admitted.load(Ordering::SeqCst), 1);
        }
    }
}
