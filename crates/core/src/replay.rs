//! # リプレイガード
//!
//! 消費済みのキー（署名バイト列またはnonce）を記録する。
//! エントリは償還成功の副作用としてのみ追加され、削除されることはない。

use std::collections::HashSet;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct ReplayGuard<K> {
    used: HashSet<K>,
}

impl<K: Eq + Hash> ReplayGuard<K> {
    pub fn new() -> Self {
        Self {
            used: HashSet::new(),
        }
    }

    pub fn is_used(&self, key: &K) -> bool {
        self.used.contains(key)
    }

    /// キーを消費済みにする。既に消費済みだった場合は`false`。
    pub fn mark(&mut self, key: K) -> bool {
        self.used.insert(key)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

impl<K: Eq + Hash> Default for ReplayGuard<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_transitions_once() {
        let mut guard = ReplayGuard::new();
        assert!(!guard.is_used(&7u64));
        assert!(guard.mark(7u64));
        assert!(guard.is_used(&7u64));
        assert!(!guard.mark(7u64));
        assert_eq!(guard.len(), 1);
    }

    #[test]
    fn test_signature_keys_compare_by_bytes() {
        let mut guard: ReplayGuard<Vec<u8>> = ReplayGuard::default();
        guard.mark(vec![1, 2, 3]);
        assert!(guard.is_used(&vec![1, 2, 3]));
        assert!(!guard.is_used(&vec![1, 2, 4]));
    }
}
