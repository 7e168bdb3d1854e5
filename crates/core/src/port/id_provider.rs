// ID Provider Port (for deterministic testing)

use std::sync::atomic::{AtomicU64, Ordering};

/// ID provider interface (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Generate a new unique user ID
    fn generate_id(&self) -> String;
}

/// Monotonic counter rendered as a decimal string, starting at "1"
#[derive(Debug)]
pub struct SequentialIdProvider {
    next: AtomicU64,
}

impl SequentialIdProvider {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIdProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdProvider for SequentialIdProvider {
    fn generate_id(&self) -> String {
        self.next.fetch_add(1, Ordering::SeqCst).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_sequential_ids_start_at_one() {
        let ids = SequentialIdProvider::new();
        assert_eq!(ids.generate_id(), "1");
        assert_eq!(ids.generate_id(), "2");
        assert_eq!(ids.generate_id(), "3");
    }

    #[tokio::test]
    async fn test_sequential_ids_unique_across_tasks() {
        let ids = Arc::new(SequentialIdProvider::new());

        let mut handles = vec![];
        for _ in 0..8 {
            let ids = Arc::clone(&ids);
            handles.push(tokio::spawn(async move {
                (0..50).map(|_| ids.generate_id()).collect::<Vec<_>>()
            }));
        }

        let mut all = vec![];
        for handle in handles {
            all.extend(handle.await.unwrap());
        }
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 400);
    }
}
