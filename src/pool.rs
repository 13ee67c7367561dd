//! Scratch buffer pooling for NUMBER printing
//!
//! Printing a NUMBER needs a short-lived text buffer. Rather than allocate
//! one per call, buffers are kept on a bounded free-list and lent out to a
//! closure. A lent buffer is always cleared first and is returned to the
//! pool when the closure finishes, so nothing printed ever escapes.
//!
//! Callers that already own a buffer can skip the pool entirely with
//! [`OracleNumber::format_into`](crate::OracleNumber::format_into).

use std::sync::{Mutex, OnceLock};

use crate::config::Config;

/// Bounded free-list of print buffers
#[derive(Debug)]
pub struct BufferPool {
    /// Buffers ready for reuse
    free: Mutex<Vec<String>>,
    /// Initial capacity of newly allocated buffers
    scratch_capacity: usize,
    /// Maximum number of buffers kept on the free-list
    max_buffers: usize,
}

static GLOBAL_POOL: OnceLock<BufferPool> = OnceLock::new();

impl BufferPool {
    /// Create a pool with the given buffer capacity and free-list bound
    ///
    /// A bound of 0 disables pooling: every call allocates.
    pub fn new(scratch_capacity: usize, max_buffers: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(max_buffers)),
            scratch_capacity,
            max_buffers,
        }
    }

    /// Create a pool from the codec configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.scratch_capacity, config.max_pooled_buffers)
    }

    /// The process-wide pool, built from the default configuration
    pub fn global() -> &'static BufferPool {
        GLOBAL_POOL.get_or_init(|| BufferPool::from_config(&Config::default()))
    }

    /// Number of buffers currently waiting for reuse
    pub fn available(&self) -> usize {
        self.free.lock().map(|free| free.len()).unwrap_or(0)
    }

    /// Maximum number of buffers kept for reuse
    pub fn max_buffers(&self) -> usize {
        self.max_buffers
    }

    /// Lend a cleared buffer to `f` and take it back afterwards
    pub fn with_scratch<R>(&self, f: impl FnOnce(&mut String) -> R) -> R {
        let mut buf = self.acquire();
        let result = f(&mut buf);
        self.release(buf);
        result
    }

    fn acquire(&self) -> String {
        // Poisoned lock: allocate a fresh buffer
        let pooled = match self.free.lock() {
            Ok(mut free) => free.pop(),
            Err(_) => None,
        };

        match pooled {
            Some(mut buf) => {
                tracing::trace!(capacity = buf.capacity(), "Scratch buffer pool hit");
                buf.clear();
                buf
            }
            None => {
                tracing::trace!(capacity = self.scratch_capacity, "Scratch buffer pool miss");
                String::with_capacity(self.scratch_capacity)
            }
        }
    }

    fn release(&self, mut buf: String) {
        buf.clear();
        if let Ok(mut free) = self.free.lock() {
            if free.len() < self.max_buffers {
                free.push(buf);
                tracing::trace!(available = free.len(), "Scratch buffer returned to pool");
                return;
            }
        }
        tracing::trace!("Scratch buffer pool full, discarding buffer");
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_reused() {
        let pool = BufferPool::new(16, 2);
        assert_eq!(pool.available(), 0);

        pool.with_scratch(|buf| buf.push_str("12345"));
        assert_eq!(pool.available(), 1);

        // Reused buffer comes back cleared
        let len = pool.with_scratch(|buf| buf.len());
        assert_eq!(len, 0);
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_pool_bound() {
        let pool = BufferPool::new(16, 1);
        pool.with_scratch(|outer| {
            outer.push('1');
            pool.with_scratch(|inner| inner.push('2'));
        });
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_pool_disabled() {
        let pool = BufferPool::new(16, 0);
        let value = pool.with_scratch(|buf| {
            buf.push_str("abc");
            buf.clone()
        });
        assert_eq!(value, "abc");
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn test_from_config() {
        let pool = BufferPool::from_config(&Config::new().max_pooled_buffers(3));
        assert_eq!(pool.max_buffers(), 3);
    }

    #[test]
    fn test_global_pool_is_shared() {
        assert!(std::ptr::eq(BufferPool::global(), BufferPool::global()));
    }

    #[test]
    fn test_global_pool_concurrent_printing() {
        use crate::OracleNumber;

        std::thread::scope(|scope| {
            for t in 0..8i64 {
                scope.spawn(move || {
                    for i in 0..200i64 {
                        let value = (t * 1_000_003 + i) * if i % 2 == 0 { 1 } else { -1 };
                        let num = OracleNumber::from(value);
                        let printed = BufferPool::global().with_scratch(|buf| {
                            assert!(buf.is_empty());
                            num.format_into(buf).to_string()
                        });
                        assert_eq!(printed, value.to_string());
                        assert_eq!(num.to_string(), value.to_string());
                    }
                });
            }
        });
        assert!(BufferPool::global().available() <= BufferPool::global().max_buffers());
    }
}
