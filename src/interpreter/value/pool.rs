use std::{collections::TryReserveError, sync::Arc};

use crate::interpreter::value::Value;

/// Upper bound on the number of idle buffers a pool keeps.
pub const MAX_POOLED_BUFFERS: usize = 8;

/// Free list of sequence buffers.
///
/// Buffers are recycled only out of sequences whose `Arc` is uniquely owned.
/// A sequence bound to a variable is always shared with that binding, so a
/// value some binding can observe never ends up here and is never mutated.
#[derive(Debug, Default)]
pub struct SequencePool {
    free: Vec<Vec<Value>>,
}

impl SequencePool {
    #[must_use]
    pub const fn new() -> Self {
        Self { free: Vec::new() }
    }

    /// Returns an empty buffer with room for at least `capacity` values.
    ///
    /// Reuses a pooled buffer when there is one. Fails only if the memory
    /// cannot be reserved.
    pub fn acquire(&mut self, capacity: usize) -> Result<Vec<Value>, TryReserveError> {
        let mut buffer = match self.free.pop() {
            Some(buffer) => {
                tracing::trace!(capacity = buffer.capacity(), "reusing pooled sequence buffer");
                buffer
            },
            None => Vec::new(),
        };
        buffer.try_reserve(capacity)?;
        Ok(buffer)
    }

    /// Takes back the buffer of `value` if nothing else references it.
    ///
    /// Returns whether the buffer was pooled.
    ///
    /// # Example
    /// ```
    /// use seqcalc::interpreter::value::{SequencePool, Value};
    ///
    /// let mut pool = SequencePool::new();
    /// let shared = Value::from(vec![Value::Int(1)]);
    /// let binding = shared.clone();
    ///
    /// assert!(!pool.recycle(shared));
    /// assert!(pool.recycle(binding));
    /// assert_eq!(pool.len(), 1);
    /// ```
    pub fn recycle(&mut self, value: Value) -> bool {
        match value {
            Value::Sequence(values) => match Arc::try_unwrap(values) {
                Ok(buffer) => self.recycle_buffer(buffer),
                Err(_) => false,
            },
            _ => false,
        }
    }

    /// Takes back a buffer the caller owns outright.
    pub fn recycle_buffer(&mut self, mut buffer: Vec<Value>) -> bool {
        if self.free.len() >= MAX_POOLED_BUFFERS || buffer.capacity() == 0 {
            return false;
        }
        buffer.clear();
        self.free.push(buffer);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.free.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquired_buffer_is_empty_and_reused() {
        let mut pool = SequencePool::new();
        assert!(pool.recycle(Value::from(vec![Value::Int(1), Value::Int(2), Value::Int(3)])));

        let buffer = pool.acquire(2).unwrap();
        assert!(buffer.is_empty());
        assert!(buffer.capacity() >= 3);
        assert!(pool.is_empty());
    }

    #[test]
    fn shared_sequences_are_not_recycled() {
        let mut pool = SequencePool::new();
        let value = Value::from(vec![Value::Int(7)]);
        let observer = value.clone();

        assert!(!pool.recycle(value));
        assert_eq!(observer, Value::from(vec![Value::Int(7)]));
        assert!(pool.is_empty());
    }

    #[test]
    fn scalars_are_ignored() {
        let mut pool = SequencePool::new();
        assert!(!pool.recycle(Value::Int(1)));
        assert!(!pool.recycle(Value::Error));
        assert!(!pool.recycle_buffer(Vec::new()));
    }

    #[test]
    fn pool_is_bounded() {
        let mut pool = SequencePool::new();
        for _ in 0..MAX_POOLED_BUFFERS + 3 {
            pool.recycle(Value::from(vec![Value::Int(0)]));
        }
        assert_eq!(pool.len(), MAX_POOLED_BUFFERS);
    }
}
