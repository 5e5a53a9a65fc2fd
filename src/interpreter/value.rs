/// The runtime value type.
///
/// Defines `Value`, its constructors and its textual form. The error value
/// is an ordinary variant that poisons every expression it flows into.
pub mod core;
/// Reuse of sequence buffers.
///
/// Defines `SequencePool`, a small free list of sequence buffers that bulk
/// operators draw from instead of allocating. A buffer only enters the pool
/// when no variable binding can still observe it.
pub mod pool;

pub use self::{core::Value, pool::SequencePool};
