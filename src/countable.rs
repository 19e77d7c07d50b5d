use std::any::Any;
use std::sync::Arc;

/// Shared, reference-counted ownership of a [`Countable`] object.
///
/// Cloning a `Shared` retains the object and dropping one releases it. The
/// count is atomic, so owners may live on different threads; the object is
/// destroyed exactly once, when the last owner goes away.
pub type Shared<T> = Arc<T>;

/// Capability for objects that can be shared between several owners and
/// erased behind an [`Any`](crate::Any).
///
/// Every `'static + Send + Sync` type is `Countable`.
pub trait Countable: Any + Send + Sync {}

impl<T: Any + Send + Sync> Countable for T {}

/// Number of live owners of `object`.
pub fn owner_count<T: ?Sized>(object: &Shared<T>) -> usize {
    Arc::strong_count(object)
}
