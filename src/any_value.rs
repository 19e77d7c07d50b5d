use crate::class::Type;
use crate::countable::Shared;
use crate::error::AnyError;
use crate::wrapper::{recover, ErasedWrapper, Family, ObjectWrapper};
use std::any::Any;
use std::sync::Arc;

/// An erased object paired with the `Type` it was captured as.
///
/// Built once per store and never changed afterwards, so any number of
/// containers can share one behind an `Arc`.
#[derive(Debug)]
pub(crate) struct AnyHandle {
    object: Option<Shared<dyn Any + Send + Sync>>,
    value_type: &'static Type,
}

impl AnyHandle {
    /// Capture a typed wrapper's object under the `Type` the wrapper carries
    pub(crate) fn new<F: Family>(wrapper: &ObjectWrapper<F>) -> Self {
        Self::from_erased(wrapper.erase())
    }

    /// Capture an already erased wrapper as-is
    pub(crate) fn from_erased(wrapper: ErasedWrapper) -> Self {
        let (object, value_type) = wrapper.into_parts();
        Self { object, value_type }
    }

    pub(crate) fn value_type(&self) -> &'static Type {
        self.value_type
    }

    /// Check if the captured object is of family F
    pub(crate) fn is_type<F: Family>(&self) -> bool {
        self.value_type == F::class_type()
    }

    /// Get a new wrapper sharing the object if it is of family F
    pub(crate) fn retrieve<F: Family>(&self) -> Result<ObjectWrapper<F>, AnyError> {
        recover(self.object.as_ref(), self.value_type)
    }

    /// Same object (or both null) as `other`
    pub(crate) fn same_object(&self, other: &AnyHandle) -> bool {
        match (&self.object, &other.object) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}
