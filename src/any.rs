use crate::any_value::AnyHandle;
use crate::class::{Type, TypeCell};
use crate::error::AnyError;
use crate::wrapper::{ErasedWrapper, Family, ObjectWrapper};
use std::fmt;
use std::mem;
use std::sync::Arc;
use tracing::trace;

/// A type-erased holder for one shared object.
///
/// An `Any` is either empty or holds an object together with the `Type` of
/// the family it was stored as. Getting the object back with
/// [`Any::retrieve`] only works for that exact family, so erasure can't be
/// used to reinterpret a value as something unrelated.
///
/// Cloning an `Any` shares the held object; it never copies the payload.
///
/// # Examples
///
/// ```
/// use sovran_any::{Any, AnyError, Family, ObjectWrapper, Type, TypeCell};
///
/// struct IntBox;
/// impl Family for IntBox {
///     type Object = i64;
///     fn class_type() -> &'static Type {
///         static TYPE: TypeCell = TypeCell::new("IntBox");
///         TYPE.get()
///     }
/// }
///
/// struct StrBox;
/// impl Family for StrBox {
///     type Object = String;
///     fn class_type() -> &'static Type {
///         static TYPE: TypeCell = TypeCell::new("StrBox");
///         TYPE.get()
///     }
/// }
///
/// let mut value = Any::new();
/// value.store(&ObjectWrapper::<IntBox>::new(5));
///
/// assert_eq!(*value.retrieve::<IntBox>()?, 5);
/// assert!(matches!(
///     value.retrieve::<StrBox>(),
///     Err(AnyError::TypeMismatch { .. })
/// ));
///
/// value.clear();
/// assert!(value.stored_type().is_none());
/// # Ok::<(), AnyError>(())
/// ```
#[derive(Clone, Default)]
pub struct Any {
    handle: Option<Arc<AnyHandle>>,
}

impl Any {
    /// Creates an empty `Any`.
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// The `Type` of `Any` itself.
    pub fn class_type() -> &'static Type {
        static TYPE: TypeCell = TypeCell::new("Any");
        TYPE.get()
    }

    /// Stores `wrapper`'s object under the `Type` the wrapper carries,
    /// replacing whatever was held before.
    ///
    /// Storing a null wrapper still records its `Type`; retrieving it as that
    /// family then yields a null wrapper.
    pub fn store<F: Family>(&mut self, wrapper: &ObjectWrapper<F>) {
        trace!(family = wrapper.value_type().name(), null = wrapper.is_null(), "store");
        self.handle = Some(Arc::new(AnyHandle::new(wrapper)));
    }

    /// Stores an already erased wrapper under the `Type` it carries.
    pub fn store_erased(&mut self, wrapper: ErasedWrapper) {
        trace!(family = wrapper.value_type().name(), null = wrapper.is_null(), "store erased");
        self.handle = Some(Arc::new(AnyHandle::from_erased(wrapper)));
    }

    /// Empties the container, releasing its share of the held object.
    pub fn clear(&mut self) {
        self.handle = None;
    }

    /// Moves the held value out, leaving `self` empty.
    pub fn take(&mut self) -> Any {
        mem::take(self)
    }

    /// Returns true if nothing is held.
    pub fn is_empty(&self) -> bool {
        self.handle.is_none()
    }

    /// The `Type` captured at storage time, or `None` when empty.
    pub fn stored_type(&self) -> Option<&'static Type> {
        self.handle.as_ref().map(|handle| handle.value_type())
    }

    /// Returns true if the held value was stored as family `F`.
    pub fn holds<F: Family>(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| handle.is_type::<F>())
    }

    /// Recovers the held object as family `F`.
    ///
    /// An empty `Any` yields a null wrapper of `F`.
    ///
    /// # Errors
    ///
    /// Returns `AnyError::TypeMismatch` if the value was stored as a family
    /// other than `F`.
    pub fn retrieve<F: Family>(&self) -> Result<ObjectWrapper<F>, AnyError> {
        match &self.handle {
            None => Ok(ObjectWrapper::null()),
            Some(handle) => {
                trace!(family = F::class_type().name(), "retrieve");
                handle.retrieve::<F>()
            }
        }
    }
}

impl<F: Family> From<ObjectWrapper<F>> for Any {
    fn from(wrapper: ObjectWrapper<F>) -> Self {
        Self::from(&wrapper)
    }
}

impl<F: Family> From<&ObjectWrapper<F>> for Any {
    fn from(wrapper: &ObjectWrapper<F>) -> Self {
        let mut any = Any::new();
        any.store(wrapper);
        any
    }
}

impl From<ErasedWrapper> for Any {
    fn from(wrapper: ErasedWrapper) -> Self {
        let mut any = Any::new();
        any.store_erased(wrapper);
        any
    }
}

/// Two `Any`s are equal when both are empty, or when both hold the same
/// object under the same `Type`. Payloads are never compared by value.
impl PartialEq for Any {
    fn eq(&self, other: &Self) -> bool {
        match (&self.handle, &other.handle) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                Arc::ptr_eq(a, b) || (a.value_type() == b.value_type() && a.same_object(b))
            }
            _ => false,
        }
    }
}

impl Eq for Any {}

impl fmt::Debug for Any {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Any")
            .field("stored_type", &self.stored_type().map(Type::name))
            .finish()
    }
}
