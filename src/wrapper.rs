use crate::class::Type;
use crate::countable::{owner_count, Countable, Shared};
use crate::error::AnyError;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ops::Deref;
use std::sync::Arc;
use tracing::debug;

/// A wrapper-type family: the object type its handles share, plus the
/// family's runtime [`Type`].
///
/// # Examples
///
/// ```
/// use sovran_any::{Family, ObjectWrapper, Type, TypeCell};
///
/// struct IntBox;
///
/// impl Family for IntBox {
///     type Object = i64;
///
///     fn class_type() -> &'static Type {
///         static TYPE: TypeCell = TypeCell::new("IntBox");
///         TYPE.get()
///     }
/// }
///
/// let five = ObjectWrapper::<IntBox>::new(5);
/// assert_eq!(*five, 5);
/// assert_eq!(five.value_type(), IntBox::class_type());
/// ```
pub trait Family: 'static {
    /// The shared payload of this family.
    type Object: Countable;

    /// The family's single, process-wide `Type`.
    fn class_type() -> &'static Type;
}

/// A shared handle to an object of family `F` that always knows its `Type`.
///
/// Cloning retains the object. A null handle still carries a `Type`, so
/// asking a null wrapper what it would hold stays meaningful.
pub struct ObjectWrapper<F: Family> {
    object: Option<Shared<F::Object>>,
    value_type: &'static Type,
    _family: PhantomData<fn() -> F>,
}

impl<F: Family> ObjectWrapper<F> {
    /// Allocates a new shared object with the family's canonical `Type`.
    pub fn new(value: F::Object) -> Self {
        Self::from_shared(Arc::new(value), F::class_type())
    }

    /// Wraps an existing shared object.
    ///
    /// The caller asserts that `value_type` describes `object`.
    pub fn from_shared(object: Shared<F::Object>, value_type: &'static Type) -> Self {
        Self {
            object: Some(object),
            value_type,
            _family: PhantomData,
        }
    }

    /// An empty handle carrying the family's canonical `Type`.
    pub fn null() -> Self {
        Self::null_of(F::class_type())
    }

    fn null_of(value_type: &'static Type) -> Self {
        Self {
            object: None,
            value_type,
            _family: PhantomData,
        }
    }

    /// Returns true if no object is held.
    pub fn is_null(&self) -> bool {
        self.object.is_none()
    }

    /// The `Type` this handle carries, set even when null.
    pub fn value_type(&self) -> &'static Type {
        self.value_type
    }

    /// Borrows the object, or `None` when null.
    pub fn get(&self) -> Option<&F::Object> {
        self.object.as_deref()
    }

    /// Borrows the shared owner of the object, or `None` when null.
    pub fn object(&self) -> Option<&Shared<F::Object>> {
        self.object.as_ref()
    }

    /// Consumes the handle, returning its share of the object.
    pub fn into_shared(self) -> Option<Shared<F::Object>> {
        self.object
    }

    /// Moves the object out, leaving `self` null with the same `Type`.
    pub fn take(&mut self) -> Self {
        let empty = Self::null_of(self.value_type);
        mem::replace(self, empty)
    }

    /// True if both handles point at the same object, or both are null.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.object, &other.object) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Live owners of the wrapped object; 0 when null.
    pub fn owner_count(&self) -> usize {
        self.object.as_ref().map_or(0, owner_count)
    }

    /// Drops the static family, keeping the object and its `Type`.
    pub fn erase(&self) -> ErasedWrapper {
        ErasedWrapper {
            object: self
                .object
                .clone()
                .map(|object| object as Shared<dyn Any + Send + Sync>),
            value_type: self.value_type,
        }
    }
}

impl<F: Family> Clone for ObjectWrapper<F> {
    fn clone(&self) -> Self {
        Self {
            object: self.object.clone(),
            value_type: self.value_type,
            _family: PhantomData,
        }
    }
}

impl<F: Family> Default for ObjectWrapper<F> {
    fn default() -> Self {
        Self::null()
    }
}

impl<F: Family> From<Shared<F::Object>> for ObjectWrapper<F> {
    fn from(object: Shared<F::Object>) -> Self {
        Self::from_shared(object, F::class_type())
    }
}

/// # Panics
///
/// Dereferencing a null wrapper panics. Check [`ObjectWrapper::is_null`] or
/// use [`ObjectWrapper::get`] when the handle may be empty.
impl<F: Family> Deref for ObjectWrapper<F> {
    type Target = F::Object;

    fn deref(&self) -> &F::Object {
        match &self.object {
            Some(object) => &**object,
            None => panic!("dereferenced a null ObjectWrapper of {}", self.value_type),
        }
    }
}

impl<F: Family> fmt::Debug for ObjectWrapper<F>
where
    F::Object: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ObjectWrapper")
            .field("type", &self.value_type.name())
            .field("object", &self.object)
            .finish()
    }
}

/// An [`ObjectWrapper`] whose family is only known at runtime.
///
/// This is what a decoder hands around before it knows which field a value
/// belongs to. [`ErasedWrapper::downcast`] applies the same check as
/// [`Any::retrieve`](crate::Any::retrieve).
#[derive(Clone)]
pub struct ErasedWrapper {
    object: Option<Shared<dyn Any + Send + Sync>>,
    value_type: &'static Type,
}

impl ErasedWrapper {
    /// The `Type` the object was erased under.
    pub fn value_type(&self) -> &'static Type {
        self.value_type
    }

    /// Returns true if no object is held.
    pub fn is_null(&self) -> bool {
        self.object.is_none()
    }

    /// Recovers a typed wrapper if `F` is exactly the erased family.
    ///
    /// # Errors
    ///
    /// Returns `AnyError::TypeMismatch` if `F`'s `Type` is not the erased one.
    pub fn downcast<F: Family>(&self) -> Result<ObjectWrapper<F>, AnyError> {
        recover(self.object.as_ref(), self.value_type)
    }

    pub(crate) fn into_parts(self) -> (Option<Shared<dyn Any + Send + Sync>>, &'static Type) {
        (self.object, self.value_type)
    }
}

impl fmt::Debug for ErasedWrapper {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ErasedWrapper")
            .field("type", &self.value_type.name())
            .field("null", &self.is_null())
            .finish()
    }
}

/// Rebuilds a typed wrapper from an erased object captured as `stored`.
///
/// The `Type` identity check is what makes the reinterpretation legitimate;
/// the `Arc` downcast is its runtime proof.
pub(crate) fn recover<F: Family>(
    object: Option<&Shared<dyn Any + Send + Sync>>,
    stored: &'static Type,
) -> Result<ObjectWrapper<F>, AnyError> {
    let requested = F::class_type();
    let mismatch = AnyError::TypeMismatch {
        requested: requested.class_id(),
        stored: stored.class_id(),
    };

    if stored != requested {
        debug!(
            requested = requested.name(),
            stored = stored.name(),
            "rejected retrieval of mismatched type"
        );
        return Err(mismatch);
    }

    match object {
        None => Ok(ObjectWrapper::null_of(stored)),
        Some(object) => match Arc::clone(object).downcast::<F::Object>() {
            Ok(typed) => Ok(ObjectWrapper::from_shared(typed, stored)),
            Err(_) => {
                debug!(
                    family = requested.name(),
                    "stored object does not have the family's object type"
                );
                Err(mismatch)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::TypeCell;
    use std::sync::atomic::{AtomicI64, Ordering};

    struct IntBox;

    impl Family for IntBox {
        type Object = i64;

        fn class_type() -> &'static Type {
            static TYPE: TypeCell = TypeCell::new("wrapper_tests::IntBox");
            TYPE.get()
        }
    }

    struct Counter;

    impl Family for Counter {
        type Object = AtomicI64;

        fn class_type() -> &'static Type {
            static TYPE: TypeCell = TypeCell::new("wrapper_tests::Counter");
            TYPE.get()
        }
    }

    // Claims IntBox's Type but shares a different object type
    struct Impostor;

    impl Family for Impostor {
        type Object = String;

        fn class_type() -> &'static Type {
            IntBox::class_type()
        }
    }

    #[test]
    fn test_new_wrapper() {
        let wrapper = ObjectWrapper::<IntBox>::new(42);
        assert!(!wrapper.is_null());
        assert_eq!(*wrapper, 42);
        assert_eq!(wrapper.get(), Some(&42));
        assert_eq!(wrapper.value_type(), IntBox::class_type());
        assert_eq!(wrapper.owner_count(), 1);
    }

    #[test]
    fn test_null_wrapper_keeps_type() {
        let wrapper = ObjectWrapper::<IntBox>::null();
        assert!(wrapper.is_null());
        assert!(wrapper.get().is_none());
        assert_eq!(wrapper.value_type(), IntBox::class_type());
        assert_eq!(wrapper.owner_count(), 0);

        let default: ObjectWrapper<IntBox> = Default::default();
        assert!(default.is_null());
        assert!(default.ptr_eq(&wrapper));
    }

    #[test]
    fn test_clone_shares_object() {
        let a = ObjectWrapper::<Counter>::new(AtomicI64::new(1));
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.owner_count(), 2);

        b.fetch_add(10, Ordering::SeqCst);
        assert_eq!(a.load(Ordering::SeqCst), 11);

        drop(b);
        assert_eq!(a.owner_count(), 1);
    }

    #[test]
    fn test_take_leaves_null_of_same_type() {
        let mut source = ObjectWrapper::<IntBox>::new(7);
        let taken = source.take();

        assert!(source.is_null());
        assert_eq!(source.value_type(), IntBox::class_type());
        assert_eq!(*taken, 7);
        assert_eq!(taken.owner_count(), 1);
    }

    #[test]
    fn test_from_shared() {
        let object = Arc::new(3i64);
        let wrapper = ObjectWrapper::<IntBox>::from_shared(Arc::clone(&object), IntBox::class_type());
        assert_eq!(owner_count(&object), 2);

        let same: ObjectWrapper<IntBox> = Arc::clone(&object).into();
        assert!(same.ptr_eq(&wrapper));
        assert_eq!(same.into_shared().map(|o| *o), Some(3));
    }

    #[test]
    #[should_panic(expected = "dereferenced a null ObjectWrapper")]
    fn test_deref_null_panics() {
        let wrapper = ObjectWrapper::<IntBox>::null();
        let _value: i64 = *wrapper;
    }

    #[test]
    fn test_erase_and_downcast() -> Result<(), AnyError> {
        let wrapper = ObjectWrapper::<IntBox>::new(99);
        let erased = wrapper.erase();
        assert_eq!(erased.value_type(), IntBox::class_type());
        assert!(!erased.is_null());

        let back = erased.downcast::<IntBox>()?;
        assert!(back.ptr_eq(&wrapper));
        assert_eq!(wrapper.owner_count(), 3);

        let err = erased.downcast::<Counter>().unwrap_err();
        assert_eq!(
            err,
            AnyError::TypeMismatch {
                requested: Counter::class_type().class_id(),
                stored: IntBox::class_type().class_id(),
            }
        );
        Ok(())
    }

    #[test]
    fn test_downcast_null_erased() -> Result<(), AnyError> {
        let erased = ObjectWrapper::<IntBox>::null().erase();
        assert!(erased.is_null());
        let back = erased.downcast::<IntBox>()?;
        assert!(back.is_null());
        Ok(())
    }

    #[test]
    fn test_shared_type_with_wrong_object_is_rejected() {
        let erased = ObjectWrapper::<IntBox>::new(1).erase();
        assert!(matches!(
            erased.downcast::<Impostor>(),
            Err(AnyError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_debug_output() {
        let wrapper = ObjectWrapper::<IntBox>::new(5);
        let text = format!("{:?}", wrapper);
        assert!(text.contains("wrapper_tests::IntBox"));
        assert!(text.contains('5'));

        let erased = format!("{:?}", wrapper.erase());
        assert!(erased.contains("null: false"));
    }
}
