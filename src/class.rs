use crate::registry;
use once_cell::sync::OnceCell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Process-wide identity of a wrapper-type family.
///
/// Ids are handed out by the [`registry`](crate::registry) when a family's
/// [`Type`] is first published. Two `ClassId`s are equal iff their ids are
/// equal; the name only describes the family.
#[derive(Clone, Copy, Debug)]
pub struct ClassId {
    id: u32,
    name: &'static str,
}

impl ClassId {
    pub(crate) const fn new(id: u32, name: &'static str) -> Self {
        Self { id, name }
    }

    /// The registry-assigned identity key.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The name the family was registered under.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ClassId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ClassId {}

impl Hash for ClassId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for ClassId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClassId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Runtime descriptor of a wrapper-type family.
///
/// There is exactly one `Type` per family for the life of the process. It is
/// created lazily through a [`TypeCell`], never mutated, and compared by its
/// [`ClassId`].
#[derive(Debug)]
pub struct Type {
    class_id: ClassId,
    parent: Option<&'static Type>,
}

impl Type {
    pub(crate) const fn new(class_id: ClassId, parent: Option<&'static Type>) -> Self {
        Self { class_id, parent }
    }

    /// The family's identity.
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// The name the family was registered under.
    pub fn name(&self) -> &'static str {
        self.class_id.name
    }

    /// The parent family's `Type`, if any.
    pub fn parent(&self) -> Option<&'static Type> {
        self.parent
    }

    /// Returns true if `self` is `other` or has `other` somewhere up its
    /// parent chain.
    pub fn is_a(&self, other: &Type) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty == other {
                return true;
            }
            current = ty.parent;
        }
        false
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.class_id == other.class_id
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class_id.hash(state);
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.class_id)
    }
}

/// Lazily published [`Type`] for a single family.
///
/// Declare one as a `static` inside the family's
/// [`Family::class_type`](crate::Family::class_type) and return
/// [`TypeCell::get`]. The first call, from whichever thread gets there first,
/// registers the `Type`; every call after that sees the same instance.
///
/// ```
/// use sovran_any::{Type, TypeCell};
///
/// fn record_type() -> &'static Type {
///     static TYPE: TypeCell = TypeCell::new("Record");
///     TYPE.get()
/// }
///
/// fn user_type() -> &'static Type {
///     static TYPE: TypeCell = TypeCell::with_parent("User", record_type);
///     TYPE.get()
/// }
///
/// assert!(std::ptr::eq(user_type(), user_type()));
/// assert!(user_type().is_a(record_type()));
/// assert!(!record_type().is_a(user_type()));
/// ```
pub struct TypeCell {
    name: &'static str,
    parent: Option<fn() -> &'static Type>,
    cell: OnceCell<&'static Type>,
}

impl TypeCell {
    /// A family with no parent.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            parent: None,
            cell: OnceCell::new(),
        }
    }

    /// A family whose `Type` points at `parent()`'s `Type`.
    pub const fn with_parent(name: &'static str, parent: fn() -> &'static Type) -> Self {
        Self {
            name,
            parent: Some(parent),
            cell: OnceCell::new(),
        }
    }

    /// The name the `Type` will be registered under.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the family's `Type`, publishing it on first use.
    pub fn get(&self) -> &'static Type {
        self.cell
            .get_or_init(|| registry::register(self.name, self.parent.map(|parent| parent())))
    }
}

impl fmt::Debug for TypeCell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TypeCell")
            .field("name", &self.name)
            .field("published", &self.cell.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn shape_type() -> &'static Type {
        static TYPE: TypeCell = TypeCell::new("class_tests::Shape");
        TYPE.get()
    }

    fn circle_type() -> &'static Type {
        static TYPE: TypeCell = TypeCell::with_parent("class_tests::Circle", shape_type);
        TYPE.get()
    }

    fn square_type() -> &'static Type {
        static TYPE: TypeCell = TypeCell::with_parent("class_tests::Square", shape_type);
        TYPE.get()
    }

    #[test]
    fn test_same_instance_every_call() {
        assert!(std::ptr::eq(shape_type(), shape_type()));
        assert_eq!(shape_type(), shape_type());
        assert_eq!(shape_type().name(), "class_tests::Shape");
        assert!(shape_type().parent().is_none());
    }

    #[test]
    fn test_distinct_families_distinct_ids() {
        assert_ne!(circle_type(), square_type());
        assert_ne!(circle_type().class_id(), square_type().class_id());
        assert_ne!(shape_type(), circle_type());
    }

    #[test]
    fn test_parent_chain() {
        let parent = circle_type().parent().unwrap();
        assert!(std::ptr::eq(parent, shape_type()));

        assert!(circle_type().is_a(circle_type()));
        assert!(circle_type().is_a(shape_type()));
        assert!(!shape_type().is_a(circle_type()));
        assert!(!circle_type().is_a(square_type()));
    }

    #[test]
    fn test_class_id_identity_ignores_name() {
        let a = ClassId::new(9_000_001, "same");
        let b = ClassId::new(9_000_002, "same");
        let c = ClassId::new(9_000_001, "other");
        assert_ne!(a, b);
        assert_eq!(a, c);
        assert!(a < b);
        assert_eq!(format!("{}", a), "same");
    }

    #[test]
    fn test_concurrent_first_access() {
        static TYPE: TypeCell = TypeCell::new("class_tests::Contended");
        let barrier = Arc::new(std::sync::Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    TYPE.get() as *const Type as usize
                })
            })
            .collect();

        let seen: HashSet<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_type_cell_debug() {
        static TYPE: TypeCell = TypeCell::new("class_tests::Debugged");
        assert!(format!("{:?}", TYPE).contains("published: false"));
        TYPE.get();
        assert!(format!("{:?}", TYPE).contains("published: true"));
        assert_eq!(TYPE.name(), "class_tests::Debugged");
    }
}
