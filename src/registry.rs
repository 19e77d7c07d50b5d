//! Process-wide registry of published [`Type`]s.
//!
//! Each [`TypeCell`](crate::TypeCell) registers its family here exactly once.
//! Registration assigns the next [`ClassId`] and leaks the `Type` so it lives
//! for the rest of the process; after that it is read-only.

use crate::class::{ClassId, Type};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Default)]
struct Registry {
    types: Vec<&'static Type>,
    by_name: HashMap<&'static str, &'static Type>,
}

static REGISTRY: Lazy<Mutex<Registry>> = Lazy::new(|| Mutex::new(Registry::default()));

/// Publishes a new family. Always yields a fresh id, even for a name that is
/// already taken.
pub(crate) fn register(name: &'static str, parent: Option<&'static Type>) -> &'static Type {
    let mut registry = REGISTRY.lock();

    let id = registry.types.len() as u32;
    let ty: &'static Type = Box::leak(Box::new(Type::new(ClassId::new(id, name), parent)));
    registry.types.push(ty);

    match registry.by_name.entry(name) {
        Entry::Occupied(existing) => {
            warn!(
                name,
                id,
                existing_id = existing.get().class_id().id(),
                "type name registered more than once"
            );
        }
        Entry::Vacant(slot) => {
            slot.insert(ty);
        }
    }

    debug!(name, id, parent = ?parent.map(Type::name), "registered type");
    ty
}

/// Finds the first family published under `name`.
pub fn lookup(name: &str) -> Option<&'static Type> {
    REGISTRY.lock().by_name.get(name).copied()
}

/// All published families, in registration order.
pub fn registered_types() -> Vec<&'static Type> {
    REGISTRY.lock().types.clone()
}
