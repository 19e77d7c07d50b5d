//! # sovran-any
//!
//! A type-erased, shared-ownership value holder with runtime type checks.
//!
//! `sovran-any` lets a statically typed object model carry values whose
//! concrete type isn't known at every use site, such as values produced while
//! decoding a self-describing wire format. A value goes into an [`Any`] with
//! its static type discarded and comes back out only as the exact family it
//! was stored as.
//!
//! ## Key Features
//!
//! - **Type-safe**: Retrieval checks the stored family's [`Type`] by identity
//! - **Shared ownership**: Objects live behind atomic reference counts, so
//!   copies of an `Any` share one object and it is dropped exactly once
//! - **Thread-safe**: `Type`s are published once, lazily, from any thread
//! - **Explicit errors**: A mismatch is an [`AnyError`], never a panic
//!
//! ## Usage Examples
//!
//! ### Declaring Families
//!
//! Each wrapper-type family names the object it shares and publishes its
//! [`Type`] through a [`TypeCell`]:
//!
//! ```rust
//! use sovran_any::{Family, Type, TypeCell};
//!
//! pub struct IntBox;
//!
//! impl Family for IntBox {
//!     type Object = i64;
//!
//!     fn class_type() -> &'static Type {
//!         static TYPE: TypeCell = TypeCell::new("IntBox");
//!         TYPE.get()
//!     }
//! }
//!
//! assert_eq!(IntBox::class_type().name(), "IntBox");
//! ```
//!
//! ### Storing and Retrieving
//!
//! ```rust
//! use sovran_any::{Any, AnyError, Family, ObjectWrapper, Type, TypeCell};
//!
//! struct IntBox;
//! impl Family for IntBox {
//!     type Object = i64;
//!     fn class_type() -> &'static Type {
//!         static TYPE: TypeCell = TypeCell::new("IntBox");
//!         TYPE.get()
//!     }
//! }
//!
//! struct StrBox;
//! impl Family for StrBox {
//!     type Object = String;
//!     fn class_type() -> &'static Type {
//!         static TYPE: TypeCell = TypeCell::new("StrBox");
//!         TYPE.get()
//!     }
//! }
//!
//! fn main() -> Result<(), AnyError> {
//!     let mut value = Any::new();
//!     value.store(&ObjectWrapper::<IntBox>::new(5));
//!
//!     // The family it was stored as
//!     let five = value.retrieve::<IntBox>()?;
//!     println!("Number: {}", *five);
//!
//!     // Any other family is refused
//!     match value.retrieve::<StrBox>() {
//!         Ok(text) => println!("Text: {}", *text),
//!         Err(AnyError::TypeMismatch { requested, stored }) => {
//!             println!("Asked for {}, but holding {}", requested, stored)
//!         }
//!     }
//!
//!     // Empty again
//!     value.clear();
//!     assert!(value.stored_type().is_none());
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Sharing Between Copies
//!
//! ```rust
//! use sovran_any::{Any, AnyError, Family, ObjectWrapper, Type, TypeCell};
//! use std::sync::Mutex;
//!
//! struct Names;
//! impl Family for Names {
//!     type Object = Mutex<Vec<String>>;
//!     fn class_type() -> &'static Type {
//!         static TYPE: TypeCell = TypeCell::new("Names");
//!         TYPE.get()
//!     }
//! }
//!
//! let a = Any::from(ObjectWrapper::<Names>::new(Mutex::new(Vec::new())));
//! let b = a.clone();
//!
//! a.retrieve::<Names>()?.lock().unwrap().push("alice".to_string());
//!
//! // b sees the same object, not a copy
//! assert_eq!(b.retrieve::<Names>()?.lock().unwrap().len(), 1);
//! assert_eq!(a, b);
//! # Ok::<(), AnyError>(())
//! ```

mod any;
mod any_value;
mod class;
mod countable;
mod error;
pub mod registry;
mod wrapper;

pub use any::Any;
pub use class::{ClassId, Type, TypeCell};
pub use countable::{owner_count, Countable, Shared};
pub use error::AnyError;
pub use wrapper::{ErasedWrapper, Family, ObjectWrapper};
