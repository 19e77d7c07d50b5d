//! Demonstrates using Any to bridge a self-describing format into typed fields.
//!
//! The "wire format" here is one `field:tag=value` entry per line, where the
//! tag says how the value was encoded (`i` for integers, `s` for strings).
//! The decoder doesn't know the target struct; it only produces erased values.
//! The struct then pulls each field out as the family it expects, and a field
//! that arrived with the wrong tag is reported as a validation failure.
//!
//! Run with: cargo run --example decode

use sovran_any::{Any, AnyError, ErasedWrapper, Family, ObjectWrapper, Type, TypeCell};
use std::collections::HashMap;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let good = "name:s=alice\nage:i=37\n";
    let person = Person::from_fields(&decode(good)?)?;
    println!("Decoded: {} is {} years old", *person.name, *person.age);

    // Same fields, but age arrives as a string
    let bad = "name:s=bob\nage:s=thirty\n";
    match Person::from_fields(&decode(bad)?) {
        Ok(person) => println!("This shouldn't happen: {}", *person.name),
        Err(AnyError::TypeMismatch { requested, stored }) => {
            println!("Rejected: expected {}, got {}", requested, stored)
        }
    }

    // A missing field decodes as a null wrapper rather than an error
    let partial = Person::from_fields(&decode("name:s=carol\n")?)?;
    println!(
        "Partial: {} (age present: {})",
        *partial.name,
        !partial.age.is_null()
    );

    Ok(())
}

// ============================================================================
// Families produced by the decoder
// ============================================================================

struct IntBox;

impl Family for IntBox {
    type Object = i64;

    fn class_type() -> &'static Type {
        static TYPE: TypeCell = TypeCell::new("Int");
        TYPE.get()
    }
}

struct StrBox;

impl Family for StrBox {
    type Object = String;

    fn class_type() -> &'static Type {
        static TYPE: TypeCell = TypeCell::new("String");
        TYPE.get()
    }
}

// ============================================================================
// Decoder - knows tags, not target types
// ============================================================================

fn decode_value(tag: &str, raw: &str) -> Result<ErasedWrapper, Box<dyn Error>> {
    match tag {
        "i" => Ok(ObjectWrapper::<IntBox>::new(raw.parse()?).erase()),
        "s" => Ok(ObjectWrapper::<StrBox>::new(raw.to_string()).erase()),
        other => Err(format!("unknown tag: {}", other).into()),
    }
}

fn decode(input: &str) -> Result<HashMap<String, Any>, Box<dyn Error>> {
    let mut fields = HashMap::new();
    for line in input.lines().filter(|l| !l.is_empty()) {
        let (name, rest) = line
            .split_once(':')
            .ok_or_else(|| format!("missing ':' in {:?}", line))?;
        let (tag, raw) = rest
            .split_once('=')
            .ok_or_else(|| format!("missing '=' in {:?}", line))?;
        fields.insert(name.to_string(), Any::from(decode_value(tag, raw)?));
    }
    Ok(fields)
}

// ============================================================================
// Statically typed model
// ============================================================================

struct Person {
    name: ObjectWrapper<StrBox>,
    age: ObjectWrapper<IntBox>,
}

impl Person {
    fn from_fields(fields: &HashMap<String, Any>) -> Result<Self, AnyError> {
        let empty = Any::new();
        let field = |name: &str| fields.get(name).unwrap_or(&empty);

        Ok(Self {
            name: field("name").retrieve()?,
            age: field("age").retrieve()?,
        })
    }
}
