//! The wire value codec.
//!
//! Native values cross the wire as JSON trees: booleans, integers, doubles
//! and strings map to themselves, sets to arrays, string-keyed maps to
//! objects, records to objects with the server's field names, enums to their
//! lower-case tag strings, references and timestamps to strings. The serde
//! derives on the record and enum types produce those composite codecs
//! mechanically; this module adds the error attribution every generated
//! method wraps around them, so a shape mismatch reports *which* method and
//! argument it belongs to rather than a bare decoder message.

use serde::{de::DeserializeOwned, Serialize};

use crate::{Error, Result};

pub use serde_json::Value;

/// Attribution carried by codec errors.
///
/// Identifies the spot a value was being encoded for: either one named
/// argument of a method or the method's result.
#[derive(Clone, Copy, Debug)]
pub struct Context<'a> {
    method: &'a str,
    argument: Option<&'a str>,
}

impl<'a> Context<'a> {
    /// Attribution for one named argument of a method.
    pub fn arg(method: &'a str, argument: &'a str) -> Self {
        Self { method, argument: Some(argument) }
    }

    /// Attribution for a method's result.
    pub fn result(method: &'a str) -> Self {
        Self { method, argument: None }
    }
}

impl core::fmt::Display for Context<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.argument {
            Some(argument) => write!(f, "{}({argument})", self.method),
            None => write!(f, "result of {}", self.method),
        }
    }
}

/// Encode a native value as a wire value.
///
/// For well-typed arguments the only failures are unrepresentable leaves,
/// such as a non-finite float.
pub fn to_wire<T>(context: Context<'_>, value: &T) -> Result<Value>
where
    T: Serialize + ?Sized,
{
    serde_json::to_value(value)
        .map_err(|source| Error::Serialize { context: context.to_string(), source })
}

/// Decode a wire value into a native value.
///
/// Fails when the wire tree does not have the shape `T` expects: wrong leaf
/// type, an enum tag outside the known set, a malformed timestamp.
pub fn from_wire<T>(context: Context<'_>, value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_value(value)
        .map_err(|source| Error::Deserialize { context: context.to_string(), source })
}

/// Encode one named argument of `method`.
///
/// Shorthand for [`to_wire`] with an argument [`Context`]; the generated
/// methods build their parameter lists out of these.
pub fn arg<T>(method: &str, name: &str, value: &T) -> Result<Value>
where
    T: Serialize + ?Sized,
{
    to_wire(Context::arg(method, name), value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn leaf_round_trips() {
        let context = Context::result("test.echo");
        assert!(from_wire::<bool>(context, to_wire(context, &true).unwrap()).unwrap());
        assert_eq!(from_wire::<i64>(context, to_wire(context, &-7i64).unwrap()).unwrap(), -7);
        assert_eq!(
            from_wire::<String>(context, to_wire(context, "plain").unwrap()).unwrap(),
            "plain",
        );

        let map = HashMap::from([("a".to_string(), 1i64), ("b".to_string(), 2)]);
        let encoded = to_wire(context, &map).unwrap();
        assert_eq!(from_wire::<HashMap<String, i64>>(context, encoded).unwrap(), map);
    }

    #[test]
    fn empty_and_zero_values_round_trip() {
        let context = Context::result("test.echo");

        let tags: Vec<String> = Vec::new();
        let encoded = to_wire(context, &tags).unwrap();
        assert_eq!(from_wire::<Vec<String>>(context, encoded).unwrap(), tags);

        let config: HashMap<String, String> = HashMap::new();
        let encoded = to_wire(context, &config).unwrap();
        assert_eq!(from_wire::<HashMap<String, String>>(context, encoded).unwrap(), config);

        assert_eq!(from_wire::<i64>(context, to_wire(context, &0i64).unwrap()).unwrap(), 0);
        assert_eq!(from_wire::<String>(context, to_wire(context, "").unwrap()).unwrap(), "");
    }

    #[test]
    fn non_finite_float_is_a_serialize_error() {
        let err = arg("task.set_progress", "value", &f64::NAN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialize);
        assert!(err.to_string().contains("task.set_progress(value)"), "{err}");
    }

    #[test]
    fn shape_mismatch_is_a_deserialize_error() {
        let err =
            from_wire::<i64>(Context::result("SR.get_physical_size"), Value::from("x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Deserialize);
        assert!(err.to_string().contains("result of SR.get_physical_size"), "{err}");
    }
}
