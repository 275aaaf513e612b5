//! Field joining and the [`fields!`](macro@crate::fields) builder.

use metalog_ports::Fields;
use serde::Serialize;
use serde_json::Value;

/// Fold each set of `extra` into `base`, later sets overriding earlier ones.
///
/// An empty `extra` hands `base` back untouched.
#[must_use]
pub fn join_fields(mut base: Fields, extra: &[Fields]) -> Fields {
    if extra.is_empty() {
        return base;
    }
    for set in extra {
        for (key, value) in set {
            base.insert(key.clone(), value.clone());
        }
    }
    base
}

/// Convert a value for the `fields!` macro. Values that cannot be represented
/// as JSON (maps with non-string keys, failing `Serialize` impls) become
/// `null`.
#[doc(hidden)]
pub fn field_value<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Build a [`Fields`](crate::Fields) map from `key => value` pairs.
///
/// Keys are anything convertible into `Box<str>`; values are anything that
/// implements `serde::Serialize`.
///
/// ```
/// let fields = metalog::fields! { "id" => 42, "user" => "ada" };
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(
            fields.insert(
                ::std::convert::Into::<::std::boxed::Box<str>>::into($key),
                $crate::__private::field_value(&$value),
            );
        )+
        fields
    }};
}
