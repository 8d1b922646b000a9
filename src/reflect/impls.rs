//! `Reflect` implementations for std, bson, chrono and serde_json types

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::Display;
use std::hash::BuildHasher;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use bson::{Bson, DateTime, Document, oid::ObjectId};
use chrono::Utc;
use serde_json::Value as JsonValue;

use super::{Reflect, ValueRef};

/* ========================= Scalars ========================= */

macro_rules! impl_reflect_int32 {
    ($($ty:ty),*) => {
        $(
            impl Reflect for $ty {
                fn reflect_ref(&self) -> ValueRef<'_> {
                    ValueRef::Scalar(Bson::Int32(i32::from(*self)))
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

// Values outside the i64 range fall back to a double, losing precision
// above 2^53.
macro_rules! impl_reflect_int64 {
    ($($ty:ty),*) => {
        $(
            impl Reflect for $ty {
                fn reflect_ref(&self) -> ValueRef<'_> {
                    let value = match i64::try_from(*self) {
                        Ok(n) => Bson::Int64(n),
                        Err(_) => Bson::Double(*self as f64),
                    };
                    ValueRef::Scalar(value)
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_reflect_int32!(i8, i16, i32, u8, u16);
impl_reflect_int64!(i64, isize, u32, u64, usize, i128, u128);

impl Reflect for f32 {
    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Scalar(Bson::Double(f64::from(*self)))
    }

    fn is_zero(&self) -> bool {
        self.to_bits() == 0
    }
}

impl Reflect for f64 {
    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Scalar(Bson::Double(*self))
    }

    fn is_zero(&self) -> bool {
        self.to_bits() == 0
    }
}

impl Reflect for bool {
    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Scalar(Bson::Boolean(*self))
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

impl Reflect for char {
    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Scalar(Bson::String(self.to_string()))
    }

    fn is_zero(&self) -> bool {
        *self == '\0'
    }
}

impl Reflect for str {
    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Scalar(Bson::String(self.to_owned()))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Reflect for String {
    fn reflect_ref(&self) -> ValueRef<'_> {
        self.as_str().reflect_ref()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Reflect for Cow<'_, str> {
    fn reflect_ref(&self) -> ValueRef<'_> {
        (**self).reflect_ref()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Reflect for () {
    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Unsupported
    }

    fn is_zero(&self) -> bool {
        true
    }
}

impl<T: ?Sized> Reflect for PhantomData<T> {
    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Unsupported
    }

    fn is_zero(&self) -> bool {
        true
    }
}

/* ========================= Indirection ========================= */

impl<T: Reflect> Reflect for Option<T> {
    fn reflect_ref(&self) -> ValueRef<'_> {
        match self {
            Some(value) => value.reflect_ref(),
            None => ValueRef::Invalid,
        }
    }

    // A set option is never zero, whatever it points at.
    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

macro_rules! impl_reflect_deref {
    ($($ptr:ident),*) => {
        $(
            impl<T: Reflect + ?Sized> Reflect for $ptr<T> {
                fn reflect_ref(&self) -> ValueRef<'_> {
                    (**self).reflect_ref()
                }

                fn is_zero(&self) -> bool {
                    (**self).is_zero()
                }
            }
        )*
    };
}

impl_reflect_deref!(Box, Rc, Arc);

impl<T: Reflect + ?Sized> Reflect for &T {
    fn reflect_ref(&self) -> ValueRef<'_> {
        (**self).reflect_ref()
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

/* ========================= Sequences ========================= */

impl<T: Reflect> Reflect for [T] {
    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Sequence(self.iter().map(|item| item as &dyn Reflect).collect())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect_ref(&self) -> ValueRef<'_> {
        self.as_slice().reflect_ref()
    }

    // Fixed arrays are zero when every element is.
    fn is_zero(&self) -> bool {
        self.iter().all(Reflect::is_zero)
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect_ref(&self) -> ValueRef<'_> {
        self.as_slice().reflect_ref()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Sequence(self.iter().map(|item| item as &dyn Reflect).collect())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

/* ========================= Mappings ========================= */

impl<K: Display, V: Reflect, S: BuildHasher> Reflect for HashMap<K, V, S> {
    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Mapping(
            self.iter()
                .map(|(key, value)| (key.to_string(), value as &dyn Reflect))
                .collect(),
        )
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K: Display, V: Reflect> Reflect for BTreeMap<K, V> {
    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Mapping(
            self.iter()
                .map(|(key, value)| (key.to_string(), value as &dyn Reflect))
                .collect(),
        )
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

/* ========================= Opaque leaves ========================= */

impl Reflect for DateTime {
    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Opaque(Bson::DateTime(*self))
    }

    fn is_zero(&self) -> bool {
        self.timestamp_millis() == 0
    }
}

impl Reflect for chrono::DateTime<Utc> {
    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Opaque(Bson::DateTime(DateTime::from_chrono(*self)))
    }

    fn is_zero(&self) -> bool {
        self.timestamp_millis() == 0
    }
}

impl Reflect for SystemTime {
    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Opaque(Bson::DateTime(DateTime::from_system_time(*self)))
    }

    fn is_zero(&self) -> bool {
        DateTime::from_system_time(*self).timestamp_millis() == 0
    }
}

impl Reflect for ObjectId {
    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Opaque(Bson::ObjectId(*self))
    }

    fn is_zero(&self) -> bool {
        self.bytes() == [0u8; 12]
    }
}

/* ========================= Dynamic values ========================= */

impl Reflect for Document {
    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Mapping(
            self.iter()
                .map(|(key, value)| (key.clone(), value as &dyn Reflect))
                .collect(),
        )
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Reflect for Bson {
    fn reflect_ref(&self) -> ValueRef<'_> {
        match self {
            Bson::Null | Bson::Undefined => ValueRef::Invalid,
            Bson::Document(doc) => doc.reflect_ref(),
            Bson::Array(items) => items.reflect_ref(),
            Bson::DateTime(_) | Bson::ObjectId(_) => ValueRef::Opaque(self.clone()),
            other => ValueRef::Scalar(other.clone()),
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            Bson::Null | Bson::Undefined => true,
            Bson::String(s) => s.is_empty(),
            Bson::Boolean(b) => !*b,
            Bson::Int32(n) => *n == 0,
            Bson::Int64(n) => *n == 0,
            Bson::Double(f) => f.is_zero(),
            Bson::Document(doc) => doc.is_empty(),
            Bson::Array(items) => items.is_empty(),
            Bson::DateTime(dt) => dt.is_zero(),
            Bson::ObjectId(oid) => oid.is_zero(),
            _ => false,
        }
    }
}

impl Reflect for serde_json::Map<String, JsonValue> {
    fn reflect_ref(&self) -> ValueRef<'_> {
        ValueRef::Mapping(
            self.iter()
                .map(|(key, value)| (key.clone(), value as &dyn Reflect))
                .collect(),
        )
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Reflect for JsonValue {
    fn reflect_ref(&self) -> ValueRef<'_> {
        match self {
            JsonValue::Null => ValueRef::Invalid,
            JsonValue::Bool(b) => b.reflect_ref(),
            JsonValue::Number(n) => ValueRef::Scalar(json_number_to_bson(n)),
            JsonValue::String(s) => s.reflect_ref(),
            JsonValue::Array(items) => items.reflect_ref(),
            JsonValue::Object(map) => map.reflect_ref(),
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            JsonValue::Null => true,
            JsonValue::Bool(b) => !*b,
            JsonValue::Number(n) => n.as_f64().is_some_and(|f| f.is_zero()),
            JsonValue::String(s) => s.is_empty(),
            JsonValue::Array(items) => items.is_empty(),
            JsonValue::Object(map) => map.is_empty(),
        }
    }
}

/// Convert a JSON number, preferring the narrowest BSON integer type
fn json_number_to_bson(n: &serde_json::Number) -> Bson {
    if let Some(i) = n.as_i64() {
        match i32::try_from(i) {
            Ok(small) => Bson::Int32(small),
            Err(_) => Bson::Int64(i),
        }
    } else {
        Bson::Double(n.as_f64().unwrap_or(f64::NAN))
    }
}
