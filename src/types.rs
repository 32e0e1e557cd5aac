//! Core value types for persisted settings

use crate::error::{Result, SettingsError};
use std::fmt;

/// Identity and variant set of a persistable enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumType {
    /// Fully qualified type name, used as the enum's identity
    pub name: &'static str,

    /// Variant names in declaration order
    pub variants: &'static [&'static str],
}

impl EnumType {
    /// Short type name without the module path
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }

    /// Resolve a variant by name, ignoring ASCII case
    pub fn variant(&self, name: &str) -> Option<&'static str> {
        self.variants
            .iter()
            .copied()
            .find(|variant| variant.eq_ignore_ascii_case(name))
    }
}

/// Declared native type of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    U8,
    I8,
    Char,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    String,
    Enum(EnumType),
}

impl ValueType {
    /// The value type of a Rust type
    pub fn of<T: SettingValue>() -> Self {
        T::value_type()
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, ValueType::Enum(_))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Bool => "bool",
            ValueType::U8 => "u8",
            ValueType::I8 => "i8",
            ValueType::Char => "char",
            ValueType::I16 => "i16",
            ValueType::U16 => "u16",
            ValueType::I32 => "i32",
            ValueType::U32 => "u32",
            ValueType::I64 => "i64",
            ValueType::U64 => "u64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
            ValueType::String => "string",
            ValueType::Enum(ty) => return write!(f, "enum {}", ty.short_name()),
        };
        f.write_str(name)
    }
}

/// A strongly-typed setting value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    U8(u8),
    I8(i8),
    Char(char),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Enum { ty: EnumType, variant: &'static str },
}

impl Value {
    /// The runtime type of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::U8(_) => ValueType::U8,
            Value::I8(_) => ValueType::I8,
            Value::Char(_) => ValueType::Char,
            Value::I16(_) => ValueType::I16,
            Value::U16(_) => ValueType::U16,
            Value::I32(_) => ValueType::I32,
            Value::U32(_) => ValueType::U32,
            Value::I64(_) => ValueType::I64,
            Value::U64(_) => ValueType::U64,
            Value::F32(_) => ValueType::F32,
            Value::F64(_) => ValueType::F64,
            Value::String(_) => ValueType::String,
            Value::Enum { ty, .. } => ValueType::Enum(*ty),
        }
    }

    /// Check if this value is exactly of the given type
    pub fn matches(&self, ty: &ValueType) -> bool {
        self.value_type() == *ty
    }

    /// Convert into a native value, returning None on a type mismatch
    pub fn get<T: SettingValue>(self) -> Option<T> {
        T::from_value(self)
    }
}

/// A native type that can be stored in a settings document
pub trait SettingValue: Sized {
    fn value_type() -> ValueType;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Option<Self>;
}

/// A unit-only enum persisted by variant name
///
/// Usually implemented with `#[derive(SettingEnum)]`, which also provides the
/// matching [`SettingValue`] implementation.
pub trait SettingEnum: Sized + 'static {
    const VARIANTS: &'static [&'static str];

    fn variant_name(&self) -> &'static str;

    fn from_variant_name(name: &str) -> Option<Self>;

    fn enum_type() -> EnumType {
        EnumType {
            name: std::any::type_name::<Self>(),
            variants: Self::VARIANTS,
        }
    }
}

macro_rules! primitive_setting_values {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl SettingValue for $ty {
                fn value_type() -> ValueType {
                    ValueType::$variant
                }

                fn to_value(&self) -> Value {
                    Value::$variant(*self)
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

primitive_setting_values! {
    bool => Bool,
    u8 => U8,
    i8 => I8,
    char => Char,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl SettingValue for String {
    fn value_type() -> ValueType {
        ValueType::String
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(v) => Some(v),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

/// Store `value` into `slot`, failing if the value is of another type
///
/// Used by `#[derive(Settings)]` to implement [`Settings::set_value`](crate::Settings::set_value).
pub fn assign<T: SettingValue>(slot: &mut T, property: &str, value: Value) -> Result<()> {
    let found = value.value_type();
    match T::from_value(value) {
        Some(v) => {
            *slot = v;
            Ok(())
        }
        None => Err(SettingsError::descriptor(
            property,
            format!("expected a {} value, got {}", T::value_type(), found),
        )),
    }
}
