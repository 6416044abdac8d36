
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt::Debug;

use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{FeaturizerError, OverflowGuard, Result};

/// Closed set of values an annotation can carry, independent of the column type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(value) => Some(*value as f64),
            Scalar::UInt(value) => Some(*value as f64),
            Scalar::Float(value) => Some(*value),
            _ => None,
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => Some(Ordering::Equal),
            (Scalar::Bool(a), Scalar::Bool(b)) => a.partial_cmp(b),
            (Scalar::Int(a), Scalar::Int(b)) => a.partial_cmp(b),
            (Scalar::UInt(a), Scalar::UInt(b)) => a.partial_cmp(b),
            (Scalar::Str(a), Scalar::Str(b)) => a.partial_cmp(b),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }
}

/// A column value type. Nullable types carry a sentinel (`NaN`, `None`) that
/// accumulators skip and transformers propagate.
pub trait Value: Clone + Debug + Send + Sync + 'static {
    /// The value type once the null sentinel has been ruled out.
    type NonNull: Value + PartialOrd;

    const IS_NULLABLE: bool;

    fn non_null(&self) -> Option<&Self::NonNull>;

    fn is_null(&self) -> bool {
        self.non_null().is_none()
    }

    /// The null sentinel, if the type has one.
    fn null_value() -> Option<Self>;

    fn to_scalar(&self) -> Scalar;

    fn from_scalar(scalar: &Scalar) -> Option<Self>;

    fn to_f64(&self) -> Option<f64>;
}

/// Numeric column types with a widened, overflow-checked running sum.
pub trait Numeric: Value<NonNull = Self> + Copy + PartialOrd + ToPrimitive + Zero {
    type Sum: Copy + Debug + PartialEq + Zero + Send + Sync;

    fn add_to_sum(sum: Self::Sum, value: Self) -> Result<Self::Sum>;

    fn sum_to_f64(sum: Self::Sum) -> f64;

    fn sum_to_scalar(sum: Self::Sum) -> Scalar;
}

macro_rules! impl_integer {
    ($($t:ty => $variant:ident($wide:ty)),* $(,)?) => {
        $(
            impl Value for $t {
                type NonNull = $t;

                const IS_NULLABLE: bool = false;

                fn non_null(&self) -> Option<&$t> {
                    Some(self)
                }

                fn null_value() -> Option<Self> {
                    None
                }

                fn to_scalar(&self) -> Scalar {
                    Scalar::$variant(*self as $wide)
                }

                fn from_scalar(scalar: &Scalar) -> Option<Self> {
                    match scalar {
                        Scalar::Int(value) => <$t>::try_from(*value).ok(),
                        Scalar::UInt(value) => <$t>::try_from(*value).ok(),
                        _ => None,
                    }
                }

                fn to_f64(&self) -> Option<f64> {
                    ToPrimitive::to_f64(self)
                }
            }

            impl Numeric for $t {
                type Sum = i64;

                fn add_to_sum(sum: i64, value: $t) -> Result<i64> {
                    value
                        .to_i64()
                        .and_then(|value| sum.checked_add(value))
                        .ok_or_else(|| FeaturizerError::overflow(OverflowGuard::IntegerSumOverflow))
                }

                fn sum_to_f64(sum: i64) -> f64 {
                    sum as f64
                }

                fn sum_to_scalar(sum: i64) -> Scalar {
                    Scalar::Int(sum)
                }
            }
        )*
    };
}

impl_integer!(
    i8 => Int(i64),
    i16 => Int(i64),
    i32 => Int(i64),
    i64 => Int(i64),
    u8 => UInt(u64),
    u16 => UInt(u64),
    u32 => UInt(u64),
    u64 => UInt(u64),
);

macro_rules! impl_float {
    ($($t:ty),*) => {
        $(
            impl Value for $t {
                type NonNull = $t;

                const IS_NULLABLE: bool = true;

                fn non_null(&self) -> Option<&$t> {
                    if self.is_nan() {
                        None
                    } else {
                        Some(self)
                    }
                }

                fn null_value() -> Option<Self> {
                    Some(<$t>::NAN)
                }

                fn to_scalar(&self) -> Scalar {
                    if self.is_nan() {
                        Scalar::Null
                    } else {
                        Scalar::Float(*self as f64)
                    }
                }

                fn from_scalar(scalar: &Scalar) -> Option<Self> {
                    match scalar {
                        Scalar::Null => Some(<$t>::NAN),
                        Scalar::Float(value) => Some(*value as $t),
                        Scalar::Int(value) => Some(*value as $t),
                        Scalar::UInt(value) => Some(*value as $t),
                        _ => None,
                    }
                }

                fn to_f64(&self) -> Option<f64> {
                    self.non_null().map(|value| *value as f64)
                }
            }

            impl Numeric for $t {
                type Sum = f64;

                fn add_to_sum(sum: f64, value: $t) -> Result<f64> {
                    let value = value as f64;
                    let next = sum + value;
                    if next == sum && value != 0.0 {
                        return Err(FeaturizerError::overflow(OverflowGuard::SumSwamped));
                    }
                    if !next.is_finite() {
                        return Err(FeaturizerError::overflow(OverflowGuard::SumNotFinite));
                    }
                    Ok(next)
                }

                fn sum_to_f64(sum: f64) -> f64 {
                    sum
                }

                fn sum_to_scalar(sum: f64) -> Scalar {
                    Scalar::Float(sum)
                }
            }
        )*
    };
}

impl_float!(f32, f64);

impl Value for bool {
    type NonNull = bool;

    const IS_NULLABLE: bool = false;

    fn non_null(&self) -> Option<&bool> {
        Some(self)
    }

    fn null_value() -> Option<Self> {
        None
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Bool(*self)
    }

    fn from_scalar(scalar: &Scalar) -> Option<Self> {
        match scalar {
            Scalar::Bool(value) => Some(*value),
            _ => None,
        }
    }

    fn to_f64(&self) -> Option<f64> {
        None
    }
}

impl Value for String {
    type NonNull = String;

    const IS_NULLABLE: bool = false;

    fn non_null(&self) -> Option<&String> {
        Some(self)
    }

    fn null_value() -> Option<Self> {
        None
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Str(self.clone())
    }

    fn from_scalar(scalar: &Scalar) -> Option<Self> {
        match scalar {
            Scalar::Str(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn to_f64(&self) -> Option<f64> {
        None
    }
}

impl<T: Value> Value for Option<T> {
    type NonNull = T::NonNull;

    const IS_NULLABLE: bool = true;

    fn non_null(&self) -> Option<&T::NonNull> {
        self.as_ref().and_then(Value::non_null)
    }

    fn null_value() -> Option<Self> {
        Some(None)
    }

    fn to_scalar(&self) -> Scalar {
        match self {
            Some(value) => value.to_scalar(),
            None => Scalar::Null,
        }
    }

    fn from_scalar(scalar: &Scalar) -> Option<Self> {
        match scalar {
            Scalar::Null => Some(None),
            other => T::from_scalar(other).map(Some),
        }
    }

    fn to_f64(&self) -> Option<f64> {
        self.as_ref().and_then(Value::to_f64)
    }
}
