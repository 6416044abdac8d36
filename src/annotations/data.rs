use std::cmp::Ordering;
use std::fmt::Debug;

use crate::error::{FeaturizerError, Result};
use crate::traits::Scalar;

fn invalid<T>(message: &str) -> Result<T> {
    Err(FeaturizerError::InvalidAnnotation(message.to_string()))
}

/// Minimum, maximum and number of non-null values of a column.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicStats {
    min: Scalar,
    max: Scalar,
    count: u64,
}

impl BasicStats {
    pub fn new(min: Scalar, max: Scalar, count: u64) -> Result<Self> {
        let stats = Self { min, max, count };
        stats.validate()?;
        Ok(stats)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Ok(());
        }
        if self.min.is_null() || self.max.is_null() {
            return invalid("min and max must be set when count > 0");
        }
        match self.min.partial_cmp(&self.max) {
            Some(Ordering::Greater) => invalid("min is > max"),
            None => invalid("min and max are not comparable"),
            _ => Ok(()),
        }
    }

    pub fn min(&self) -> &Scalar {
        &self.min
    }

    pub fn max(&self) -> &Scalar {
        &self.max
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Basic stats of a numeric column together with its widened sum and average.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardStats {
    basic: BasicStats,
    sum: Scalar,
    average: f64,
}

impl StandardStats {
    pub fn new(sum: Scalar, average: f64, min: Scalar, max: Scalar, count: u64) -> Result<Self> {
        let stats = Self {
            basic: BasicStats { min, max, count },
            sum,
            average,
        };
        stats.validate()?;
        Ok(stats)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.basic.validate()?;
        if self.sum.as_f64().is_none() {
            return invalid("sum must be numeric");
        }
        if !self.average.is_finite() {
            return invalid("average must be finite");
        }
        if self.basic.count == 0 {
            if self.average != 0.0 {
                return invalid("average must be 0 when count is 0");
            }
            return Ok(());
        }
        match (self.basic.min.as_f64(), self.basic.max.as_f64()) {
            (Some(min), Some(max)) if self.average < min || self.average > max => {
                invalid("average is not within [min, max]")
            }
            (Some(_), Some(_)) => Ok(()),
            _ => invalid("min and max must be numeric"),
        }
    }

    pub fn sum(&self) -> &Scalar {
        &self.sum
    }

    pub fn average(&self) -> f64 {
        self.average
    }

    pub fn min(&self) -> &Scalar {
        self.basic.min()
    }

    pub fn max(&self) -> &Scalar {
        self.basic.max()
    }

    pub fn count(&self) -> u64 {
        self.basic.count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Median {
    value: Scalar,
}

impl Median {
    pub fn new(value: Scalar) -> Result<Self> {
        let median = Self { value };
        median.validate()?;
        Ok(median)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match &self.value {
            Scalar::Null => invalid("median must not be null"),
            Scalar::Float(value) if !value.is_finite() => invalid("median must be finite"),
            _ => Ok(()),
        }
    }

    pub fn value(&self) -> &Scalar {
        &self.value
    }
}

/// Population standard deviation and the number of values it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardDeviation {
    deviation: f64,
    count: u64,
}

impl StandardDeviation {
    pub fn new(deviation: f64, count: u64) -> Result<Self> {
        let sd = Self { deviation, count };
        sd.validate()?;
        Ok(sd)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.deviation.is_finite() {
            return invalid("standard deviation must be finite");
        }
        if self.deviation < 0.0 {
            return invalid("standard deviation must be >= 0");
        }
        if self.count == 0 && self.deviation != 0.0 {
            return invalid("standard deviation must be 0 when count is 0");
        }
        Ok(())
    }

    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

/// A fact learned during training, stored per column and transform name.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    BasicStats(BasicStats),
    StandardStats(StandardStats),
    Median(Median),
    StandardDeviation(StandardDeviation),
}

impl Annotation {
    pub fn validate(&self) -> Result<()> {
        match self {
            Annotation::BasicStats(stats) => stats.validate(),
            Annotation::StandardStats(stats) => stats.validate(),
            Annotation::Median(median) => median.validate(),
            Annotation::StandardDeviation(sd) => sd.validate(),
        }
    }

    pub(crate) fn same_kind(&self, other: &Annotation) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Payloads that can be stored in and read back from an [`Annotation`].
pub trait AnnotationData: Clone + Debug + Send + Sync + 'static {
    fn into_annotation(self) -> Annotation;

    fn from_annotation(annotation: &Annotation) -> Option<&Self>;
}

macro_rules! annotation_data {
    ($($payload:ident),*) => {
        $(
            impl AnnotationData for $payload {
                fn into_annotation(self) -> Annotation {
                    Annotation::$payload(self)
                }

                fn from_annotation(annotation: &Annotation) -> Option<&Self> {
                    match annotation {
                        Annotation::$payload(data) => Some(data),
                        _ => None,
                    }
                }
            }
        )*
    };
}

annotation_data!(BasicStats, StandardStats, Median, StandardDeviation);
