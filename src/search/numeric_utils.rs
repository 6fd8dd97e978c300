//! Sortable numeric encodings and trie range decomposition
//!
//! Every numeric value is mapped to an unsigned integer whose natural order
//! matches the numeric order of the value. Integers flip their sign bit,
//! floats use the IEEE-754 sortable-bits transform. A range over the sortable
//! space is split into sub-ranges aligned to multiples of the precision step,
//! which is how trie-encoded numeric fields are queried.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

use crate::config::NumericType;

/// A numeric primitive that can be queried through a trie range
pub trait NumericPrimitive:
    Copy + PartialOrd + Debug + Display + Send + Sync + Serialize + 'static
{
    /// Width of the sortable encoding
    const BITS: u32;

    fn numeric_type() -> NumericType;

    /// Smallest value, used for an open lower bound
    fn lowest() -> Self;

    /// Largest value, used for an open upper bound
    fn highest() -> Self;

    fn to_sortable(self) -> u64;

    fn from_sortable(sortable: u64) -> Self;

    /// Largest value of the sortable encoding
    fn max_sortable() -> u64 {
        if Self::BITS == 64 {
            u64::MAX
        } else {
            (1u64 << Self::BITS) - 1
        }
    }
}

const SIGN_64: u64 = 1 << 63;
const SIGN_32: u32 = 1 << 31;

impl NumericPrimitive for i64 {
    const BITS: u32 = 64;

    fn numeric_type() -> NumericType {
        NumericType::Long
    }

    fn lowest() -> Self {
        i64::MIN
    }

    fn highest() -> Self {
        i64::MAX
    }

    fn to_sortable(self) -> u64 {
        (self as u64) ^ SIGN_64
    }

    fn from_sortable(sortable: u64) -> Self {
        (sortable ^ SIGN_64) as i64
    }
}

impl NumericPrimitive for i32 {
    const BITS: u32 = 32;

    fn numeric_type() -> NumericType {
        NumericType::Int
    }

    fn lowest() -> Self {
        i32::MIN
    }

    fn highest() -> Self {
        i32::MAX
    }

    fn to_sortable(self) -> u64 {
        ((self as u32) ^ SIGN_32) as u64
    }

    fn from_sortable(sortable: u64) -> Self {
        ((sortable as u32) ^ SIGN_32) as i32
    }
}

impl NumericPrimitive for f32 {
    const BITS: u32 = 32;

    fn numeric_type() -> NumericType {
        NumericType::Float
    }

    fn lowest() -> Self {
        f32::NEG_INFINITY
    }

    fn highest() -> Self {
        f32::INFINITY
    }

    fn to_sortable(self) -> u64 {
        float_to_sortable_bits(self) as u64
    }

    fn from_sortable(sortable: u64) -> Self {
        sortable_bits_to_float(sortable as u32)
    }
}

impl NumericPrimitive for f64 {
    const BITS: u32 = 64;

    fn numeric_type() -> NumericType {
        NumericType::Double
    }

    fn lowest() -> Self {
        f64::NEG_INFINITY
    }

    fn highest() -> Self {
        f64::INFINITY
    }

    fn to_sortable(self) -> u64 {
        double_to_sortable_bits(self)
    }

    fn from_sortable(sortable: u64) -> Self {
        sortable_bits_to_double(sortable)
    }
}

/// Order-preserving unsigned encoding of an `f32`
pub fn float_to_sortable_bits(value: f32) -> u32 {
    let bits = value.to_bits();
    if bits & SIGN_32 != 0 {
        !bits
    } else {
        bits | SIGN_32
    }
}

pub fn sortable_bits_to_float(sortable: u32) -> f32 {
    let bits = if sortable & SIGN_32 != 0 {
        sortable ^ SIGN_32
    } else {
        !sortable
    };
    f32::from_bits(bits)
}

/// Order-preserving unsigned encoding of an `f64`
pub fn double_to_sortable_bits(value: f64) -> u64 {
    let bits = value.to_bits();
    if bits & SIGN_64 != 0 {
        !bits
    } else {
        bits | SIGN_64
    }
}

pub fn sortable_bits_to_double(sortable: u64) -> f64 {
    let bits = if sortable & SIGN_64 != 0 {
        sortable ^ SIGN_64
    } else {
        !sortable
    };
    f64::from_bits(bits)
}

/// One aligned piece of a decomposed range, in sortable space
///
/// All values in `min..=max` share their bits above `shift`, so the piece
/// is matched by a single prefix-coded term range at that shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubRange {
    pub shift: u32,
    pub min: u64,
    pub max: u64,
}

/// Split the sortable range `min..=max` into trie-aligned sub-ranges
///
/// `value_bits` is the width of the encoding and `precision_step` the number
/// of bits dropped per trie level; it must be at least 1. The sub-ranges are
/// disjoint and their union is exactly `min..=max`.
pub fn split_range(
    value_bits: u32,
    precision_step: u32,
    mut min: u64,
    mut max: u64,
) -> Vec<SubRange> {
    debug_assert!(precision_step >= 1);
    let mut ranges = Vec::new();
    if min > max {
        return ranges;
    }

    let mut shift = 0;
    loop {
        if shift + precision_step >= value_bits {
            ranges.push(sub_range(shift, min, max));
            break;
        }

        let diff = 1u64 << (shift + precision_step);
        let mask = ((1u64 << precision_step) - 1) << shift;
        let has_lower = min & mask != 0;
        let has_upper = max & mask != mask;
        let next_min = (if has_lower { min.wrapping_add(diff) } else { min }) & !mask;
        let next_max = (if has_upper { max.wrapping_sub(diff) } else { max }) & !mask;
        let lower_wrapped = next_min < min;
        let upper_wrapped = next_max > max;

        if next_min > next_max || lower_wrapped || upper_wrapped {
            ranges.push(sub_range(shift, min, max));
            break;
        }

        if has_lower {
            ranges.push(sub_range(shift, min, min | mask));
        }
        if has_upper {
            ranges.push(sub_range(shift, max & !mask, max));
        }

        min = next_min;
        max = next_max;
        shift += precision_step;
    }
    ranges
}

fn sub_range(shift: u32, min: u64, max: u64) -> SubRange {
    // The bits below the shift are dropped by prefix coding; set them on the
    // upper end so the piece covers what it matches.
    let low_bits = (1u64 << shift) - 1;
    SubRange {
        shift,
        min,
        max: max | low_bits,
    }
}
