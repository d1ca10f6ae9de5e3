//! Fixture construction for codec trials.
//!
//! Two fixture families are fed to every codec:
//!
//! - the nested [`Record`], parsed once from [`CANONICAL_RECORD_JSON`] so that every
//!   codec starts from the same decoded value;
//! - homogeneous numeric vectors, sampled from a seeded `ChaCha8Rng` over the
//!   element type's full range.
//!
//! Fixtures are built once per trial family and only ever borrowed afterwards.

use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};

/// Default vector fixture length.
pub const DEFAULT_VECTOR_LEN: usize = 10_000;

/// Canonical text form of the nested record fixture.
pub const CANONICAL_RECORD_JSON: &str = r#"
{
   "fixed_object": {
      "int_array": [0, 1, 2, 3, 4, 5, 6],
      "float_array": [0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
      "double_array": [3288398.238, 233e22, 289e-1, 0.928759872, 0.22222848, 0.1, 0.2, 0.3, 0.4]
   },
   "fixed_name_object": {
      "name0": "James",
      "name1": "Abraham",
      "name2": "Susan",
      "name3": "Frank",
      "name4": "Alicia"
   },
   "another_object": {
      "string": "here is some text",
      "another_string": "Hello World",
      "boolean": false,
      "nested_object": {
         "v3s": [[0.12345, 0.23456, 0.001345],
                  [0.3894675, 97.39827, 297.92387],
                  [18.18, 87.289, 2988.298]],
         "id": "298728949872"
      }
   },
   "string_array": ["Cat", "Dog", "Elephant", "Tiger"],
   "string": "Hello world",
   "number": 3.14,
   "boolean": true,
   "another_bool": false
}
"#;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedObject {
    pub int_array: Vec<i32>,
    pub float_array: Vec<f32>,
    pub double_array: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedNameObject {
    pub name0: String,
    pub name1: String,
    pub name2: String,
    pub name3: String,
    pub name4: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NestedObject {
    pub v3s: Vec<[f64; 3]>,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnotherObject {
    pub string: String,
    pub another_string: String,
    pub boolean: bool,
    pub nested_object: NestedObject,
}

/// The nested heterogeneous sample value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub fixed_object: FixedObject,
    pub fixed_name_object: FixedNameObject,
    pub another_object: AnotherObject,
    pub string_array: Vec<String>,
    pub string: String,
    pub number: f64,
    pub boolean: bool,
    pub another_bool: bool,
}

/// Parse the canonical record. Failure here is fatal to a run.
pub fn build_record_fixture() -> Result<Record> {
    serde_json::from_str(CANONICAL_RECORD_JSON).map_err(BenchError::FixtureParse)
}

/// Numeric element type usable in a vector fixture.
pub trait VectorElement: Copy + PartialEq + std::fmt::Debug {
    /// Short type label used in record names (`f64`, `u16`, ...).
    const LABEL: &'static str;
    const MAX: Self;
    const ZERO: Self;

    fn sample(rng: &mut ChaCha8Rng) -> Self;
}

impl VectorElement for f64 {
    const LABEL: &'static str = "f64";
    const MAX: Self = f64::MAX;
    const ZERO: Self = 0.0;

    fn sample(rng: &mut ChaCha8Rng) -> Self {
        // Half-open [0, MAX): the inclusive float range overflows its scale.
        Uniform::new(0.0, f64::MAX).sample(rng)
    }
}

impl VectorElement for f32 {
    const LABEL: &'static str = "f32";
    const MAX: Self = f32::MAX;
    const ZERO: Self = 0.0;

    fn sample(rng: &mut ChaCha8Rng) -> Self {
        Uniform::new(0.0, f32::MAX).sample(rng)
    }
}

impl VectorElement for u16 {
    const LABEL: &'static str = "u16";
    const MAX: Self = u16::MAX;
    const ZERO: Self = 0;

    fn sample(rng: &mut ChaCha8Rng) -> Self {
        rng.gen()
    }
}

impl VectorElement for u32 {
    const LABEL: &'static str = "u32";
    const MAX: Self = u32::MAX;
    const ZERO: Self = 0;

    fn sample(rng: &mut ChaCha8Rng) -> Self {
        rng.gen()
    }
}

impl VectorElement for u64 {
    const LABEL: &'static str = "u64";
    const MAX: Self = u64::MAX;
    const ZERO: Self = 0;

    fn sample(rng: &mut ChaCha8Rng) -> Self {
        rng.gen()
    }
}

impl VectorElement for i64 {
    const LABEL: &'static str = "i64";
    const MAX: Self = i64::MAX;
    const ZERO: Self = 0;

    fn sample(rng: &mut ChaCha8Rng) -> Self {
        rng.gen()
    }
}

/// Build `length` elements of `T` from a generator seeded with `seed`.
pub fn build_vector_fixture<T: VectorElement>(length: usize, seed: u64) -> Vec<T> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..length).map(|_| T::sample(&mut rng)).collect()
}

/// Record name for a vector fixture, e.g. `vec_f64[10000]`.
pub fn vector_fixture_name<T: VectorElement>(length: usize) -> String {
    format!("vec_{}[{}]", T::LABEL, length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_record_parses() {
        let rec = build_record_fixture().unwrap();
        assert_eq!(rec.number, 3.14);
        assert!(rec.boolean);
        assert!(!rec.another_bool);
        assert_eq!(rec.fixed_object.int_array, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(rec.fixed_object.double_array.len(), 9);
        assert_eq!(rec.fixed_object.double_array[1], 233e22);
        assert_eq!(rec.fixed_name_object.name4, "Alicia");
        assert_eq!(rec.another_object.nested_object.v3s.len(), 3);
        assert_eq!(rec.another_object.nested_object.v3s[2][2], 2988.298);
        assert_eq!(rec.another_object.nested_object.id, "298728949872");
        assert_eq!(rec.string_array, vec!["Cat", "Dog", "Elephant", "Tiger"]);
    }

    #[test]
    fn vector_fixture_is_seed_deterministic() {
        let a = build_vector_fixture::<f64>(1_000, 0);
        let b = build_vector_fixture::<f64>(1_000, 0);
        let c = build_vector_fixture::<f64>(1_000, 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn vector_fixture_respects_range() {
        let floats = build_vector_fixture::<f32>(2_000, 7);
        assert!(floats.iter().all(|v| v.is_finite() && *v >= 0.0));

        let doubles = build_vector_fixture::<f64>(2_000, 7);
        assert!(doubles.iter().all(|v| v.is_finite() && *v >= 0.0));

        // Full-range sampling should reach the upper half of the type.
        let wide = build_vector_fixture::<u64>(2_000, 7);
        assert!(wide.iter().any(|v| *v > u64::MAX / 2));
    }

    #[test]
    fn vector_fixture_name_carries_type_and_len() {
        assert_eq!(vector_fixture_name::<u16>(10_000), "vec_u16[10000]");
    }
}
