//! Schedule reconciliation: vendor grid in, validated per-part schedule out.
//!
//! - key normalization (`key`)
//! - grid slicing and date labels (`extract`)
//! - duplicate-key aggregation (`aggregate`)
//! - validation remap + translation factors (`validate`)
//! - the composed build (`builder`)

pub mod aggregate;
pub mod builder;
pub mod extract;
pub mod key;
pub mod validate;

pub use aggregate::aggregate;
pub use builder::{BuildStats, ScheduleBuild, build_schedule};
pub use key::{NormalizedKey, normalize_key};
pub use validate::{Remapped, ensure_finite, remap, translate};
