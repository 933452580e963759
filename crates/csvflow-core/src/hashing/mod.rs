//! Hashing y JSON canónico para identificar datasets.

pub mod canonical_json;
pub mod hash;

pub use canonical_json::to_canonical_json;
pub use hash::hash_value;
