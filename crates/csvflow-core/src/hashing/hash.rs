//! Hash helpers sobre blake3.

use blake3::Hasher;
use serde_json::Value;

use super::to_canonical_json;

/// Hash hex del JSON canónico de `value`; dos valores iguales salvo por el
/// orden de sus claves dan el mismo hash.
pub fn hash_value(value: &Value) -> String {
    let canonical = to_canonical_json(value);
    Hasher::new().update(canonical.as_bytes()).finalize().to_hex().to_string()
}
