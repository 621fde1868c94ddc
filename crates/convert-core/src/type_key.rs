//! Type identities used to key definition tables and strategy caches.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a concrete runtime type.
///
/// Two keys compare equal iff they denote the same type. The type name is
/// carried along for diagnostics only and never takes part in equality or
/// hashing.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for the type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The underlying `TypeId`.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, e.g. `chrono::naive::datetime::NaiveDateTime`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name with module paths stripped and generic arguments kept,
    /// e.g. `DateTime<FixedOffset>`.
    pub fn short_name(&self) -> String {
        short_type_name(self.name)
    }

    /// Whether this key denotes `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

/// Ordered (source, target) pair of type keys.
///
/// Conversion is directional: `(A, B)` and `(B, A)` are independent entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversionPairKey {
    pub source: TypeKey,
    pub target: TypeKey,
}

impl ConversionPairKey {
    pub fn new(source: TypeKey, target: TypeKey) -> Self {
        Self { source, target }
    }

    /// Pair key for converting `S` into `T`.
    pub fn of<S: ?Sized + 'static, T: ?Sized + 'static>() -> Self {
        Self::new(TypeKey::of::<S>(), TypeKey::of::<T>())
    }

    /// Whether source and target denote the same type.
    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }
}

impl fmt::Display for ConversionPairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Strip module paths from every path segment of a `type_name` string.
fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;

    for (idx, ch) in full.char_indices() {
        if matches!(ch, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&') {
            out.push_str(last_path_segment(&full[segment_start..idx]));
            out.push(ch);
            segment_start = idx + ch.len_utf8();
        }
    }
    out.push_str(last_path_segment(&full[segment_start..]));
    out
}

fn last_path_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_keys_compare_by_type() {
        assert_eq!(TypeKey::of::<i32>(), TypeKey::of::<i32>());
        assert_ne!(TypeKey::of::<i32>(), TypeKey::of::<i64>());
        assert!(TypeKey::of::<String>().is::<String>());
    }

    #[test]
    fn test_pair_keys_are_directional() {
        let forward = ConversionPairKey::of::<i32, String>();
        let backward = ConversionPairKey::of::<String, i32>();
        assert_ne!(forward, backward);

        let mut map = HashMap::new();
        map.insert(forward, "forward");
        map.insert(backward, "backward");
        assert_eq!(map[&ConversionPairKey::of::<i32, String>()], "forward");
        assert!(ConversionPairKey::of::<u8, u8>().is_identity());
    }

    #[test]
    fn test_short_name() {
        assert_eq!(TypeKey::of::<String>().short_name(), "String");
        assert_eq!(TypeKey::of::<Option<Vec<u8>>>().short_name(), "Option<Vec<u8>>");
        assert_eq!(
            short_type_name("chrono::datetime::DateTime<chrono::offset::fixed::FixedOffset>"),
            "DateTime<FixedOffset>"
        );
        assert_eq!(short_type_name("(alloc::string::String, u8)"), "(String, u8)");
    }

    #[test]
    fn test_display_uses_short_name() {
        let pair = ConversionPairKey::of::<Option<String>, i64>();
        assert_eq!(pair.to_string(), "Option<String> -> i64");
    }
}
