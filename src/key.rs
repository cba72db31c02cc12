//! Type keys for provider and instance lookup.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Key identifying a providable type.
///
/// Keys pair the `TypeId` used for lookup with the type's name for
/// diagnostics. Only the `TypeId` takes part in equality, ordering and
/// hashing.
///
/// # Examples
///
/// ```rust
/// use ferrous_wire::{key_of_type, Key};
/// use std::any::TypeId;
///
/// let key = key_of_type::<String>();
/// assert_eq!(key.type_id(), TypeId::of::<String>());
/// assert_eq!(key.display_name(), "alloc::string::String");
///
/// // Names are diagnostic only
/// assert_eq!(key, Key::new(TypeId::of::<String>(), "String"));
/// ```
#[derive(Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Creates a key from raw parts.
    pub const fn new(id: TypeId, name: &'static str) -> Self {
        Self { id, name }
    }

    /// The `TypeId` this key stands for.
    #[inline(always)]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Get the type name for display
    ///
    /// Returns the `std::any::type_name` result for the keyed type.
    #[inline]
    pub fn display_name(&self) -> &'static str {
        self.name
    }

    /// Whether the keyed type is a `Result`.
    ///
    /// A `Result` is a constructor's failure indicator, never something it
    /// provides.
    pub fn is_result(&self) -> bool {
        self.name.starts_with("core::result::Result<")
    }

    /// Type name with module path stripped, for compact graph labels.
    ///
    /// ```rust
    /// use ferrous_wire::key_of_type;
    ///
    /// assert_eq!(key_of_type::<String>().short_name(), "String");
    /// assert_eq!(key_of_type::<Vec<String>>().short_name(), "Vec<String>");
    /// ```
    pub fn short_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut segment = String::new();
        for ch in self.name.chars() {
            match ch {
                ':' => segment.clear(),
                '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' => {
                    out.push_str(&segment);
                    segment.clear();
                    out.push(ch);
                }
                _ => segment.push(ch),
            }
        }
        out.push_str(&segment);
        out
    }
}

impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for Key {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Creates the key for `T`.
#[inline(always)]
pub fn key_of_type<T: ?Sized + 'static>() -> Key {
    Key::new(TypeId::of::<T>(), std::any::type_name::<T>())
}
