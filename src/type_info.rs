use core::{
    any::{type_name, TypeId},
    fmt,
    hash::{Hash, Hasher},
};

/// Uninhabited marker standing for "no type".
enum Void {}

/// Runtime identity of a type, with a human-readable name attached.
///
/// Two [`TypeInfo`]s compare equal when they describe the same type.
/// Comparison is done by [`TypeId`] value, never by address,
/// so it holds for types coming from independently compiled code too.
/// The name is informational only and takes no part in comparison.
#[derive(Clone, Copy)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
}

impl TypeInfo {
    /// Returns identity of the type `T`.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::TypeInfo;
    /// assert_eq!(TypeInfo::of::<u32>(), TypeInfo::of::<u32>());
    /// assert_ne!(TypeInfo::of::<u32>(), TypeInfo::of::<i32>());
    /// ```
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeInfo {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns the "no type" sentinel reported by empty containers.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::TypeInfo;
    /// assert!(TypeInfo::empty().is_empty());
    /// assert_eq!(TypeInfo::empty().name(), "void");
    /// ```
    #[inline]
    pub fn empty() -> Self {
        TypeInfo {
            id: TypeId::of::<Void>(),
            name: "void",
        }
    }

    /// Returns `true` if this is the "no type" sentinel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id == TypeId::of::<Void>()
    }

    /// Returns `true` if this describes the type `T`.
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Human-readable name of the type.
    ///
    /// Same caveats as for [`core::any::type_name`] apply,
    /// the exact string is not guaranteed to be stable.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeInfo {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeInfo").field(&self.name).finish()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl PartialEq<TypeId> for TypeInfo {
    #[inline]
    fn eq(&self, other: &TypeId) -> bool {
        self.id == *other
    }
}
