use core::{any::TypeId, fmt, marker::PhantomData};

use crate::{
    cast,
    error::{BadAnyCast, CapacityError},
    storage::Storage,
    type_info::TypeInfo,
    vtable::VTable,
};

/// `dyn Any` with fixed-capacity inline storage of `N` bytes.
///
/// Values are always stored inline, no allocation is ever performed.
/// Storing a type that is larger than `N` bytes or more aligned than [`MAX_ALIGN`]
/// is rejected at compile time.
///
/// Stored types must implement `Clone`, so that the container itself can be cloned.
/// The container does not implement `Send` and `Sync`.
///
/// [`MAX_ALIGN`]: crate::MAX_ALIGN
pub struct StaticAny<const N: usize> {
    vtable: Option<&'static VTable>,
    storage: Storage<N>,
    unsend: PhantomData<*mut u8>,
}

impl<const N: usize> Drop for StaticAny<N> {
    #[inline(always)]
    fn drop(&mut self) {
        self.reset();
    }
}

impl<const N: usize> Default for StaticAny<N> {
    #[inline(always)]
    fn default() -> Self {
        StaticAny::new()
    }
}

impl<const N: usize> Clone for StaticAny<N> {
    #[inline]
    fn clone(&self) -> Self {
        let mut any = StaticAny::new();

        // Safety: Same capacity, anything stored in `self` fits.
        unsafe {
            any.clone_value_from(self);
        }

        any
    }

    /// Drops the current value first, then clones the value of `source`.
    /// If cloning panics, `self` is left empty.
    #[inline]
    fn clone_from(&mut self, source: &Self) {
        self.reset();

        // Safety: Same capacity, anything stored in `source` fits.
        unsafe {
            self.clone_value_from(source);
        }
    }
}

impl<const N: usize> fmt::Debug for StaticAny<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticAny")
            .field("type", &self.type_info().name())
            .field("capacity", &N)
            .finish()
    }
}

impl<const N: usize> StaticAny<N> {
    /// Capacity of the inline storage in bytes.
    pub const CAPACITY: usize = N;

    /// Construct new empty [`StaticAny`].
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::StaticAny;
    /// let a = StaticAny::<16>::new();
    /// assert!(a.is_empty());
    /// ```
    #[inline]
    pub const fn new() -> Self {
        StaticAny {
            vtable: None,
            storage: Storage::new(),
            unsend: PhantomData,
        }
    }

    /// Returns `true` if the type `T` can be stored in this container.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::StaticAny;
    /// assert!(StaticAny::<8>::fits::<u64>());
    /// assert!(!StaticAny::<8>::fits::<[u64; 2]>());
    /// ```
    #[inline]
    pub const fn fits<T>() -> bool {
        Storage::<N>::fits::<T>()
    }

    /// Construct new [`StaticAny`] holding the given value.
    ///
    /// Fails to compile if `T` does not fit into `N` bytes.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::StaticAny;
    /// let a = StaticAny::<16>::from_value(42u32);
    ///
    /// assert_eq!(a.get::<u32>(), Ok(&42));
    /// ```
    #[inline]
    pub fn from_value<T>(value: T) -> Self
    where
        T: Clone + 'static,
    {
        let mut any = StaticAny::new();
        any.store(value);
        any
    }

    /// Replaces the stored value with the given one.
    ///
    /// The old value, if any, is dropped before the new one is written.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::StaticAny;
    /// let mut a = StaticAny::<32>::from_value(7i32);
    /// a.set(3.14f64);
    ///
    /// assert!(!a.has::<i32>());
    /// assert!(a.has::<f64>());
    /// ```
    #[inline]
    pub fn set<T>(&mut self, value: T)
    where
        T: Clone + 'static,
    {
        self.reset();
        self.store(value);
    }

    /// Drops the stored value and constructs a new one in place
    /// from the result of `f`.
    ///
    /// `f` runs after the old value is dropped.
    /// If it panics, the container is left empty.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::StaticAny;
    /// let mut a = StaticAny::<16>::new();
    /// let v = a.emplace(|| [1u16, 2, 3]);
    /// v[0] = 10;
    ///
    /// assert_eq!(a.get::<[u16; 3]>(), Ok(&[10, 2, 3]));
    /// ```
    #[inline]
    pub fn emplace<T, F>(&mut self, f: F) -> &mut T
    where
        T: Clone + 'static,
        F: FnOnce() -> T,
    {
        Storage::<N>::assert_fits::<T>();

        self.reset();
        let value = self.storage.as_mut::<T>().write(f());
        self.vtable = Some(VTable::of::<T>());
        value
    }

    /// Drops the stored value and replaces it with `T::default()`.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::StaticAny;
    /// let mut a = StaticAny::<16>::from_value(1u8);
    /// a.emplace_default::<u64>();
    ///
    /// assert_eq!(a.get::<u64>(), Ok(&0));
    /// ```
    #[inline]
    pub fn emplace_default<T>(&mut self) -> &mut T
    where
        T: Clone + Default + 'static,
    {
        self.emplace(T::default)
    }

    /// Drops the stored value, leaving the container empty.
    ///
    /// Does nothing if the container is already empty.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::StaticAny;
    /// let mut a = StaticAny::<16>::from_value(7i32);
    /// a.reset();
    /// assert!(a.is_empty());
    ///
    /// a.reset();
    /// assert!(a.is_empty());
    /// ```
    #[inline]
    pub fn reset(&mut self) {
        // Vtable is taken first, a panicking destructor won't cause double drop.
        if let Some(vtable) = self.vtable.take() {
            // Safety: Storage holds a live value of the vtable's type.
            unsafe {
                vtable.drop(self.storage.as_mut_ptr());
            }
        }
    }

    /// Returns `true` if no value is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vtable.is_none()
    }

    /// Returns capacity of the inline storage in bytes.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::StaticAny;
    /// let a = StaticAny::<32>::from_value(1u8);
    /// assert_eq!(a.capacity(), 32);
    /// ```
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns size of the stored value in bytes, zero if empty.
    #[inline]
    pub fn size(&self) -> usize {
        self.vtable.map_or(0, |vtable| vtable.size())
    }

    /// Returns identity of the stored type,
    /// or [`TypeInfo::empty`] if nothing is stored.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::{StaticAny, TypeInfo};
    /// let mut a = StaticAny::<16>::from_value(42u32);
    /// assert_eq!(a.type_info(), TypeInfo::of::<u32>());
    ///
    /// a.reset();
    /// assert_eq!(a.type_info(), TypeInfo::empty());
    /// ```
    #[inline]
    pub fn type_info(&self) -> TypeInfo {
        match self.vtable {
            Some(vtable) => vtable.type_info(),
            None => TypeInfo::empty(),
        }
    }

    /// Returns the type id of the stored value.
    ///
    /// Empty container reports the id of [`TypeInfo::empty`].
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_info().id()
    }

    /// Returns `true` if the stored value is of type `T`.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::StaticAny;
    /// let a = StaticAny::<16>::from_value(77i32);
    /// assert!(a.has::<i32>());
    /// assert!(!a.has::<f64>());
    /// ```
    #[inline]
    pub fn has<T>(&self) -> bool
    where
        T: Clone + 'static,
    {
        match self.vtable {
            Some(vtable) => vtable.is::<T>(),
            None => false,
        }
    }

    /// Returns some reference to the stored value if it is of type `T`.
    /// Otherwise returns none.
    #[inline]
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: Clone + 'static,
    {
        if self.has::<T>() {
            Some(unsafe { self.downcast_ref_unchecked::<T>() })
        } else {
            None
        }
    }

    /// Returns some mutable reference to the stored value if it is of type `T`.
    /// Otherwise returns none.
    #[inline]
    pub fn downcast_mut<T>(&mut self) -> Option<&mut T>
    where
        T: Clone + 'static,
    {
        if self.has::<T>() {
            Some(unsafe { self.downcast_mut_unchecked::<T>() })
        } else {
            None
        }
    }

    /// Returns reference to the stored value if it is of type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`BadAnyCast`] describing both types on mismatch, including when the container is empty.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::StaticAny;
    /// let a = StaticAny::<16>::from_value(7i32);
    ///
    /// assert_eq!(a.get::<i32>(), Ok(&7));
    /// assert!(a.get::<f32>().is_err());
    /// ```
    #[inline]
    pub fn get<T>(&self) -> Result<&T, BadAnyCast>
    where
        T: Clone + 'static,
    {
        cast::any_cast(self)
    }

    /// Returns mutable reference to the stored value if it is of type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`BadAnyCast`] describing both types on mismatch, including when the container is empty.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::StaticAny;
    /// let mut a = StaticAny::<16>::from_value(7i32);
    /// *a.get_mut::<i32>().unwrap() = 6;
    ///
    /// assert_eq!(a.get::<i32>(), Ok(&6));
    /// ```
    #[inline]
    pub fn get_mut<T>(&mut self) -> Result<&mut T, BadAnyCast>
    where
        T: Clone + 'static,
    {
        cast::any_cast_mut(self)
    }

    /// Moves the stored value out if it is of type `T`, leaving the container empty.
    /// Otherwise returns none and keeps the value.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::StaticAny;
    /// let mut a = StaticAny::<16>::from_value(5u64);
    ///
    /// assert_eq!(a.take::<u32>(), None);
    /// assert_eq!(a.take::<u64>(), Some(5));
    /// assert!(a.is_empty());
    /// ```
    #[inline]
    pub fn take<T>(&mut self) -> Option<T>
    where
        T: Clone + 'static,
    {
        if !self.has::<T>() {
            return None;
        }

        self.vtable = None;

        // Safety: It was initialized as `T` and the vtable is cleared, so it won't be dropped again.
        Some(unsafe { self.storage.as_ref::<T>().assume_init_read() })
    }

    /// Returns the stored value if it is of type `T`.
    /// Otherwise return self back.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::StaticAny;
    /// let a = StaticAny::<16>::from_value(42u32);
    ///
    /// let Ok(v) = a.downcast::<u32>() else {
    ///    panic!();
    /// };
    /// assert_eq!(v, 42);
    /// ```
    #[inline]
    pub fn downcast<T>(mut self) -> Result<T, Self>
    where
        T: Clone + 'static,
    {
        match self.take() {
            Some(value) => Ok(value),
            None => Err(self),
        }
    }

    /// Returns reference to the stored value without type checking.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the container holds a value of type `T`.
    #[inline]
    pub unsafe fn downcast_ref_unchecked<T>(&self) -> &T
    where
        T: Clone + 'static,
    {
        debug_assert!(self.has::<T>());

        // Safety: It was initialized as `T`.
        unsafe { self.storage.as_ref::<T>().assume_init_ref() }
    }

    /// Returns mutable reference to the stored value without type checking.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the container holds a value of type `T`.
    #[inline]
    pub unsafe fn downcast_mut_unchecked<T>(&mut self) -> &mut T
    where
        T: Clone + 'static,
    {
        debug_assert!(self.has::<T>());

        // Safety: It was initialized as `T`.
        unsafe { self.storage.as_mut::<T>().assume_init_mut() }
    }

    /// Construct new [`StaticAny`] holding a clone of the value stored in another
    /// container, possibly of different capacity.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the stored value does not fit into `N` bytes.
    /// Never fails when `M <= N`.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::StaticAny;
    /// let small = StaticAny::<8>::from_value(1i32);
    /// let big = StaticAny::<32>::try_clone_from_any(&small).unwrap();
    ///
    /// assert_eq!(big.get::<i32>(), Ok(&1));
    /// assert_eq!(small.get::<i32>(), Ok(&1));
    /// ```
    #[inline]
    pub fn try_clone_from_any<const M: usize>(other: &StaticAny<M>) -> Result<Self, CapacityError> {
        Self::check_fits(other)?;

        let mut any = StaticAny::new();

        // Safety: Checked above.
        unsafe {
            any.clone_value_from(other);
        }

        Ok(any)
    }

    /// Construct new [`StaticAny`] taking the value stored in another
    /// container, possibly of different capacity.
    /// If the value does not fit, the other container is returned back untouched.
    /// Never fails when `M <= N`.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::StaticAny;
    /// let big = StaticAny::<32>::from_value(String::from("hello"));
    ///
    /// let big = StaticAny::<8>::try_from_any(big).unwrap_err();
    /// let bigger = StaticAny::<64>::try_from_any(big).unwrap();
    ///
    /// assert_eq!(bigger.get::<String>().unwrap(), "hello");
    /// ```
    #[inline]
    pub fn try_from_any<const M: usize>(mut other: StaticAny<M>) -> Result<Self, StaticAny<M>> {
        if Self::check_fits(&other).is_err() {
            return Err(other);
        }

        let mut any = StaticAny::new();

        // Safety: Checked above.
        unsafe {
            any.relocate_value_from(&mut other);
        }

        Ok(any)
    }

    /// Replaces the stored value with a clone of the value stored in another
    /// container, possibly of different capacity.
    ///
    /// The old value is dropped first, then the new one is cloned in.
    /// If cloning panics, the container is left empty.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the value does not fit into `N` bytes.
    /// The container is left untouched in this case.
    ///
    /// # Example
    ///
    /// ```
    /// # use static_any::StaticAny;
    /// let a = StaticAny::<16>::from_value(1i32);
    /// let mut b = StaticAny::<32>::from_value(2i32);
    ///
    /// b.try_assign_from(&a).unwrap();
    /// assert_eq!(b.get::<i32>(), Ok(&1));
    /// ```
    #[inline]
    pub fn try_assign_from<const M: usize>(
        &mut self,
        other: &StaticAny<M>,
    ) -> Result<(), CapacityError> {
        Self::check_fits(other)?;

        self.reset();

        // Safety: Checked above.
        unsafe {
            self.clone_value_from(other);
        }

        Ok(())
    }

    /// Replaces the stored value with the value taken from another
    /// container, possibly of different capacity.
    /// If the value does not fit, the other container is returned back
    /// and this container is left untouched.
    #[inline]
    pub fn try_assign_from_any<const M: usize>(
        &mut self,
        mut other: StaticAny<M>,
    ) -> Result<(), StaticAny<M>> {
        if Self::check_fits(&other).is_err() {
            return Err(other);
        }

        self.reset();

        // Safety: Checked above.
        unsafe {
            self.relocate_value_from(&mut other);
        }

        Ok(())
    }

    fn store<T>(&mut self, value: T)
    where
        T: Clone + 'static,
    {
        Storage::<N>::assert_fits::<T>();
        debug_assert!(self.vtable.is_none(), "storing into occupied container");

        self.storage.as_mut::<T>().write(value);
        self.vtable = Some(VTable::of::<T>());
    }

    fn check_fits<const M: usize>(other: &StaticAny<M>) -> Result<(), CapacityError> {
        match other.vtable {
            // Anything stored in a smaller container fits.
            _ if M <= N => Ok(()),
            Some(vtable) if !Storage::<N>::fits_layout(vtable.size(), vtable.align()) => {
                Err(CapacityError::new(
                    vtable.type_info(),
                    vtable.size(),
                    vtable.align(),
                    N,
                ))
            }
            _ => Ok(()),
        }
    }

    /// # Safety
    ///
    /// `self` must be empty and the value stored in `other` must fit into `N` bytes.
    unsafe fn clone_value_from<const M: usize>(&mut self, other: &StaticAny<M>) {
        debug_assert!(self.vtable.is_none(), "cloning into occupied container");

        if let Some(vtable) = other.vtable {
            debug_assert!(Storage::<N>::fits_layout(vtable.size(), vtable.align()));

            // Safety: `other` holds a live value of the vtable's type and `self` is empty.
            // The vtable is set only after cloning succeeds.
            unsafe {
                vtable.clone(other.storage.as_ptr(), self.storage.as_mut_ptr());
            }
            self.vtable = Some(vtable);
        }
    }

    /// # Safety
    ///
    /// `self` must be empty and the value stored in `other` must fit into `N` bytes.
    unsafe fn relocate_value_from<const M: usize>(&mut self, other: &mut StaticAny<M>) {
        debug_assert!(self.vtable.is_none(), "moving into occupied container");

        if let Some(vtable) = other.vtable.take() {
            debug_assert!(Storage::<N>::fits_layout(vtable.size(), vtable.align()));

            // Safety: `other` held a live value of the vtable's type,
            // its vtable is cleared so the value is not dropped there.
            unsafe {
                vtable.relocate(other.storage.as_ptr(), self.storage.as_mut_ptr());
            }
            self.vtable = Some(vtable);
        }
    }
}
