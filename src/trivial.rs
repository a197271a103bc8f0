use core::{fmt, marker::PhantomData};

use crate::storage::Storage;

/// Untyped inline storage of `N` bytes for `Copy` values.
///
/// Unlike [`StaticAny`](crate::StaticAny) this keeps no record of the stored type,
/// values are copied in bitwise and never dropped.
/// Reading the value back is `unsafe`: the caller is responsible to read
/// the same type that was written last.
///
/// # Example
///
/// ```
/// # use static_any::TrivialAny;
/// let mut a = TrivialAny::<16>::from_value(7i32);
/// assert_eq!(unsafe { *a.get::<i32>() }, 7);
///
/// a.set((1.5f32, 2u64));
/// assert_eq!(unsafe { *a.get::<(f32, u64)>() }, (1.5, 2));
/// ```
#[derive(Clone, Copy)]
pub struct TrivialAny<const N: usize> {
    storage: Storage<N>,
    unsend: PhantomData<*mut u8>,
}

impl<const N: usize> fmt::Debug for TrivialAny<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrivialAny").field("capacity", &N).finish_non_exhaustive()
    }
}

impl<const N: usize> Default for TrivialAny<N> {
    #[inline(always)]
    fn default() -> Self {
        TrivialAny::new()
    }
}

impl<const N: usize> TrivialAny<N> {
    /// Capacity of the inline storage in bytes.
    pub const CAPACITY: usize = N;

    /// Construct new [`TrivialAny`] with uninitialized storage.
    #[inline]
    pub const fn new() -> Self {
        TrivialAny {
            storage: Storage::new(),
            unsend: PhantomData,
        }
    }

    /// Returns `true` if the type `T` can be stored in this container.
    #[inline]
    pub const fn fits<T>() -> bool {
        Storage::<N>::fits::<T>()
    }

    /// Construct new [`TrivialAny`] holding the given value.
    ///
    /// Fails to compile if `T` does not fit into `N` bytes.
    #[inline]
    pub fn from_value<T>(value: T) -> Self
    where
        T: Copy + 'static,
    {
        let mut any = TrivialAny::new();
        any.set(value);
        any
    }

    /// Overwrites the storage with the given value.
    #[inline]
    pub fn set<T>(&mut self, value: T)
    where
        T: Copy + 'static,
    {
        Storage::<N>::assert_fits::<T>();
        self.storage.as_mut::<T>().write(value);
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns reference to the stored value interpreted as `T`.
    ///
    /// # Safety
    ///
    /// The last value written must be of type `T`,
    /// or at least have the same layout with every bit pattern valid for `T`.
    #[inline]
    pub unsafe fn get<T>(&self) -> &T
    where
        T: Copy + 'static,
    {
        Storage::<N>::assert_fits::<T>();

        // Safety: Guaranteed by the caller.
        unsafe { self.storage.as_ref::<T>().assume_init_ref() }
    }

    /// Returns mutable reference to the stored value interpreted as `T`.
    ///
    /// # Safety
    ///
    /// Same as for [`TrivialAny::get`].
    #[inline]
    pub unsafe fn get_mut<T>(&mut self) -> &mut T
    where
        T: Copy + 'static,
    {
        Storage::<N>::assert_fits::<T>();

        // Safety: Guaranteed by the caller.
        unsafe { self.storage.as_mut::<T>().assume_init_mut() }
    }
}
