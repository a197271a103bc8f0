//! Per-type operations on values living in raw inline storage.
//!
//! A [`VTable`] is the only record of what is stored in a container.
//! It is created as a `&'static` reference by [`VTable::of`], which pairs
//! every function pointer with the same concrete type `T`.
//! Fields are module-private so no table can be assembled with mismatched functions.

use core::{
    mem::{align_of, size_of},
    ptr,
};

use crate::type_info::TypeInfo;

// Virtual table to operate on a value in the storage.
pub(crate) struct VTable {
    type_info: fn() -> TypeInfo,
    size: usize,
    align: usize,
    clone: unsafe fn(*const u8, *mut u8),
    relocate: unsafe fn(*const u8, *mut u8),
    drop: unsafe fn(*mut u8),
}

impl VTable {
    /// Returns the table for type `T`.
    pub(crate) const fn of<T>() -> &'static Self
    where
        T: Clone + 'static,
    {
        const {
            &VTable {
                type_info: TypeInfo::of::<T>,
                size: size_of::<T>(),
                align: align_of::<T>(),
                clone: clone::<T>,
                relocate: relocate::<T>,
                drop: drop::<T>,
            }
        }
    }

    #[inline]
    pub(crate) fn type_info(&self) -> TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub(crate) fn align(&self) -> usize {
        self.align
    }

    /// Returns `true` if this table was made for type `T`.
    ///
    /// Tables are compared by address first. Promoted constants are not
    /// guaranteed to be unique across codegen units and linked binaries,
    /// so a mismatch falls back to comparing type ids.
    #[inline]
    pub(crate) fn is<T>(&self) -> bool
    where
        T: Clone + 'static,
    {
        ptr::eq(self, VTable::of::<T>()) || self.type_info().is::<T>()
    }

    /// Clones the value at `src` into `dst`.
    ///
    /// # Safety
    ///
    /// `src` must point to a live value of the table's type.
    /// `dst` must be valid for writes of that type, suitably aligned,
    /// and must not hold a live value, which would be leaked.
    #[inline]
    pub(crate) unsafe fn clone(&self, src: *const u8, dst: *mut u8) {
        // Safety: Guaranteed by the caller.
        unsafe { (self.clone)(src, dst) }
    }

    /// Moves the value at `src` into `dst`.
    ///
    /// # Safety
    ///
    /// Same requirements as for [`VTable::clone`].
    /// After the call `src` must be treated as uninitialized.
    #[inline]
    pub(crate) unsafe fn relocate(&self, src: *const u8, dst: *mut u8) {
        // Safety: Guaranteed by the caller.
        unsafe { (self.relocate)(src, dst) }
    }

    /// Drops the value at `ptr` in place.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live value of the table's type.
    /// After the call it must be treated as uninitialized.
    #[inline]
    pub(crate) unsafe fn drop(&self, ptr: *mut u8) {
        // Safety: Guaranteed by the caller.
        unsafe { (self.drop)(ptr) }
    }
}

unsafe fn clone<T: Clone>(src: *const u8, dst: *mut u8) {
    debug_assert!(!src.is_null() && !dst.is_null());

    // Safety: `src` holds a live `T`.
    let value = unsafe { &*src.cast::<T>() }.clone();

    // Safety: `dst` is aligned and valid for writes of `T`.
    unsafe { dst.cast::<T>().write(value) }
}

unsafe fn relocate<T>(src: *const u8, dst: *mut u8) {
    debug_assert!(!src.is_null() && !dst.is_null());

    // Safety: `src` holds a live `T` that is given up by the caller,
    // `dst` is aligned, valid for writes and distinct from `src`.
    unsafe { ptr::copy_nonoverlapping(src.cast::<T>(), dst.cast::<T>(), 1) }
}

unsafe fn drop<T>(ptr: *mut u8) {
    debug_assert!(!ptr.is_null());

    // Safety: `ptr` holds a live `T`.
    unsafe { ptr::drop_in_place(ptr.cast::<T>()) }
}
