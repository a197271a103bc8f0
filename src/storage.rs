use core::mem::{align_of, size_of, MaybeUninit};

/// Maximum alignment of a value that can be stored inline.
///
/// Every container keeps its buffer aligned to this value, regardless of capacity,
/// so values can be moved between containers of different capacities.
pub const MAX_ALIGN: usize = 8;

/// Storage type that can hold any value of size up to `N` bytes and alignment up to `MAX_ALIGN`.
#[repr(C, align(8))] // alignment value is in synced with `MAX_ALIGN`
#[derive(Clone, Copy)]
pub(crate) struct Storage<const N: usize> {
    bytes: [MaybeUninit<u8>; N],
}

impl<const N: usize> Storage<N> {
    /// Construct new storage without initializing any value in it.
    pub const fn new() -> Self {
        Storage {
            bytes: [MaybeUninit::uninit(); N],
        }
    }

    /// Returns `true` if the type `T` fits into the storage.
    pub const fn fits<T>() -> bool {
        Self::fits_layout(size_of::<T>(), align_of::<T>())
    }

    /// Returns `true` if a value with given size and alignment fits into the storage.
    pub const fn fits_layout(size: usize, align: usize) -> bool {
        size <= N && align <= MAX_ALIGN
    }

    /// Fails compilation when `T` does not fit.
    ///
    /// The check is evaluated when the calling function is monomorphized,
    /// so it only fires for types that are actually stored.
    #[inline(always)]
    pub fn assert_fits<T>() {
        const {
            assert!(
                Storage::<N>::fits::<T>(),
                "type is too big or too aligned for the inline storage"
            );
        }
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr().cast()
    }

    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.bytes.as_mut_ptr().cast()
    }

    /// Returns reference to the potentially uninitialized value.
    /// Type must be not larger than `N` and not more aligned than `MAX_ALIGN`.
    ///
    /// The caller is responsible to ensure that the type is correct and the value is initialized before accessing it.
    pub fn as_ref<T>(&self) -> &MaybeUninit<T> {
        // This can't be const, because then it'll be checked in branches that are not taken.
        assert!(Self::fits::<T>());

        // Safety: This cast is safe due to the size and alignment constraints.
        unsafe { &*self.as_ptr().cast() }
    }

    /// Returns mutable reference to the potentially uninitialized value.
    /// Type must be not larger than `N` and not more aligned than `MAX_ALIGN`.
    ///
    /// The caller is responsible to ensure that the type is correct and the value is initialized before accessing it.
    pub fn as_mut<T>(&mut self) -> &mut MaybeUninit<T> {
        // This can't be const, because then it'll be checked in branches that are not taken.
        assert!(Self::fits::<T>());

        // Safety: This cast is safe due to the size and alignment constraints.
        unsafe { &mut *self.as_mut_ptr().cast() }
    }
}
