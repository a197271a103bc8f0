//! Free-standing extraction functions.
//!
//! `try_` variants return `None` on type mismatch, the others return [`BadAnyCast`].

use crate::{error::BadAnyCast, static_any::StaticAny, type_info::TypeInfo};

/// Returns reference to the value stored in `any` if it is of type `T`.
///
/// # Example
///
/// ```
/// # use static_any::{StaticAny, try_any_cast};
/// let a = StaticAny::<16>::from_value(7i32);
///
/// assert_eq!(try_any_cast::<i32, 16>(&a), Some(&7));
/// assert_eq!(try_any_cast::<f32, 16>(&a), None);
/// ```
#[inline]
pub fn try_any_cast<T, const N: usize>(any: &StaticAny<N>) -> Option<&T>
where
    T: Clone + 'static,
{
    any.downcast_ref()
}

/// Returns mutable reference to the value stored in `any` if it is of type `T`.
#[inline]
pub fn try_any_cast_mut<T, const N: usize>(any: &mut StaticAny<N>) -> Option<&mut T>
where
    T: Clone + 'static,
{
    any.downcast_mut()
}

/// Returns reference to the value stored in `any` if it is of type `T`.
///
/// # Errors
///
/// Returns [`BadAnyCast`] carrying the stored and the requested types on mismatch.
///
/// # Example
///
/// ```
/// # use static_any::{StaticAny, TypeInfo, any_cast};
/// let a = StaticAny::<16>::from_value(7i32);
/// assert_eq!(any_cast::<i32, 16>(&a), Ok(&7));
///
/// let err = any_cast::<f32, 16>(&a).unwrap_err();
/// assert_eq!(err.stored_type(), TypeInfo::of::<i32>());
/// assert_eq!(err.target_type(), TypeInfo::of::<f32>());
/// ```
#[inline]
pub fn any_cast<T, const N: usize>(any: &StaticAny<N>) -> Result<&T, BadAnyCast>
where
    T: Clone + 'static,
{
    any.downcast_ref()
        .ok_or_else(|| BadAnyCast::new(any.type_info(), TypeInfo::of::<T>()))
}

/// Returns mutable reference to the value stored in `any` if it is of type `T`.
///
/// # Errors
///
/// Returns [`BadAnyCast`] carrying the stored and the requested types on mismatch.
#[inline]
pub fn any_cast_mut<T, const N: usize>(any: &mut StaticAny<N>) -> Result<&mut T, BadAnyCast>
where
    T: Clone + 'static,
{
    if any.has::<T>() {
        // Safety: Type is checked above.
        Ok(unsafe { any.downcast_mut_unchecked() })
    } else {
        Err(BadAnyCast::new(any.type_info(), TypeInfo::of::<T>()))
    }
}
