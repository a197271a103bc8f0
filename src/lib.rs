//! This crate provides type-erased values as replacement for `Box<dyn Any>`
//! that are stored inline, in a buffer of fixed capacity, without ever touching the heap.
//!
//! [`StaticAny<N>`] can hold a value of any `Clone + 'static` type that fits into `N` bytes.
//! Types that don't fit are rejected at compile time.
//! Containers of different capacities can be converted into each other,
//! with a runtime check when the destination is smaller.
//!
//! [`TrivialAny<N>`] is a minimal unchecked variant for `Copy` values
//! that does not remember what type is stored.
//!
//! ## Usage
//!
//! ```
//! use static_any::{StaticAny, any_cast, try_any_cast};
//!
//! // Inline storage of 32 bytes.
//! let mut a = StaticAny::<32>::from_value(42i32);
//! assert!(a.has::<i32>());
//! assert_eq!(a.get::<i32>(), Ok(&42));
//!
//! // Overwrite with a value of another type.
//! a.set(String::from("hello"));
//! assert!(!a.has::<i32>());
//! assert_eq!(any_cast::<String, 32>(&a).unwrap(), "hello");
//!
//! // Casting to a wrong type is not fatal.
//! assert!(try_any_cast::<i32, 32>(&a).is_none());
//! assert!(any_cast::<i32, 32>(&a).is_err());
//!
//! a.reset();
//! assert!(a.is_empty());
//! ```
//!
//! Values that are too big don't compile:
//!
//! ```compile_fail
//! use static_any::StaticAny;
//!
//! let a = StaticAny::<4>::from_value(1u64);
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit `trace` level events through [`tracing`](https://docs.rs/tracing)
//!   when a cast or a cross-capacity conversion is rejected.

#![no_std]

#[cfg(test)]
extern crate std;

macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
    };
}

mod cast;
mod error;
mod static_any;
mod storage;
mod trivial;
mod type_info;
mod vtable;

pub use self::{
    cast::{any_cast, any_cast_mut, try_any_cast, try_any_cast_mut},
    error::{BadAnyCast, CapacityError},
    static_any::StaticAny,
    storage::MAX_ALIGN,
    trivial::TrivialAny,
    type_info::TypeInfo,
};

#[cfg(test)]
mod tests;
