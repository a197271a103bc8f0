use core::{cell::RefCell, mem::size_of};

use std::{
    format,
    panic::{catch_unwind, AssertUnwindSafe},
    rc::Rc,
    string::{String, ToString},
    vec,
    vec::Vec,
};

use crate::{
    any_cast, any_cast_mut, try_any_cast, try_any_cast_mut, BadAnyCast, StaticAny, TrivialAny,
    TypeInfo,
};

type Log = Rc<RefCell<Vec<String>>>;

/// Records its construction, clones and drops into a shared log.
struct Tracked {
    name: &'static str,
    log: Log,
}

impl Tracked {
    fn new(name: &'static str, log: &Log) -> Self {
        log.borrow_mut().push(format!("new {name}"));
        Tracked {
            name,
            log: log.clone(),
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.log.borrow_mut().push(format!("clone {}", self.name));
        Tracked {
            name: self.name,
            log: self.log.clone(),
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.log.borrow_mut().push(format!("drop {}", self.name));
    }
}

fn take_log(log: &Log) -> Vec<String> {
    log.borrow_mut().drain(..).collect()
}

/// Panics when cloned with the value 42.
#[derive(Debug, PartialEq)]
struct UnsafeClone(i32);

impl Clone for UnsafeClone {
    fn clone(&self) -> Self {
        assert_ne!(self.0, 42, "refusing to clone");
        UnsafeClone(self.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct InitCtor {
    x: i32,
    y: i32,
}

#[test]
fn test_readme_scenario() {
    let mut a = StaticAny::<32>::from_value(42i32);
    assert!(a.has::<i32>());
    assert_eq!(a.get::<i32>(), Ok(&42));

    a.set(String::from("hello"));
    assert!(!a.has::<i32>());
    assert!(a.has::<String>());
    assert_eq!(a.get::<String>().unwrap(), "hello");

    a.reset();
    assert!(a.is_empty());
}

#[test]
#[cfg(target_pointer_width = "64")]
fn test_sizeof() {
    assert_eq!(size_of::<StaticAny<16>>(), 16 + size_of::<usize>());
    assert_eq!(size_of::<StaticAny<32>>(), 32 + size_of::<usize>());
    assert_eq!(size_of::<TrivialAny<16>>(), 16);
}

#[test]
fn test_capacity() {
    let mut a = StaticAny::<32>::new();
    assert_eq!(a.capacity(), 32);
    assert_eq!(StaticAny::<32>::CAPACITY, 32);

    a.set(String::from("hello world"));
    assert_eq!(a.capacity(), 32);

    a.reset();
    assert_eq!(a.capacity(), 32);
}

#[test]
fn test_size() {
    let mut a = StaticAny::<32>::new();
    assert_eq!(a.size(), 0);

    a.set(1234i32);
    assert_eq!(a.size(), size_of::<i32>());

    a.set(String::from("foobar"));
    assert_eq!(a.size(), size_of::<String>());

    a.reset();
    assert_eq!(a.size(), 0);
}

#[test]
fn test_fits() {
    assert!(StaticAny::<8>::fits::<u64>());
    assert!(!StaticAny::<8>::fits::<[u64; 2]>());
    assert!(StaticAny::<0>::fits::<()>());
    assert!(TrivialAny::<4>::fits::<f32>());
}

#[test]
fn test_default_is_empty() {
    let a = StaticAny::<16>::default();
    assert!(a.is_empty());
    assert!(!a.has::<i32>());
    assert_eq!(a.type_info(), TypeInfo::empty());
    assert!(a.type_info().is_empty());
}

#[test]
fn test_has() {
    let a = StaticAny::<16>::from_value(77i32);
    assert!(!a.is_empty());
    assert!(a.has::<i32>());
    assert!(!a.has::<u32>());
    assert!(!a.has::<f64>());
}

#[test]
fn test_type_info() {
    let mut a = StaticAny::<32>::from_value(7i32);
    assert_eq!(a.type_info(), TypeInfo::of::<i32>());
    assert_eq!(a.type_id(), core::any::TypeId::of::<i32>());

    a.set(String::from("f00"));
    assert_eq!(a.type_info(), TypeInfo::of::<String>());
    assert_eq!(a.type_info().name(), core::any::type_name::<String>());
}

#[test]
fn test_zero_sized() {
    let a = StaticAny::<0>::from_value(());
    assert!(a.has::<()>());
    assert_eq!(a.size(), 0);
    assert_eq!(a.get::<()>(), Ok(&()));
}

#[test]
fn test_store_by_value_does_not_clone() {
    let log = Log::default();
    let a = StaticAny::<32>::from_value(Tracked::new("a", &log));

    assert_eq!(take_log(&log), ["new a"]);

    drop(a);
    assert_eq!(take_log(&log), ["drop a"]);
}

#[test]
fn test_store_clone_of_value() {
    let log = Log::default();
    let t = Tracked::new("a", &log);
    take_log(&log);

    let a = StaticAny::<32>::from_value(t.clone());
    assert_eq!(take_log(&log), ["clone a"]);

    drop(t);
    assert_eq!(take_log(&log), ["drop a"]);
    assert!(a.has::<Tracked>());
}

#[test]
fn test_drop_once() {
    let log = Log::default();
    {
        let _a = StaticAny::<32>::from_value(Tracked::new("a", &log));
    }
    assert_eq!(take_log(&log), ["new a", "drop a"]);
}

#[test]
fn test_reset_drops_once() {
    let log = Log::default();
    let mut a = StaticAny::<32>::from_value(Tracked::new("a", &log));
    take_log(&log);

    a.reset();
    assert_eq!(take_log(&log), ["drop a"]);

    a.reset();
    drop(a);
    assert!(take_log(&log).is_empty());
}

#[test]
fn test_set_drops_old_value() {
    let log = Log::default();
    let mut a = StaticAny::<32>::from_value(Tracked::new("a", &log));
    let b = Tracked::new("b", &log);
    take_log(&log);

    a.set(b);
    assert_eq!(take_log(&log), ["drop a"]);

    a.set(7i32);
    assert_eq!(take_log(&log), ["drop b"]);
    assert_eq!(a.get::<i32>(), Ok(&7));
}

#[test]
fn test_emplace_drops_before_construct() {
    let log = Log::default();
    let mut a = StaticAny::<32>::from_value(Tracked::new("a", &log));
    take_log(&log);

    a.emplace(|| Tracked::new("b", &log));
    assert_eq!(take_log(&log), ["drop a", "new b"]);

    drop(a);
    assert_eq!(take_log(&log), ["drop b"]);
}

#[test]
fn test_emplace() {
    let mut a = StaticAny::<32>::new();
    a.emplace_default::<InitCtor>();
    assert_eq!(a.get::<InitCtor>(), Ok(&InitCtor { x: 0, y: 0 }));

    let v = a.emplace(|| InitCtor { x: 77, y: 88 });
    v.y += 1;
    assert_eq!(a.get::<InitCtor>(), Ok(&InitCtor { x: 77, y: 89 }));
}

#[test]
fn test_clone_container() {
    let log = Log::default();
    let a = StaticAny::<32>::from_value(Tracked::new("a", &log));
    take_log(&log);

    let b = a.clone();
    assert_eq!(take_log(&log), ["clone a"]);
    assert!(b.has::<Tracked>());

    drop(a);
    assert_eq!(take_log(&log), ["drop a"]);
    assert_eq!(b.get::<Tracked>().unwrap().name, "a");

    drop(b);
    assert_eq!(take_log(&log), ["drop a"]);
}

#[test]
fn test_clone_is_independent() {
    let mut a = StaticAny::<32>::from_value(vec![1, 2, 3]);
    let b = a.clone();

    a.get_mut::<Vec<i32>>().unwrap().push(4);
    assert_eq!(b.get::<Vec<i32>>().unwrap(), &[1, 2, 3]);

    a.reset();
    assert_eq!(b.get::<Vec<i32>>().unwrap(), &[1, 2, 3]);
}

#[test]
fn test_clone_empty() {
    let a = StaticAny::<16>::new();
    let b = a.clone();

    assert!(a.is_empty());
    assert!(b.is_empty());
}

#[test]
fn test_clone_from_drops_before_clone() {
    let log = Log::default();
    let a = StaticAny::<32>::from_value(Tracked::new("a", &log));
    let mut b = StaticAny::<32>::from_value(Tracked::new("b", &log));
    take_log(&log);

    b.clone_from(&a);
    assert_eq!(take_log(&log), ["drop b", "clone a"]);
    assert_eq!(b.get::<Tracked>().unwrap().name, "a");
}

#[test]
fn test_move_container() {
    let log = Log::default();
    let a = StaticAny::<32>::from_value(Tracked::new("a", &log));
    take_log(&log);

    let b = a;
    assert!(take_log(&log).is_empty());
    assert!(b.has::<Tracked>());

    drop(b);
    assert_eq!(take_log(&log), ["drop a"]);
}

#[test]
fn test_any_to_bigger_any() {
    let a = StaticAny::<16>::from_value(1i32);
    let mut b = StaticAny::<32>::from_value(2i32);

    b.try_assign_from(&a).unwrap();
    assert_eq!(b.get::<i32>(), Ok(&1));
    assert_eq!(a.get::<i32>(), Ok(&1));

    let c = StaticAny::<32>::try_clone_from_any(&a).unwrap();
    assert_eq!(c.get::<i32>(), Ok(&1));
}

#[test]
fn test_any_to_smaller_any_when_value_fits() {
    let a = StaticAny::<32>::from_value(5u16);

    let b = StaticAny::<8>::try_clone_from_any(&a).unwrap();
    assert_eq!(b.get::<u16>(), Ok(&5));

    let c = StaticAny::<2>::try_from_any(a).unwrap();
    assert_eq!(c.get::<u16>(), Ok(&5));
}

#[test]
fn test_any_to_smaller_any_rejected() {
    let a = StaticAny::<32>::from_value(String::from("hello"));

    let err = StaticAny::<8>::try_clone_from_any(&a).unwrap_err();
    assert_eq!(err.stored_type(), TypeInfo::of::<String>());
    assert_eq!(err.size(), size_of::<String>());
    assert_eq!(err.capacity(), 8);

    let mut b = StaticAny::<8>::from_value(3i32);
    assert_eq!(b.try_assign_from(&a), Err(err));
    assert_eq!(b.get::<i32>(), Ok(&3));

    let a = b.try_assign_from_any(a).unwrap_err();
    assert_eq!(b.get::<i32>(), Ok(&3));
    assert_eq!(a.get::<String>().unwrap(), "hello");

    let a = StaticAny::<8>::try_from_any(a).unwrap_err();
    assert_eq!(a.get::<String>().unwrap(), "hello");
}

#[test]
fn test_cross_capacity_move_does_not_clone() {
    let log = Log::default();
    let a = StaticAny::<64>::from_value(Tracked::new("a", &log));
    let mut b = StaticAny::<32>::from_value(Tracked::new("b", &log));
    take_log(&log);

    b.try_assign_from_any(a).unwrap();
    assert_eq!(take_log(&log), ["drop b"]);
    assert_eq!(b.get::<Tracked>().unwrap().name, "a");

    drop(b);
    assert_eq!(take_log(&log), ["drop a"]);
}

#[test]
fn test_cross_capacity_empty() {
    let a = StaticAny::<64>::new();
    let b = StaticAny::<1>::try_clone_from_any(&a).unwrap();
    assert!(b.is_empty());

    let mut c = StaticAny::<16>::from_value(1u8);
    c.try_assign_from(&a).unwrap();
    assert!(c.is_empty());
}

#[test]
fn test_get_bad_type() {
    let a = StaticAny::<16>::from_value(7i32);
    let err = a.get::<f64>().unwrap_err();

    assert_eq!(err.stored_type(), TypeInfo::of::<i32>());
    assert_eq!(err.target_type(), TypeInfo::of::<f64>());
}

#[test]
fn test_get_empty() {
    let a = StaticAny::<16>::new();
    let err = a.get::<f64>().unwrap_err();

    assert!(err.stored_type().is_empty());
    assert_eq!(err.target_type(), TypeInfo::of::<f64>());
}

#[test]
fn test_bad_cast_message() {
    let a = StaticAny::<16>::from_value(7i32);
    let err: BadAnyCast = any_cast::<f32, 16>(&a).unwrap_err();

    assert_eq!(
        err.to_string(),
        "failed conversion using any_cast: stored type i32, trying to cast to f32"
    );
}

#[test]
fn test_mutable_get() {
    let mut a = StaticAny::<16>::from_value(7i32);
    *a.get_mut::<i32>().unwrap() = 6;

    let r = &a;
    assert_eq!(r.get::<i32>(), Ok(&6));
}

#[test]
fn test_any_cast() {
    let mut a = StaticAny::<16>::from_value(7i32);

    assert_eq!(try_any_cast::<i32, 16>(&a), Some(&7));
    assert_eq!(try_any_cast::<f32, 16>(&a), None);
    assert_eq!(any_cast::<i32, 16>(&a), Ok(&7));
    assert!(any_cast::<f32, 16>(&a).is_err());

    *try_any_cast_mut::<i32, 16>(&mut a).unwrap() += 1;
    assert_eq!(try_any_cast_mut::<u8, 16>(&mut a), None);
    *any_cast_mut::<i32, 16>(&mut a).unwrap() += 1;
    assert!(any_cast_mut::<u8, 16>(&mut a).is_err());

    assert_eq!(a.get::<i32>(), Ok(&9));
}

#[test]
fn test_cast_empty() {
    let mut a = StaticAny::<16>::new();
    assert_eq!(try_any_cast::<i32, 16>(&a), None);
    assert!(any_cast::<i32, 16>(&a).is_err());
    assert!(any_cast_mut::<i32, 16>(&mut a).is_err());
}

#[test]
fn test_take() {
    let log = Log::default();
    let mut a = StaticAny::<32>::from_value(Tracked::new("a", &log));
    take_log(&log);

    assert!(a.take::<i32>().is_none());
    assert!(a.has::<Tracked>());

    let t = a.take::<Tracked>().unwrap();
    assert!(a.is_empty());
    assert!(take_log(&log).is_empty());

    drop(a);
    assert!(take_log(&log).is_empty());

    drop(t);
    assert_eq!(take_log(&log), ["drop a"]);
}

#[test]
fn test_downcast() {
    let mut a = StaticAny::<16>::from_value(42u32);

    a = match a.downcast::<u64>() {
        Ok(_) => panic!("expected downcast to fail"),
        Err(a) => a,
    };

    match a.downcast::<u32>() {
        Ok(v) => assert_eq!(v, 42),
        Err(_) => panic!("expected downcast to succeed"),
    }
}

#[test]
fn test_clone_panic_leaves_empty() {
    let mut a = StaticAny::<16>::new();
    a.emplace(|| UnsafeClone(42));

    let mut b = StaticAny::<16>::from_value(1234i32);
    let result = catch_unwind(AssertUnwindSafe(|| b.clone_from(&a)));

    assert!(result.is_err());
    assert!(b.is_empty());
    assert_eq!(a.get::<UnsafeClone>(), Ok(&UnsafeClone(42)));
}

#[test]
fn test_cross_capacity_clone_panic_leaves_empty() {
    let a = StaticAny::<8>::from_value(UnsafeClone(42));

    let mut b = StaticAny::<16>::from_value(1234i32);
    let result = catch_unwind(AssertUnwindSafe(|| b.try_assign_from(&a)));

    assert!(result.is_err());
    assert!(b.is_empty());
}

#[test]
fn test_emplace_panic_leaves_empty() {
    let mut a = StaticAny::<16>::from_value(1234i32);
    let result = catch_unwind(AssertUnwindSafe(|| {
        a.emplace::<i32, _>(|| panic!("constructor failed"));
    }));

    assert!(result.is_err());
    assert!(a.is_empty());
}

#[test]
fn test_debug() {
    let a = StaticAny::<16>::from_value(1u8);
    assert_eq!(format!("{a:?}"), "StaticAny { type: \"u8\", capacity: 16 }");

    let t = TrivialAny::<16>::new();
    assert_eq!(format!("{t:?}"), "TrivialAny { capacity: 16, .. }");
}

#[test]
fn test_trivial_simple() {
    let a = TrivialAny::<16>::from_value(7i32);
    assert_eq!(unsafe { *a.get::<i32>() }, 7);
    assert_eq!(a.capacity(), 16);
}

#[test]
fn test_trivial_round_trip_is_bit_identical() {
    #[derive(Clone, Copy)]
    struct Point {
        x: f32,
        y: f64,
    }

    let mut a = TrivialAny::<16>::new();
    a.set(Point { x: -0.0, y: f64::NAN });

    let p = unsafe { *a.get::<Point>() };
    assert_eq!(p.x.to_bits(), (-0.0f32).to_bits());
    assert_eq!(p.y.to_bits(), f64::NAN.to_bits());

    let copy = a;
    unsafe {
        a.get_mut::<Point>().x = 1.0;
    }
    assert_eq!(unsafe { copy.get::<Point>() }.x.to_bits(), (-0.0f32).to_bits());
    assert_eq!(unsafe { a.get::<Point>() }.x.to_bits(), 1.0f32.to_bits());

    a.set(u64::MAX);
    assert_eq!(unsafe { *a.get::<u64>() }, u64::MAX);
}

mod traits {
    use super::*;
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    assert_not_impl_any!(StaticAny<16>: Send, Sync, Copy);
    assert_impl_all!(StaticAny<16>: Clone, Default, core::fmt::Debug);
    assert_not_impl_any!(TrivialAny<16>: Send, Sync);
    assert_impl_all!(TrivialAny<16>: Copy, Clone, Default, core::fmt::Debug);
    assert_impl_all!(BadAnyCast: core::error::Error, Copy, Send, Sync);
    assert_impl_all!(crate::CapacityError: core::error::Error, Copy, Send, Sync);
    assert_impl_all!(TypeInfo: Copy, Eq, core::hash::Hash, core::fmt::Display);
}
