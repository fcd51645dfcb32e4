// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! The Tock `Cell` types.
//!
//! Capsules are shared through `&` references, so every piece of mutable state
//! they hold lives in one of these cells. None of them can panic: an access
//! to a value that is currently taken simply yields `None`.
//!
//! To use `TakeCell`, for example, users should use:
//!
//!     use kernel::utilities::cells::TakeCell;

use core::cell::Cell;

/// `OptionalCell` is a `Cell` that wraps an `Option`, for `Copy` values such
/// as client references.
pub struct OptionalCell<T: Copy> {
    value: Cell<Option<T>>,
}

impl<T: Copy> OptionalCell<T> {
    /// Create a new OptionalCell.
    pub const fn new(val: T) -> OptionalCell<T> {
        OptionalCell {
            value: Cell::new(Some(val)),
        }
    }

    /// Create an empty `OptionalCell` (contains just `None`).
    pub const fn empty() -> OptionalCell<T> {
        OptionalCell {
            value: Cell::new(None),
        }
    }

    /// Update the stored value.
    pub fn set(&self, val: T) {
        self.value.set(Some(val));
    }

    /// Insert the value of the supplied `Option`, or clear the cell if it is
    /// `None`.
    pub fn insert(&self, opt: Option<T>) {
        self.value.set(opt);
    }

    /// Replace the contents with the supplied value, returning the previous
    /// contents.
    pub fn replace(&self, val: T) -> Option<T> {
        self.value.replace(Some(val))
    }

    /// Reset the stored value to `None`.
    pub fn clear(&self) {
        self.value.set(None);
    }

    pub fn is_some(&self) -> bool {
        self.value.get().is_some()
    }

    pub fn is_none(&self) -> bool {
        self.value.get().is_none()
    }

    /// Return a copy of the contained `Option`.
    pub fn get(&self) -> Option<T> {
        self.value.get()
    }

    /// Take the value out, leaving the cell empty.
    pub fn take(&self) -> Option<T> {
        self.value.take()
    }

    pub fn unwrap_or(&self, default: T) -> T {
        self.value.get().unwrap_or(default)
    }

    /// Call `closure` on a copy of the value if there is one.
    pub fn map<F, R>(&self, closure: F) -> Option<R>
    where
        F: FnOnce(T) -> R,
    {
        self.value.get().map(closure)
    }

    pub fn map_or<F, R>(&self, default: R, closure: F) -> R
    where
        F: FnOnce(T) -> R,
    {
        self.value.get().map_or(default, closure)
    }
}

/// A shared reference to a mutable reference.
///
/// A `TakeCell` wraps a reference to mutable memory (usually a buffer) that may
/// or may not be available at a given point. Clients either move the
/// reference out of the cell or operate on it within a closure.
pub struct TakeCell<'a, T: 'a + ?Sized> {
    val: Cell<Option<&'a mut T>>,
}

impl<'a, T: ?Sized> TakeCell<'a, T> {
    pub const fn empty() -> TakeCell<'a, T> {
        TakeCell {
            val: Cell::new(None),
        }
    }

    /// Creates a new `TakeCell` containing `value`
    pub const fn new(value: &'a mut T) -> TakeCell<'a, T> {
        TakeCell {
            val: Cell::new(Some(value)),
        }
    }

    pub fn is_none(&self) -> bool {
        let inner = self.take();
        let none = inner.is_none();
        self.val.set(inner);
        none
    }

    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Takes the mutable reference out of the `TakeCell` leaving a `None` in
    /// its place.
    pub fn take(&self) -> Option<&'a mut T> {
        self.val.replace(None)
    }

    /// Replaces the contents of the `TakeCell` with `val`, returning the
    /// previous contents.
    pub fn replace(&self, val: &'a mut T) -> Option<&'a mut T> {
        self.val.replace(Some(val))
    }

    /// Borrow the contents for the duration of `closure` if they are not
    /// taken. The cell holds the same reference afterwards.
    pub fn map<F, R>(&self, closure: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.take().map(|val| {
            let res = closure(&mut *val);
            self.replace(val);
            res
        })
    }

    pub fn map_or<F, R>(&self, default: R, closure: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        self.map(closure).unwrap_or(default)
    }
}

/// A mutable memory location that enforces borrow rules at runtime without
/// possible panics.
///
/// Think of a `MapCell` as an `Option` wrapped in a `RefCell`: a borrow that
/// would conflict returns `None` instead of panicking.
pub struct MapCell<T> {
    val: Cell<Option<T>>,
}

impl<T> MapCell<T> {
    pub const fn empty() -> MapCell<T> {
        MapCell {
            val: Cell::new(None),
        }
    }

    /// Creates a new `MapCell` containing `value`
    pub const fn new(value: T) -> MapCell<T> {
        MapCell {
            val: Cell::new(Some(value)),
        }
    }

    pub fn is_some(&self) -> bool {
        let inner = self.val.take();
        let some = inner.is_some();
        self.val.set(inner);
        some
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }

    pub fn take(&self) -> Option<T> {
        self.val.take()
    }

    pub fn put(&self, val: T) {
        self.val.set(Some(val));
    }

    pub fn replace(&self, val: T) -> Option<T> {
        self.val.replace(Some(val))
    }

    /// Borrow the contents for the duration of `closure`. While the closure
    /// runs the cell is empty, so a nested `map` returns `None`.
    pub fn map<F, R>(&self, closure: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.val.take().map(|mut val| {
            let res = closure(&mut val);
            self.val.set(Some(val));
            res
        })
    }

    pub fn map_or<F, R>(&self, default: R, closure: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        self.map(closure).unwrap_or(default)
    }
}
