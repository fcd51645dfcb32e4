// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Data structure for storing compile-time configuration options in the kernel.
//!
//! The rationale for configuration based on a `const` object is twofold.
//!
//! - In theory, Cargo features could be used for boolean-based configuration.
//!   However, these features are generally error-prone for non-trivial use
//!   cases. Code gated by a non-enabled feature isn't even type-checked by the
//!   compiler, and therefore we can end up with broken features due to
//!   refactoring code.
//!
//! - Cargo features can only contain bits. A constant value can contain
//!   arbitrary types, which allow configuration based on integers, strings,
//!   or even more complex values.
//!
//! With a typed `const` configuration, all code paths are type-checked by the
//! compiler, even those that end up disabled. After type-checking, the compiler
//! folds the constants, so a boolean condition used in an `if` block has no
//! cost in the resulting binary.

/// Data structure holding compile-time configuration options.
///
/// To change the configuration, modify the relevant values in the `CONFIG`
/// constant object defined at the end of this file.
pub struct Config {
    /// Whether link-layer capsules should trace their state machines to the
    /// debug output.
    ///
    /// If enabled, every signal dispatched to a link state machine is printed
    /// together with the state it moved from and to, as well as collisions,
    /// watchdog expiries and dropped frames.
    pub trace_link_signals: bool,
}

/// A unique instance of `Config` where compile-time configuration options are
/// defined. Notably, this is the only location in the kernel where we permit
/// `#[cfg(x)]` to be used to configure code based on Cargo features.
pub const CONFIG: Config = Config {
    trace_link_signals: cfg!(feature = "trace_link_signals"),
};
