// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Core Tock Kernel
//!
//! The kernel crate holds the shared code that capsules, chips and boards
//! build on: the standard [`ErrorCode`], the compile-time [`config`], the
//! `debug!` output path, the cell types capsules use for interior
//! mutability, kernel collections, and the Hardware Interface Layer (HIL)
//! definitions.
//!
//! Most `unsafe` code is in this kernel crate.

#![warn(unreachable_pub)]
#![no_std]

pub mod collections;
pub mod config;
#[macro_use]
pub mod debug;
pub mod errorcode;
pub mod hil;
pub mod utilities;

pub use crate::errorcode::ErrorCode;
