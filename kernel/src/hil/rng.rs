// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interfaces for accessing a random number generator.
//!
//! The HIL exposes a synchronous, low-entropy source suited to jitter and
//! backoff computations. It is not meant for key material.

/// A source of uniformly distributed 32-bit values.
pub trait Random<'a> {
    /// Return the next value.
    fn random(&self) -> u32;

    /// Mix `seed` into the generator state.
    fn reseed(&self, seed: u32);
}
