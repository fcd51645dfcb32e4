// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Per link timeout.
//!
//! One one-shot alarm per link bounds every wait of the state machine: the
//! echo of a transmitted octet, the next octet of a frame being received,
//! and the backoff before a transmission. It is re-armed on every octet, so
//! its granularity is one alarm tick and it fires after `timeout_base` of
//! silence.

use core::cell::Cell;

use kernel::hil::time::{Alarm, ConvertTicks, Ticks};

/// Backoff before a transmission attempt, in ticks.
///
/// The first attempt waits a uniformly distributed time in
/// `[0, 2 * base)`. A retry after a collision waits one extra `base`, so
/// the receive watchdog of every peer has expired and dropped the partial
/// frame before the retry starts.
pub fn backoff_ticks(base: u32, random: u32, retry: bool) -> u32 {
    let range = 2 * base as u64;
    let jitter = (random as u64 * range) >> 32;
    let extra = if retry { base as u64 } else { 0 };
    (jitter + extra).min(u32::MAX as u64) as u32
}

pub struct Watchdog<'a, A: Alarm<'a>> {
    alarm: &'a A,
    base: Cell<u32>,
}

impl<'a, A: Alarm<'a>> Watchdog<'a, A> {
    pub fn new(alarm: &'a A) -> Watchdog<'a, A> {
        Watchdog {
            alarm,
            base: Cell::new(1),
        }
    }

    /// Set `timeout_base` from a duration in microseconds. It is never
    /// shorter than one tick.
    pub fn set_timeout_us(&self, us: u32) {
        let ticks = self.alarm.ticks_from_us(us).into_u32();
        self.base.set(ticks.max(1));
    }

    /// `timeout_base` in ticks.
    pub fn base(&self) -> u32 {
        self.base.get()
    }

    /// Fire after `timeout_base`, replacing any pending expiry.
    pub fn arm(&self) {
        self.arm_for(self.base.get());
    }

    /// Fire after a randomized backoff, see [`backoff_ticks`].
    pub fn arm_backoff(&self, random: u32, retry: bool) {
        self.arm_for(backoff_ticks(self.base.get(), random, retry));
    }

    fn arm_for(&self, ticks: u32) {
        self.alarm.set_alarm(self.alarm.now(), A::Ticks::from(ticks));
    }

    pub fn disarm(&self) {
        // A failed disarm leaves one expiry in flight. Idle ignores it.
        let _ = self.alarm.disarm();
    }
}
