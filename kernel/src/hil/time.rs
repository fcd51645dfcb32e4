// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Hardware agnostic interfaces for time and timers within the Tock kernel.
//!
//! These traits are designed to be able to represent several different
//! timers. The base of the hierarchy is [`Time`], which represents a free
//! running counter of [`Ticks`] at a known [`Frequency`]. An [`Alarm`] adds a
//! single one-shot deadline on top of that counter.

use crate::ErrorCode;
use core::cmp::Ordering;
use core::fmt;

/// An integer type defining the width of a time value, which allows clients
/// to know when wraparound will occur.
pub trait Ticks: Clone + Copy + From<u32> + fmt::Debug + Ord + PartialOrd + Eq {
    /// Width of the actual underlying timer in bits.
    fn width() -> u32;

    /// Converts the type into a `usize`, stripping the higher bits if it is
    /// larger than `usize` and filling the higher bits with 0 if it is
    /// smaller than `usize`.
    fn into_usize(self) -> usize;

    /// Converts the type into a `u32`, stripping the higher bits if it is
    /// larger than `u32` and filling the higher bits with 0 if it is smaller
    /// than `u32`.
    fn into_u32(self) -> u32;

    fn into_u64(self) -> u64;

    /// Add two values, wrapping around on overflow using standard unsigned
    /// arithmetic.
    fn wrapping_add(self, other: Self) -> Self;

    /// Subtract two values, wrapping around on underflow using standard
    /// unsigned arithmetic.
    fn wrapping_sub(self, other: Self) -> Self;

    /// Returns whether the value is in the range of [`start`, `end`) using
    /// unsigned arithmetic and considering wraparound.
    fn within_range(self, start: Self, end: Self) -> bool;

    /// Returns the maximum value of this type, which should be (2^width)-1.
    fn max_value() -> Self;

    /// Converts a u64 into the type, saturating at `max_value`.
    fn from_or_max(val: u64) -> Self;
}

/// Represents a clock's frequency in Hz, allowing code to transform between
/// computer time units and wall clock time.
pub trait Frequency {
    /// Returns frequency in Hz.
    fn frequency() -> u32;
}

/// Represents a moment in time, obtained by calling `now`.
pub trait Time {
    /// The number of ticks per second
    type Frequency: Frequency;
    /// The width of a time value
    type Ticks: Ticks;

    /// Returns a timestamp. Depending on the implementation of Time, this
    /// could represent either a static timestamp or a sample of a counter;
    /// if an implementation relies on it being constant or changing it
    /// should use `Timestamp` or `Counter`.
    fn now(&self) -> Self::Ticks;
}

/// Conversions between wall clock units and [`Ticks`] of a [`Time`]
/// implementation.
pub trait ConvertTicks<T: Ticks> {
    /// Returns the number of ticks in the provided number of microseconds,
    /// saturating at the maximum tick value.
    fn ticks_from_us(&self, us: u32) -> T;

    /// Returns the number of ticks in the provided number of milliseconds,
    /// saturating at the maximum tick value.
    fn ticks_from_ms(&self, ms: u32) -> T;

    /// Returns the number of microseconds in the provided number of ticks,
    /// rounded down.
    fn ticks_to_us(&self, tick: T) -> u32;
}

impl<T: Time + ?Sized> ConvertTicks<<T as Time>::Ticks> for T {
    fn ticks_from_us(&self, us: u32) -> <T as Time>::Ticks {
        let freq = <T::Frequency>::frequency() as u64;
        <T as Time>::Ticks::from_or_max(us as u64 * freq / 1_000_000)
    }

    fn ticks_from_ms(&self, ms: u32) -> <T as Time>::Ticks {
        let freq = <T::Frequency>::frequency() as u64;
        <T as Time>::Ticks::from_or_max(ms as u64 * freq / 1_000)
    }

    fn ticks_to_us(&self, tick: <T as Time>::Ticks) -> u32 {
        let freq = <T::Frequency>::frequency() as u64;
        (tick.into_u64() * 1_000_000 / freq) as u32
    }
}

/// Callback handler for when an Alarm fires (a `Counter` reaches a specific
/// value).
pub trait AlarmClient {
    /// Callback indicating the alarm time has been reached. The alarm MUST
    /// be disabled when this is called. If a new alarm is needed, the client
    /// can call `Alarm::set_alarm`.
    fn alarm(&self);
}

/// Interface for receiving notification when a particular time (`Counter`
/// value) is reached.
///
/// Clients use the [`AlarmClient`] trait to signal when the counter has
/// reached a pre-specified value set in [`set_alarm`](Alarm::set_alarm).
/// Alarms are one-shot: the alarm is disarmed before the client is called.
pub trait Alarm<'a>: Time {
    /// Specify the callback for when the counter reaches the alarm value.
    fn set_alarm_client(&self, client: &'a dyn AlarmClient);

    /// Specify when the callback should be called and enable it. The
    /// callback will be enqueued when `Time::now() == reference + dt`. The
    /// callback itself may not run exactly at this time, due to delays.
    /// However, it it assured to execute *after* `reference + dt`: it can be
    /// delayed but will never fire early. Any previously armed alarm is
    /// replaced.
    fn set_alarm(&self, reference: Self::Ticks, dt: Self::Ticks);

    /// Return the current alarm value. This is undefined at boot and
    /// otherwise returns `now + dt` from the last call to `set_alarm`.
    fn get_alarm(&self) -> Self::Ticks;

    /// Disable the alarm and stop it from firing in the future.
    ///
    /// Valid `Result<(), ErrorCode>` codes are:
    ///   - `Ok(())` no callback will be called
    ///   - `Err(ErrorCode::FAIL)` the alarm could not be disarmed and a
    ///     callback will still be delivered
    fn disarm(&self) -> Result<(), ErrorCode>;

    /// Returns whether the alarm is currently armed. Note that this does not
    /// reliably indicate whether there will be a future callback: it is
    /// possible that the alarm has triggered (and disarmed) and a callback
    /// is pending and has not been called yet.
    fn is_armed(&self) -> bool;

    /// Return the minimum dt value that is supported. Any dt smaller than
    /// this will automatically be increased to this minimum value.
    fn minimum_dt(&self) -> Self::Ticks;
}

/// 1MHz `Frequency`
#[derive(Debug)]
pub struct Freq1MHz;
impl Frequency for Freq1MHz {
    fn frequency() -> u32 {
        1_000_000
    }
}

/// 32.768KHz `Frequency`
#[derive(Debug)]
pub struct Freq32KHz;
impl Frequency for Freq32KHz {
    fn frequency() -> u32 {
        32768
    }
}

/// 1KHz `Frequency`
#[derive(Debug)]
pub struct Freq1KHz;
impl Frequency for Freq1KHz {
    fn frequency() -> u32 {
        1000
    }
}

/// u32 `Ticks`
#[derive(Clone, Copy, Debug)]
pub struct Ticks32(u32);

impl From<u32> for Ticks32 {
    fn from(val: u32) -> Self {
        Ticks32(val)
    }
}

impl Ticks for Ticks32 {
    fn width() -> u32 {
        32
    }

    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn into_u32(self) -> u32 {
        self.0
    }

    fn into_u64(self) -> u64 {
        self.0 as u64
    }

    fn wrapping_add(self, other: Self) -> Self {
        Ticks32(self.0.wrapping_add(other.0))
    }

    fn wrapping_sub(self, other: Self) -> Self {
        Ticks32(self.0.wrapping_sub(other.0))
    }

    fn within_range(self, start: Self, end: Self) -> bool {
        self.wrapping_sub(start).0 < end.wrapping_sub(start).0
    }

    /// Returns the maximum value of this type, which should be (2^width)-1.
    fn max_value() -> Self {
        Ticks32(0xFFFFFFFF)
    }

    fn from_or_max(val: u64) -> Self {
        if val < Self::max_value().0 as u64 {
            Ticks32(val as u32)
        } else {
            Self::max_value()
        }
    }
}

impl PartialOrd for Ticks32 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ticks32 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialEq for Ticks32 {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Ticks32 {}

#[cfg(test)]
mod test {
    use super::*;

    struct Clock1MHz;

    impl Time for Clock1MHz {
        type Frequency = Freq1MHz;
        type Ticks = Ticks32;

        fn now(&self) -> Ticks32 {
            Ticks32::from(0)
        }
    }

    struct Clock32KHz;

    impl Time for Clock32KHz {
        type Frequency = Freq32KHz;
        type Ticks = Ticks32;

        fn now(&self) -> Ticks32 {
            Ticks32::from(0)
        }
    }

    #[test]
    fn convert_ticks() {
        assert_eq!(Clock1MHz.ticks_from_us(4340).into_u32(), 4340);
        assert_eq!(Clock1MHz.ticks_from_ms(3).into_u32(), 3000);
        assert_eq!(Clock32KHz.ticks_from_ms(1000).into_u32(), 32768);
        assert_eq!(Clock32KHz.ticks_to_us(Ticks32::from(32768)), 1_000_000);
    }

    #[test]
    fn range_wraps() {
        let start = Ticks32::from(0xFFFF_FFF0);
        let end = start.wrapping_add(Ticks32::from(0x20));
        assert!(Ticks32::from(5).within_range(start, end));
        assert!(!Ticks32::from(0x20).within_range(start, end));
        assert_eq!(Ticks32::from_or_max(u64::MAX), Ticks32::max_value());
    }
}
