// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interfaces for GPIO pins.

/// Enum for configuring any pull-up or pull-down resistors on the GPIO pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatingState {
    PullUp,
    PullDown,
    PullNone,
}

/// Enum for selecting which edge to trigger interrupts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterruptEdge {
    RisingEdge,
    FallingEdge,
    EitherEdge,
}

/// Enum for which state the pin is in. `Function` means the pin has been
/// configured to a special function, which is outside the scope of the HIL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Configuration {
    LowPower,
    Input,
    Output,
    InputOutput,
    Function,
    Other,
}

/// The Pin trait allows a pin to be used as either input or output and to be
/// configured.
pub trait Pin: Input + Output + Configure {}

/// The InterruptPin trait allows a pin to be used as either input or output
/// and also to source interrupts.
pub trait InterruptPin<'a>: Pin + Interrupt<'a> {}

impl<T: Input + Output + Configure> Pin for T {}
impl<'a, T: Pin + Interrupt<'a>> InterruptPin<'a> for T {}

pub trait Configure {
    fn configuration(&self) -> Configuration;
    fn make_output(&self) -> Configuration;
    fn disable_output(&self) -> Configuration;
    fn make_input(&self) -> Configuration;
    fn disable_input(&self) -> Configuration;

    /// Disable the pin and put it into its lowest power state. Re-enabling
    /// the pin requires reconfiguring it.
    fn deactivate_to_low_power(&self);

    fn set_floating_state(&self, state: FloatingState);
    fn floating_state(&self) -> FloatingState;
}

pub trait Output {
    /// Set the GPIO pin high. If the pin is not an output or input/output,
    /// this call is ignored.
    fn set(&self);

    /// Set the GPIO pin low. If the pin is not an output or input/output,
    /// this call is ignored.
    fn clear(&self);

    /// Toggle the GPIO pin and return its new value.
    fn toggle(&self) -> bool;
}

pub trait Input {
    /// Get the current state of an input GPIO pin. For an output pin, return
    /// the output; for an input pin, return the input; for disabled or
    /// function pins the value is undefined.
    fn read(&self) -> bool;
}

pub trait Interrupt<'a>: Input {
    /// Set the client for interrupt events.
    fn set_client(&self, client: &'a dyn Client);

    /// Enable an interrupt on the GPIO pin. This does not configure the pin
    /// except to enable an interrupt: it should be separately configured as
    /// an input, etc.
    fn enable_interrupts(&self, mode: InterruptEdge);

    /// Disable interrupts for the GPIO pin.
    fn disable_interrupts(&self);

    /// Return whether this interrupt is pending
    fn is_pending(&self) -> bool;
}

/// Interface for users of synchronous GPIO interrupts. In order to receive
/// interrupts, the user must implement this `Client` interface.
pub trait Client {
    /// Called when an interrupt occurs.
    fn fired(&self);
}
