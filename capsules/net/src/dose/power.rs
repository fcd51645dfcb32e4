// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Low power states of a DOSE link.
//!
//! `Standby` drives the standby pin so the transceiver stops listening to
//! the bus, `Sleep` additionally stops UART reception. Both are entered
//! from `Idle` only: a request made while a frame is being sent or received
//! is held and applied when the link next settles in `Idle`. Sending from
//! `Standby` holds a request for `Standby` once the frame is done.

use kernel::hil::ethernet::PowerState;
use kernel::hil::gpio::Output;
use kernel::hil::time::Alarm;
use kernel::hil::uart::Receive;
use kernel::{debug, ErrorCode};

use super::driver::Dose;
use super::{Signal, State};

impl<'a, A: Alarm<'a>> Dose<'a, A> {
    pub(super) fn power_state(&self) -> PowerState {
        match self.state.get() {
            State::Init => PowerState::Off,
            State::Standby => PowerState::Standby,
            State::Sleep => PowerState::Sleep,
            State::Idle | State::Blocked | State::Recv | State::Send => PowerState::Idle,
        }
    }

    /// Move the link to `target`. Requesting the current state does nothing.
    pub(super) fn request_power(&self, target: PowerState) -> Result<(), ErrorCode> {
        if target == PowerState::Off {
            return Err(ErrorCode::INVAL);
        }
        let state = self.state.get();
        match state {
            State::Init => Err(ErrorCode::OFF),
            State::Idle | State::Standby | State::Sleep if !self.send_pending() => {
                self.power_request.clear();
                self.apply_power(target);
                Ok(())
            }
            _ => {
                if target == PowerState::Idle {
                    self.power_request.clear();
                    self.standby_after_send.set(false);
                } else {
                    self.power_request.set(target);
                }
                Ok(())
            }
        }
    }

    /// Switch to `target` from `Idle` or a low power state.
    pub(super) fn apply_power(&self, target: PowerState) {
        let current = self.power_state();
        if current == target {
            return;
        }
        if current != PowerState::Idle {
            self.dispatch(Signal::Init);
        }
        match target {
            PowerState::Standby | PowerState::Sleep => self.enter_low_power(target),
            PowerState::Idle | PowerState::Off => {}
        }
    }

    fn enter_low_power(&self, target: PowerState) {
        self.disable_sense();
        self.watchdog.disarm();
        if let Some(pin) = self.standby {
            pin.set();
        }
        if target == PowerState::Sleep {
            match self.uart.receive_abort() {
                Ok(()) => self.rx_listening.set(false),
                // Still listening until the cancelled word is reported.
                Err(ErrorCode::BUSY) => {}
                Err(e) => {
                    debug!("dose: UART receive abort failed: {:?}", e);
                    self.rx_listening.set(false);
                }
            }
            self.state.set(State::Sleep);
        } else {
            self.state.set(State::Standby);
        }
    }

    /// `Standby` or `Sleep` + `Init`.
    pub(super) fn wake(&self) -> Option<Signal> {
        if let Some(pin) = self.standby {
            pin.clear();
        }
        if self.start_listening().is_err() {
            debug!("dose: could not restart UART reception");
        }
        self.enter_idle()
    }
}
