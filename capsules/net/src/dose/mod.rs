// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Differentially Operated Serial Ethernet (DOSE).
//!
//! DOSE carries Ethernet frames over a UART whose TX and RX lines are
//! connected to a CAN transceiver, so that every node shares one
//! differential bus. The bus is half duplex and every node hears its own
//! transmissions. The driver uses that echo to detect collisions: each octet
//! is sent on its own and compared against what comes back before the next
//! one goes out. A mismatch aborts the frame, which is retried from its first
//! byte after a randomized backoff.
//!
//! Frames are delimited and escaped as described in [`framing`] and protected
//! by a CRC16. Received frames are staged in a
//! [`ChunkedRingBuffer`](kernel::collections::chunked_ring_buffer::ChunkedRingBuffer)
//! supplied by the board, and validated when the network stack collects them.
//!
//! All peripheral callbacks are turned into a [`Signal`] and fed to a single
//! state machine, see [`Dose`].
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! let dose = static_init!(
//!     Dose<'static, VirtualMuxAlarm<'static, Rtc>>,
//!     Dose::new(
//!         uart, alarm, rng,
//!         Some(sense_pin), Some(standby_pin),
//!         rx_buffer, tx_buffer,
//!         mac, DoseParams::default(),
//!     )
//! );
//! uart.set_receive_client(dose);
//! uart.set_transmit_client(dose);
//! alarm.set_alarm_client(dose);
//! sense_pin.set_client(dose);
//! dose.set_client(network_stack);
//! dose.init()?;
//! ```

pub mod driver;
pub mod framing;
mod power;
pub mod watchdog;


pub use self::driver::Dose;
pub use kernel::collections::chunked_ring_buffer::MAX_CHUNKS;

/// Length of an Ethernet header: destination, source, EtherType.
pub const ETHERNET_HEADER_LEN: usize = 14;
/// Largest Ethernet frame the link carries, without FCS.
pub const ETHERNET_FRAME_LEN: usize = 1514;
/// Largest Ethernet payload.
pub const ETHERNET_DATA_LEN: usize = ETHERNET_FRAME_LEN - ETHERNET_HEADER_LEN;
pub const MAC_ADDRESS_LEN: usize = 6;
pub const CRC_LEN: usize = 2;
/// Largest frame as stored in the receive buffer.
pub const FRAME_LEN: usize = ETHERNET_FRAME_LEN + CRC_LEN;
/// Transmissions of one frame before it is given up on.
pub const MAX_ATTEMPTS: u8 = 3;

/// Per link configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoseParams {
    /// UART baud rate in bit/s.
    pub baud_rate: u32,
    /// Silence, counted in octet times, after which a frame in progress is
    /// given up on. Also the unit of the transmit backoff.
    pub timeout_bytes: u32,
}

impl Default for DoseParams {
    fn default() -> Self {
        DoseParams {
            baud_rate: 115200,
            timeout_bytes: 50,
        }
    }
}

impl DoseParams {
    /// Length of the base timeout in microseconds, assuming 10 bits per
    /// octet on the wire.
    pub fn timeout_us(&self) -> u32 {
        (self.timeout_bytes as u64 * 10 * 1_000_000)
            .checked_div(self.baud_rate as u64)
            .map_or(0, |us| us.min(u32::MAX as u64) as u32)
    }
}

/// Link counters. They wrap on overflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Frames that passed validation.
    pub rx_frames: u32,
    /// Frames dropped for a bad CRC.
    pub rx_dropped_crc: u32,
    /// Frames dropped for being too short or too long.
    pub rx_dropped_len: u32,
    /// Frames dropped because they were addressed to another node.
    pub rx_dropped_addr: u32,
    /// Frames that did not fit the receive buffer or saw a line error.
    pub rx_overruns: u32,
    /// Receptions abandoned after the bus went silent.
    pub rx_timeouts: u32,
    pub tx_frames: u32,
    /// Transmission attempts that ended in a collision.
    pub tx_collisions: u32,
    /// Frames given up on after `MAX_ATTEMPTS` collisions.
    pub tx_failed: u32,
}

/// States of the link state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Not yet initialized.
    Init,
    /// Waiting out the backoff before a transmission.
    Blocked,
    Idle,
    /// Receiving a frame.
    Recv,
    /// Transmitting a frame.
    Send,
    /// Bus driver powered down, woken by a transmission.
    Standby,
    /// Bus driver and receiver powered down.
    Sleep,
}

/// Events fed to the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    /// Reset, or wake from a low power state.
    Init,
    /// Falling edge on the sense pin: a start bit is on the bus.
    Gpio,
    /// An octet was read from the bus.
    Uart,
    /// The watchdog or backoff alarm fired.
    Timer,
    /// A frame is waiting to be sent.
    Send,
    /// The frame in progress is complete.
    End,
}
