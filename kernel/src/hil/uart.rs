// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Hardware interface layer (HIL) traits for UART communication.
//!
//! Buffer based transfers are left to chip drivers. This interface covers
//! configuration and word granularity transfers, which is what link layer
//! capsules that check every echoed octet on a shared bus need.

use crate::ErrorCode;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopBits {
    One = 1,
    Two = 2,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Parity {
    None = 0,
    Odd = 1,
    Even = 2,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Width {
    Six = 6,
    Seven = 7,
    Eight = 8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Parameters {
    pub baud_rate: u32, // baud rate in bit/s
    pub width: Width,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub hw_flow_control: bool,
}

/// The type of error encountered during UART transaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// No error occurred and the command completed successfully
    None,

    /// Parity error during receive
    ParityError,

    /// Framing error during receive
    FramingError,

    /// Overrun error during receive
    OverrunError,

    /// Repeat call of transmit or receive before initial command complete
    RepeatCallError,

    /// UART hardware was reset
    ResetError,

    /// The transceiver saw the bus disagree with the bit being driven
    CollisionError,

    /// Read or write was aborted early
    Aborted,
}

pub trait Uart<'a>: Configure + Transmit<'a> + Receive<'a> {}

impl<'a, T: Configure + Transmit<'a> + Receive<'a>> Uart<'a> for T {}

/// Trait for configuring a UART.
pub trait Configure {
    /// Returns Ok(()), or
    /// - OFF: The underlying hardware is currently not available, perhaps
    ///   because it has not been initialized or in the case of a shared
    ///   hardware USART controller because it is set up for SPI.
    /// - INVAL: Impossible parameters (e.g. a `baud_rate` of 0)
    /// - ENOSUPPORT: The underlying UART cannot satisfy this configuration.
    fn configure(&self, params: Parameters) -> Result<(), ErrorCode>;
}

pub trait Transmit<'a> {
    /// Set the transmit client, which will be called when transmissions
    /// complete.
    fn set_transmit_client(&self, client: &'a dyn TransmitClient);

    /// Transmit a single word of data asynchronously. The word length is
    /// determined by the UART configuration, which on a byte oriented link
    /// is a single octet.
    ///
    /// If the transmission is not started successfully, this function
    /// returns `Err` and no callback will be made. In that case:
    /// - OFF: The underlying hardware is not available, perhaps because it
    ///   has not been initialized or has been put to sleep.
    /// - BUSY: the UART is already transmitting and has not made a
    ///   transmission complete callback yet.
    /// - FAIL: unspecified failure.
    fn transmit_word(&self, word: u32) -> Result<(), ErrorCode>;

    /// Abort an outstanding call to `transmit_word`.
    fn transmit_abort(&self) -> Result<(), ErrorCode>;
}

pub trait Receive<'a> {
    /// Set the receive client, which will be called when reads complete.
    fn set_receive_client(&self, client: &'a dyn ReceiveClient);

    /// Receive a single word of data. The word length is determined by the
    /// UART configuration. Each call yields at most one `received_word`
    /// callback, so a client that keeps listening calls this again from
    /// the callback.
    ///
    /// Other return values are:
    /// - BUSY: the UART is already receiving and has not made a reception
    ///   `complete` callback yet.
    /// - OFF: The underlying hardware is not available, perhaps because it
    ///   has not been initialized or in the case of a shared hardware USART
    ///   controller because it is set up for SPI.
    /// - FAIL: unspecified failure.
    fn receive_word(&self) -> Result<(), ErrorCode>;

    /// Abort any ongoing receive transfers and return what has been
    /// received. If there was an ongoing receive, no `received_word`
    /// callback follows.
    fn receive_abort(&self) -> Result<(), ErrorCode>;
}

/// Trait implemented by a UART transmitter to receive callbacks when
/// operations complete.
pub trait TransmitClient {
    /// A call to `Transmit::transmit_word` completed.
    fn transmitted_word(&self, _rval: Result<(), ErrorCode>) {}
}

pub trait ReceiveClient {
    /// A call to `Receive::receive_word` completed. `error` is
    /// `Error::None` for a clean octet and names the line condition
    /// otherwise. A `CollisionError` still carries the word read from the
    /// bus.
    fn received_word(&self, word: u32, rval: Result<(), ErrorCode>, error: Error);
}
