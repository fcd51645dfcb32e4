// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! Ethernet link HIL for devices transporting IEEE 802.3 Ethernet frames over
//! a shared medium.
//!
//! Frames passed through this HIL are fully formed, with an Ethernet header
//! containing destination and source address. They never include the link's
//! own integrity trailer (FCS or CRC): the link appends it on transmit and
//! strips it on receive.
//!
//! Reception is two staged. When a frame has been completed the link calls
//! [`EthernetLinkClient::event_pending`], usually from a bottom half. The
//! network stack then calls [`EthernetLink::isr`] from its own context, which
//! validates the completed frames and calls
//! [`EthernetLinkClient::frame_received`] for each deliverable one. The client
//! retrieves the frame with [`EthernetLink::recv`] from within that callback.

use crate::ErrorCode;

pub type MacAddress = [u8; 6];

/// The all-ones broadcast address.
pub const BROADCAST: MacAddress = [0xFF; 6];

/// Power state of a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerState {
    /// The link has not been initialized.
    Off,
    /// Listening, able to send and receive.
    Idle,
    /// Bus driver off. A transmission wakes the link.
    Standby,
    /// Bus driver and receiver off. Transmissions are refused.
    Sleep,
}

/// Options a link may expose through [`EthernetLink::get`] and
/// [`EthernetLink::set`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkOption {
    Address,
    AddressLength,
    Promiscuous,
    MaxPduSize,
    IsWired,
    State,
    Channel,
    TxPower,
}

/// A value for one [`LinkOption`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionValue {
    Address(MacAddress),
    AddressLength(usize),
    Promiscuous(bool),
    MaxPduSize(usize),
    IsWired(bool),
    State(PowerState),
    Channel(u8),
    TxPower(i8),
}

/// Ethernet link client HIL
pub trait EthernetLinkClient {
    /// The link has completed work that needs [`EthernetLink::isr`] to be
    /// called from the client's context.
    fn event_pending(&self);

    /// The link was initialized and can send and receive frames.
    fn link_up(&self);

    /// A validated frame of `len` bytes is waiting. The client should call
    /// [`EthernetLink::recv`] before returning; a frame left in place is
    /// offered again on the next call to `isr`.
    fn frame_received(&self, len: usize);

    /// A frame accepted by [`EthernetLink::transmit`] was sent, or finally
    /// failed.
    ///
    /// Possible error codes:
    /// - [`ErrorCode::BUSY`]: the medium stayed contended for every attempt.
    /// - [`ErrorCode::CANCEL`]: the link was reinitialized before the frame
    ///   went out.
    fn transmit_done(&self, result: Result<usize, ErrorCode>);
}

/// Ethernet link HIL
pub trait EthernetLink<'a> {
    /// Set the client for this link.
    fn set_client(&self, client: &'a dyn EthernetLinkClient);

    /// Configure the underlying peripherals, reset the link to idle and
    /// report [`EthernetLinkClient::link_up`].
    fn init(&self) -> Result<(), ErrorCode>;

    /// Gather `fragments` into one frame and queue it for transmission.
    ///
    /// Returns the number of bytes queued. The outcome is reported through
    /// [`EthernetLinkClient::transmit_done`]. Synchronous errors, which are
    /// not followed by a callback:
    ///
    /// - [`ErrorCode::BUSY`]: another frame is still in flight.
    /// - [`ErrorCode::OFF`]: the link is not initialized or is asleep.
    /// - [`ErrorCode::SIZE`]: the frame does not fit the link's buffer or the
    ///   Ethernet frame size.
    /// - [`ErrorCode::INVAL`]: the frame is empty.
    fn transmit(&self, fragments: &[&[u8]]) -> Result<usize, ErrorCode>;

    /// Read the oldest pending frame.
    ///
    /// - `(None, 0)` returns the size of the pending frame without consuming
    ///   it.
    /// - `(None, n)` with `n > 0` drops the pending frame and returns its
    ///   size.
    /// - `(Some(buf), n)` copies at most `min(n, buf.len())` bytes of the
    ///   pending frame into `buf`, consumes the frame and returns the number
    ///   of bytes copied.
    ///
    /// Returns 0 when no frame is pending.
    fn recv(&self, buf: Option<&mut [u8]>, max_len: usize) -> usize;

    /// Process completed frames, calling
    /// [`EthernetLinkClient::frame_received`] for each deliverable one.
    fn isr(&self);

    /// Read a link option.
    ///
    /// Returns [`ErrorCode::NOSUPPORT`] for options the link does not have.
    fn get(&self, opt: LinkOption) -> Result<OptionValue, ErrorCode>;

    /// Write a link option.
    ///
    /// Returns [`ErrorCode::NOSUPPORT`] for options the link does not have
    /// or cannot change, and [`ErrorCode::INVAL`] for values it cannot take.
    fn set(&self, value: OptionValue) -> Result<(), ErrorCode>;
}
