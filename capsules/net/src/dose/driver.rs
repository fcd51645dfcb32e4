// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! The DOSE link state machine.
//!
//! Every peripheral callback and every API call that changes what the link
//! is doing becomes a [`Signal`] passed to [`Dose::dispatch`]. A dispatch
//! pass looks up the `(state, signal)` pair, runs the action for it and
//! repeats with the follow-up signal the action returns, if any. Pairs that
//! do not appear below are ignored.
//!
//! | From            | Signal        | To      |
//! |-----------------|---------------|---------|
//! | Init            | Init          | Idle    |
//! | Idle            | Send          | Blocked |
//! | Blocked         | Timer         | Send    |
//! | Send            | Uart          | Send    |
//! | Send            | End, Timer    | Idle    |
//! | Idle, Blocked   | Gpio, Uart    | Recv    |
//! | Recv            | Uart          | Recv    |
//! | Recv            | End, Timer    | Idle    |
//! | Standby, Sleep  | Init          | Idle    |
//!
//! Sending is paced by the echo of each octet rather than by the UART's
//! transmit completion. The alarm bounds every wait, see [`Watchdog`].
//! A frame queued in `Standby` wakes the link, which returns to `Standby`
//! once the frame is sent or finally fails.

use core::cell::Cell;

use kernel::collections::chunked_ring_buffer::ChunkedRingBuffer;
use kernel::config::CONFIG;
use kernel::debug;
use kernel::hil::ethernet::{
    EthernetLink, EthernetLinkClient, LinkOption, MacAddress, OptionValue, PowerState, BROADCAST,
};
use kernel::hil::gpio::{self, Configure, FloatingState, Interrupt, InterruptEdge, Output};
use kernel::hil::rng::Random;
use kernel::hil::time::{Alarm, AlarmClient};
use kernel::hil::uart::{self, Configure as UartConfigure, Receive, Transmit};
use kernel::utilities::cells::{MapCell, OptionalCell, TakeCell};
use kernel::utilities::registers::{register_bitfields, Field, FieldValue, LocalRegisterCopy};
use kernel::ErrorCode;

use super::framing::{self, Decoded, Encoder};
use super::watchdog::Watchdog;
use super::{
    DoseParams, Signal, State, Statistics, CRC_LEN, ETHERNET_DATA_LEN, ETHERNET_FRAME_LEN,
    ETHERNET_HEADER_LEN, FRAME_LEN, MAC_ADDRESS_LEN, MAX_ATTEMPTS,
};

register_bitfields![u8,
    Flags [
        /// The frame being received is dropped when it ends.
        RECV_BUF_DIRTY 0,
        END_RECEIVED 1,
        /// The last octet received was an unconsumed `ESC`.
        ESC_RECEIVED 2,
        /// A frame waits in the transmit buffer.
        SEND_PENDING 3
    ],
    Options [
        PROMISCUOUS 0
    ]
];

/// Why a received frame was not delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Reject {
    Length,
    Crc,
    Address,
}

/// One DOSE link.
///
/// The board supplies the receive buffer, which bounds how many bytes of
/// completed but uncollected frames the link holds, and a transmit buffer of
/// up to [`ETHERNET_FRAME_LEN`] bytes. The sense pin, when present, catches
/// the start bit of an incoming frame before the UART has a whole octet;
/// without it reception starts on the first octet. The standby pin, when
/// present, is driven high to put the bus transceiver in standby.
pub struct Dose<'a, A: Alarm<'a>> {
    pub(super) uart: &'a dyn uart::Uart<'a>,
    pub(super) sense: Option<&'a dyn gpio::InterruptPin<'a>>,
    pub(super) standby: Option<&'a dyn gpio::Pin>,
    rng: &'a dyn Random<'a>,
    pub(super) watchdog: Watchdog<'a, A>,
    params: DoseParams,
    client: OptionalCell<&'a dyn EthernetLinkClient>,

    pub(super) state: Cell<State>,
    flags: Cell<LocalRegisterCopy<u8, Flags::Register>>,
    options: Cell<LocalRegisterCopy<u8, Options::Register>>,
    mac: Cell<MacAddress>,
    last_octet: Cell<u8>,
    line_error: Cell<uart::Error>,
    pub(super) rx_listening: Cell<bool>,

    pub(super) rx: MapCell<ChunkedRingBuffer<'a>>,
    /// The oldest chunk has passed validation.
    head_checked: Cell<bool>,
    /// Bumped whenever the oldest chunk is released.
    consumed: Cell<usize>,

    tx_buffer: TakeCell<'a, [u8]>,
    tx_len: Cell<usize>,
    encoder: Cell<Encoder>,
    last_sent: Cell<u8>,
    attempts: Cell<u8>,
    collided: Cell<bool>,

    pub(super) power_request: OptionalCell<PowerState>,
    /// The pending frame was queued in `Standby`.
    pub(super) standby_after_send: Cell<bool>,

    dispatching: Cell<bool>,
    queued: OptionalCell<Signal>,
    rx_event: Cell<bool>,
    tx_done: OptionalCell<Result<usize, ErrorCode>>,
    stats: Cell<Statistics>,
}

impl<'a, A: Alarm<'a>> Dose<'a, A> {
    pub fn new(
        uart: &'a dyn uart::Uart<'a>,
        alarm: &'a A,
        rng: &'a dyn Random<'a>,
        sense: Option<&'a dyn gpio::InterruptPin<'a>>,
        standby: Option<&'a dyn gpio::Pin>,
        rx_buffer: &'a mut [u8],
        tx_buffer: &'a mut [u8],
        mac: MacAddress,
        params: DoseParams,
    ) -> Dose<'a, A> {
        let watchdog = Watchdog::new(alarm);
        watchdog.set_timeout_us(params.timeout_us());
        Dose {
            uart,
            sense,
            standby,
            rng,
            watchdog,
            params,
            client: OptionalCell::empty(),
            state: Cell::new(State::Init),
            flags: Cell::new(LocalRegisterCopy::new(0)),
            options: Cell::new(LocalRegisterCopy::new(0)),
            mac: Cell::new(mac),
            last_octet: Cell::new(0),
            line_error: Cell::new(uart::Error::None),
            rx_listening: Cell::new(false),
            rx: MapCell::new(ChunkedRingBuffer::new(rx_buffer)),
            head_checked: Cell::new(false),
            consumed: Cell::new(0),
            tx_buffer: TakeCell::new(tx_buffer),
            tx_len: Cell::new(0),
            encoder: Cell::new(Encoder::idle()),
            last_sent: Cell::new(0),
            attempts: Cell::new(0),
            collided: Cell::new(false),
            power_request: OptionalCell::empty(),
            standby_after_send: Cell::new(false),
            dispatching: Cell::new(false),
            queued: OptionalCell::empty(),
            rx_event: Cell::new(false),
            tx_done: OptionalCell::empty(),
            stats: Cell::new(Statistics::default()),
        }
    }

    pub fn state(&self) -> State {
        self.state.get()
    }

    pub fn statistics(&self) -> Statistics {
        self.stats.get()
    }

    fn count<F: FnOnce(&mut Statistics)>(&self, f: F) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }

    fn flag(&self, field: Field<u8, Flags::Register>) -> bool {
        self.flags.get().is_set(field)
    }

    fn modify_flags(&self, value: FieldValue<u8, Flags::Register>) {
        let mut flags = self.flags.get();
        flags.modify(value);
        self.flags.set(flags);
    }

    pub(super) fn send_pending(&self) -> bool {
        self.flag(Flags::SEND_PENDING)
    }

    fn promiscuous(&self) -> bool {
        self.options.get().is_set(Options::PROMISCUOUS)
    }

    pub(super) fn enable_sense(&self) {
        if let Some(pin) = self.sense {
            pin.enable_interrupts(InterruptEdge::FallingEdge);
        }
    }

    pub(super) fn disable_sense(&self) {
        if let Some(pin) = self.sense {
            pin.disable_interrupts();
        }
    }

    /// Keep one `receive_word` outstanding on the UART.
    pub(super) fn start_listening(&self) -> Result<(), ErrorCode> {
        if !self.rx_listening.get() {
            self.uart.receive_word()?;
            self.rx_listening.set(true);
        }
        Ok(())
    }

    /// Feed `signal` to the state machine.
    ///
    /// A signal raised while a pass is running is queued and handled by that
    /// pass. Client notifications collected during the pass are delivered
    /// once it is over, so clients may call back into the link.
    pub(super) fn dispatch(&self, signal: Signal) {
        if self.dispatching.get() {
            self.queued.set(signal);
            return;
        }
        self.dispatching.set(true);
        let mut next = Some(signal);
        while let Some(signal) = next.or_else(|| self.queued.take()) {
            let from = self.state.get();
            next = self.transition(from, signal);
            if CONFIG.trace_link_signals {
                debug!("dose: {:?} + {:?} -> {:?}", from, signal, self.state.get());
            }
        }
        self.dispatching.set(false);
        self.deliver_events();
    }

    fn transition(&self, from: State, signal: Signal) -> Option<Signal> {
        match (from, signal) {
            (State::Init, Signal::Init) => self.reset_link(),
            (State::Idle, Signal::Send) => self.start_backoff(),
            (State::Blocked, Signal::Timer) => self.begin_send(),
            (State::Send, Signal::Uart) => self.check_echo(),
            (State::Send, Signal::End) | (State::Send, Signal::Timer) => self.finish_send(signal),
            (State::Idle, Signal::Gpio)
            | (State::Idle, Signal::Uart)
            | (State::Blocked, Signal::Gpio)
            | (State::Blocked, Signal::Uart) => self.begin_recv(signal),
            (State::Recv, Signal::Uart) => self.recv_octet(),
            (State::Recv, Signal::End) => self.end_recv(),
            (State::Recv, Signal::Timer) => self.abort_recv(),
            // The frame stays pending until the reception is over.
            (State::Recv, Signal::Send) => None,
            (State::Standby, Signal::Init) | (State::Sleep, Signal::Init) => self.wake(),
            _ => None,
        }
    }

    fn deliver_events(&self) {
        if let Some(result) = self.tx_done.take() {
            self.client.map(|client| client.transmit_done(result));
        }
        if self.rx_event.replace(false) {
            self.client.map(|client| client.event_pending());
        }
    }

    fn reset_link(&self) -> Option<Signal> {
        self.rx.map(|rx| rx.reset());
        self.head_checked.set(false);
        self.flags.set(LocalRegisterCopy::new(0));
        self.encoder.set(Encoder::idle());
        self.power_request.clear();
        self.standby_after_send.set(false);
        self.enter_idle()
    }

    /// Listen for the bus again. Returns `Send` if a frame is waiting,
    /// otherwise applies a power request deferred while the link was busy.
    pub(super) fn enter_idle(&self) -> Option<Signal> {
        self.watchdog.disarm();
        self.modify_flags(
            Flags::RECV_BUF_DIRTY::CLEAR + Flags::END_RECEIVED::CLEAR + Flags::ESC_RECEIVED::CLEAR,
        );
        self.state.set(State::Idle);
        self.enable_sense();
        if self.send_pending() {
            Some(Signal::Send)
        } else {
            if let Some(target) = self.power_request.take() {
                self.apply_power(target);
            }
            None
        }
    }

    // Send path

    fn start_backoff(&self) -> Option<Signal> {
        self.watchdog
            .arm_backoff(self.rng.random(), self.attempts.get() > 0);
        self.state.set(State::Blocked);
        None
    }

    fn begin_send(&self) -> Option<Signal> {
        self.disable_sense();
        let len = self.tx_len.get();
        match self.tx_buffer.map(|buf| Encoder::new(&buf[..len.min(buf.len())])) {
            Some(encoder) => self.encoder.set(encoder),
            None => {
                self.complete_send(Err(ErrorCode::FAIL));
                return self.enter_idle();
            }
        }
        self.attempts.set(self.attempts.get() + 1);
        self.collided.set(false);
        self.state.set(State::Send);
        self.send_next_octet()
    }

    /// Put the next wire octet on the bus and wait for its echo. Returns
    /// `End` once nothing is left to send or the UART refused the octet.
    fn send_next_octet(&self) -> Option<Signal> {
        let len = self.tx_len.get();
        let mut encoder = self.encoder.get();
        let octet = self
            .tx_buffer
            .map(|buf| encoder.next(&buf[..len.min(buf.len())]))
            .flatten();
        self.encoder.set(encoder);
        match octet {
            Some(octet) => {
                self.last_sent.set(octet);
                if self.uart.transmit_word(octet as u32).is_err() {
                    self.collided.set(true);
                    return Some(Signal::End);
                }
                self.watchdog.arm();
                None
            }
            None => Some(Signal::End),
        }
    }

    fn check_echo(&self) -> Option<Signal> {
        if self.line_error.get() != uart::Error::None || self.last_octet.get() != self.last_sent.get()
        {
            self.collided.set(true);
            return Some(Signal::End);
        }
        self.send_next_octet()
    }

    fn finish_send(&self, signal: Signal) -> Option<Signal> {
        self.watchdog.disarm();
        // No echo within the timeout counts as a collision.
        if signal == Signal::Timer {
            self.collided.set(true);
        }
        if !self.collided.get() && self.encoder.get().is_done() {
            self.count(|s| s.tx_frames = s.tx_frames.wrapping_add(1));
            self.complete_send(Ok(self.tx_len.get()));
        } else {
            self.count(|s| s.tx_collisions = s.tx_collisions.wrapping_add(1));
            let attempts = self.attempts.get();
            if attempts >= MAX_ATTEMPTS {
                if CONFIG.trace_link_signals {
                    debug!("dose: giving up after {} attempts", attempts);
                }
                self.count(|s| s.tx_failed = s.tx_failed.wrapping_add(1));
                self.complete_send(Err(ErrorCode::BUSY));
            } else if CONFIG.trace_link_signals {
                debug!("dose: collision on attempt {}", attempts);
            }
        }
        self.encoder.set(Encoder::idle());
        self.enter_idle()
    }

    fn complete_send(&self, result: Result<usize, ErrorCode>) {
        self.modify_flags(Flags::SEND_PENDING::CLEAR);
        self.attempts.set(0);
        // A request made during the send takes precedence.
        if self.standby_after_send.replace(false) && self.power_request.is_none() {
            self.power_request.set(PowerState::Standby);
        }
        self.tx_done.set(result);
    }

    // Receive path

    fn begin_recv(&self, signal: Signal) -> Option<Signal> {
        self.disable_sense();
        self.modify_flags(
            Flags::RECV_BUF_DIRTY::CLEAR + Flags::END_RECEIVED::CLEAR + Flags::ESC_RECEIVED::CLEAR,
        );
        if !self.rx.map_or(false, |rx| rx.start_chunk()) {
            self.modify_flags(Flags::RECV_BUF_DIRTY::SET);
        }
        self.state.set(State::Recv);
        self.watchdog.arm();
        match signal {
            Signal::Uart => Some(Signal::Uart),
            _ => None,
        }
    }

    fn recv_octet(&self) -> Option<Signal> {
        self.watchdog.arm();
        if self.line_error.get() != uart::Error::None {
            self.modify_flags(Flags::RECV_BUF_DIRTY::SET);
        }
        match framing::decode(self.last_octet.get(), self.flag(Flags::ESC_RECEIVED)) {
            Decoded::Escape => {
                self.modify_flags(Flags::ESC_RECEIVED::SET);
                None
            }
            Decoded::End => {
                self.modify_flags(Flags::END_RECEIVED::SET);
                Some(Signal::End)
            }
            Decoded::Data(byte) => {
                self.modify_flags(Flags::ESC_RECEIVED::CLEAR);
                if !self.flag(Flags::RECV_BUF_DIRTY) && !self.rx.map_or(false, |rx| rx.add_byte(byte))
                {
                    self.modify_flags(Flags::RECV_BUF_DIRTY::SET);
                }
                None
            }
        }
    }

    fn end_recv(&self) -> Option<Signal> {
        self.watchdog.disarm();
        let dirty = self.flag(Flags::RECV_BUF_DIRTY);
        if self.rx.map_or(false, |rx| rx.end_chunk(!dirty)) {
            self.rx_event.set(true);
        }
        if dirty {
            self.count(|s| s.rx_overruns = s.rx_overruns.wrapping_add(1));
            if CONFIG.trace_link_signals {
                debug!("dose: dropped frame, no room or line error");
            }
        }
        self.enter_idle()
    }

    fn abort_recv(&self) -> Option<Signal> {
        self.rx.map(|rx| rx.end_chunk(false));
        self.count(|s| s.rx_timeouts = s.rx_timeouts.wrapping_add(1));
        if CONFIG.trace_link_signals {
            debug!("dose: receive timed out");
        }
        self.enter_idle()
    }

    // Delivery

    fn check_chunk(&self, rx: &ChunkedRingBuffer<'_>, size: usize) -> Result<(), Reject> {
        if size < ETHERNET_HEADER_LEN + CRC_LEN || size > FRAME_LEN {
            return Err(Reject::Length);
        }
        let mut crc = framing::CRC16_INIT;
        rx.chunk_for_each(|byte| crc = framing::crc16_update(crc, byte));
        if crc != 0 {
            return Err(Reject::Crc);
        }
        if !self.promiscuous() {
            let mut dst = [0u8; MAC_ADDRESS_LEN];
            rx.peek_bytes(&mut dst, 0);
            if dst != BROADCAST && dst != self.mac.get() {
                return Err(Reject::Address);
            }
        }
        Ok(())
    }

    /// Size, CRC included, of the oldest frame that passes validation.
    /// Frames ahead of it that fail are dropped.
    fn pending_frame(&self) -> Option<usize> {
        loop {
            let (size, verdict) = self
                .rx
                .map(|rx| {
                    let size = rx.chunk_size()?;
                    if self.head_checked.get() {
                        return Some((size, Ok(())));
                    }
                    Some((size, self.check_chunk(rx, size)))
                })
                .flatten()?;
            match verdict {
                Ok(()) => {
                    if !self.head_checked.replace(true) {
                        self.count(|s| s.rx_frames = s.rx_frames.wrapping_add(1));
                    }
                    return Some(size);
                }
                Err(reason) => {
                    self.release_head();
                    self.count(|s| match reason {
                        Reject::Length => s.rx_dropped_len = s.rx_dropped_len.wrapping_add(1),
                        Reject::Crc => s.rx_dropped_crc = s.rx_dropped_crc.wrapping_add(1),
                        Reject::Address => s.rx_dropped_addr = s.rx_dropped_addr.wrapping_add(1),
                    });
                    if CONFIG.trace_link_signals {
                        debug!("dose: dropped {} byte frame ({:?})", size, reason);
                    }
                }
            }
        }
    }

    fn release_head(&self) {
        self.rx.map(|rx| rx.drop_chunk());
        self.head_released();
    }

    fn head_released(&self) {
        self.head_checked.set(false);
        self.consumed.set(self.consumed.get().wrapping_add(1));
    }
}

impl<'a, A: Alarm<'a>> EthernetLink<'a> for Dose<'a, A> {
    fn set_client(&self, client: &'a dyn EthernetLinkClient) {
        self.client.set(client);
    }

    fn init(&self) -> Result<(), ErrorCode> {
        if self.params.baud_rate == 0 {
            return Err(ErrorCode::INVAL);
        }
        self.uart.configure(uart::Parameters {
            baud_rate: self.params.baud_rate,
            width: uart::Width::Eight,
            parity: uart::Parity::None,
            stop_bits: uart::StopBits::One,
            hw_flow_control: false,
        })?;
        if let Some(pin) = self.sense {
            pin.make_input();
            pin.set_floating_state(FloatingState::PullUp);
        }
        if let Some(pin) = self.standby {
            pin.make_output();
            pin.clear();
        }
        if self.send_pending() {
            self.complete_send(Err(ErrorCode::CANCEL));
        }
        self.watchdog.disarm();
        self.start_listening()?;
        self.state.set(State::Init);
        self.dispatch(Signal::Init);
        self.client.map(|client| client.link_up());
        Ok(())
    }

    fn transmit(&self, fragments: &[&[u8]]) -> Result<usize, ErrorCode> {
        if let State::Init | State::Sleep = self.state.get() {
            return Err(ErrorCode::OFF);
        }
        if self.send_pending() {
            return Err(ErrorCode::BUSY);
        }
        let len: usize = fragments.iter().map(|fragment| fragment.len()).sum();
        if len == 0 {
            return Err(ErrorCode::INVAL);
        }
        if len > ETHERNET_FRAME_LEN {
            return Err(ErrorCode::SIZE);
        }
        self.tx_buffer.map_or(Err(ErrorCode::FAIL), |buf| {
            if len > buf.len() {
                return Err(ErrorCode::SIZE);
            }
            let mut offset = 0;
            for fragment in fragments {
                buf[offset..offset + fragment.len()].copy_from_slice(fragment);
                offset += fragment.len();
            }
            Ok(())
        })?;
        self.tx_len.set(len);
        self.attempts.set(0);
        self.modify_flags(Flags::SEND_PENDING::SET);
        if self.state.get() == State::Standby {
            self.standby_after_send.set(true);
            self.dispatch(Signal::Init);
        }
        self.dispatch(Signal::Send);
        Ok(len)
    }

    fn recv(&self, buf: Option<&mut [u8]>, max_len: usize) -> usize {
        let len = match self.pending_frame() {
            Some(size) => size - CRC_LEN,
            None => return 0,
        };
        match buf {
            None if max_len == 0 => len,
            None => {
                self.release_head();
                len
            }
            Some(buf) => {
                let n = len.min(max_len).min(buf.len());
                let copied = self
                    .rx
                    .map(|rx| rx.consume_chunk(&mut buf[..n]))
                    .flatten()
                    .unwrap_or(0);
                self.head_released();
                copied
            }
        }
    }

    fn isr(&self) {
        while let Some(size) = self.pending_frame() {
            let consumed = self.consumed.get();
            self.client
                .map(|client| client.frame_received(size - CRC_LEN));
            if self.consumed.get() == consumed {
                // Left in place, offered again on the next call.
                break;
            }
        }
    }

    fn get(&self, opt: LinkOption) -> Result<OptionValue, ErrorCode> {
        match opt {
            LinkOption::Address => Ok(OptionValue::Address(self.mac.get())),
            LinkOption::AddressLength => Ok(OptionValue::AddressLength(MAC_ADDRESS_LEN)),
            LinkOption::Promiscuous => Ok(OptionValue::Promiscuous(self.promiscuous())),
            LinkOption::MaxPduSize => Ok(OptionValue::MaxPduSize(ETHERNET_DATA_LEN)),
            LinkOption::IsWired => Ok(OptionValue::IsWired(true)),
            LinkOption::State => Ok(OptionValue::State(self.power_state())),
            LinkOption::Channel | LinkOption::TxPower => Err(ErrorCode::NOSUPPORT),
        }
    }

    fn set(&self, value: OptionValue) -> Result<(), ErrorCode> {
        match value {
            OptionValue::Address(mac) => {
                if mac[0] & 0x01 != 0 {
                    return Err(ErrorCode::INVAL);
                }
                self.mac.set(mac);
                Ok(())
            }
            OptionValue::Promiscuous(enabled) => {
                let mut options = self.options.get();
                options.modify(if enabled {
                    Options::PROMISCUOUS::SET
                } else {
                    Options::PROMISCUOUS::CLEAR
                });
                self.options.set(options);
                Ok(())
            }
            OptionValue::State(target) => self.request_power(target),
            OptionValue::AddressLength(_)
            | OptionValue::MaxPduSize(_)
            | OptionValue::IsWired(_)
            | OptionValue::Channel(_)
            | OptionValue::TxPower(_) => Err(ErrorCode::NOSUPPORT),
        }
    }
}

impl<'a, A: Alarm<'a>> uart::ReceiveClient for Dose<'a, A> {
    fn received_word(&self, word: u32, rval: Result<(), ErrorCode>, error: uart::Error) {
        self.rx_listening.set(false);
        let cancelled = rval == Err(ErrorCode::CANCEL) || error == uart::Error::Aborted;
        // The link may have woken while an abort was still in progress.
        if self.state.get() != State::Sleep && self.start_listening().is_err() {
            debug!("dose: could not restart UART reception");
        }
        if cancelled {
            return;
        }
        self.last_octet.set(word as u8);
        self.line_error.set(error);
        self.dispatch(Signal::Uart);
    }
}

impl<'a, A: Alarm<'a>> uart::TransmitClient for Dose<'a, A> {
    // The echo read back from the bus paces transmission.
    fn transmitted_word(&self, _rval: Result<(), ErrorCode>) {}
}

impl<'a, A: Alarm<'a>> gpio::Client for Dose<'a, A> {
    fn fired(&self) {
        self.dispatch(Signal::Gpio);
    }
}

impl<'a, A: Alarm<'a>> AlarmClient for Dose<'a, A> {
    fn alarm(&self) {
        self.dispatch(Signal::Timer);
    }
}
