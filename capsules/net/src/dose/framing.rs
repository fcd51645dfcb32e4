// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2023.

//! DOSE wire framing.
//!
//! A frame goes on the wire as its bytes, then the CRC16 of those bytes in
//! big-endian order, then a bare `END` octet. Every byte before the `END`
//! that equals `END` or `ESC` is preceded by an `ESC`:
//!
//! ```text
//! [escaped frame][escaped CRC16 high, low][0xFF]
//! ```
//!
//! The CRC is CRC-16/CCITT-FALSE (polynomial 0x1021, initial value 0xFFFF,
//! no reflection, no final xor). Running it over a frame followed by its own
//! big-endian CRC leaves a residue of zero, which is how receivers check it.

/// Frame delimiter.
pub const END: u8 = 0xFF;
/// Escape marker. The octet after it is taken literally.
pub const ESC: u8 = 0xFE;

pub const CRC16_INIT: u16 = 0xFFFF;
const CRC16_POLY: u16 = 0x1021;

/// Feed one byte into a running CRC16.
pub fn crc16_update(crc: u16, byte: u8) -> u16 {
    let mut crc = crc ^ ((byte as u16) << 8);
    for _ in 0..8 {
        crc = if crc & 0x8000 != 0 {
            (crc << 1) ^ CRC16_POLY
        } else {
            crc << 1
        };
    }
    crc
}

pub fn crc16(data: &[u8]) -> u16 {
    data.iter()
        .fold(CRC16_INIT, |crc, &byte| crc16_update(crc, byte))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Payload,
    CrcHigh,
    CrcLow,
    End,
    Done,
}

/// Produces the wire octets for one frame, one at a time.
///
/// The encoder only keeps a cursor, so the frame stays in the caller's
/// buffer and is passed back in on every call. Restarting a frame after a
/// collision is `Encoder::new` again.
#[derive(Clone, Copy, Debug)]
pub struct Encoder {
    pos: usize,
    len: usize,
    crc: u16,
    phase: Phase,
    literal: Option<u8>,
}

impl Encoder {
    /// An encoder with nothing left to send.
    pub const fn idle() -> Encoder {
        Encoder {
            pos: 0,
            len: 0,
            crc: CRC16_INIT,
            phase: Phase::Done,
            literal: None,
        }
    }

    pub fn new(frame: &[u8]) -> Encoder {
        Encoder {
            pos: 0,
            len: frame.len(),
            crc: crc16(frame),
            phase: if frame.is_empty() {
                Phase::CrcHigh
            } else {
                Phase::Payload
            },
            literal: None,
        }
    }

    /// The next octet to put on the wire, or `None` once the closing `END`
    /// has been produced.
    ///
    /// `frame` must be the slice the encoder was created from.
    pub fn next(&mut self, frame: &[u8]) -> Option<u8> {
        if let Some(octet) = self.literal.take() {
            return Some(octet);
        }
        let byte = match self.phase {
            Phase::Payload => {
                let byte = match frame.get(self.pos) {
                    Some(&byte) => byte,
                    None => {
                        self.phase = Phase::Done;
                        return None;
                    }
                };
                self.pos += 1;
                if self.pos == self.len {
                    self.phase = Phase::CrcHigh;
                }
                byte
            }
            Phase::CrcHigh => {
                self.phase = Phase::CrcLow;
                (self.crc >> 8) as u8
            }
            Phase::CrcLow => {
                self.phase = Phase::End;
                self.crc as u8
            }
            Phase::End => {
                self.phase = Phase::Done;
                return Some(END);
            }
            Phase::Done => return None,
        };
        if byte == END || byte == ESC {
            self.literal = Some(byte);
            Some(ESC)
        } else {
            Some(byte)
        }
    }

    /// Whether the closing `END` has been produced.
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done && self.literal.is_none()
    }
}

/// What a received octet means for the frame being reassembled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decoded {
    /// A frame byte.
    Data(u8),
    /// An escape marker. The next octet is data whatever its value.
    Escape,
    /// The frame is complete.
    End,
}

/// Interpret `octet`, given whether the previous octet was an unconsumed
/// escape marker.
pub fn decode(octet: u8, escaped: bool) -> Decoded {
    if escaped {
        return Decoded::Data(octet);
    }
    match octet {
        ESC => Decoded::Escape,
        END => Decoded::End,
        byte => Decoded::Data(byte),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn encode(frame: &[u8], wire: &mut [u8]) -> usize {
        let mut encoder = Encoder::new(frame);
        let mut n = 0;
        while let Some(octet) = encoder.next(frame) {
            wire[n] = octet;
            n += 1;
        }
        assert!(encoder.is_done());
        n
    }

    /// Returns the frame length including the CRC.
    fn decode_all(wire: &[u8], out: &mut [u8]) -> Option<usize> {
        let mut escaped = false;
        let mut n = 0;
        for &octet in wire {
            match decode(octet, escaped) {
                Decoded::Data(byte) => {
                    escaped = false;
                    out[n] = byte;
                    n += 1;
                }
                Decoded::Escape => escaped = true,
                Decoded::End => return Some(n),
            }
        }
        None
    }

    #[test]
    fn crc_known_value() {
        assert_eq!(crc16(b"123456789"), 0x29B1);
        assert_eq!(crc16(&[]), CRC16_INIT);
    }

    #[test]
    fn crc_residue_is_zero() {
        let frame = b"\x00\x11\x22\xff\xfe DOSE payload";
        let crc = crc16(frame);
        let residue = crc16_update(crc16_update(crc, (crc >> 8) as u8), crc as u8);
        assert_eq!(residue, 0);
    }

    #[test]
    fn crc_catches_single_bit_errors() {
        let mut frame = [0u8; 34];
        for (i, b) in frame.iter_mut().enumerate() {
            *b = (i * 7) as u8;
        }
        let crc = crc16(&frame[..32]);
        frame[32] = (crc >> 8) as u8;
        frame[33] = crc as u8;
        for bit in 0..frame.len() * 8 {
            frame[bit / 8] ^= 1 << (bit % 8);
            assert_ne!(crc16(&frame), 0, "bit {} flip not detected", bit);
            frame[bit / 8] ^= 1 << (bit % 8);
        }
        assert_eq!(crc16(&frame), 0);
    }

    #[test]
    fn plain_frame_layout() {
        let mut wire = [0u8; 16];
        let n = encode(b"HELLO", &mut wire);
        let crc = crc16(b"HELLO");
        assert_eq!(&wire[..5], b"HELLO");
        assert_eq!(wire[n - 1], END);
        // Escaping of the CRC bytes depends on their value.
        let crc_octets = n - 1 - 5;
        let expected = 2 + [(crc >> 8) as u8, crc as u8]
            .iter()
            .filter(|&&b| b == END || b == ESC)
            .count();
        assert_eq!(crc_octets, expected);
    }

    #[test]
    fn magic_bytes_are_escaped() {
        let frame = [0x01, 0x02, END, 0x03, ESC];
        let mut wire = [0u8; 16];
        let n = encode(&frame, &mut wire);
        assert_eq!(&wire[..7], &[0x01, 0x02, ESC, END, 0x03, ESC, ESC]);
        // Only the last octet is a bare END.
        let mut escaped = false;
        for (i, &octet) in wire[..n].iter().enumerate() {
            match decode(octet, escaped) {
                Decoded::End => assert_eq!(i, n - 1),
                Decoded::Escape => escaped = true,
                Decoded::Data(_) => escaped = false,
            }
        }
    }

    #[test]
    fn round_trip() {
        let mut frame = [0u8; 300];
        let mut wire = [0u8; 700];
        let mut out = [0u8; 302];
        for len in [0, 1, 2, 13, 255, 300] {
            for (i, b) in frame[..len].iter_mut().enumerate() {
                // Plenty of END and ESC bytes.
                *b = 0xF0u8.wrapping_add((i * 13) as u8);
            }
            let n = encode(&frame[..len], &mut wire);
            let decoded = decode_all(&wire[..n], &mut out).unwrap();
            assert_eq!(decoded, len + 2);
            assert_eq!(&out[..len], &frame[..len]);
            assert_eq!(crc16(&out[..decoded]), 0);
        }
    }

    #[test]
    fn escape_applies_to_one_octet() {
        assert_eq!(decode(END, true), Decoded::Data(END));
        assert_eq!(decode(ESC, true), Decoded::Data(ESC));
        assert_eq!(decode(ESC, false), Decoded::Escape);
        assert_eq!(decode(END, false), Decoded::End);
        assert_eq!(decode(0x42, false), Decoded::Data(0x42));
    }

    #[test]
    fn idle_encoder_is_done() {
        let mut encoder = Encoder::idle();
        assert!(encoder.is_done());
        assert_eq!(encoder.next(&[]), None);
    }
}
