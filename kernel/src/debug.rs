// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Support for in-kernel debugging.
//!
//! For printing, this module uses an [`IoWrite`] sink registered by the board
//! during setup, typically a UART or an RTT channel. Until a board registers
//! one, `debug!` output is discarded, which keeps capsules usable (and their
//! unit tests quiet) on hosts with no debug channel.
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! debug!("Yes the code gets here with value {}", i);
//! debug_verbose!("got here"); // includes file and line number
//! ```
//!
//! Board setup:
//!
//! ```rust,ignore
//! unsafe { kernel::debug::set_debug_writer(writer) };
//! ```

use core::fmt::{self, Write};
use core::ptr::addr_of_mut;

/// Byte sink for debug output.
pub trait IoWrite {
    /// Write `buf`, returning the number of bytes accepted.
    fn write(&mut self, buf: &[u8]) -> usize;
}

// Only ever accessed from the single kernel thread.
static mut DEBUG_WRITER: Option<&'static mut dyn IoWrite> = None;

/// Register the board's debug output sink.
///
/// # Safety
///
/// Must be called from the kernel thread before any other thread of
/// execution can print, and at most once.
pub unsafe fn set_debug_writer(writer: &'static mut dyn IoWrite) {
    *addr_of_mut!(DEBUG_WRITER) = Some(writer);
}

struct LineWriter<'a>(&'a mut dyn IoWrite);

impl Write for LineWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        // A short write only loses debug output.
        let _ = self.0.write(s.as_bytes());
        Ok(())
    }
}

fn write_line(writer: &mut dyn IoWrite, prefix: Option<(&str, u32)>, args: fmt::Arguments) {
    let mut line = LineWriter(writer);
    if let Some((file, line_no)) = prefix {
        let _ = write!(line, "TOCK_DEBUG: {}:{}: ", file, line_no);
    }
    let _ = line.write_fmt(args);
    let _ = line.write_str("\r\n");
}

fn with_writer<F: FnOnce(&mut dyn IoWrite)>(f: F) {
    // SAFETY: the kernel is single threaded and `set_debug_writer` runs
    // during board setup, before anything prints.
    let writer = unsafe { &mut *addr_of_mut!(DEBUG_WRITER) };
    if let Some(writer) = writer.as_deref_mut() {
        f(writer);
    }
}

/// Write a debug message without file and line information.
pub fn debug_println(args: fmt::Arguments) {
    with_writer(|writer| write_line(writer, None, args));
}

/// Write a debug message with file and line information.
pub fn debug_verbose_println(args: fmt::Arguments, file_line: &(&'static str, u32)) {
    let (file, line) = *file_line;
    with_writer(|writer| write_line(writer, Some((file, line)), args));
}

/// In-kernel `println()` debugging.
#[macro_export]
macro_rules! debug {
    () => ({
        // Allow an empty debug!() to print the location when hit
        $crate::debug!("")
    });
    ($msg:expr $(,)?) => ({
        $crate::debug::debug_println(format_args!($msg))
    });
    ($fmt:expr, $($arg:tt)+) => ({
        $crate::debug::debug_println(format_args!($fmt, $($arg)+))
    });
}

/// In-kernel `println()` debugging with filename and line numbers.
#[macro_export]
macro_rules! debug_verbose {
    () => ({
        $crate::debug_verbose!("")
    });
    ($msg:expr $(,)?) => ({
        $crate::debug::debug_verbose_println(format_args!($msg), {
            static _FILE_LINE: (&'static str, u32) = (file!(), line!());
            &_FILE_LINE
        })
    });
    ($fmt:expr, $($arg:tt)+) => ({
        $crate::debug::debug_verbose_println(format_args!($fmt, $($arg)+), {
            static _FILE_LINE: (&'static str, u32) = (file!(), line!());
            &_FILE_LINE
        })
    });
}

#[cfg(test)]
mod test {
    use super::{write_line, IoWrite};

    struct Capture {
        buf: [u8; 64],
        len: usize,
    }

    impl IoWrite for Capture {
        fn write(&mut self, buf: &[u8]) -> usize {
            let n = buf.len().min(self.buf.len() - self.len);
            self.buf[self.len..self.len + n].copy_from_slice(&buf[..n]);
            self.len += n;
            n
        }
    }

    #[test]
    fn line_is_terminated() {
        let mut capture = Capture {
            buf: [0; 64],
            len: 0,
        };
        write_line(&mut capture, None, format_args!("state {}", 3));
        assert_eq!(&capture.buf[..capture.len], b"state 3\r\n");
    }

    #[test]
    fn verbose_line_has_location() {
        let mut capture = Capture {
            buf: [0; 64],
            len: 0,
        };
        write_line(&mut capture, Some(("dose.rs", 12)), format_args!("x"));
        assert_eq!(&capture.buf[..capture.len], b"TOCK_DEBUG: dose.rs:12: x\r\n");
    }

    #[test]
    fn unregistered_writer_discards() {
        // Nothing registered in unit tests; this must not fault.
        debug!("dropped {}", 1);
    }
}
