//! Raw channel abstraction
//!
//! The command engine talks to a controller through this trait. The Linux
//! [`HciSocket`](crate::hci::socket::HciSocket) implements it; tests use an
//! in-memory channel.

use crate::hci::filter::HciFilter;
use std::io;
use std::time::Duration;

/// A raw, packet-oriented channel bound to one controller
pub trait RawChannel {
    /// Writes `data` in one call, returning how many bytes were accepted
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Reads without blocking. Fails with `ErrorKind::WouldBlock` when
    /// nothing is pending.
    fn read_nonblocking(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Waits up to `timeout` for the channel to become readable, returning
    /// the number of ready descriptors (0 on timeout)
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<usize>;

    /// Current receive filter
    fn filter(&mut self) -> io::Result<HciFilter>;

    fn set_filter(&mut self, filter: &HciFilter) -> io::Result<()>;
}

impl<C: RawChannel + ?Sized> RawChannel for &mut C {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        (**self).write(data)
    }

    fn read_nonblocking(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_nonblocking(buf)
    }

    fn wait_readable(&mut self, timeout: Duration) -> io::Result<usize> {
        (**self).wait_readable(timeout)
    }

    fn filter(&mut self) -> io::Result<HciFilter> {
        (**self).filter()
    }

    fn set_filter(&mut self, filter: &HciFilter) -> io::Result<()> {
        (**self).set_filter(filter)
    }
}

/// Whether a read error is worth retrying
pub fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}
