//! HCI Socket implementation for Bluetooth communication
//!
//! This module provides a wrapper around the raw Linux HCI socket,
//! implementing [`RawChannel`] for the command engine.

use crate::error::HciError;
use crate::hci::channel::RawChannel;
use crate::hci::constants::*;
use crate::hci::filter::HciFilter;
use log::debug;
use std::io;
use std::os::unix::io::{AsRawFd, RawFd};
use std::time::Duration;

/// Represents an HCI socket bound to one controller
#[derive(Debug)]
pub struct HciSocket {
    fd: RawFd,
    dev_id: u16,
}

// Define the sockaddr_hci structure
#[repr(C)]
struct SockaddrHci {
    hci_family: libc::sa_family_t,
    hci_dev: u16,
    hci_channel: u16,
}

fn cvt(result: libc::c_int) -> io::Result<libc::c_int> {
    if result < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(result)
    }
}

fn cvt_size(result: libc::ssize_t) -> io::Result<usize> {
    if result < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(result as usize)
    }
}

impl HciSocket {
    /// Opens a raw HCI socket bound to `dev_id` (0 for hci0)
    pub fn open(dev_id: u16) -> Result<Self, HciError> {
        let fd = cvt(unsafe {
            libc::socket(
                AF_BLUETOOTH,
                libc::SOCK_RAW | libc::SOCK_CLOEXEC,
                BTPROTO_HCI,
            )
        })
        .map_err(HciError::SocketError)?;

        let addr = SockaddrHci {
            hci_family: AF_BLUETOOTH as libc::sa_family_t,
            hci_dev: dev_id,
            hci_channel: HCI_CHANNEL_RAW,
        };

        let bound = cvt(unsafe {
            libc::bind(
                fd,
                &addr as *const _ as *const libc::sockaddr,
                std::mem::size_of::<SockaddrHci>() as libc::socklen_t,
            )
        });

        if let Err(err) = bound {
            unsafe { libc::close(fd) };
            return Err(HciError::BindError(err));
        }

        debug!("opened hci{} on fd {}", dev_id, fd);
        Ok(HciSocket { fd, dev_id })
    }

    /// The controller this socket is bound to
    pub fn dev_id(&self) -> u16 {
        self.dev_id
    }
}

impl RawChannel for HciSocket {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        cvt_size(unsafe { libc::write(self.fd, data.as_ptr() as *const libc::c_void, data.len()) })
    }

    fn read_nonblocking(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        cvt_size(unsafe {
            libc::recv(
                self.fd,
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
                libc::MSG_DONTWAIT,
            )
        })
    }

    fn wait_readable(&mut self, timeout: Duration) -> io::Result<usize> {
        let mut pfd = libc::pollfd {
            fd: self.fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let millis = timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;
        let ready = cvt(unsafe { libc::poll(&mut pfd, 1, millis) })?;
        Ok(ready as usize)
    }

    fn filter(&mut self) -> io::Result<HciFilter> {
        let mut buf = [0u8; HCI_FILTER_SIZE];
        let mut len = buf.len() as libc::socklen_t;
        cvt(unsafe {
            libc::getsockopt(
                self.fd,
                SOL_HCI,
                HCI_FILTER,
                buf.as_mut_ptr() as *mut libc::c_void,
                &mut len,
            )
        })?;

        HciFilter::from_sockopt_bytes(&buf[..len as usize]).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("short HCI filter option: {} bytes", len),
            )
        })
    }

    fn set_filter(&mut self, filter: &HciFilter) -> io::Result<()> {
        let buf = filter.to_sockopt_bytes();
        cvt(unsafe {
            libc::setsockopt(
                self.fd,
                SOL_HCI,
                HCI_FILTER,
                buf.as_ptr() as *const libc::c_void,
                buf.len() as libc::socklen_t,
            )
        })?;
        Ok(())
    }
}

impl AsRawFd for HciSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for HciSocket {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}
