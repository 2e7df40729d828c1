//! Command/response engine
//!
//! Sends one HCI command over a [`RawChannel`] and waits for the event that
//! answers it. For the duration of a request the channel is locked and its
//! receive filter narrowed to the command's events; the previous filter is
//! put back on every exit path.

use crate::error::{HciError, Result};
use crate::hci::channel::{is_transient, RawChannel};
use crate::hci::constants::*;
use crate::hci::event::HciEvent;
use crate::hci::filter::HciFilter;
use crate::hci::opcode::OpCode;
use crate::hci::packet::{Packet, PacketType};
use crate::hci::params::{Parameters, ResponseDecoders};
use crate::hci::status::StatusCode;
use log::{debug, trace, warn};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Tunables for [`CommandEngine`] requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    /// Upper bound on a single readiness wait
    pub poll_interval: Duration,
    /// Overall deadline per request, `None` waits forever
    pub timeout: Option<Duration>,
    /// Most bytes held while waiting for a frame to complete
    pub max_buffered: usize,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            timeout: Some(Duration::from_secs(5)),
            max_buffered: HCI_MAX_FRAME_SIZE,
        }
    }
}

impl RequestConfig {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_buffered(mut self, max_buffered: usize) -> Self {
        self.max_buffered = max_buffered;
        self
    }
}

/// Cooperative cancellation for an in-flight request
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Holds the channel's previous filter and puts it back when dropped.
struct FilterGuard<'a, C: RawChannel> {
    channel: &'a mut C,
    saved: Option<HciFilter>,
}

impl<'a, C: RawChannel> FilterGuard<'a, C> {
    fn install(channel: &'a mut C, filter: &HciFilter) -> Result<Self> {
        let saved = channel.filter().map_err(HciError::GetFilterError)?;
        let guard = FilterGuard {
            channel,
            saved: Some(saved),
        };
        guard
            .channel
            .set_filter(filter)
            .map_err(HciError::SetFilterError)?;
        Ok(guard)
    }

    fn channel(&mut self) -> &mut C {
        &mut *self.channel
    }

    fn restore(&mut self) {
        if let Some(saved) = self.saved.take() {
            if let Err(err) = self.channel.set_filter(&saved) {
                warn!("failed to restore HCI filter: {}", err);
            }
        }
    }
}

impl<C: RawChannel> Drop for FilterGuard<'_, C> {
    fn drop(&mut self) {
        self.restore();
    }
}

/// Issues HCI commands and correlates the controller's answers
pub struct CommandEngine<C: RawChannel> {
    channel: Mutex<C>,
    decoders: ResponseDecoders,
    config: RequestConfig,
}

impl<C: RawChannel> CommandEngine<C> {
    /// Creates an engine with the built-in response decoders and default
    /// configuration
    pub fn new(channel: C) -> Self {
        Self::with_config(channel, RequestConfig::default())
    }

    pub fn with_config(channel: C, config: RequestConfig) -> Self {
        Self {
            channel: Mutex::new(channel),
            decoders: ResponseDecoders::with_defaults(),
            config,
        }
    }

    /// Replaces the response decoder registry
    pub fn with_decoders(mut self, decoders: ResponseDecoders) -> Self {
        self.decoders = decoders;
        self
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    pub fn decoders_mut(&mut self) -> &mut ResponseDecoders {
        &mut self.decoders
    }

    /// Gives the channel back
    pub fn into_inner(self) -> C {
        self.channel
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Sends `opcode` with `params` and returns the decoded response
    pub fn request(&self, opcode: OpCode, params: &Parameters) -> Result<Parameters> {
        self.request_with_cancel(opcode, params, &CancelToken::new())
    }

    /// Like [`request`](Self::request), giving up once `cancel` fires
    pub fn request_with_cancel(
        &self,
        opcode: OpCode,
        params: &Parameters,
        cancel: &CancelToken,
    ) -> Result<Parameters> {
        let frame = Packet::Command {
            opcode,
            params: params.to_bytes()?,
        }
        .to_bytes()?;

        // A poisoned lock only means another request panicked; its guard
        // already restored the filter.
        let mut channel = self.channel.lock().unwrap_or_else(PoisonError::into_inner);

        debug!("request {} ({} bytes)", opcode, frame.len());
        let mut guard = FilterGuard::install(&mut *channel, &HciFilter::for_command(opcode))?;

        trace!("tx {}", hex::encode(&frame));
        let written = guard.channel().write(&frame).map_err(HciError::SendError)?;
        if written != frame.len() {
            return Err(HciError::IncompleteWrite {
                written,
                expected: frame.len(),
            });
        }

        let result = self.await_response(guard.channel(), opcode, cancel);
        guard.restore();
        match &result {
            Ok(_) => debug!("request {} completed", opcode),
            Err(err) => debug!("request {} failed: {}", opcode, err),
        }
        result
    }

    fn await_response(
        &self,
        channel: &mut C,
        opcode: OpCode,
        cancel: &CancelToken,
    ) -> Result<Parameters> {
        let deadline = self.config.timeout.map(|timeout| Instant::now() + timeout);
        let mut pending: Vec<u8> = Vec::with_capacity(HCI_MAX_EVENT_SIZE);
        let mut scratch = [0u8; HCI_MAX_EVENT_SIZE];

        loop {
            if cancel.is_cancelled() {
                return Err(HciError::Cancelled(opcode));
            }

            let wait = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(HciError::Timeout(opcode));
                    }
                    self.config.poll_interval.min(deadline - now)
                }
                None => self.config.poll_interval,
            };

            match channel.wait_readable(wait) {
                Ok(0) => continue,
                Ok(_) => {}
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(HciError::ReceiveError(err)),
            }

            let n = match channel.read_nonblocking(&mut scratch) {
                Ok(0) => continue,
                Ok(n) => n,
                Err(err) if is_transient(&err) => continue,
                Err(err) => return Err(HciError::ReceiveError(err)),
            };
            trace!("rx {}", hex::encode(&scratch[..n]));
            pending.extend_from_slice(&scratch[..n]);

            if let Some(result) = self.process_buffered(&mut pending, opcode) {
                return result;
            }
        }
    }

    /// Consumes every complete frame at the front of `pending`, stopping
    /// early if one of them settles the request.
    fn process_buffered(
        &self,
        pending: &mut Vec<u8>,
        opcode: OpCode,
    ) -> Option<Result<Parameters>> {
        let mut offset = 0;
        let outcome = loop {
            let buf = &pending[offset..];
            let Some(&indicator) = buf.first() else {
                break None;
            };

            if PacketType::from_indicator(indicator).is_none() {
                warn!("dropping byte 0x{:02x}: not a packet indicator", indicator);
                offset += 1;
                continue;
            }

            let (packet, consumed) = Packet::parse(buf);
            let Some(packet) = packet else {
                break None;
            };
            offset += consumed;

            if let Some(result) = self.correlate(packet, opcode) {
                break Some(result);
            }
        };
        pending.drain(..offset);

        if outcome.is_none() && pending.len() > self.config.max_buffered {
            return Some(Err(HciError::BufferOverflow(self.config.max_buffered)));
        }
        outcome
    }

    fn correlate(&self, packet: Packet, opcode: OpCode) -> Option<Result<Parameters>> {
        let (code, params) = match packet {
            Packet::Event { code, params } => (code, params),
            other => {
                debug!("discarding {:?} packet", other.packet_type());
                return None;
            }
        };

        let event = match HciEvent::decode(code, &params) {
            Ok(event) => event,
            Err(err) => {
                debug!("discarding event: {}", err);
                return None;
            }
        };

        match event {
            HciEvent::CommandComplete {
                opcode: answered,
                return_params,
                ..
            } if answered == opcode => Some(self.decoders.decode(opcode, &return_params)),

            HciEvent::CommandStatus {
                status,
                opcode: answered,
                ..
            } if answered == opcode => match StatusCode::from_status(status) {
                Some(code) => Some(Err(HciError::Status(code))),
                None => {
                    debug!("{} accepted, awaiting completion", opcode);
                    None
                }
            },

            // LE commands may complete through an LE Meta subevent; nothing
            // correlates those yet.
            HciEvent::LeMeta { subevent, .. } => {
                debug!("LE meta subevent 0x{:02x} while awaiting {}", subevent, opcode);
                None
            }

            other => {
                debug!(
                    "ignoring event 0x{:02x} ({:?})",
                    other.event_code(),
                    other.opcode()
                );
                None
            }
        }
    }
}
