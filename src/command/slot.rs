//! Single pending-command slot between the radio callback and the tick loop.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

use crate::error::ParseError;

use super::{Command, Endpoint};

/// Largest payload accepted from the radio.
pub const PAYLOAD_CAPACITY: usize = 128;

/// Raw command text as received, tagged with its endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    endpoint: Endpoint,
    payload: heapless::String<PAYLOAD_CAPACITY>,
}

impl Inbound {
    /// Copy a received payload.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::PayloadTooLong`] if it does not fit.
    pub fn new(endpoint: Endpoint, payload: &str) -> Result<Self, ParseError> {
        let payload =
            heapless::String::try_from(payload).map_err(|_| ParseError::PayloadTooLong)?;
        Ok(Self { endpoint, payload })
    }

    /// Endpoint the payload arrived on.
    #[inline]
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Payload text.
    #[inline]
    pub fn payload(&self) -> &str {
        self.payload.as_str()
    }

    /// Decode the payload.
    pub fn parse(&self) -> Result<Option<Command>, ParseError> {
        Command::parse(self.endpoint, self.payload.as_str())
    }
}

/// Holds at most one command until the next tick boundary.
///
/// Posting overwrites whatever was still pending. The slot is written under
/// the raw mutex `M`, so a command posted mid-tick is seen by the next
/// [`take`](CommandSlot::take), never by the tick in progress.
///
/// ```rust,ignore
/// static COMMANDS: CommandSlot<CriticalSectionRawMutex> = CommandSlot::new();
///
/// // radio callback
/// COMMANDS.post(Endpoint::Step, "FWD1500")?;
///
/// // main loop
/// controller.tick(now, COMMANDS.take());
/// ```
pub struct CommandSlot<M: RawMutex> {
    pending: Signal<M, Inbound>,
}

impl<M: RawMutex> Default for CommandSlot<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> CommandSlot<M> {
    /// Create an empty slot.
    pub const fn new() -> Self {
        Self {
            pending: Signal::new(),
        }
    }

    /// Store a received payload, replacing any command not yet taken.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::PayloadTooLong`] and leaves the slot unchanged if
    /// the payload does not fit.
    pub fn post(&self, endpoint: Endpoint, payload: &str) -> Result<(), ParseError> {
        let inbound = Inbound::new(endpoint, payload)?;
        self.pending.signal(inbound);
        Ok(())
    }

    /// Take the pending command, if any.
    pub fn take(&self) -> Option<Inbound> {
        self.pending.try_take()
    }

    /// Whether a command is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.signaled()
    }
}
