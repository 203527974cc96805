//! Delivery outcome codes
//!
//! Reported when an inbound message is dropped or an outbound one fails.
//! None of these are ever shown to the user; the companion owns retries
//! and user-facing delivery errors.

/// Why a message did not make it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeliveryError {
    /// No ack arrived in time
    SendTimeout,
    /// The other side refused the message
    SendRejected,
    /// Link is down
    NotConnected,
    /// A previous message is still in flight
    Busy,
    /// Message did not fit the receive buffer
    BufferOverflow,
    /// Bytes arrived but did not decode
    Malformed,
    /// Anything else
    Internal,
}

// Wire format values
const CODE_SEND_TIMEOUT: u8 = 0x01;
const CODE_SEND_REJECTED: u8 = 0x02;
const CODE_NOT_CONNECTED: u8 = 0x03;
const CODE_BUSY: u8 = 0x04;
const CODE_BUFFER_OVERFLOW: u8 = 0x05;
const CODE_MALFORMED: u8 = 0x06;
const CODE_INTERNAL: u8 = 0x7F;

impl DeliveryError {
    /// Parse from wire code; unknown codes map to [`DeliveryError::Internal`]
    pub fn from_code(code: u8) -> Self {
        match code {
            CODE_SEND_TIMEOUT => DeliveryError::SendTimeout,
            CODE_SEND_REJECTED => DeliveryError::SendRejected,
            CODE_NOT_CONNECTED => DeliveryError::NotConnected,
            CODE_BUSY => DeliveryError::Busy,
            CODE_BUFFER_OVERFLOW => DeliveryError::BufferOverflow,
            CODE_MALFORMED => DeliveryError::Malformed,
            _ => DeliveryError::Internal,
        }
    }

    /// Convert to wire code
    pub fn code(self) -> u8 {
        match self {
            DeliveryError::SendTimeout => CODE_SEND_TIMEOUT,
            DeliveryError::SendRejected => CODE_SEND_REJECTED,
            DeliveryError::NotConnected => CODE_NOT_CONNECTED,
            DeliveryError::Busy => CODE_BUSY,
            DeliveryError::BufferOverflow => CODE_BUFFER_OVERFLOW,
            DeliveryError::Malformed => CODE_MALFORMED,
            DeliveryError::Internal => CODE_INTERNAL,
        }
    }
}
