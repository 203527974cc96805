//! Link message types
//!
//! Either side may push a dictionary. The receiver answers every push
//! with an ack (accepted) or a nack (rejected, with a reason), echoing the
//! dictionary so the sender can match the outcome to what it sent.

use crate::dictionary::{Dictionary, DictionaryError, MAX_ENCODED_SIZE};
use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use crate::keys::MessageKey;
use crate::result::DeliveryError;

// Message type IDs
pub const MSG_PUSH: u8 = 0x01;
pub const MSG_ACK: u8 = 0x02;
pub const MSG_NACK: u8 = 0x03;

// Compile-time check that a nack with a full dictionary fits in a frame
const _: () = assert!(1 + MAX_ENCODED_SIZE <= MAX_PAYLOAD_SIZE);

/// A message on the companion link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkMessage {
    /// Dictionary pushed by the sender
    Push(Dictionary),
    /// Receiver accepted this dictionary
    Ack(Dictionary),
    /// Receiver rejected this dictionary
    Nack {
        reason: DeliveryError,
        dict: Dictionary,
    },
}

impl From<DictionaryError> for FrameError {
    fn from(_: DictionaryError) -> Self {
        FrameError::InvalidFrame
    }
}

impl LinkMessage {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let mut payload = [0u8; MAX_PAYLOAD_SIZE];
        match self {
            LinkMessage::Push(dict) => {
                let len = dict.encode(&mut payload)?;
                Frame::new(MSG_PUSH, &payload[..len])
            }
            LinkMessage::Ack(dict) => {
                let len = dict.encode(&mut payload)?;
                Frame::new(MSG_ACK, &payload[..len])
            }
            LinkMessage::Nack { reason, dict } => {
                payload[0] = reason.code();
                let len = dict.encode(&mut payload[1..])?;
                Frame::new(MSG_NACK, &payload[..1 + len])
            }
        }
    }

    /// Parse a message from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_PUSH => Ok(LinkMessage::Push(Dictionary::decode(&frame.payload)?)),
            MSG_ACK => Ok(LinkMessage::Ack(Dictionary::decode(&frame.payload)?)),
            MSG_NACK => {
                let (&code, rest) = frame
                    .payload
                    .split_first()
                    .ok_or(FrameError::InvalidFrame)?;
                Ok(LinkMessage::Nack {
                    reason: DeliveryError::from_code(code),
                    dict: Dictionary::decode(rest)?,
                })
            }
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Whether this is the ack or nack for `pushed`
    pub fn answers(&self, pushed: &Dictionary) -> bool {
        match self {
            LinkMessage::Push(_) => false,
            LinkMessage::Ack(dict) | LinkMessage::Nack { dict, .. } => dict == pushed,
        }
    }
}

/// What an inbound dictionary asks of the watch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InboundKind {
    /// Reply with [`SetupInfo`]; settings are untouched
    SetupInfoRequest,
    /// Apply every tuple as a settings update
    SettingsUpdate,
}

impl InboundKind {
    /// Classify by the first tuple only
    ///
    /// The request marker is recognised solely in first position; anywhere
    /// else it is just an unrecognised settings key.
    pub fn classify(dict: &Dictionary) -> Self {
        match dict.first().and_then(|t| t.message_key()) {
            Some(MessageKey::RequestSetupInfo) => InboundKind::SetupInfoRequest,
            _ => InboundKind::SettingsUpdate,
        }
    }
}

/// Watch facts the companion needs before showing its settings page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetupInfo {
    /// Watch clock is in 24-hour style
    pub clock_24h: bool,
    /// Settings schema version this build understands
    pub installed_version: i32,
}

impl SetupInfo {
    /// Build the outbound dictionary
    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        // Two tuples always fit
        let _ = dict.push(MessageKey::Clock24Hour, self.clock_24h as i32);
        let _ = dict.push(MessageKey::CurrentVersion, self.installed_version);
        dict
    }
}
