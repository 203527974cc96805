//! Companion link protocol
//!
//! The watch and its paired phone exchange small dictionaries of
//! `key: i32` tuples. Keys are stable numeric identifiers (see
//! [`keys::MessageKey`]); the two sides are deployed independently, so an
//! unknown key must always be skippable.
//!
//! # Protocol Overview
//!
//! Dictionaries travel inside a simple binary frame:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–160B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! A push carries a dictionary; the receiving side answers with an ack or
//! a nack echoing it, which the sender surfaces as sent/failed outcomes.

#![no_std]
#![deny(unsafe_code)]

pub mod dictionary;
pub mod frame;
pub mod keys;
pub mod messages;
pub mod result;

pub use dictionary::{Dictionary, DictionaryError, Tuple, MAX_TUPLES};
pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use keys::MessageKey;
pub use messages::{InboundKind, LinkMessage, SetupInfo};
pub use result::DeliveryError;
