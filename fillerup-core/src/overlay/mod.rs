//! Ephemeral notification overlay
//!
//! A single text slot shown on top of the face and dismissed by a one-shot
//! timer. Showing again while a dismissal is pending moves the deadline
//! instead of stacking a second timer.

pub mod notification;

pub use notification::{NotificationOverlay, NotificationRequest, ShowOutcome, Slot};
