//! Collaborator traits
//!
//! These traits define the interface between the face logic and the
//! drawing, messaging and host services it drives.

pub mod io;
pub mod layer;
pub mod outbox;

pub use io::Io;
pub use layer::{FaceLayer, LayerSet, MessageLayer, RootLayer, StatusLayer};
pub use outbox::Outbox;
