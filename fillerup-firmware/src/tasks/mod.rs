//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.
//! Only the controller task touches face state.

pub mod battery;
pub mod controller;
pub mod link_rx;
pub mod link_status;
pub mod link_tx;
pub mod message_timer;
pub mod tick;
pub mod vibes;

pub use battery::battery_task;
pub use controller::controller_task;
pub use link_rx::link_rx_task;
pub use link_status::link_status_task;
pub use link_tx::link_tx_task;
pub use message_timer::message_timer_task;
pub use tick::tick_task;
pub use vibes::vibes_task;
