//! Hushlight Core - display model and command scheduling.
//!
//! This crate holds everything about *what* the presence light should show:
//! colors and modes, the timed command queue, the steady-state fallback and
//! the notification overlay. Talking to the hardware lives in `hushlight-hid`.

pub mod color;
pub mod command;
pub mod error;
pub mod notification;
pub mod queue;
pub mod scheduler;
pub mod sequence;
pub mod shutdown;
pub mod state;

pub use color::{Color, ColorChoice, Mode, NotificationMode, SignalMode, command_code};
pub use command::Command;
pub use error::{CoreError, Result};
pub use notification::NotificationConfig;
pub use queue::CommandQueue;
pub use scheduler::{DisplaySink, Scheduler};
pub use sequence::DisplayCommand;
pub use shutdown::ShutdownSignal;
pub use state::{StatusSnapshot, SteadyState, TouchEdge, TouchState};
