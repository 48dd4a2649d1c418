pub mod actions;
pub mod clipboard;
pub mod events;
mod notes;
mod scroll;
mod session;
mod transcript;

pub use notes::*;
pub use scroll::*;
pub use session::*;
pub use transcript::*;
