mod action;
mod api;
mod author;
mod encounter;
mod event;
mod message;
mod note;
mod stream;
mod textarea;

pub use action::*;
pub use api::*;
pub use author::*;
pub use encounter::*;
pub use event::*;
pub use message::*;
pub use note::*;
pub use stream::*;
pub use textarea::*;
