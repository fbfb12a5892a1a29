pub mod actions;
mod chat_window;
pub mod events;
mod export;
pub mod markup;
mod message_view;
mod scroll;
mod session_state;
mod storage;

pub use chat_window::*;
pub use export::*;
pub use message_view::*;
pub use scroll::*;
pub use session_state::*;
pub use storage::*;
