mod action;
mod backend;
mod event;
mod input_area;
mod loading;
mod message;
mod role;

pub use action::*;
pub use backend::*;
pub use event::*;
pub use input_area::*;
pub use loading::*;
pub use message::*;
pub use role::*;
