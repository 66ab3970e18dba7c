mod channel;
mod file;
mod message;

pub use channel::*;
pub use file::*;
pub use message::*;
