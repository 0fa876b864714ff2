//! Domain models for the warehouse inventory backend

mod notification;
mod reference;
mod stock;

pub use notification::*;
pub use reference::*;
pub use stock::*;
