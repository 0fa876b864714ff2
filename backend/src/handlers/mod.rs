//! HTTP handlers

pub mod dashboard;
pub mod health;
pub mod notification;
pub mod product;
pub mod reference;
pub mod stock;
pub mod stock_in;
pub mod stock_out;

pub use dashboard::*;
pub use health::*;
pub use notification::*;
pub use product::*;
pub use reference::*;
pub use stock::*;
pub use stock_in::*;
pub use stock_out::*;
