//! External API integrations

pub mod dispatcher;
pub mod telegram;

pub use dispatcher::{AlertDispatcher, DispatchError, LogDispatcher};
pub use telegram::TelegramClient;
