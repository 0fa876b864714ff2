//! Business logic services for the warehouse inventory backend

pub mod expiry;
pub mod ledger;
pub mod notification;
pub mod product;
pub mod recorder;
pub mod reference;
pub mod stock_in;
pub mod stock_out;

pub use expiry::{ExpiryAlertStore, ExpiryScanner, PgExpiryStore, ScanOutcome, ScanReport};
pub use ledger::LedgerService;
pub use notification::NotificationPolicyService;
pub use product::ProductService;
pub use recorder::TransactionRecorder;
pub use reference::{NamedKind, ReferenceService};
pub use stock_in::StockInService;
pub use stock_out::StockOutService;
