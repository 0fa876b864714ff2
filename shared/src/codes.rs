//! Human-readable business codes
//!
//! Codes follow `<PREFIX>-<unix seconds>-<random>` and are only unique on a
//! best-effort basis. The backend stores them under a `UNIQUE` constraint and
//! regenerates on collision.

use chrono::{DateTime, Utc};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Worker,
    Product,
    StockIn,
    StockOut,
    /// Worker self-registration code: `EMP` followed by six digits
    Registration,
}

impl CodeKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            CodeKind::Worker => "W",
            CodeKind::Product => "P",
            CodeKind::StockIn => "IN",
            CodeKind::StockOut => "OUT",
            CodeKind::Registration => "EMP",
        }
    }
}

/// Build a code for `kind` at `now` using `rng` for the random part
pub fn generate_code<R: Rng + ?Sized>(kind: CodeKind, now: DateTime<Utc>, rng: &mut R) -> String {
    match kind {
        CodeKind::Registration => format!("{}{}", kind.prefix(), rng.gen_range(100_000..=999_999)),
        _ => format!(
            "{}-{}-{}",
            kind.prefix(),
            now.timestamp(),
            rng.gen_range(1000..=9999)
        ),
    }
}

/// Code for `kind` stamped with the current time
pub fn new_code(kind: CodeKind) -> String {
    generate_code(kind, Utc::now(), &mut rand::thread_rng())
}
