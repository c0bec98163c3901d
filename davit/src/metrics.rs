//! Transfer engine metrics.
//!
//! Counters for exchange outcomes and byte volume, registered with
//! metriken for Prometheus exposition by whoever hosts the process.

use metriken::{Counter, metric};

// ── Transfers ───────────────────────────────────────────────────────────

#[metric(
    name = "davit/transfers/started",
    description = "Transfers handed to a transport"
)]
pub static TRANSFERS_STARTED: Counter = Counter::new();

#[metric(
    name = "davit/transfers/completed",
    description = "Transfers that ran to the end of the exchange"
)]
pub static TRANSFERS_COMPLETED: Counter = Counter::new();

#[metric(
    name = "davit/transfers/failed",
    description = "Transfers that ended in a transport error"
)]
pub static TRANSFERS_FAILED: Counter = Counter::new();

// ── Bytes ───────────────────────────────────────────────────────────────

#[metric(name = "davit/bytes/sent", description = "Request bytes written")]
pub static BYTES_SENT: Counter = Counter::new();

#[metric(name = "davit/bytes/received", description = "Response bytes received")]
pub static BYTES_RECEIVED: Counter = Counter::new();
