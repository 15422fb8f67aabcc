//! Wall-clock ↔ slot conversion.
//!
//! The planning day is discretized into fixed-length slots counted from
//! the day start. All solver arithmetic happens on integer slots; wall
//! clock strings only appear at the boundary.
//!
//! # Key Components
//!
//! - [`DayClock`]: day bounds plus slot length; converts `"HH:MM"` to slot
//!   indices and back.
//! - [`normalize_hhmm`]: lenient intake parser that extracts `HH:MM` from
//!   ISO datetimes and free text.

mod clock;
mod normalize;

pub use clock::DayClock;
pub use normalize::normalize_hhmm;
