//! # Domain Models
//!
//! Canonical types shared by the gateway, the analysis hand-off and the CLI.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Query`] | Instrument plus resolution, the gateway input |
//! | [`Instrument`] | Equity ticker, currency pair, or commodity |
//! | [`Candle`] | One OHLC point |
//! | [`Series`] | Ascending candles for one instrument/resolution |
//! | [`Resolution`] | M5, M30, H1, D1 |
//! | [`Symbol`] | Validated equity ticker |
//! | [`CurrencyCode`] | 3-letter currency code |
//! | [`Commodity`] | Fixed set of upstream commodity functions |
//! | [`UtcDateTime`] | UTC timestamp |

mod candle;
mod instrument;
mod resolution;
mod symbol;
mod timestamp;

pub use candle::{Candle, Series};
pub use instrument::{Commodity, CurrencyCode, Instrument, Query};
pub use resolution::Resolution;
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
