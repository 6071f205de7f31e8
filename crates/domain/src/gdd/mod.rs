//! Growing degree days
//!
//! Heat units are computed per day from the daily maximum and minimum
//! temperature and accumulated across a growing season. Everything in this
//! module is pure: observations come in, records go out.

mod accumulator;
mod calculator;
mod observation;
mod record;
mod season;

pub use accumulator::{GddAccumulator, verify_coverage};
pub use calculator::{DEFAULT_BASE_TEMP, calculate_gdd};
pub use observation::DailyObservation;
pub use record::{DailyGddRecord, SeasonResult};
pub use season::{MonthDay, SeasonDates, SeasonWindow};
