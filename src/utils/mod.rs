pub mod clock;
pub mod rng;

pub use clock::{Clock, ManualClock, SystemClock};
pub use rng::{RngStream, rng_from_seed, worker_seed};
