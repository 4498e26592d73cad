// Wrappers for Env composition.
//
// The web-task chain, innermost first:
// - Monitor (ApplyFilter + DiagnosticsInfo)
// - ActionBox2Discrete
// - MovingActionWrapper
// - GreyChannelWrapper

pub mod action;
pub mod diagnostics;
pub mod filter;
pub mod observation;

pub use action::{ActionBox2Discrete, Direction, MovingActionWrapper};
pub use diagnostics::{DiagnosticsInfo, Monitor, diagnostics};
pub use filter::{ApplyFilter, Filter};
pub use observation::{GreyChannelWrapper, add_channel};
