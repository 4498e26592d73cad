pub mod config;
pub mod core;
pub mod metrics;
pub mod registry;
pub mod spaces;
pub mod utils;
pub mod vector;
pub mod wob_env;
pub mod wrappers;

pub use crate::config::{Axes, WobConfig};
pub use crate::core::{Cursor, CursorGrid, Env, Frame, GymError, Info, InfoValue, PointerAction, PointerEnv, RenderFrame, Result, Step};
pub use crate::metrics::{EpisodeMetrics, LogSink, MemorySink, MetricsSink, NullSink};
pub use crate::spaces::{ActionSpace, ArrayBoxSpace, BoxSpace, Discrete, Space};
pub use crate::utils::{Clock, ManualClock, SystemClock};
pub use crate::vector::SyncVectorEnv;
pub use crate::wob_env::{WobChain, WobEnv};
pub use crate::wrappers::{
    ActionBox2Discrete, ApplyFilter, DiagnosticsInfo, Direction, Filter, GreyChannelWrapper, Monitor, MovingActionWrapper,
};

#[cfg(feature = "tensorboard")]
pub use crate::metrics::TensorboardSink;
