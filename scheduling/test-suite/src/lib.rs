mod helpers;
mod pool_ext;
mod recorder;

pub use helpers::{serial_map, test_config, wait_until};
pub use pool_ext::PoolExt;
pub use recorder::CompletionRecorder;
