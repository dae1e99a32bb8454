//! Library side of the `sih` command: input discovery, logging setup and
//! the per-file pipeline.

pub mod discovery;
pub mod error;
pub mod logging;
pub mod lookups;
pub mod pipeline;

pub use discovery::collect_inputs;
pub use error::{DiscoveryError, PipelineError, SetupError};
pub use lookups::load_lookups;
pub use pipeline::{
    BatchObserver, NoopObserver, Pipeline, PipelineOptions, convert_batch, convert_file,
};
