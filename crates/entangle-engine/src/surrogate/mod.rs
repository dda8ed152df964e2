//! Surrogate types
//!
//! - [`Variation`]: the strategies a surrogate is built with
//! - [`synthesize`]: builds the surrogate class from a catalog
//! - [`SurrogateRegistry`]: realizes each (origin, variation) pair once
//! - [`instantiate`]: creates surrogate instances

mod instantiate;
mod registry;
mod synthesizer;
mod variation;

pub use instantiate::instantiate;
pub use registry::{NameOwner, SurrogateId, SurrogateKey, SurrogateRegistry};
pub use synthesizer::{surrogate_name, synthesize};
pub use variation::{Variation, DEFAULT_VARIATION};
