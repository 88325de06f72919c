// ABOUTME: Tool module - defines tools, descriptors, validation, and the registry.
// ABOUTME: Core abstraction for what an agent can do besides replying.

mod descriptor;
mod registry;
mod traits;
mod validation;

pub use descriptor::*;
pub use registry::*;
pub use traits::*;
pub use validation::validate_arguments;

#[cfg(test)]
mod descriptor_test;
