#![allow(dead_code)] // Each test binary uses a different subset of helpers

pub mod builders;
pub mod recording_gateway;
pub mod strategies;

pub use builders::*;
pub use recording_gateway::*;
pub use strategies::*;
