//! Port definitions for the application layer
//!
//! Ports are interfaces the application layer uses to reach external
//! systems. Adapters in the infrastructure layer implement them.

pub mod completion_gateway;
