//! # scrapefn Core
//!
//! Invocation orchestration for the scrapefn worker: the routine registry
//! that routes path segments to automation routines, and the handler that
//! drives one invocation from trigger to response envelope with guaranteed
//! session release.

pub mod handler;
pub mod registry;

pub use handler::{Handler, HandlerError};
pub use registry::RoutineRegistry;
