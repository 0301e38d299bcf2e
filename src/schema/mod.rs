//! Frame record input schema
//!
//! This module defines the per-frame records a classifier emits and the
//! adapter that loads them into the frame-point IR.

mod adapter;
mod frame_record;

pub use adapter::*;
pub use frame_record::*;
