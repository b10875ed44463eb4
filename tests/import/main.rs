//! Import pipeline tests for `mascot-rs`

mod archive;
mod convert;
mod fixtures;
mod recompose;
