//! Prelude module for `mascot_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use mascot_types::prelude::*;
//!
//! let descriptor = Descriptor::new();
//! let graph = SurfaceGraph::default();
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Surface types
	Animation,
	Collision,
	// Descriptor types
	Costume,
	Descriptor,
	Element,
	Interval,
	IntervalClass,
	Method,

	// Errors
	ParseError,

	Pattern,
	Surface,
	SurfaceGraph,

	// Text helpers
	TextEncoding,
	decode_text,
};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
