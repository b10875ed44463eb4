//! This crate provides the data model and text parsers for `mascot-rs`.
//!
//! # File Formats
//!
//! - **`descript.txt`**: Flat `key,value` descriptor with costume (bind group) metadata
//! - **`surfaces*.txt`**: Scoped surface definitions: layer elements, collisions and animations
//!
//! Both formats are legacy text that may be stored as Shift-JIS or UTF-8.
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use mascot_types::prelude::*;
//!
//! let descriptor = Descriptor::parse_str("name,Sample\nsakura.bindgroup0.name,Default\n");
//! let graph = SurfaceGraph::parse("surface0\n{\nelement0,base,surface0.png,0,0\n}\n");
//! assert_eq!(descriptor.costumes().len(), 1);
//! assert!(graph.contains(0));
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use mascot_types::file::surfaces::parse_id_set;
//!
//! let ids = parse_id_set("0-9,!5");
//! assert_eq!(ids.len(), 9);
//! ```

pub mod file;

/// `use mascot_types::prelude::*;` to import commonly used items.
pub mod prelude;
