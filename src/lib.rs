#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `mascot-rs` imports legacy desktop mascot packages and turns their layered
//! surface graphs into static, emotion-keyed avatar bundles.
//!
pub use mascot_internal::*;
