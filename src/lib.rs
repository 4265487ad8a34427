//! # gendist
//!
//! Regenerates derived source code for a multi-package project and
//! distributes it back into each package's source tree.
//!
//! A run goes through fixed stages:
//!
//! - **Pre-processing**: sweep each package's subtree of the shared output directory
//! - **Generating**: one batched call of the external generator for all packages
//! - **Post-processing**: sweep stale generated code, then move fresh artifacts
//!   into `<package>/Generated/...`, flattened per category
//! - **Finalizing**: special single-file relocations and removal of the
//!   generator's transient list files
//!
//! Version-control metadata and ignore files are never deleted or moved.

pub mod cli;
pub mod common;
pub mod fsops;
pub mod pipeline;
