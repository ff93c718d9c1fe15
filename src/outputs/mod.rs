//! Output generation for scan results.
//!
//! # Submodules
//!
//! - [`console`]: renders pipeline events for the console scan and the interactive form
//! - [`json`]: writes a [`crate::models::ScanReport`] to disk for other tools
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── morning.json
//!     ├── afternoon.json
//!     └── evening.json
//! ```

pub mod console;
pub mod json;
