//! Output generation.
//!
//! - [`json`]: writes the ranked shortlist consumed by the summarizer
//!
//! # Output Structure
//!
//! ```text
//! data/
//! └── input.json   # [{title, content, url, source, published}, ...]
//! ```

pub mod json;
