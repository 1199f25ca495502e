//! Utility functions for common operations.
//!
//! - **URL validation**: syntactic checks for app links, plus a stricter
//!   http/https check before launching a browser
//! - **Text processing**: Unicode-aware width calculation, truncation, and
//!   control-character stripping for terminal output
//!
//! # Examples
//!
//! ```
//! use appshelf::util::{validate_url, display_width, truncate_to_width};
//!
//! let url = validate_url("https://example.com/app").unwrap();
//! let width = display_width("开发 tools"); // 4 + 1 + 5
//! let truncated = truncate_to_width("A rather long app name", 12);
//! ```

mod text;
mod url_validator;

pub use text::{display_width, pad_to_width, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_url, validate_url_for_open, UrlValidationError};
