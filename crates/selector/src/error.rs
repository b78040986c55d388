//! Error types for selector compilation.

use thiserror::Error;

/// Errors that can occur when compiling a selector.
#[derive(Debug, Error)]
pub enum SelectorError {
	/// A raw regular expression fragment failed to compile.
	#[error("invalid pattern '{fragment}': {source}")]
	InvalidPattern {
		/// The offending fragment, exactly as supplied.
		fragment: String,
		/// The underlying regex error.
		source: regex::Error,
	},
}

/// Result type for selector compilation.
pub type Result<T> = std::result::Result<T, SelectorError>;
