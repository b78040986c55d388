//! Name selectors for feature and extension filtering.
//!
//! A [`Selector`] is a predicate over full element names. Selectors are
//! compiled from the name lists given on the command line with [`compile`]:
//!
//! * a non-empty list matches exactly the listed names, anchored at both
//!   ends, so `ANARI_KHR_a` does not match `ANARI_KHR_ab`;
//! * an empty list falls back to a caller-supplied default, usually
//!   [`Selector::Any`];
//! * an empty list without a default matches nothing.
//!
//! Lists may also hold raw regular expression fragments, in which case the
//! fragments are joined into a single `^(f1|f2|...)$` alternation.
//!
//! ```
//! use angen_selector::{Selector, compile};
//!
//! let features = compile(&["ANARI_CORE_API_1_0"], Some(Selector::Any), false)?;
//! assert!(features.matches("ANARI_CORE_API_1_0"));
//! assert!(!features.matches("ANARI_CORE_API_1_1"));
//!
//! let nothing = compile::<&str>(&[], None, false)?;
//! assert!(!nothing.matches(""));
//! # Ok::<(), angen_selector::SelectorError>(())
//! ```

mod error;

use std::fmt;

use indexmap::IndexSet;
use regex::Regex;

pub use error::{Result, SelectorError};

/// A compiled predicate over element names.
#[derive(Debug, Clone, Default)]
pub enum Selector {
	/// Matches no name at all.
	#[default]
	Never,
	/// Matches every name.
	Any,
	/// Matches exactly the contained names, in insertion order for display.
	Literal(IndexSet<String>),
	/// Matches names fully matched by an anchored alternation.
	Pattern(Regex),
}

impl Selector {
	/// Builds a literal selector from exact names.
	///
	/// An empty iterator yields [`Selector::Never`].
	pub fn literal<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let names: IndexSet<String> = names.into_iter().map(Into::into).collect();
		if names.is_empty() { Self::Never } else { Self::Literal(names) }
	}

	/// Returns true if `name` is selected.
	pub fn matches(&self, name: &str) -> bool {
		match self {
			Self::Never => false,
			Self::Any => true,
			Self::Literal(names) => names.contains(name),
			Self::Pattern(re) => re.is_match(name),
		}
	}

	/// Exact names for literal selectors, `None` for every other variant.
	///
	/// Callers use this to check that explicitly requested names exist;
	/// patterns cannot be checked that way.
	pub fn literals(&self) -> Option<&IndexSet<String>> {
		match self {
			Self::Literal(names) => Some(names),
			_ => None,
		}
	}

	/// Returns true for [`Selector::Never`].
	pub fn is_never(&self) -> bool {
		matches!(self, Self::Never)
	}
}

impl fmt::Display for Selector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Never => f.write_str("<none>"),
			Self::Any => f.write_str(".*"),
			Self::Literal(names) => {
				f.write_str("^(")?;
				for (i, name) in names.iter().enumerate() {
					if i > 0 {
						f.write_str("|")?;
					}
					f.write_str(&regex::escape(name))?;
				}
				f.write_str(")$")
			}
			Self::Pattern(re) => f.write_str(re.as_str()),
		}
	}
}

/// Compiles a list of names or regex fragments into a [`Selector`].
///
/// * Non-empty `names`: with `names_are_regex` unset every entry is an exact
///   name; otherwise each entry is validated as a regex fragment and the
///   fragments are joined into `^(f1|f2|...)$`.
/// * Empty `names` with a `default`: the default is returned unchanged.
/// * Empty `names` without a default: [`Selector::Never`]. An empty
///   alternation is never built.
///
/// # Errors
///
/// Returns [`SelectorError::InvalidPattern`] naming the first fragment that
/// fails to compile. Literal names never fail.
pub fn compile<S: AsRef<str>>(names: &[S], default: Option<Selector>, names_are_regex: bool) -> Result<Selector> {
	if names.is_empty() {
		return Ok(default.unwrap_or(Selector::Never));
	}

	if !names_are_regex {
		return Ok(Selector::literal(names.iter().map(|n| n.as_ref())));
	}

	for fragment in names {
		let fragment = fragment.as_ref();
		Regex::new(fragment).map_err(|source| SelectorError::InvalidPattern {
			fragment: fragment.to_string(),
			source,
		})?;
	}

	let joined = names.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("|");
	let re = Regex::new(&format!("^({joined})$")).map_err(|source| SelectorError::InvalidPattern {
		fragment: joined.clone(),
		source,
	})?;
	Ok(Selector::Pattern(re))
}
