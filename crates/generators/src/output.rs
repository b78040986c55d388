//! File writing shared by every generator.

use std::fs;
use std::path::Path;

use angen_surface::{GenResult, GenerateError, GeneratorOptions};

/// First line of every generated include fragment.
pub(crate) const DO_NOT_EDIT: &str =
	"// WARNING: DO NOT MODIFY! This file is automatically generated from the API registry";

/// Writes `contents` to `path`, creating missing parent directories.
pub(crate) fn write_file(path: &Path, contents: &str) -> GenResult<()> {
	if let Some(parent) = path.parent()
		&& !parent.as_os_str().is_empty()
	{
		fs::create_dir_all(parent).map_err(|e| GenerateError::io(parent, e))?;
	}
	fs::write(path, contents).map_err(|e| GenerateError::io(path, e))?;
	tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote output");
	Ok(())
}

/// Writes an include fragment under the output directory.
pub(crate) fn write_include(options: &GeneratorOptions, relative: &str, body: &str) -> GenResult<()> {
	let text = format!("{DO_NOT_EDIT}\n{body}");
	write_file(&options.output_child(relative), &text)
}

/// Touches the primary output file once a batch of includes is complete.
///
/// Build systems depend on this file instead of every fragment.
pub(crate) fn write_marker(options: &GeneratorOptions, files: usize) -> GenResult<()> {
	write_file(&options.output_path(), &format!("{files} include files generated\n"))
}

/// The configured prefix lines, newline-terminated.
pub(crate) fn prefix(options: &GeneratorOptions) -> String {
	options.prefix_text.iter().map(|line| format!("{line}\n")).collect()
}
