//! Output destinations for error and diagnostic messages.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{DiagnosticsError, Result};

/// Where a stream of messages ends up.
#[derive(Debug, Default)]
pub enum Sink {
	/// The process standard error stream.
	Stderr,
	/// A file opened for the lifetime of the process.
	File {
		/// Path the file was created at.
		path: PathBuf,
		/// Buffered handle, flushed on [`Sink::flush`] and on drop.
		writer: BufWriter<File>,
	},
	/// An in-memory buffer, for capturing output in tests and tools.
	Memory(MemorySink),
	/// Messages are dropped.
	#[default]
	Disabled,
}

impl Sink {
	/// Creates (truncating) `path` and returns a sink writing to it.
	pub fn create(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let file = File::create(path).map_err(|error| DiagnosticsError::Open {
			path: path.to_path_buf(),
			error,
		})?;
		Ok(Self::File {
			path: path.to_path_buf(),
			writer: BufWriter::new(file),
		})
	}

	/// Returns a file sink for `path`, or `fallback` when no path is given.
	pub fn file_or(path: Option<&Path>, fallback: Sink) -> Result<Self> {
		match path {
			Some(path) => Self::create(path),
			None => Ok(fallback),
		}
	}

	/// Returns false for [`Sink::Disabled`].
	pub fn is_enabled(&self) -> bool {
		!matches!(self, Self::Disabled)
	}

	pub(crate) fn write_line(&mut self, line: &str) -> io::Result<()> {
		match self {
			Self::Stderr => {
				let mut err = io::stderr().lock();
				writeln!(err, "{line}")
			}
			Self::File { writer, .. } => writeln!(writer, "{line}"),
			Self::Memory(mem) => {
				let mut buf = mem.0.lock();
				buf.extend_from_slice(line.as_bytes());
				buf.push(b'\n');
				Ok(())
			}
			Self::Disabled => Ok(()),
		}
	}

	pub(crate) fn flush(&mut self) -> io::Result<()> {
		match self {
			Self::Stderr => io::stderr().flush(),
			Self::File { writer, .. } => writer.flush(),
			Self::Memory(_) | Self::Disabled => Ok(()),
		}
	}
}

/// Shared in-memory buffer behind [`Sink::Memory`].
///
/// Clones share the same buffer, so a caller can keep one handle and pass
/// the other into a sink.
#[derive(Debug, Clone, Default)]
pub struct MemorySink(Arc<Mutex<Vec<u8>>>);

impl MemorySink {
	pub fn new() -> Self {
		Self::default()
	}

	/// Everything written so far, lossily decoded as UTF-8.
	pub fn contents(&self) -> String {
		String::from_utf8_lossy(&self.0.lock()).into_owned()
	}

	/// Written lines, without trailing newlines.
	pub fn lines(&self) -> Vec<String> {
		self.contents().lines().map(str::to_string).collect()
	}

	/// Returns a sink that appends to this buffer.
	pub fn sink(&self) -> Sink {
		Sink::Memory(self.clone())
	}
}
