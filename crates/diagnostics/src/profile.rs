//! Call-site profiling built on tracing spans.
//!
//! [`ProfileLayer`] records how long every span is entered and aggregates
//! the totals per call site (span name plus source location). Nested spans
//! count towards their parents, so the totals are cumulative times. After a
//! run, [`Profiler::report`] snapshots the statistics and
//! [`ProfileReport::write_top`] prints the most expensive call sites.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::span::{Attributes, Id};
use tracing::{Metadata, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Number of call sites printed by the command-line profiler.
pub const DEFAULT_TOP: usize = 50;

/// Identifies where a span was declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSite {
	pub target: String,
	pub name: String,
	pub file: Option<String>,
	pub line: Option<u32>,
}

impl CallSite {
	fn from_metadata(meta: &Metadata<'_>) -> Self {
		Self {
			target: meta.target().to_string(),
			name: meta.name().to_string(),
			file: meta.file().map(|f| f.rsplit(['/', '\\']).next().unwrap_or(f).to_string()),
			line: meta.line(),
		}
	}

	fn label(&self) -> String {
		match (&self.file, self.line) {
			(Some(file), Some(line)) => format!("{}::{} ({file}:{line})", self.target, self.name),
			(Some(file), None) => format!("{}::{} ({file})", self.target, self.name),
			_ => format!("{}::{}", self.target, self.name),
		}
	}
}

#[derive(Debug, Default, Clone, Copy)]
struct SiteStats {
	calls: u64,
	cumulative: Duration,
}

/// Per-span bookkeeping stored in the span's extensions.
#[derive(Debug, Default)]
struct SpanTiming {
	entered: Option<Instant>,
	busy: Duration,
}

/// Owner of the collected statistics.
///
/// Clone the handle freely; every clone and every layer made from it share
/// one table.
#[derive(Debug, Clone, Default)]
pub struct Profiler {
	sites: Arc<Mutex<HashMap<CallSite, SiteStats>>>,
}

impl Profiler {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a layer feeding this profiler.
	pub fn layer(&self) -> ProfileLayer {
		ProfileLayer {
			sites: Arc::clone(&self.sites),
		}
	}

	/// Snapshots the statistics, most expensive call site first.
	pub fn report(&self) -> ProfileReport {
		let sites = self.sites.lock();
		let mut entries: Vec<ProfileEntry> = sites
			.iter()
			.map(|(site, stats)| ProfileEntry {
				site: site.clone(),
				calls: stats.calls,
				cumulative: stats.cumulative,
			})
			.collect();
		entries.sort_by(|a, b| b.cumulative.cmp(&a.cumulative).then_with(|| a.site.label().cmp(&b.site.label())));
		ProfileReport { entries }
	}

	/// Drops everything collected so far.
	pub fn clear(&self) {
		self.sites.lock().clear();
	}
}

/// A [`tracing_subscriber::Layer`] accumulating span busy time per call site.
pub struct ProfileLayer {
	sites: Arc<Mutex<HashMap<CallSite, SiteStats>>>,
}

impl<S> tracing_subscriber::Layer<S> for ProfileLayer
where
	S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
	fn on_new_span(&self, _attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
		let Some(span) = ctx.span(id) else {
			return;
		};
		span.extensions_mut().insert(SpanTiming::default());
	}

	fn on_enter(&self, id: &Id, ctx: Context<'_, S>) {
		let Some(span) = ctx.span(id) else {
			return;
		};
		if let Some(timing) = span.extensions_mut().get_mut::<SpanTiming>() {
			timing.entered = Some(Instant::now());
		}
	}

	fn on_exit(&self, id: &Id, ctx: Context<'_, S>) {
		let Some(span) = ctx.span(id) else {
			return;
		};
		if let Some(timing) = span.extensions_mut().get_mut::<SpanTiming>()
			&& let Some(entered) = timing.entered.take()
		{
			timing.busy += entered.elapsed();
		}
	}

	fn on_close(&self, id: Id, ctx: Context<'_, S>) {
		let Some(span) = ctx.span(&id) else {
			return;
		};
		let busy = span.extensions().get::<SpanTiming>().map(|t| t.busy).unwrap_or_default();
		let site = CallSite::from_metadata(span.metadata());

		let mut sites = self.sites.lock();
		let stats = sites.entry(site).or_default();
		stats.calls += 1;
		stats.cumulative += busy;
	}
}

/// Aggregated statistics for one call site.
#[derive(Debug, Clone)]
pub struct ProfileEntry {
	pub site: CallSite,
	pub calls: u64,
	pub cumulative: Duration,
}

/// Snapshot of profiling statistics, sorted by cumulative time.
#[derive(Debug, Clone, Default)]
pub struct ProfileReport {
	pub entries: Vec<ProfileEntry>,
}

impl ProfileReport {
	/// Total number of recorded span closures.
	pub fn total_calls(&self) -> u64 {
		self.entries.iter().map(|e| e.calls).sum()
	}

	/// Writes the `top` most expensive call sites as a table.
	pub fn write_top(&self, top: usize, out: &mut dyn Write) -> io::Result<()> {
		writeln!(out, "{} span calls over {} call sites", self.total_calls(), self.entries.len())?;
		writeln!(out)?;
		writeln!(out, "{:>8}  {:>10}  {:>10}  call site", "ncalls", "cumtime", "percall")?;
		for entry in self.entries.iter().take(top) {
			let cum = entry.cumulative.as_secs_f64();
			let per_call = if entry.calls == 0 { 0.0 } else { cum / entry.calls as f64 };
			writeln!(out, "{:>8}  {:>10.6}  {:>10.6}  {}", entry.calls, cum, per_call, entry.site.label())?;
		}
		Ok(())
	}
}
