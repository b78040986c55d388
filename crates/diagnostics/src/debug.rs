//! Hook for stepping through a phase under an external debugger.
//!
//! Run the binary under gdb or lldb with a breakpoint on
//! `angen_debug_break`; every phase wrapped by [`step`] stops there first
//! with the phase name logged at info level.

/// Breakpoint target. Does nothing.
#[unsafe(no_mangle)]
#[inline(never)]
pub extern "C" fn angen_debug_break() {
	std::hint::black_box(());
}

/// Runs `f`, stopping at [`angen_debug_break`] first when `enabled`.
pub fn step<R>(enabled: bool, phase: &str, f: impl FnOnce() -> R) -> R {
	if !enabled {
		return f();
	}

	tracing::info!(phase, "stepping: break on `angen_debug_break` to inspect");
	angen_debug_break();
	let span = tracing::trace_span!("step", phase);
	let _guard = span.enter();
	f()
}
