use std::process::ExitCode;

use angen::Cli;
use angen::error::EXIT_UNKNOWN_TARGET;
use angen::session::Outcome;
use clap::Parser;
#[allow(unused_imports, reason = "library dependencies are linked through `angen`")]
use {
	angen_diagnostics as _, angen_generators as _, angen_selector as _, angen_surface as _, indexmap as _,
	thiserror as _, tracing as _,
};

fn main() -> ExitCode {
	let cli = match Cli::try_parse() {
		Ok(cli) => cli,
		Err(e) => {
			let _ = e.print();
			return ExitCode::from(e.exit_code() as u8);
		}
	};

	match angen::run(&cli) {
		Ok(Some(Outcome::UnknownTarget(_))) => ExitCode::from(EXIT_UNKNOWN_TARGET),
		Ok(_) => ExitCode::SUCCESS,
		Err(e) => {
			if !e.is_reported() {
				eprintln!("angen: {e}");
			}
			ExitCode::from(e.exit_code())
		}
	}
}
