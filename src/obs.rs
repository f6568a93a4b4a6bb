//! Optional observability helpers for entry flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `session_entry.flow` with the `flow` and
//!   `stage` (call site) fields, plus debug events for provider selection and redirect handling.
//! - Enable `metrics` to increment the `session_entry_outcome_total` counter for every
//!   attempt and outcome, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Entry points observed by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryFlow {
	/// Login form display and post-login redirect.
	Login,
	/// Explicit logout.
	Logout,
	/// Background keep-alive from the login refresh window.
	Refresh,
	/// Password reset screens.
	PasswordReset,
}
impl EntryFlow {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			EntryFlow::Login => "login",
			EntryFlow::Logout => "logout",
			EntryFlow::Refresh => "refresh",
			EntryFlow::PasswordReset => "password_reset",
		}
	}
}
impl Display for EntryFlow {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryOutcome {
	/// Entry to a controller operation.
	Attempt,
	/// A form was rendered.
	RenderForm,
	/// A redirect was issued.
	Redirect,
	/// The opening window was asked to resume and close this one.
	CloseWindow,
	/// Failure propagated back to the caller.
	Failure,
}
impl EntryOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			EntryOutcome::Attempt => "attempt",
			EntryOutcome::RenderForm => "render_form",
			EntryOutcome::Redirect => "redirect",
			EntryOutcome::CloseWindow => "close_window",
			EntryOutcome::Failure => "failure",
		}
	}
}
impl Display for EntryOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
