//! Authentication state contract consumed by the entry flows.

/// View of the current backend user session.
///
/// Credential verification happens before the controller runs; implementations only report
/// the result and perform side effects the controller asks for.
pub trait AuthenticationState
where
	Self: Send + Sync,
{
	/// Returns `true` when a backend user is authenticated for this request.
	fn is_logged_in(&self) -> bool;

	/// Terminates the current backend user session.
	fn log_off(&self);

	/// Per-user redirect target that overrides interface routing after login, if configured.
	fn redirect_override(&self) -> Option<String> {
		None
	}

	/// Records the interface the user is routed into (empty when none was chosen).
	fn remember_interface(&self, _interface: &str) {}
}
