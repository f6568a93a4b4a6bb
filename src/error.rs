//! Controller-level error types shared across flows, providers, and collaborators.

// self
use crate::_prelude::*;

/// Controller-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical controller error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; aborts request processing before any output.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Form protection collaborator failure.
	#[error("{0}")]
	FormProtection(
		#[from]
		#[source]
		crate::protection::FormProtectionError,
	),

	/// The client dropped the session cookie even after the retry round-trip.
	#[error(
		"Login error: no session cookie was received after a retry. Please accept cookies from this site, otherwise you will not be able to use the system."
	)]
	CookieRequired,
}

/// Configuration and validation failures raised while wiring the controller.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A login provider entry lacks a required field.
	#[error("Login provider `{provider}` is missing the required `{field}` field.")]
	MissingField {
		/// Name of the missing field.
		field: &'static str,
		/// Identifier of the offending provider entry.
		provider: String,
	},
	/// No login provider has been registered.
	#[error("At least one login provider must be registered.")]
	EmptyRegistry,
	/// Two registered providers share the same identifier.
	#[error("Login provider `{provider}` is registered more than once.")]
	DuplicateProvider {
		/// Identifier registered twice.
		provider: String,
	},
	/// A provider entry names a capability that is not part of the catalog.
	#[error("Login provider `{provider}` references the unknown capability `{capability}`.")]
	UnknownCapability {
		/// Identifier of the offending provider entry.
		provider: String,
		/// Capability name that failed to resolve.
		capability: String,
	},
	/// A provider or session identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// The configured site URL cannot serve as a redirect origin.
	#[error("Site URL `{url}` must be an absolute http(s) URL.")]
	InvalidSiteUrl {
		/// Offending URL.
		url: String,
	},
	/// The configuration document could not be parsed.
	#[error("Configuration is invalid at `{path}`.")]
	Parse {
		/// Path of the failing field inside the document.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Builds a [`ConfigError::MissingField`] for the given provider entry.
	pub fn missing_field(field: &'static str, provider: impl Into<String>) -> Self {
		Self::MissingField { field, provider: provider.into() }
	}
}
impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = e.path().to_string();

		Self::Parse { path, source: e.into_inner() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn missing_field_names_field_and_provider() {
		let err: Error = ConfigError::missing_field("label", "1433416747").into();

		assert!(matches!(err, Error::Config(ConfigError::MissingField { field: "label", .. })));
		assert_eq!(
			err.to_string(),
			"Login provider `1433416747` is missing the required `label` field."
		);
	}

	#[test]
	fn cookie_required_is_user_visible() {
		assert!(Error::CookieRequired.to_string().contains("accept cookies"));
	}
}
