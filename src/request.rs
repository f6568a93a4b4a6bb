//! Inbound request snapshot consumed by the entry flows.

// self
use crate::_prelude::*;

/// Wire keys read from the request body, query string, and cookies.
pub mod keys {
	/// Redirect hint supplied with the login form.
	pub const REDIRECT_URL: &str = "redirect_url";
	/// Keep-alive flag set by the background login refresh window.
	pub const LOGIN_REFRESH: &str = "loginRefresh";
	/// Submit command; carries [`COOKIE_RETRY`] on the cookie retry round-trip.
	pub const SUBMIT_COMMAND: &str = "commandLI";
	/// Logout parameter; logout is requested when it equals [`LOGOUT_VALUE`].
	pub const LOGOUT: &str = "L";
	/// Value of [`LOGOUT`] requesting a logout.
	pub const LOGOUT_VALUE: &str = "OUT";
	/// Explicitly requested login provider.
	pub const LOGIN_PROVIDER: &str = "loginProvider";
	/// Submitted username.
	pub const USERNAME: &str = "username";
	/// Requested post-login interface.
	pub const INTERFACE: &str = "interface";
	/// Username preset for the login form.
	pub const PRESET_USERNAME: &str = "u";
	/// Cookie remembering the last used login provider.
	pub const LAST_PROVIDER_COOKIE: &str = "be_lastLoginProvider";
	/// Backend session cookie.
	pub const SESSION_COOKIE: &str = "be_typo_user";
	/// Submit command value marking the cookie retry round-trip.
	pub const COOKIE_RETRY: &str = "setCookie";
	/// Email address submitted to request a password reset.
	pub const EMAIL: &str = "email";
	/// Password reset token secret.
	pub const RESET_TOKEN: &str = "t";
	/// Identity the password reset token was issued for.
	pub const RESET_IDENTITY: &str = "i";
	/// Unix timestamp at which the password reset token expires.
	pub const RESET_EXPIRES: &str = "e";
}

/// Raw request fields as parsed by the hosting web layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestParams {
	/// Parsed form body.
	pub body: BTreeMap<String, String>,
	/// Query string parameters.
	pub query: BTreeMap<String, String>,
	/// Request cookies.
	pub cookies: BTreeMap<String, String>,
	/// Whether the request arrived over an encrypted transport.
	pub https: bool,
}
impl RequestParams {
	/// Looks a parameter up in the body first, then in the query string.
	pub fn param(&self, key: &str) -> Option<&str> {
		self.body.get(key).or_else(|| self.query.get(key)).map(String::as_str)
	}

	/// Adds a body parameter.
	pub fn with_body(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.body.insert(key.into(), value.into());

		self
	}

	/// Adds a query parameter.
	pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.insert(key.into(), value.into());

		self
	}

	/// Adds a cookie.
	pub fn with_cookie(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.cookies.insert(key.into(), value.into());

		self
	}

	/// Marks the transport as encrypted.
	pub fn over_https(mut self) -> Self {
		self.https = true;

		self
	}
}

/// Immutable per-request view of the fields relevant to the login flow.
///
/// Empty values are normalized to `None` so flows never need to distinguish a missing
/// parameter from a blank one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionRequestContext {
	/// Submitted username.
	pub username: Option<String>,
	/// Submit command (`commandLI`).
	pub submit_command: Option<String>,
	/// Explicitly requested provider identifier.
	pub login_provider: Option<String>,
	/// Provider identifier remembered in the last-used-provider cookie.
	pub last_provider_cookie: Option<String>,
	/// Whether the session cookie was sent back by the client.
	pub session_cookie_present: bool,
	/// Logout requested (`L=OUT`).
	pub logout: bool,
	/// Redirect hint, unsanitized.
	pub redirect_hint: Option<String>,
	/// Background keep-alive request.
	pub login_refresh: bool,
	/// Requested post-login interface.
	pub interface: Option<String>,
	/// Whether the request arrived over an encrypted transport.
	pub https: bool,
	/// Username preset for the form.
	pub preset_username: Option<String>,
}
impl SessionRequestContext {
	/// Derives the snapshot from raw request fields.
	pub fn from_params(params: &RequestParams) -> Self {
		let text = |key: &str| non_empty(params.param(key));

		Self {
			username: text(keys::USERNAME),
			submit_command: text(keys::SUBMIT_COMMAND),
			login_provider: text(keys::LOGIN_PROVIDER),
			last_provider_cookie: non_empty(
				params.cookies.get(keys::LAST_PROVIDER_COOKIE).map(String::as_str),
			),
			session_cookie_present: non_empty(
				params.cookies.get(keys::SESSION_COOKIE).map(String::as_str),
			)
			.is_some(),
			logout: params.param(keys::LOGOUT) == Some(keys::LOGOUT_VALUE),
			redirect_hint: text(keys::REDIRECT_URL),
			login_refresh: params.param(keys::LOGIN_REFRESH).is_some_and(is_truthy),
			interface: text(keys::INTERFACE),
			https: params.https,
			preset_username: text(keys::PRESET_USERNAME),
		}
	}

	/// A username or submit command was sent, i.e. a login attempt is in progress.
	pub fn is_login_in_progress(&self) -> bool {
		self.username.is_some() || self.submit_command.is_some()
	}

	/// Logout was requested outside the keep-alive window, which never logs off.
	pub fn is_logout(&self) -> bool {
		self.logout && !self.login_refresh
	}

	/// This request is the second leg of the cookie retry round-trip.
	pub fn is_cookie_retry(&self) -> bool {
		self.submit_command.as_deref() == Some(keys::COOKIE_RETRY)
	}
}

fn non_empty(value: Option<&str>) -> Option<String> {
	value.filter(|text| !text.is_empty()).map(ToOwned::to_owned)
}

fn is_truthy(value: &str) -> bool {
	!matches!(value, "" | "0" | "false")
}
