//! Redacted form protection token wrapper.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::_prelude::*;

const TOKEN_LEN: usize = 32;

/// Session-scoped form protection secret that never shows up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormToken(String);
impl FormToken {
	/// Wraps an existing token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Draws a fresh random alphanumeric token.
	pub fn generate() -> Self {
		Self(rand::rng().sample_iter(Alphanumeric).take(TOKEN_LEN).map(char::from).collect())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for FormToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for FormToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("FormToken").field(&"<redacted>").finish()
	}
}
impl Display for FormToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_formatters_redact() {
		let token = FormToken::new("super-secret");

		assert_eq!(format!("{token:?}"), "FormToken(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
	}

	#[test]
	fn generated_tokens_are_alphanumeric_and_distinct() {
		let a = FormToken::generate();
		let b = FormToken::generate();

		assert_eq!(a.expose().len(), TOKEN_LEN);
		assert!(a.expose().chars().all(|c| c.is_ascii_alphanumeric()));
		assert_ne!(a, b);
	}
}
