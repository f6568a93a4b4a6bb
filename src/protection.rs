//! Form protection (CSRF) token contracts and the built-in in-memory implementation.
//!
//! A session owns one secret session token. Per-form tokens are derived from it, so rotating the
//! session token invalidates every outstanding form. The token also lives in a longer-lived
//! registry keyed by session, which lets a background login refresh restore the exact secret
//! forms in the opening window were rendered with.

pub mod memory;

pub use memory::{MemoryFormProtection, ProtectionOp, TokenRegistry};

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
// self
use crate::{_prelude::*, auth::FormToken};

/// Session-scoped form protection token store.
///
/// The login path calls [`store_session_token_in_registry`](Self::store_session_token_in_registry)
/// only. The keep-alive path calls
/// [`set_session_token_from_registry`](Self::set_session_token_from_registry) followed by
/// [`persist_session_token`](Self::persist_session_token) only.
pub trait FormProtection
where
	Self: Send + Sync,
{
	/// Creates the session token if needed and stores it in the registry.
	fn store_session_token_in_registry(&self) -> Result<(), FormProtectionError>;

	/// Replaces the session token with the one held in the registry.
	fn set_session_token_from_registry(&self) -> Result<(), FormProtectionError>;

	/// Writes the current session token into the session.
	fn persist_session_token(&self) -> Result<(), FormProtectionError>;

	/// Derives the token for one form instance.
	fn generate_token(
		&self,
		form: &str,
		action: &str,
		instance: &str,
	) -> Result<FormToken, FormProtectionError>;

	/// Checks a submitted token against the one derived for the form instance.
	fn validate_token(&self, token: &str, form: &str, action: &str, instance: &str) -> bool;

	/// Forgets the session token everywhere; used on logoff.
	fn clean(&self);
}

/// Error type produced by [`FormProtection`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum FormProtectionError {
	/// The registry holds no token for this session.
	#[error("No form protection token is registered for session `{session}`.")]
	MissingRegistryToken {
		/// Session the lookup was made for.
		session: String,
	},
	/// Backend-level failure of the token storage.
	#[error("Form protection backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Derives a per-form token from the session token.
pub fn derive_form_token(session: &FormToken, form: &str, action: &str, instance: &str) -> FormToken {
	let mut hasher = Sha256::new();

	for part in [session.expose(), form, action, instance] {
		hasher.update((part.len() as u64).to_be_bytes());
		hasher.update(part.as_bytes());
	}

	FormToken::new(URL_SAFE_NO_PAD.encode(hasher.finalize()))
}

/// Compares two tokens in constant time for equal lengths.
pub fn tokens_match(expected: &str, submitted: &str) -> bool {
	expected.as_bytes().ct_eq(submitted.as_bytes()).into()
}
