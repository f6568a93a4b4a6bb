//! Strongly typed identifiers for login providers and backend sessions.
//!
//! Provider identifiers end up verbatim in the remember-provider cookie and in form action
//! query strings, so identifiers are limited to a cookie-safe alphabet: ASCII letters and
//! digits plus `_`, `-`, and `.`.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Longest accepted identifier, in bytes.
pub const IDENTIFIER_MAX_LEN: usize = 128;

macro_rules! def_id {
	($(#[$meta:meta])* $name:ident => $kind:literal) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Validates `value` and wraps it.
			pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
				let value = value.into();

				check_identifier($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				self
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				self
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, IdentifierError> {
				Self::new(value)
			}
		}
		impl From<$name> for String {
			fn from(id: $name) -> Self {
				id.0
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, IdentifierError> {
				Self::new(s)
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple($kind).field(&self.0).finish()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(self)
			}
		}
	};
}

def_id! {
	/// Registry key of a login provider, for example `1433416747` or `username_password`.
	ProviderId => "Provider"
}
def_id! {
	/// Backend session owning a form protection slot.
	SessionId => "Session"
}

/// Rejected identifier input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// Nothing was supplied.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Identifier kind (`Provider`, `Session`).
		kind: &'static str,
	},
	/// A character outside the cookie-safe alphabet was supplied.
	#[error("{kind} identifier contains the disallowed character {character:?}.")]
	InvalidCharacter {
		/// Identifier kind (`Provider`, `Session`).
		kind: &'static str,
		/// First offending character.
		character: char,
	},
	/// The identifier is longer than [`IDENTIFIER_MAX_LEN`].
	#[error("{kind} identifier exceeds {max} bytes.")]
	TooLong {
		/// Identifier kind (`Provider`, `Session`).
		kind: &'static str,
		/// Maximum accepted length.
		max: usize,
	},
}

fn check_identifier(kind: &'static str, value: &str) -> Result<(), IdentifierError> {
	if value.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if let Some(character) =
		value.chars().find(|&c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
	{
		return Err(IdentifierError::InvalidCharacter { kind, character });
	}
	if value.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}
