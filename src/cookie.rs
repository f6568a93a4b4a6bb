//! Outbound cookie emitted when a non-primary login provider is selected.

// crates.io
use time::{UtcOffset, format_description::BorrowedFormatItem, macros::format_description};
// self
use crate::{_prelude::*, auth::ProviderId, request::keys};

/// Lifetime of the remembered-provider cookie.
pub const REMEMBER_PROVIDER_TTL: Duration = Duration::days(90);

const HTTP_DATE: &[BorrowedFormatItem<'static>] = format_description!(
	"[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

/// `SameSite` cookie attribute values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SameSite {
	/// Sent only with same-site requests.
	Strict,
	/// Sent with same-site requests and top-level navigations.
	Lax,
	/// Sent with every request; requires `Secure`.
	None,
}
impl SameSite {
	/// Returns the attribute value as written in `Set-Cookie`.
	pub const fn as_str(self) -> &'static str {
		match self {
			SameSite::Strict => "Strict",
			SameSite::Lax => "Lax",
			SameSite::None => "None",
		}
	}
}
impl Display for SameSite {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Long-lived, HTTP-only cookie remembering the last selected login provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberProviderCookie {
	/// Cookie name.
	pub name: String,
	/// Remembered provider.
	pub value: ProviderId,
	/// Path the cookie is scoped to.
	pub path: String,
	/// Absolute expiry instant.
	pub expires_at: OffsetDateTime,
	/// Whether the `Secure` attribute is set.
	pub secure: bool,
	/// Whether the `HttpOnly` attribute is set.
	pub http_only: bool,
	/// `SameSite` attribute.
	pub same_site: SameSite,
}
impl RememberProviderCookie {
	/// Builds the cookie for `provider`, expiring [`REMEMBER_PROVIDER_TTL`] after `now`.
	pub fn new(
		provider: ProviderId,
		path: impl Into<String>,
		secure: bool,
		now: OffsetDateTime,
	) -> Self {
		Self {
			name: keys::LAST_PROVIDER_COOKIE.into(),
			value: provider,
			path: path.into(),
			expires_at: now + REMEMBER_PROVIDER_TTL,
			secure,
			http_only: true,
			same_site: SameSite::Strict,
		}
	}

	/// Renders the `Set-Cookie` header value.
	pub fn to_header_value(&self) -> String {
		let mut header = format!(
			"{}={}; Path={}; Max-Age={}",
			self.name,
			self.value,
			self.path,
			REMEMBER_PROVIDER_TTL.whole_seconds()
		);

		if let Ok(expires) = self.expires_at.to_offset(UtcOffset::UTC).format(HTTP_DATE) {
			header.push_str("; Expires=");
			header.push_str(&expires);
		}
		if self.secure {
			header.push_str("; Secure");
		}
		if self.http_only {
			header.push_str("; HttpOnly");
		}

		header.push_str("; SameSite=");
		header.push_str(self.same_site.as_str());

		header
	}
}
impl Display for RememberProviderCookie {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.to_header_value())
	}
}
