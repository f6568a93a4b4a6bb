//! Password reset screens reachable from the login form.
//!
//! Every request that could reveal whether an email address belongs to an account is answered
//! after a randomized pause, so response timing says nothing about the account table.

// std
use std::{ops::RangeInclusive, thread, time::Duration as StdDuration};
// crates.io
use rand::Rng;
// self
use crate::{
	_prelude::*,
	flows::{EntryResponse, SessionEntryController},
	obs::{self, EntryFlow, EntryOutcome, EntrySpan},
	request::{RequestParams, SessionRequestContext, keys},
};

/// Bounds of the randomized pause applied to reset requests, in milliseconds.
pub const RESET_DELAY_MS: RangeInclusive<u64> = 200..=3_000;

/// Password reset backend supplied by the hosting application.
pub trait PasswordReset: Send + Sync {
	/// Whether password reset is available at all (for example, a mail transport exists).
	fn is_enabled(&self) -> bool;

	/// Sends reset instructions if `email` belongs to an account; silent otherwise.
	fn initiate_reset(&self, email: &str);

	/// Whether `token` was issued by this backend and is still unused.
	fn is_valid_token(&self, token: &ResetToken) -> bool;

	/// Replaces the password of the token's identity.
	fn reset_password(&self, token: &ResetToken, password: &str) -> Result<(), ResetRejection>;
}

/// Sleeps for the randomized reset delay.
pub trait ResponseDelay: Send + Sync {
	/// Blocks the current request for `duration`.
	fn pause(&self, duration: StdDuration);
}

/// [`ResponseDelay`] that blocks the current thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleep;
impl ResponseDelay for ThreadSleep {
	fn pause(&self, duration: StdDuration) {
		thread::sleep(duration);
	}
}

/// Reasons a password change is refused.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ResetRejection {
	/// Password and confirmation differ.
	#[error("The new password and its confirmation do not match.")]
	PasswordsDoNotMatch,
	/// The backend refused the password, for example because of a password policy.
	#[error("The new password was rejected: {reason}.")]
	Rejected {
		/// Backend explanation shown to the user.
		reason: String,
	},
}

/// Token carried by the link in the password reset email.
#[derive(Clone, PartialEq, Eq)]
pub struct ResetToken {
	/// Opaque secret issued by the backend.
	pub secret: String,
	/// Identity (account hash) the token was issued for.
	pub identity: String,
	/// Instant after which the token is void.
	pub expires_at: OffsetDateTime,
}
impl ResetToken {
	/// Reads `t`, `i` and `e` from the request; `None` when any part is missing or malformed.
	pub fn from_params(params: &RequestParams) -> Option<Self> {
		let part = |key: &str| params.param(key).filter(|value| !value.trim().is_empty());
		let secret = part(keys::RESET_TOKEN)?.to_owned();
		let identity = part(keys::RESET_IDENTITY)?.to_owned();
		let expires = part(keys::RESET_EXPIRES)?.trim().parse::<i64>().ok()?;
		let expires_at = OffsetDateTime::from_unix_timestamp(expires).ok()?;

		Some(Self { secret, identity, expires_at })
	}

	/// Whether the token has expired at `now`.
	pub fn is_expired(&self, now: OffsetDateTime) -> bool {
		self.expires_at <= now
	}
}
impl Debug for ResetToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ResetToken")
			.field("secret", &"<redacted>")
			.field("identity", &self.identity)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Reset collaborator plus the delay used around it.
#[derive(Clone)]
pub struct PasswordResetBackend {
	/// Reset backend.
	pub reset: Arc<dyn PasswordReset>,
	/// Delay strategy for responses that touch account lookups.
	pub delay: Arc<dyn ResponseDelay>,
}
impl Debug for PasswordResetBackend {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PasswordResetBackend")
			.field("enabled", &self.reset.is_enabled())
			.finish_non_exhaustive()
	}
}

/// Template variables of the reset screens.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetView {
	/// Whether password reset is available.
	pub enable_password_reset: bool,
	/// Email address echoed back into the form.
	pub email: Option<String>,
	/// The submitted email address is not well formed.
	pub invalid_email: bool,
	/// Reset instructions were requested.
	pub reset_initiated: bool,
	/// The reset link is unknown, used, or expired.
	pub invalid_token: bool,
	/// The password was changed.
	pub reset_executed: bool,
	/// Message explaining why the password was not changed.
	pub error: Option<String>,
}

/// Result of a reset operation.
#[derive(Clone, Debug, PartialEq)]
pub enum ResetResponse {
	/// Render a reset screen.
	Form(ResetView),
	/// The user is already authenticated; the regular entry flow answered instead.
	Entry(EntryResponse),
}

impl SessionEntryController {
	/// Whether the login form offers the "forgot password" link.
	pub fn password_reset_enabled(&self) -> bool {
		self.config.password_reset
			&& self.password_reset.as_ref().is_some_and(|backend| backend.reset.is_enabled())
	}

	/// Shows the "forgot password" form.
	pub fn forget_password_form(&self, request: &SessionRequestContext) -> Result<ResetResponse> {
		if self.auth.is_logged_in() {
			return self.handle(request).map(ResetResponse::Entry);
		}

		Ok(ResetResponse::Form(self.reset_view()))
	}

	/// Requests reset instructions for `email`.
	///
	/// Well-formed addresses are handed to the backend; either way the answer is delayed by a
	/// random duration within [`RESET_DELAY_MS`].
	pub fn initiate_password_reset(
		&self,
		request: &SessionRequestContext,
		email: &str,
	) -> Result<ResetResponse> {
		if self.auth.is_logged_in() {
			return self.handle(request).map(ResetResponse::Entry);
		}

		let _span = EntrySpan::new(EntryFlow::PasswordReset, "initiate").entered();
		let mut view = self.reset_view();
		let Some(backend) = self.enabled_backend() else {
			return Ok(ResetResponse::Form(view));
		};

		obs::record_entry_outcome(EntryFlow::PasswordReset, EntryOutcome::Attempt);

		let email = email.trim();

		view.email = Some(email.to_owned());

		if is_valid_email(email) {
			backend.reset.initiate_reset(email);

			view.reset_initiated = true;
		} else {
			view.invalid_email = true;
		}

		let delay = StdDuration::from_millis(rand::rng().random_range(RESET_DELAY_MS));

		#[cfg(feature = "tracing")]
		tracing::debug!(delay_ms = delay.as_millis() as u64, "Delaying password reset response.");

		backend.delay.pause(delay);
		obs::record_entry_outcome(EntryFlow::PasswordReset, EntryOutcome::RenderForm);

		Ok(ResetResponse::Form(view))
	}

	/// Shows the "choose a new password" form for the link in the reset email.
	pub fn password_reset_form(
		&self,
		request: &SessionRequestContext,
		token: Option<&ResetToken>,
	) -> Result<ResetResponse> {
		if self.auth.is_logged_in() {
			return self.handle(request).map(ResetResponse::Entry);
		}

		let mut view = self.reset_view();

		if let Some(backend) = self.enabled_backend() {
			view.invalid_token = !token_is_usable(backend, token);
		}

		Ok(ResetResponse::Form(view))
	}

	/// Changes the password for the identity behind `token`.
	pub fn finish_password_reset(
		&self,
		request: &SessionRequestContext,
		token: Option<&ResetToken>,
		password: &str,
		confirmation: &str,
	) -> Result<ResetResponse> {
		if self.auth.is_logged_in() {
			return self.handle(request).map(ResetResponse::Entry);
		}

		let _span = EntrySpan::new(EntryFlow::PasswordReset, "finish").entered();
		let mut view = self.reset_view();
		let Some(backend) = self.enabled_backend() else {
			return Ok(ResetResponse::Form(view));
		};

		obs::record_entry_outcome(EntryFlow::PasswordReset, EntryOutcome::Attempt);

		match token.filter(|&token| token_is_usable(backend, Some(token))) {
			None => view.invalid_token = true,
			Some(_) if password != confirmation =>
				view.error = Some(ResetRejection::PasswordsDoNotMatch.to_string()),
			Some(token) => match backend.reset.reset_password(token, password) {
				Ok(()) => view.reset_executed = true,
				Err(rejection) => view.error = Some(rejection.to_string()),
			},
		}

		obs::record_entry_outcome(EntryFlow::PasswordReset, EntryOutcome::RenderForm);

		Ok(ResetResponse::Form(view))
	}

	fn enabled_backend(&self) -> Option<&PasswordResetBackend> {
		self.password_reset.as_ref().filter(|_| self.password_reset_enabled())
	}

	fn reset_view(&self) -> ResetView {
		ResetView { enable_password_reset: self.password_reset_enabled(), ..Default::default() }
	}
}

fn token_is_usable(backend: &PasswordResetBackend, token: Option<&ResetToken>) -> bool {
	token.is_some_and(|token| {
		!token.is_expired(OffsetDateTime::now_utc()) && backend.reset.is_valid_token(token)
	})
}

/// Loose syntactic check: one `@`, a non-empty local part, and a dotted domain without blanks.
pub fn is_valid_email(email: &str) -> bool {
	let Some((local, domain)) = email.split_once('@') else {
		return false;
	};

	!local.is_empty()
		&& !domain.contains('@')
		&& !email.chars().any(|c| c.is_whitespace() || c.is_control())
		&& domain.split('.').count() > 1
		&& domain.split('.').all(|label| !label.is_empty())
}
