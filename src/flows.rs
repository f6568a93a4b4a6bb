//! Request orchestration for the login endpoint.

pub mod entry;
pub mod reset;
pub mod selection;
pub mod view;

pub use reset::*;
pub use selection::*;
pub use view::*;

// self
use crate::{
	_prelude::*,
	auth::AuthenticationState,
	config::EntryConfig,
	news::NewsSource,
	protection::FormProtection,
	provider::ProviderRegistry,
};

/// Status used for every redirect the controller issues; forces a GET on the target.
pub const SEE_OTHER: u16 = 303;

/// Decides, per request, between rendering the login form, redirecting, and closing the
/// keep-alive window.
///
/// The controller owns the configuration and the validated provider registry, and borrows the
/// collaborators that know about the session: authentication state, form protection, and
/// optionally news and password reset backends. It never writes a response itself; callers
/// translate the returned [`EntryResponse`] into their transport.
#[derive(Clone)]
pub struct SessionEntryController {
	/// Deployment configuration.
	pub config: EntryConfig,
	/// Validated, ordered login providers.
	pub registry: ProviderRegistry,
	/// Authentication state of the current request.
	pub auth: Arc<dyn AuthenticationState>,
	/// Form protection token store of the current session.
	pub protection: Arc<dyn FormProtection>,
	/// Optional source of persisted news items.
	pub news: Option<Arc<dyn NewsSource>>,
	/// Optional password reset backend.
	pub password_reset: Option<PasswordResetBackend>,
}
impl SessionEntryController {
	/// Creates a controller from configuration, registry, and session collaborators.
	pub fn new(
		config: EntryConfig,
		registry: ProviderRegistry,
		auth: Arc<dyn AuthenticationState>,
		protection: Arc<dyn FormProtection>,
	) -> Self {
		Self { config, registry, auth, protection, news: None, password_reset: None }
	}

	/// Attaches a news source for the login screen.
	pub fn with_news_source(mut self, news: Arc<dyn NewsSource>) -> Self {
		self.news = Some(news);

		self
	}

	/// Attaches the password reset backend and the delay applied to reset requests.
	pub fn with_password_reset(
		mut self,
		reset: Arc<dyn PasswordReset>,
		delay: Arc<dyn ResponseDelay>,
	) -> Self {
		self.password_reset = Some(PasswordResetBackend { reset, delay });

		self
	}
}
impl Debug for SessionEntryController {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionEntryController")
			.field("config", &self.config)
			.field("registry", &self.registry)
			.field("news_set", &self.news.is_some())
			.field("password_reset_set", &self.password_reset.is_some())
			.finish()
	}
}
