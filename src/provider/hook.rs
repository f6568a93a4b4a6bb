//! Render hooks implemented by login provider capabilities.
//!
//! A capability decides which form fragment the login view renders and may add variables to
//! it. Capabilities are resolved by name through [`ProviderCatalog`] once, when the registry is
//! built, so a misspelled capability fails at startup instead of on the first request.

// self
use crate::{_prelude::*, flows::LoginView, request::SessionRequestContext};

/// Catalog name of the built-in [`UsernamePasswordProvider`].
pub const USERNAME_PASSWORD: &str = "username_password";

/// Render hook of a login provider.
///
/// Implementors are required to be `Send + Sync`. Override only what you need; `decorate`
/// has a default no-op implementation.
pub trait LoginProvider: Send + Sync {
	/// View fragment rendering the credential-entry UI.
	fn template(&self) -> &str;

	/// Gives the provider a chance to add variables to the login view.
	fn decorate(&self, _request: &SessionRequestContext, _view: &mut LoginView) {}
}

/// Built-in username/password form.
///
/// Presets the username from the `u` parameter, but only on encrypted transports.
#[derive(Debug, Default)]
pub struct UsernamePasswordProvider;
impl Display for UsernamePasswordProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(USERNAME_PASSWORD)
	}
}
impl LoginProvider for UsernamePasswordProvider {
	fn template(&self) -> &str {
		"Login/UserPassLoginForm"
	}

	fn decorate(&self, request: &SessionRequestContext, view: &mut LoginView) {
		if request.https {
			view.preset_username = request.preset_username.clone();
		}
	}
}

/// Registration-time table mapping capability names to render hooks.
#[derive(Clone, Default)]
pub struct ProviderCatalog {
	hooks: HashMap<String, Arc<dyn LoginProvider>>,
}
impl ProviderCatalog {
	/// Creates an empty catalog.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a catalog containing the built-in capabilities.
	pub fn with_defaults() -> Self {
		Self::new().with(USERNAME_PASSWORD, Arc::new(UsernamePasswordProvider))
	}

	/// Registers (or replaces) a capability.
	pub fn with(mut self, name: impl Into<String>, hook: Arc<dyn LoginProvider>) -> Self {
		self.hooks.insert(name.into(), hook);

		self
	}

	/// Resolves a capability by name.
	pub fn resolve(&self, name: &str) -> Option<Arc<dyn LoginProvider>> {
		self.hooks.get(name).cloned()
	}
}
impl Debug for ProviderCatalog {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut names: Vec<_> = self.hooks.keys().collect();

		names.sort();

		f.debug_struct("ProviderCatalog").field("capabilities", &names).finish()
	}
}
