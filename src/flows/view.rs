//! Outcomes returned to the calling web layer.

// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	config::LoginBranding,
	cookie::RememberProviderCookie,
	interface::InterfaceChoice,
	news::NewsItem,
	provider::ProviderSummary,
};

/// Which form the view renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
	/// Credential entry.
	Login,
	/// Logout confirmation for an authenticated session.
	Logout,
}

/// Template variables of the login screen.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
	/// Form kind.
	pub action: FormKind,
	/// URL the form posts to.
	pub form_action_url: String,
	/// Sanitized redirect hint carried through the form.
	pub redirect_url: Option<String>,
	/// Whether this is the keep-alive window.
	pub login_refresh: bool,
	/// Registered providers in display order.
	pub login_providers: Vec<ProviderSummary>,
	/// Active provider.
	pub login_provider_identifier: ProviderId,
	/// View fragment of the active provider.
	pub provider_template: String,
	/// News items shown next to the form.
	pub login_news_items: Vec<NewsItem>,
	/// Whether the interface chooser is displayed.
	pub show_interface_selector: bool,
	/// Interfaces offered by the chooser.
	pub interfaces: Vec<InterfaceChoice>,
	/// Preselected interface when the chooser is hidden.
	pub interface: Option<String>,
	/// A login attempt was made and did not authenticate.
	pub has_login_error: bool,
	/// Username preset for the form.
	pub preset_username: Option<String>,
	/// Login screen customization.
	pub branding: LoginBranding,
	/// Whether the "forgot password" link is offered.
	pub enable_password_reset: bool,
	/// Additional variables contributed by the provider hook.
	pub extra: BTreeMap<String, serde_json::Value>,
}

/// Decision of a controller operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
	/// Render the login or logout form.
	RenderForm(Box<LoginView>),
	/// Send the client elsewhere.
	Redirect {
		/// Location target.
		target: String,
		/// HTTP status code.
		status: u16,
	},
	/// Let the opening window resume its background task and close this one.
	CloseWindow,
}
impl Outcome {
	/// Returns the rendered view, if any.
	pub fn view(&self) -> Option<&LoginView> {
		match self {
			Outcome::RenderForm(view) => Some(view),
			_ => None,
		}
	}

	/// Returns `true` for [`Outcome::Redirect`].
	pub fn is_redirect(&self) -> bool {
		matches!(self, Outcome::Redirect { .. })
	}
}

/// Outcome plus the cookies the response must set.
#[derive(Clone, Debug, PartialEq)]
pub struct EntryResponse {
	/// Controller decision.
	pub outcome: Outcome,
	/// Cookies to emit with the response.
	pub cookies: Vec<RememberProviderCookie>,
}
impl EntryResponse {
	/// `Set-Cookie` header values for all cookies.
	pub fn set_cookie_headers(&self) -> Vec<String> {
		self.cookies.iter().map(RememberProviderCookie::to_header_value).collect()
	}
}
