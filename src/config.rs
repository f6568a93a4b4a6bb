//! Deployment configuration consumed by the controller.
//!
//! Everything the login endpoint used to read from ambient globals lives in [`EntryConfig`],
//! which is deserialized once at startup and handed to
//! [`SessionEntryController`](crate::flows::SessionEntryController) by value.

// self
use crate::{_prelude::*, error::ConfigError, news::NewsItem};

/// Default backend entry route used when no redirect hint applies.
pub const DEFAULT_MAIN_ROUTE: &str = "/typo3/main";
/// Default login route used to build form actions and the cookie retry target.
pub const DEFAULT_LOGIN_ROUTE: &str = "/typo3/login";
/// Default path the remembered-provider cookie is scoped to.
pub const DEFAULT_COOKIE_PATH: &str = "/typo3/";

/// Controller configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryConfig {
	/// Public origin of the site; absolute redirect hints are only accepted on this origin.
	///
	/// When unset, only relative redirect hints survive sanitization.
	pub site_url: Option<Url>,
	/// Main backend entry route.
	pub main_route: String,
	/// Login route.
	pub login_route: String,
	/// Path the remembered-provider cookie is scoped to.
	pub cookie_path: String,
	/// Allows the `Secure` cookie attribute on HTTPS requests.
	pub cookie_secure: bool,
	/// Deployment interfaces a session can be routed into after login.
	pub interfaces: Vec<String>,
	/// Registered login providers keyed by identifier.
	pub login_providers: BTreeMap<String, ProviderEntry>,
	/// Static news items shown above the news source entries.
	pub login_news: Vec<NewsItem>,
	/// Login screen customization.
	pub branding: LoginBranding,
	/// Enables the password reset flow.
	pub password_reset: bool,
}
impl EntryConfig {
	/// Parses and validates a JSON configuration document.
	pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(json);
		let config: Self = serde_path_to_error::deserialize(&mut de)?;

		config.validate()?;

		Ok(config)
	}

	/// Checks invariants that serde cannot express.
	pub fn validate(&self) -> Result<(), ConfigError> {
		match self.site_url.as_ref() {
			Some(url) if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() =>
				Err(ConfigError::InvalidSiteUrl { url: url.to_string() }),
			_ => Ok(()),
		}
	}

	/// Interface names with blanks and surrounding whitespace removed.
	pub fn interface_names(&self) -> Vec<&str> {
		self.interfaces.iter().map(|name| name.trim()).filter(|name| !name.is_empty()).collect()
	}
}
impl Default for EntryConfig {
	fn default() -> Self {
		Self {
			site_url: None,
			main_route: DEFAULT_MAIN_ROUTE.into(),
			login_route: DEFAULT_LOGIN_ROUTE.into(),
			cookie_path: DEFAULT_COOKIE_PATH.into(),
			cookie_secure: true,
			interfaces: vec!["backend".into()],
			login_providers: BTreeMap::new(),
			login_news: Vec::new(),
			branding: LoginBranding::default(),
			password_reset: true,
		}
	}
}

/// Raw login provider registration as it appears in configuration.
///
/// Every field is optional here so that registry construction can report exactly which one
/// is missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEntry {
	/// Human-readable label.
	pub label: Option<String>,
	/// Icon reference.
	#[serde(alias = "iconIdentifier")]
	pub icon_identifier: Option<String>,
	/// Sort rank; higher ranks come first.
	pub sorting: Option<i64>,
	/// Name of the capability in the [`ProviderCatalog`](crate::provider::ProviderCatalog).
	pub provider: Option<String>,
}

/// Optional login screen customization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginBranding {
	/// Logo image reference.
	pub logo: Option<String>,
	/// Alternative text for the logo.
	pub logo_alt: Option<String>,
	/// Accent color in `#rgb` or `#rrggbb` form.
	pub highlight_color: Option<String>,
	/// Background image reference.
	pub background_image: Option<String>,
	/// Footnote rendered under the form.
	pub footnote: Option<String>,
}
impl LoginBranding {
	/// Returns a copy with an invalid highlight color dropped.
	pub fn sanitized(&self) -> Self {
		let mut branding = self.clone();

		branding.highlight_color = branding.highlight_color.filter(|color| is_hex_color(color));

		branding
	}
}

fn is_hex_color(value: &str) -> bool {
	match value.strip_prefix('#') {
		Some(hex) if hex.len() == 3 || hex.len() == 6 => hex.chars().all(|c| c.is_ascii_hexdigit()),
		_ => false,
	}
}
