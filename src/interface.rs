//! Interface selector presentation.

// self
use crate::{_prelude::*, config::EntryConfig, redirect};

/// Interface offered on the login form together with its jump target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceChoice {
	/// Interface name (`backend`, `frontend`, ...).
	pub interface: String,
	/// URL the session jumps to after login.
	pub jump_target: String,
}

/// What the login form shows about post-login interfaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InterfaceSelection {
	/// Several interfaces are configured; let the user choose.
	Chooser(Vec<InterfaceChoice>),
	/// A single interface is configured and no redirect hint competes with it.
	Preselected(String),
	/// Nothing to show.
	Hidden,
}
impl InterfaceSelection {
	/// Whether the chooser is displayed.
	pub fn shows_chooser(&self) -> bool {
		matches!(self, Self::Chooser(_))
	}
}

/// Decides the interface presentation from configuration and request state.
///
/// With more than one interface the chooser appears while a login is in progress or when no
/// redirect hint was supplied. With exactly one interface and no hint it is preselected.
pub fn select_interfaces(
	config: &EntryConfig,
	login_in_progress: bool,
	has_redirect_hint: bool,
) -> InterfaceSelection {
	let names = config.interface_names();

	if names.is_empty() || (has_redirect_hint && !login_in_progress) {
		return InterfaceSelection::Hidden;
	}

	match names.as_slice() {
		[single] if !has_redirect_hint => InterfaceSelection::Preselected((*single).to_owned()),
		[_] => InterfaceSelection::Hidden,
		_ => InterfaceSelection::Chooser(
			names
				.iter()
				.map(|&name| InterfaceChoice {
					interface: name.to_owned(),
					jump_target: redirect::interface_target(config, name)
						.unwrap_or_else(|| config.main_route.clone()),
				})
				.collect(),
		),
	}
}
