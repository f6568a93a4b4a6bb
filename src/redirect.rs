//! Redirect hint sanitization and target resolution.
//!
//! Redirect hints arrive from the client and are an open-redirect vector, so only URLs that
//! stay on the site survive [`sanitize_local_url`]. Rejected hints are dropped silently and the
//! configured main route takes their place.

// self
use crate::{_prelude::*, config::EntryConfig};

/// Target of the `frontend` interface: the site root relative to the backend entry.
pub const FRONTEND_TARGET: &str = "../";

const LOCAL_BASE: &str = "http://localhost.invalid/";

/// Returns `hint` unchanged when it points at the site, `None` otherwise.
///
/// Relative URLs are accepted unless they escape the origin (`//host`, `/\host`). Absolute URLs
/// are accepted only on the origin of `site`; without a site every absolute URL is rejected.
/// Since the accepted value is the input itself, sanitizing twice yields the same result.
pub fn sanitize_local_url(site: Option<&Url>, hint: &str) -> Option<String> {
	if hint.is_empty() || hint.chars().any(char::is_control) {
		return None;
	}

	let accepted = match Url::parse(hint) {
		Ok(absolute) => site.is_some_and(|site| same_origin(site, &absolute)),
		Err(url::ParseError::RelativeUrlWithoutBase) => {
			let base = match site {
				Some(site) => site.clone(),
				None => Url::parse(LOCAL_BASE).ok()?,
			};

			base.join(hint).is_ok_and(|joined| same_origin(&base, &joined))
		},
		Err(_) => false,
	};

	if accepted {
		Some(hint.to_owned())
	} else {
		#[cfg(feature = "tracing")]
		tracing::debug!(hint, "Dropped a non-local redirect hint.");

		None
	}
}

/// Sanitized redirect hint, or the configured main route when none survives.
pub fn resolve_redirect_target(config: &EntryConfig, hint: Option<&str>) -> String {
	hint.and_then(|hint| sanitize_local_url(config.site_url.as_ref(), hint))
		.unwrap_or_else(|| config.main_route.clone())
}

/// Jump target of a named interface, if the interface is known.
pub fn interface_target(config: &EntryConfig, interface: &str) -> Option<String> {
	match interface {
		"frontend" => Some(FRONTEND_TARGET.into()),
		"backend" => Some(config.main_route.clone()),
		_ => None,
	}
}

fn same_origin(a: &Url, b: &Url) -> bool {
	a.origin() == b.origin()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn site() -> Url {
		Url::parse("https://cms.example.com/").expect("Site fixture should parse.")
	}

	#[test]
	fn relative_hints_survive() {
		for hint in ["../", "/typo3/module/web/layout?id=1", "index.php?x=1", "#top"] {
			assert_eq!(sanitize_local_url(Some(&site()), hint).as_deref(), Some(hint));
			assert_eq!(sanitize_local_url(None, hint).as_deref(), Some(hint));
		}
	}

	#[test]
	fn external_hints_are_rejected() {
		for hint in [
			"https://evil.example.net/",
			"//evil.example.net/path",
			"/\\evil.example.net",
			"\\\\evil.example.net",
			"javascript:alert(1)",
			"data:text/html,boom",
			"http://cms.example.com/",
			"https://cms.example.com:8443/",
			"/typo3/\nmain",
		] {
			assert_eq!(sanitize_local_url(Some(&site()), hint), None, "{hint} must be rejected.");
		}
	}

	#[test]
	fn same_origin_absolute_hints_need_a_site() {
		let hint = "https://cms.example.com/typo3/main";

		assert_eq!(sanitize_local_url(Some(&site()), hint).as_deref(), Some(hint));
		assert_eq!(sanitize_local_url(None, hint), None);
	}

	#[test]
	fn sanitization_is_idempotent() {
		for hint in ["../", "//evil.example.net", "https://cms.example.com/a", "https://x.test/"] {
			let once = sanitize_local_url(Some(&site()), hint);
			let twice = once.as_deref().and_then(|value| sanitize_local_url(Some(&site()), value));

			assert_eq!(once, twice, "Sanitizing {hint} twice must be stable.");
		}
	}

	#[test]
	fn resolution_falls_back_to_main_route() {
		let config = EntryConfig { site_url: Some(site()), ..Default::default() };

		assert_eq!(resolve_redirect_target(&config, None), config.main_route);
		assert_eq!(resolve_redirect_target(&config, Some("https://evil.example.net/")), "/typo3/main");
		assert_eq!(resolve_redirect_target(&config, Some("/typo3/record")), "/typo3/record");
	}

	#[test]
	fn interfaces_map_to_jump_targets() {
		let config = EntryConfig::default();

		assert_eq!(interface_target(&config, "frontend").as_deref(), Some(FRONTEND_TARGET));
		assert_eq!(interface_target(&config, "backend").as_deref(), Some("/typo3/main"));
		assert_eq!(interface_target(&config, "preview"), None);
	}
}
