//! Authentication and redirect state machine of the login endpoint.
//!
//! [`SessionEntryController::handle`] looks at the authentication state reported by the
//! collaborator and moves along these edges:
//!
//! - anonymous: render the login form, flagging a failed attempt when credentials were sent;
//! - authenticated + logout: log off, then redirect to the resolved target;
//! - authenticated: make sure the session cookie round-trips (retrying once), then either close
//!   the keep-alive window after restoring the form protection token, or store the token and
//!   redirect with `303 See Other`.

// self
use crate::{
	_prelude::*,
	flows::{EntryResponse, FormKind, LoginView, Outcome, SEE_OTHER, SessionEntryController},
	flows::selection::{self, ProviderSelection},
	interface::{self, InterfaceSelection},
	news,
	obs::{self, EntryFlow, EntryOutcome, EntrySpan},
	redirect,
	request::{SessionRequestContext, keys},
};

impl SessionEntryController {
	/// Handles one request to the login endpoint.
	pub fn handle(&self, request: &SessionRequestContext) -> Result<EntryResponse> {
		let flow = if request.is_logout() && self.auth.is_logged_in() {
			EntryFlow::Logout
		} else if request.login_refresh {
			EntryFlow::Refresh
		} else {
			EntryFlow::Login
		};
		let _span = EntrySpan::new(flow, "handle").entered();

		obs::record_entry_outcome(flow, EntryOutcome::Attempt);

		let result = self.dispatch(request);

		obs::record_entry_outcome(flow, match &result {
			Ok(response) => outcome_label(&response.outcome),
			Err(_) => EntryOutcome::Failure,
		});

		result
	}

	/// Handles a keep-alive request from the login refresh window; a logout flag is ignored.
	pub fn refresh(&self, request: &SessionRequestContext) -> Result<EntryResponse> {
		let mut request = request.clone();

		request.login_refresh = true;

		self.handle(&request)
	}

	/// Logs the current user off and redirects, regardless of the logout and refresh flags.
	pub fn logout(&self, request: &SessionRequestContext) -> Result<EntryResponse> {
		let mut request = request.clone();

		request.logout = true;
		request.login_refresh = false;

		self.handle(&request)
	}

	/// Builds the login (or logout) form for the request without running the state machine.
	pub fn render_form(&self, request: &SessionRequestContext) -> LoginView {
		let selection = self.select_provider(request);

		self.build_view(request, &selection)
	}

	fn dispatch(&self, request: &SessionRequestContext) -> Result<EntryResponse> {
		let selection = self.select_provider(request);
		let cookies = selection.remember.iter().cloned().collect();
		let outcome = if self.auth.is_logged_in() {
			if request.is_logout() { self.log_off(request) } else { self.check_redirect(request)? }
		} else {
			Outcome::RenderForm(Box::new(self.build_view(request, &selection)))
		};

		Ok(EntryResponse { outcome, cookies })
	}

	fn select_provider(&self, request: &SessionRequestContext) -> ProviderSelection {
		selection::select_provider(request, &self.registry, &self.config, OffsetDateTime::now_utc())
	}

	fn log_off(&self, request: &SessionRequestContext) -> Outcome {
		self.auth.log_off();
		self.protection.clean();

		let (target, _) = self.plan_redirect(request);

		Outcome::Redirect { target, status: SEE_OTHER }
	}

	fn check_redirect(&self, request: &SessionRequestContext) -> Result<Outcome> {
		let retry_target = if request.session_cookie_present {
			None
		} else if request.is_cookie_retry() {
			return Err(Error::CookieRequired);
		} else {
			#[cfg(feature = "tracing")]
			tracing::debug!("Session cookie missing; retrying the login round-trip once.");

			Some(self.cookie_retry_target())
		};
		let (planned, interface) = self.plan_redirect(request);

		self.auth.remember_interface(&interface);

		if request.login_refresh {
			self.protection.set_session_token_from_registry()?;
			self.protection.persist_session_token()?;

			return Ok(Outcome::CloseWindow);
		}

		self.protection.store_session_token_in_registry()?;

		Ok(Outcome::Redirect { target: retry_target.unwrap_or(planned), status: SEE_OTHER })
	}

	/// Resolves the post-login/post-logout target and the interface to record.
	///
	/// A per-user override wins and clears the interface. Otherwise a known interface picks its
	/// jump target, and anything else keeps the sanitized hint or the main route and records no
	/// interface.
	fn plan_redirect(&self, request: &SessionRequestContext) -> (String, String) {
		if let Some(target) = self.auth.redirect_override().filter(|target| !target.is_empty()) {
			return (target, String::new());
		}

		let interface = request.interface.as_deref().unwrap_or_default();

		match redirect::interface_target(&self.config, interface) {
			Some(target) => (target, interface.to_owned()),
			None => (
				redirect::resolve_redirect_target(&self.config, request.redirect_hint.as_deref()),
				String::new(),
			),
		}
	}

	fn cookie_retry_target(&self) -> String {
		let query = url::form_urlencoded::Serializer::new(String::new())
			.append_pair(keys::SUBMIT_COMMAND, keys::COOKIE_RETRY)
			.finish();

		format!("{}?{query}", self.config.login_route)
	}

	fn build_view(&self, request: &SessionRequestContext, selection: &ProviderSelection) -> LoginView {
		let logged_in = self.auth.is_logged_in();
		let redirect_url = request
			.redirect_hint
			.as_deref()
			.and_then(|hint| redirect::sanitize_local_url(self.config.site_url.as_ref(), hint));
		let (action, form_action_url) = if logged_in {
			(FormKind::Logout, self.logout_action_url())
		} else {
			(FormKind::Login, self.login_action_url(selection, redirect_url.as_deref()))
		};
		let selection_view = interface::select_interfaces(
			&self.config,
			request.is_login_in_progress(),
			redirect_url.is_some(),
		);
		let (show_interface_selector, interfaces, preselected) = match selection_view {
			InterfaceSelection::Chooser(choices) => (true, choices, None),
			InterfaceSelection::Preselected(name) => (false, Vec::new(), Some(name)),
			InterfaceSelection::Hidden => (false, Vec::new(), None),
		};
		// The registry only hands out registered identifiers, so the lookup cannot miss.
		let descriptor = self.registry.get(&selection.provider).unwrap_or(self.registry.primary());
		let mut view = LoginView {
			action,
			form_action_url,
			redirect_url,
			login_refresh: request.login_refresh,
			login_providers: self.registry.iter().map(|descriptor| descriptor.summary()).collect(),
			login_provider_identifier: descriptor.id.clone(),
			provider_template: descriptor.provider.template().to_owned(),
			login_news_items: news::collect_news(&self.config.login_news, self.news.as_deref()),
			show_interface_selector,
			interfaces,
			interface: preselected,
			has_login_error: !logged_in && request.is_login_in_progress(),
			preset_username: None,
			branding: self.config.branding.sanitized(),
			enable_password_reset: self.password_reset_enabled(),
			extra: BTreeMap::new(),
		};

		descriptor.provider.decorate(request, &mut view);

		view
	}

	fn login_action_url(&self, selection: &ProviderSelection, redirect_url: Option<&str>) -> String {
		let mut query = url::form_urlencoded::Serializer::new(String::new());

		query.append_pair(keys::LOGIN_PROVIDER, &selection.provider);

		if let Some(target) = redirect_url {
			query.append_pair(keys::REDIRECT_URL, target);
		}

		format!("{}?{}", self.config.login_route, query.finish())
	}

	fn logout_action_url(&self) -> String {
		format!("{}?{}={}", self.config.login_route, keys::LOGOUT, keys::LOGOUT_VALUE)
	}
}

fn outcome_label(outcome: &Outcome) -> EntryOutcome {
	match outcome {
		Outcome::RenderForm(_) => EntryOutcome::RenderForm,
		Outcome::Redirect { .. } => EntryOutcome::Redirect,
		Outcome::CloseWindow => EntryOutcome::CloseWindow,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::{FakeAuthState, build_test_controller, test_config},
		protection::{FormProtection, ProtectionOp},
	};

	fn authenticated() -> SessionRequestContext {
		SessionRequestContext { session_cookie_present: true, ..Default::default() }
	}

	#[test]
	fn anonymous_without_credentials_renders_login_form() {
		let (controller, protection) =
			build_test_controller(test_config(), Arc::new(FakeAuthState::anonymous()));
		let response = controller
			.handle(&SessionRequestContext::default())
			.expect("Anonymous requests should render the form.");
		let view = response.outcome.view().expect("A login form should be rendered.");

		assert_eq!(view.action, FormKind::Login);
		assert!(!view.has_login_error);
		assert_eq!(view.login_provider_identifier.as_ref(), "password");
		assert_eq!(view.form_action_url, "/typo3/login?loginProvider=password");
		assert!(response.cookies.is_empty());
		assert!(protection.operations().is_empty());
	}

	#[test]
	fn anonymous_with_credentials_flags_login_error() {
		let (controller, _) =
			build_test_controller(test_config(), Arc::new(FakeAuthState::anonymous()));
		let request =
			SessionRequestContext { username: Some("editor".into()), ..Default::default() };
		let response = controller.handle(&request).expect("Failed logins should render the form.");

		assert!(response.outcome.view().is_some_and(|view| view.has_login_error));
	}

	#[test]
	fn anonymous_logout_flag_is_ignored() {
		let auth = Arc::new(FakeAuthState::anonymous());
		let (controller, _) = build_test_controller(test_config(), auth.clone());
		let request = SessionRequestContext { logout: true, ..Default::default() };
		let response = controller.handle(&request).expect("Anonymous logout should render.");

		assert!(response.outcome.view().is_some());
		assert_eq!(auth.log_off_calls(), 0);
	}

	#[test]
	fn logout_with_frontend_interface_redirects_to_site_root() {
		let auth = Arc::new(FakeAuthState::logged_in());
		let (controller, protection) = build_test_controller(test_config(), auth.clone());
		let request = SessionRequestContext {
			logout: true,
			interface: Some("frontend".into()),
			..authenticated()
		};
		let response = controller.handle(&request).expect("Logout should succeed.");

		assert_eq!(response.outcome, Outcome::Redirect { target: "../".into(), status: 303 });
		assert_eq!(auth.log_off_calls(), 1);
		assert_eq!(protection.operations(), [ProtectionOp::Clean]);
	}

	#[test]
	fn logout_without_interface_redirects_to_main_route() {
		for interface in [None, Some("backend".to_owned())] {
			let (controller, _) =
				build_test_controller(test_config(), Arc::new(FakeAuthState::logged_in()));
			let request = SessionRequestContext { logout: true, interface, ..authenticated() };
			let response = controller.handle(&request).expect("Logout should succeed.");

			assert_eq!(
				response.outcome,
				Outcome::Redirect { target: "/typo3/main".into(), status: 303 }
			);
		}
	}

	#[test]
	fn login_stores_token_and_redirects_with_see_other() {
		let auth = Arc::new(FakeAuthState::logged_in());
		let (controller, protection) = build_test_controller(test_config(), auth.clone());
		let request = SessionRequestContext {
			redirect_hint: Some("/typo3/module/web/layout".into()),
			..authenticated()
		};
		let response = controller.handle(&request).expect("Authenticated requests should redirect.");

		assert_eq!(
			response.outcome,
			Outcome::Redirect { target: "/typo3/module/web/layout".into(), status: 303 }
		);
		assert_eq!(protection.operations(), [ProtectionOp::StoreInRegistry]);
		assert_eq!(auth.remembered_interface().as_deref(), Some(""));
	}

	#[test]
	fn override_beats_interface_and_clears_it() {
		let auth = Arc::new(FakeAuthState::logged_in().with_redirect_override("/typo3/dashboard"));
		let (controller, _) = build_test_controller(test_config(), auth.clone());
		let request =
			SessionRequestContext { interface: Some("frontend".into()), ..authenticated() };
		let response = controller.handle(&request).expect("Override redirects should succeed.");

		assert_eq!(
			response.outcome,
			Outcome::Redirect { target: "/typo3/dashboard".into(), status: 303 }
		);
		assert_eq!(auth.remembered_interface().as_deref(), Some(""));
	}

	#[test]
	fn unknown_interfaces_are_not_recorded() {
		let auth = Arc::new(FakeAuthState::logged_in());
		let (controller, _) = build_test_controller(test_config(), auth.clone());
		let request =
			SessionRequestContext { interface: Some("<script>".into()), ..authenticated() };
		let response = controller.handle(&request).expect("Unknown interfaces should redirect.");

		assert_eq!(
			response.outcome,
			Outcome::Redirect { target: "/typo3/main".into(), status: 303 }
		);
		assert_eq!(auth.remembered_interface().as_deref(), Some(""));
	}

	#[test]
	fn refresh_with_logout_flag_keeps_the_session() {
		let auth = Arc::new(FakeAuthState::logged_in());
		let (controller, protection) = build_test_controller(test_config(), auth.clone());

		protection.store_session_token_in_registry().expect("Seeding the registry should work.");

		let request = SessionRequestContext { logout: true, ..authenticated() };
		let response = controller.refresh(&request).expect("Refresh requests should succeed.");

		assert_eq!(response.outcome, Outcome::CloseWindow);
		assert_eq!(auth.log_off_calls(), 0);
	}

	#[test]
	fn missing_session_cookie_retries_once_then_fails() {
		let (controller, _) =
			build_test_controller(test_config(), Arc::new(FakeAuthState::logged_in()));
		let first = controller
			.handle(&SessionRequestContext::default())
			.expect("The first missing-cookie detection should redirect.");

		assert_eq!(
			first.outcome,
			Outcome::Redirect { target: "/typo3/login?commandLI=setCookie".into(), status: 303 }
		);

		let retry = SessionRequestContext {
			submit_command: Some(keys::COOKIE_RETRY.into()),
			..Default::default()
		};
		let err = controller.handle(&retry).expect_err("The second detection must be fatal.");

		assert!(matches!(err, Error::CookieRequired));
	}

	#[test]
	fn refresh_closes_window_using_registry_path_only() {
		let (controller, protection) =
			build_test_controller(test_config(), Arc::new(FakeAuthState::logged_in()));

		protection.store_session_token_in_registry().expect("Seeding the registry should work.");

		let seeded = protection.operations().len();
		let response =
			controller.refresh(&authenticated()).expect("Refresh requests should succeed.");

		assert_eq!(response.outcome, Outcome::CloseWindow);
		assert_eq!(
			protection.operations()[seeded..],
			[ProtectionOp::SetFromRegistry, ProtectionOp::Persist]
		);
	}

	#[test]
	fn refresh_without_registry_token_surfaces_protection_error() {
		let (controller, _) =
			build_test_controller(test_config(), Arc::new(FakeAuthState::logged_in()));
		let err = controller
			.refresh(&authenticated())
			.expect_err("A missing registry token should fail the refresh.");

		assert!(matches!(err, Error::FormProtection(_)));
	}

	#[test]
	fn render_form_reports_logout_kind_for_authenticated_sessions() {
		let (controller, _) =
			build_test_controller(test_config(), Arc::new(FakeAuthState::logged_in()));
		let view = controller.render_form(&authenticated());

		assert_eq!(view.action, FormKind::Logout);
		assert_eq!(view.form_action_url, "/typo3/login?L=OUT");
		assert!(!view.has_login_error);
	}
}
