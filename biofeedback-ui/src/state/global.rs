//! Global Application State
//!
//! Reactive wrapper around the shared `Session` and `AuthGate`. Every
//! transition goes through the core types; signals only make them visible.

use biofeedback::session::{FetchTicket, Session};
use biofeedback::{AuthGate, AuthMode, DateRange};
use leptos::*;

use crate::api;

/// How long a success or error notice stays up (ms)
const NOTICE_TIMEOUT_MS: u32 = 4000;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Entries, range, loading flag, entry input and notices
    pub session: RwSignal<Session>,
    /// Entry form gate
    pub gate: RwSignal<AuthGate>,
    /// Token request in flight
    pub logging_in: RwSignal<bool>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        session: create_rw_signal(Session::new()),
        gate: create_rw_signal(AuthGate::new()),
        logging_in: create_rw_signal(false),
    };

    provide_context(state);
}

/// Fetch the global state from context
pub fn use_global_state() -> GlobalState {
    expect_context::<GlobalState>()
}

/// Gate mode for this build. `token` unless built with
/// `BIOFEEDBACK_AUTH_MODE=password`.
pub fn auth_mode() -> AuthMode {
    parse_auth_mode(option_env!("BIOFEEDBACK_AUTH_MODE"))
}

fn parse_auth_mode(raw: Option<&str>) -> AuthMode {
    raw.and_then(|m| m.parse().ok()).unwrap_or(AuthMode::Token)
}

/// Password for `password` mode, taken from the build environment
fn configured_password() -> &'static str {
    option_env!("BIOFEEDBACK_PASSWORD").unwrap_or("")
}

impl GlobalState {
    /// Re-fetch the current range
    pub fn refresh(&self) {
        if let Some(ticket) = self.session.try_update(|s| s.begin_fetch()) {
            self.run_fetch(ticket);
        }
    }

    /// Change the date filter and fetch it
    pub fn set_range(&self, range: DateRange) {
        if let Some(ticket) = self.session.try_update(|s| s.set_range(range)) {
            self.run_fetch(ticket);
        }
    }

    fn run_fetch(&self, ticket: FetchTicket) {
        let session = self.session;
        spawn_local(async move {
            let result = api::fetch_entries(&ticket.range).await;
            if let Err(e) = &result {
                web_sys::console::error_1(&format!("Failed to fetch entries: {}", e).into());
            }
            session.update(|s| {
                s.complete_fetch(ticket, result);
            });
        });
    }

    /// Submit the entry input; a success triggers one refetch
    pub fn submit(&self) {
        let Some(attempt) = self.session.try_update(|s| s.begin_submit()) else {
            return;
        };

        let ticket = match attempt {
            Ok(ticket) => ticket,
            Err(_) => {
                self.schedule_notice_clear();
                return;
            }
        };

        let token = self.gate.with_untracked(|g| g.token().map(str::to_string));
        let state = *self;

        spawn_local(async move {
            let result = api::submit_entry(&ticket.body, token).await;
            if let Err(e) = &result {
                web_sys::console::error_1(&format!("Error submitting data: {}", e).into());
            }

            let refetch = state.session.try_update(|s| s.complete_submit(result)).flatten();
            if let Some(fetch) = refetch {
                state.run_fetch(fetch);
            }
            state.schedule_notice_clear();
        });
    }

    /// Password mode: compare against the build-time password
    pub fn unlock_with_password(&self, input: &str) -> bool {
        self.gate
            .try_update(|g| g.check_password(configured_password(), input))
            .unwrap_or(false)
    }

    /// Token mode: exchange credentials with the API
    pub fn login(&self, username: String, password: String) {
        if self.logging_in.get_untracked() {
            return;
        }
        self.logging_in.set(true);

        let state = *self;
        spawn_local(async move {
            let result = api::issue_token(&username, &password).await;
            state.gate.update(|g| {
                g.accept_token(&username, result);
            });
            state.logging_in.set(false);
        });
    }

    /// Expire the notice showing now; a newer notice gets its own timer
    fn schedule_notice_clear(&self) {
        let session = self.session;
        let generation = session.with_untracked(|s| s.notice_generation());
        gloo_timers::callback::Timeout::new(NOTICE_TIMEOUT_MS, move || {
            session.update(|s| s.expire_notice(generation));
        })
        .forget();
    }
}
