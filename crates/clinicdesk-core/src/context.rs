//! The shared admin context.
//!
//! `AdminContext` is created once at the application root and handed to
//! whatever needs the session, the doctor directory or the toast queue.

use tracing::info;

use crate::api::{AdminApiClient, ApiError};
use crate::auth::{SessionStore, TokenStorage, TokenWatch};
use crate::directory::{DoctorDirectory, FetchTicket};
use crate::models::DoctorRecord;
use crate::notify::{Notifier, ToastQueue};

pub struct AdminContext<S: TokenStorage> {
    session: SessionStore<S>,
    directory: DoctorDirectory,
    api: AdminApiClient,
    toasts: ToastQueue,
    doctors_watch: TokenWatch,
}

impl<S: TokenStorage> AdminContext<S> {
    /// Build the context, loading the session from `storage`.
    pub fn new(api: AdminApiClient, storage: S) -> Self {
        Self {
            session: SessionStore::initialize(storage),
            directory: DoctorDirectory::new(),
            api,
            toasts: ToastQueue::new(),
            doctors_watch: TokenWatch::new(),
        }
    }

    pub fn token(&self) -> &str {
        self.session.get()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.session.set(token);
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn api(&self) -> &AdminApiClient {
        &self.api
    }

    pub fn directory(&self) -> &DoctorDirectory {
        &self.directory
    }

    pub fn doctors(&self) -> &[DoctorRecord] {
        self.directory.doctors()
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastQueue {
        &mut self.toasts
    }

    /// Called by the Doctors view on every render. True exactly once each
    /// time the token changes to a non-empty value.
    pub fn doctors_fetch_due(&mut self) -> bool {
        self.doctors_watch.observe(self.session.get())
    }

    /// Fetch the doctor directory with the current token and wait for it.
    pub async fn get_all_doctors(&mut self) -> Result<(), ApiError> {
        let ticket = self.directory.begin_fetch();
        let outcome = self.api.fetch_all_doctors(self.session.get()).await;
        self.directory
            .complete(ticket, outcome, &mut self.toasts)
            .map(|_| ())
    }

    /// Start a fetch whose request runs elsewhere; pair with [`Self::complete_fetch`].
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.directory.begin_fetch()
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Vec<DoctorRecord>, ApiError>,
    ) -> Result<bool, ApiError> {
        self.directory.complete(ticket, outcome, &mut self.toasts)
    }

    /// Log in and store the new token. Failures are toasted and returned.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ApiError> {
        let outcome = self.api.login(email, password).await;
        self.apply_login(outcome)
    }

    /// Store the token from a login call made elsewhere.
    pub fn apply_login(&mut self, outcome: Result<String, ApiError>) -> Result<(), ApiError> {
        match outcome {
            Ok(token) => {
                self.session.set(token);
                info!("Admin login successful");
                self.toasts.info("Logged in");
                Ok(())
            }
            Err(e) => {
                self.toasts.error(&e.toast_message());
                Err(e)
            }
        }
    }

    /// Drop the session and everything fetched with it.
    pub fn logout(&mut self) {
        self.session.clear();
        self.directory.clear();
        info!("Admin logged out");
        self.toasts.info("Logged out");
    }
}
