//! Application state management for clinicdesk.
//!
//! This module contains the `App` struct that owns the `AdminContext` plus
//! all UI state, and coordinates background network tasks.

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use clinicdesk_core::{
    AdminApiClient, AdminContext, ApiError, Config, DoctorRecord, FetchTicket, FileStorage,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 64;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    LoggingIn,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from spawned network tasks.
enum TaskResult {
    /// Outcome of a doctor directory fetch, tagged with its ticket
    Doctors(FetchTicket, Result<Vec<DoctorRecord>, ApiError>),
    /// Outcome of an admin login attempt
    Login(Result<String, ApiError>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    config_path: PathBuf,
    pub ctx: AdminContext<FileStorage>,

    // UI State
    pub state: AppState,
    pub search_query: String,
    pub doctor_selection: usize,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,
    pub login_pending: bool,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config, config_path: PathBuf) -> Result<Self> {
        let backend_url = config.backend_url()?;
        debug!(backend_url = %backend_url, "Backend configured");

        let storage = FileStorage::new(&config.data_dir()?);
        let api = AdminApiClient::new(backend_url)?;
        let ctx = AdminContext::new(api, storage);

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_email = config.last_email.clone().unwrap_or_default();

        Ok(Self::with_context(config, config_path, ctx, login_email, tx, rx))
    }

    fn with_context(
        config: Config,
        config_path: PathBuf,
        ctx: AdminContext<FileStorage>,
        login_email: String,
        task_tx: mpsc::Sender<TaskResult>,
        task_rx: mpsc::Receiver<TaskResult>,
    ) -> Self {
        Self {
            config,
            config_path,
            ctx,
            state: AppState::Normal,
            search_query: String::new(),
            doctor_selection: 0,
            login_email,
            login_password: String::new(),
            login_focus: LoginFocus::Email,
            login_error: None,
            login_pending: false,
            task_rx,
            task_tx,
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.ctx.is_authenticated()
    }

    /// Show the login overlay
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    /// Send the login form in the background; the result arrives through
    /// `check_background_tasks`.
    pub fn attempt_login(&mut self) {
        if self.login_pending {
            return;
        }
        if self.login_email.is_empty() || self.login_password.is_empty() {
            self.login_error = Some("Email and password required".to_string());
            return;
        }

        self.login_error = None;
        self.login_pending = true;

        let api = self.ctx.api().clone();
        let email = self.login_email.clone();
        let password = self.login_password.clone();
        let tx = self.task_tx.clone();

        tokio::spawn(async move {
            let outcome = api.login(&email, &password).await;
            Self::send_result(&tx, TaskResult::Login(outcome)).await;
        });
    }

    pub fn logout(&mut self) {
        self.ctx.logout();
        self.doctor_selection = 0;
        self.search_query.clear();
    }

    // =========================================================================
    // Background Data Fetch
    // =========================================================================

    /// Run once per frame: fetch doctors when the token changed.
    pub fn tick(&mut self) {
        if self.ctx.doctors_fetch_due() {
            self.spawn_doctors_fetch();
        }
        self.ctx.toasts_mut().prune();
    }

    /// Manual refresh. Logged out, this opens the login form instead.
    pub fn refresh(&mut self) {
        if !self.is_authenticated() {
            self.start_login();
            return;
        }
        self.spawn_doctors_fetch();
    }

    fn spawn_doctors_fetch(&mut self) {
        let ticket = self.ctx.begin_fetch();
        let api = self.ctx.api().clone();
        let token = self.ctx.token().to_string();
        let tx = self.task_tx.clone();

        info!(seq = ticket.seq(), "Fetching doctor directory");
        tokio::spawn(async move {
            let outcome = api.fetch_all_doctors(&token).await;
            Self::send_result(&tx, TaskResult::Doctors(ticket, outcome)).await;
        });
    }

    async fn send_result(tx: &mpsc::Sender<TaskResult>, result: TaskResult) {
        if tx.send(result).await.is_err() {
            debug!("App closed before background task finished");
        }
    }

    /// Drain finished background tasks and apply their results
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.task_rx.try_recv() {
            self.process_task_result(result);
        }
    }

    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Doctors(ticket, outcome) => {
                if let Ok(true) = self.ctx.complete_fetch(ticket, outcome) {
                    self.clamp_selection();
                }
            }
            TaskResult::Login(outcome) => {
                self.login_pending = false;
                match self.ctx.apply_login(outcome) {
                    Ok(()) => {
                        self.config.last_email = Some(self.login_email.clone());
                        if let Err(e) = self.config.save_to(&self.config_path) {
                            warn!(error = %e, "Failed to save config");
                        }
                        self.login_password.clear();
                        self.state = AppState::Normal;
                    }
                    Err(e) => {
                        self.login_error = Some(e.toast_message());
                    }
                }
            }
        }
    }

    // =========================================================================
    // Doctor List
    // =========================================================================

    /// Doctors matching the search query, in server order
    pub fn filtered_doctors(&self) -> Vec<&DoctorRecord> {
        self.ctx
            .doctors()
            .iter()
            .filter(|d| d.matches(&self.search_query))
            .collect()
    }

    pub fn selected_doctor(&self) -> Option<&DoctorRecord> {
        self.filtered_doctors().get(self.doctor_selection).copied()
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.filtered_doctors().len();
        if len == 0 {
            self.doctor_selection = 0;
            return;
        }
        let next = self.doctor_selection as isize + delta;
        self.doctor_selection = next.clamp(0, len as isize - 1) as usize;
    }

    pub fn select_first(&mut self) {
        self.doctor_selection = 0;
    }

    pub fn select_last(&mut self) {
        self.doctor_selection = self.filtered_doctors().len().saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let len = self.filtered_doctors().len();
        if self.doctor_selection >= len {
            self.doctor_selection = len.saturating_sub(1);
        }
    }
}

// ============================================================================
// Input Validation
// ============================================================================

/// Check if a character is valid for text input (printable, non-control)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a character can be added to the email field
pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

/// Check if a character can be added to the password field
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

#[cfg(test)]
const SCRATCH_PREFIX: &str = "clinicdesk-app-";

#[cfg(test)]
impl App {
    /// App with a throwaway storage directory and no reachable backend.
    pub fn for_tests() -> Self {
        Self::for_tests_with_url("http://127.0.0.1:1")
    }

    pub fn for_tests_with_url(url: &str) -> Self {
        let dir = std::env::temp_dir()
            .join(format!("{SCRATCH_PREFIX}{:016x}", rand::random::<u64>()));
        let storage = FileStorage::new(&dir);
        let api = AdminApiClient::new(url).expect("test client");
        let ctx = AdminContext::new(api, storage);
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Self::with_context(
            Config::default(),
            dir.join("config.json"),
            ctx,
            String::new(),
            tx,
            rx,
        )
    }
}

/// Test apps live in a scratch directory that goes away with the app.
#[cfg(test)]
impl Drop for App {
    fn drop(&mut self) {
        if let Some(dir) = self.config_path.parent() {
            let scratch = dir
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(SCRATCH_PREFIX));
            if scratch {
                std::fs::remove_dir_all(dir).ok();
            }
        }
    }
}
