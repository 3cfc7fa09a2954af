//! One share-creation attempt, from dialog defaults to rendered message.
//!
//! The builder moves through `Idle -> Pending -> Succeeded | Failed`. A failed
//! attempt can be retried; validation errors never leave `Idle`. `Succeeded` is
//! final until the builder is initialized again.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::client::ShareClient;
use super::error::{ShareError, ShareResult};
use super::expiration::{self, DEFAULT_EXPIRATION};
use super::request::{
    random_password, ExtractFolder, OrderBy, OrderDirection, ShareInfo, ShareRequest,
    DEFAULT_PASSWORD_LENGTH,
};
use super::template::{compile, make_template_data, placeholders, DEFAULT_TEMPLATE};
use crate::listing::{join_share_path, Entry};

/// Site-wide settings that shape every share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSettings {
    /// Site title, available to templates as `site_title`.
    pub site_title: String,
    /// Public site URL; the share link is `{site_url}/@s/{id}`.
    pub site_url: Option<String>,
    /// Message template rendered after a successful share.
    pub template: String,
    /// Expiration token preselected in the dialog.
    pub default_expiration: String,
    /// Length of generated passwords.
    pub password_length: usize,
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self {
            site_title: String::new(),
            site_url: None,
            template: DEFAULT_TEMPLATE.to_string(),
            default_expiration: DEFAULT_EXPIRATION.to_string(),
            password_length: DEFAULT_PASSWORD_LENGTH,
        }
    }
}

/// Where a share attempt stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ShareState {
    /// Editing; nothing submitted yet.
    #[default]
    Idle,
    /// Waiting for the share service.
    Pending,
    /// Created; holds the rendered message.
    Succeeded(String),
    /// The last attempt failed; may be retried.
    Failed(ShareError),
}

/// Builds and submits a single share request.
#[derive(Debug, Clone, Default)]
pub struct ShareRequestBuilder {
    settings: ShareSettings,
    request: ShareRequest,
    expiration: String,
    expiration_valid: bool,
    state: ShareState,
    result: Option<ShareInfo>,
}

impl ShareRequestBuilder {
    /// Create a builder with the given settings. Call [`initialize`](Self::initialize)
    /// before showing the dialog.
    pub fn new(settings: ShareSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Establish fresh defaults for a new share of `entries`.
    ///
    /// Paths are built from `base_path`, `current_path` and each entry name, in the
    /// given order. The password is regenerated, expiration reset to the default
    /// token, access limit to unlimited, and any previous result discarded.
    pub fn initialize(&mut self, entries: &[&Entry], base_path: &str, current_path: &str) {
        let paths = entries
            .iter()
            .map(|entry| join_share_path(base_path, current_path, &entry.name))
            .collect();

        self.request = ShareRequest::new(paths);
        self.request.password = random_password(self.settings.password_length);
        self.request.expires_at = None;
        self.expiration = self.settings.default_expiration.clone();
        self.expiration_valid = expiration::is_valid(&self.expiration);
        self.state = ShareState::Idle;
        self.result = None;

        debug!(
            files = self.request.paths.len(),
            expiration = %self.expiration,
            "Initialized share request"
        );
    }

    /// The request as currently edited.
    pub fn request(&self) -> &ShareRequest {
        &self.request
    }

    /// The settings this builder renders with.
    pub fn settings(&self) -> &ShareSettings {
        &self.settings
    }

    /// Current state.
    pub fn state(&self) -> &ShareState {
        &self.state
    }

    /// Whether a submission is in flight.
    pub fn is_pending(&self) -> bool {
        self.state == ShareState::Pending
    }

    /// Whether a share has been created by this builder.
    pub fn is_succeeded(&self) -> bool {
        matches!(self.state, ShareState::Succeeded(_))
    }

    /// Whether the dialog may submit right now.
    pub fn can_submit(&self) -> bool {
        self.expiration_valid
            && !self.is_pending()
            && !self.is_succeeded()
            && !self.request.paths.is_empty()
    }

    /// The rendered message after a successful submission.
    pub fn link_text(&self) -> Option<&str> {
        match self.state {
            ShareState::Succeeded(ref text) => Some(text),
            _ => None,
        }
    }

    /// The share returned by the last successful submission.
    pub fn result(&self) -> Option<&ShareInfo> {
        self.result.as_ref()
    }

    /// The selected expiration token.
    pub fn expiration(&self) -> &str {
        &self.expiration
    }

    /// Whether the selected expiration token is valid.
    pub fn expiration_valid(&self) -> bool {
        self.expiration_valid
    }

    /// Select an expiration token. The token is kept even when invalid, so the
    /// user can keep editing, but submission stays blocked until it is fixed.
    pub fn set_expiration(&mut self, token: impl Into<String>) -> ShareResult<()> {
        self.expiration = token.into();
        match self.expiration.parse::<expiration::DurationToken>() {
            Ok(_) => {
                self.expiration_valid = true;
                Ok(())
            }
            Err(e) => {
                self.expiration_valid = false;
                Err(e)
            }
        }
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.request.password = password.into();
    }

    /// Replace the password with a new random one.
    pub fn regenerate_password(&mut self) -> &str {
        self.request.password = random_password(self.settings.password_length);
        &self.request.password
    }

    /// Limit the number of accesses; 0 is unlimited.
    pub fn set_max_accessed(&mut self, max_accessed: u32) {
        self.request.max_accessed = max_accessed;
    }

    pub fn set_extract_folder(&mut self, policy: ExtractFolder) {
        self.request.extract_folder_policy = policy;
    }

    pub fn set_order(&mut self, order_by: OrderBy, direction: OrderDirection) {
        self.request.order_by = order_by;
        self.request.order_direction = direction;
    }

    pub fn set_remark(&mut self, remark: impl Into<String>) {
        self.request.remark = remark.into();
    }

    pub fn set_readme(&mut self, readme: impl Into<String>) {
        self.request.readme = readme.into();
    }

    pub fn set_header(&mut self, header: impl Into<String>) {
        self.request.header = header.into();
    }

    /// Validate the request, resolve the expiration against `now` and enter `Pending`.
    ///
    /// Returns the frozen request to send. The expiration is resolved exactly
    /// once here; the stored timestamp is what gets submitted.
    pub fn begin_submit(&mut self, now: DateTime<Utc>) -> ShareResult<ShareRequest> {
        if self.is_pending() {
            return Err(ShareError::AlreadyPending);
        }
        if self.is_succeeded() {
            return Err(ShareError::AlreadyCreated);
        }
        self.request.validate()?;
        let expires_at = expiration::resolve(&self.expiration, now)?;

        self.request.expires_at = expires_at;
        self.state = ShareState::Pending;
        info!(
            files = self.request.paths.len(),
            expires = %expiration::format_expiration(expires_at),
            max_accessed = self.request.max_accessed,
            "Submitting share"
        );
        Ok(self.request.clone())
    }

    /// Record the outcome of a submission started with [`begin_submit`](Self::begin_submit).
    ///
    /// On success the result is rendered through the message template. A
    /// failure keeps no result, since only `Idle` or `Failed` can be pending.
    pub fn finish_submit(&mut self, outcome: ShareResult<ShareInfo>) -> ShareResult<String> {
        match outcome {
            Ok(info) => {
                let message = self.render(&info);
                info!(id = ?info.id(), "Share created");
                self.result = Some(info);
                self.state = ShareState::Succeeded(message.clone());
                Ok(message)
            }
            Err(e) => {
                warn!(error = %e, "Share creation failed");
                self.result = None;
                self.state = ShareState::Failed(e.clone());
                Err(e)
            }
        }
    }

    /// Submit through `client`, resolving the expiration against the current time.
    pub async fn submit(&mut self, client: &dyn ShareClient) -> ShareResult<String> {
        self.submit_at(client, Utc::now()).await
    }

    /// Submit through `client`, resolving the expiration against `now`.
    pub async fn submit_at(
        &mut self,
        client: &dyn ShareClient,
        now: DateTime<Utc>,
    ) -> ShareResult<String> {
        let request = self.begin_submit(now)?;
        debug!(client = client.name(), "Sending share request");
        let outcome = client.create_share(&request).await;
        self.finish_submit(outcome)
    }

    /// Render the message for `info` with this builder's settings.
    pub fn render(&self, info: &ShareInfo) -> String {
        let mut overrides = vec![
            ("site_title".to_string(), self.settings.site_title.clone()),
            (
                "expires_display".to_string(),
                expiration::format_expiration(self.request.expires_at),
            ),
        ];
        if let (Some(site_url), Some(id)) = (self.settings.site_url.as_deref(), info.id()) {
            overrides.push((
                "link".to_string(),
                format!("{}/@s/{}", site_url.trim_end_matches('/'), id),
            ));
        }

        let data = make_template_data(info, overrides);
        let missing: Vec<String> = placeholders(&self.settings.template)
            .into_iter()
            .filter(|key| !data.contains_key(key))
            .collect();
        if !missing.is_empty() {
            debug!(?missing, "Template keys without values");
        }
        compile(&self.settings.template, &data)
    }
}
