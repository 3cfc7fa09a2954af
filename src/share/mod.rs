//! Share-link creation.
//!
//! A share turns the selected entries into a request, resolves its expiration
//! token, sends it to the share service and renders the returned share into a
//! message through a user-authored template.

pub mod builder;
pub mod client;
pub mod error;
pub mod expiration;
pub mod mock;
pub mod request;
pub mod template;

pub use builder::{ShareRequestBuilder, ShareSettings, ShareState};
pub use client::{ApiResponse, HttpShareClient, ShareClient};
pub use error::{ShareError, ShareResult};
pub use expiration::{DurationToken, DurationUnit, EXPIRATION_PRESETS};
pub use request::{ExtractFolder, OrderBy, OrderDirection, ShareInfo, ShareRequest};
pub use template::{compile, make_template_data, placeholders, TemplateContext};
