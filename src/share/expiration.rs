//! Relative expiration tokens.
//!
//! A token is either `never` (any case) or `[+]<n><unit>` with `n > 0` and
//! unit one of `H` (hours), `d` (days), `w` (weeks), `M` (calendar months).
//! The leading `+` is optional and does not change the meaning.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Months, TimeDelta, Utc};
use tracing::debug;

use super::error::{ShareError, ShareResult};

/// Menu of expiration choices offered to users, as `(token, label)`.
pub const EXPIRATION_PRESETS: [(&str, &str); 5] = [
    ("2H", "2 hours"),
    ("2d", "2 days"),
    ("1w", "1 week"),
    ("1M", "1 month"),
    ("never", "never"),
];

/// Token used when nothing else is configured.
pub const DEFAULT_EXPIRATION: &str = "2H";

/// Unit of a relative duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Hours,
    Days,
    Weeks,
    Months,
}

impl DurationUnit {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'H' => Some(Self::Hours),
            'd' => Some(Self::Days),
            'w' => Some(Self::Weeks),
            'M' => Some(Self::Months),
            _ => None,
        }
    }

    fn as_char(&self) -> char {
        match self {
            Self::Hours => 'H',
            Self::Days => 'd',
            Self::Weeks => 'w',
            Self::Months => 'M',
        }
    }
}

/// A parsed expiration token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationToken {
    /// The link never expires.
    Never,
    /// The link expires `amount` units after resolution time.
    Relative { amount: u32, unit: DurationUnit },
}

impl DurationToken {
    /// Absolute expiration relative to `now`, or `None` for [`DurationToken::Never`].
    pub fn resolve_at(&self, now: DateTime<Utc>) -> ShareResult<Option<DateTime<Utc>>> {
        let (amount, unit) = match *self {
            Self::Never => return Ok(None),
            Self::Relative { amount, unit } => (amount, unit),
        };

        let resolved = match unit {
            DurationUnit::Months => now.checked_add_months(Months::new(amount)),
            DurationUnit::Hours => add_delta(now, TimeDelta::try_hours(amount.into())),
            DurationUnit::Days => add_delta(now, TimeDelta::try_days(amount.into())),
            DurationUnit::Weeks => add_delta(now, TimeDelta::try_weeks(amount.into())),
        };

        resolved
            .map(Some)
            .ok_or_else(|| ShareError::invalid_duration_token(self.to_string()))
    }
}

fn add_delta(now: DateTime<Utc>, delta: Option<TimeDelta>) -> Option<DateTime<Utc>> {
    delta.and_then(|d| now.checked_add_signed(d))
}

impl FromStr for DurationToken {
    type Err = ShareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.eq_ignore_ascii_case("never") {
            return Ok(Self::Never);
        }

        let invalid = || ShareError::invalid_duration_token(s);
        let body = token.strip_prefix('+').unwrap_or(token);
        let unit_char = body.chars().last().ok_or_else(invalid)?;
        let unit = DurationUnit::from_char(unit_char).ok_or_else(invalid)?;
        let digits = &body[..body.len() - unit_char.len_utf8()];

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let amount: u32 = digits.parse().map_err(|_| invalid())?;
        if amount == 0 {
            return Err(invalid());
        }

        Ok(Self::Relative { amount, unit })
    }
}

impl fmt::Display for DurationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => write!(f, "never"),
            Self::Relative { amount, unit } => write!(f, "{}{}", amount, unit.as_char()),
        }
    }
}

/// Resolve `token` relative to `now`.
///
/// Returns `Ok(None)` for `never`, the absolute expiration otherwise.
pub fn resolve(token: &str, now: DateTime<Utc>) -> ShareResult<Option<DateTime<Utc>>> {
    let parsed: DurationToken = token.parse()?;
    let resolved = parsed.resolve_at(now)?;
    debug!(token, expires = ?resolved, "Resolved expiration token");
    Ok(resolved)
}

/// Resolve `token` against the current wall-clock time.
///
/// Every call reads the clock again; resolve once per submission and keep the result.
pub fn resolve_now(token: &str) -> ShareResult<Option<DateTime<Utc>>> {
    resolve(token, Utc::now())
}

/// Check a token without resolving it.
pub fn is_valid(token: &str) -> bool {
    token.parse::<DurationToken>().is_ok()
}

/// Human-readable form of a resolved expiration.
pub fn format_expiration(expires: Option<DateTime<Utc>>) -> String {
    match expires {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "never".to_string(),
    }
}
