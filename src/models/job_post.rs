//! Job posts and the status/expiry rules that decide what job seekers see.

use diesel_derive_enum::DbEnum;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

const SECONDS_PER_DAY: i64 = 86_400;

/// Stored status of a job post.
///
/// `active` alone does not make a post visible; see [`is_visible`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, DbEnum, ToSchema,
)]
#[db_enum(existing_type_path = "crate::schema::sql_types::JobPostStatus")]
#[serde(rename_all = "lowercase")]
pub enum JobPostStatus {
    Active,
    Expired,
    Hidden,
}

impl JobPostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobPostStatus::Active => "active",
            JobPostStatus::Expired => "expired",
            JobPostStatus::Hidden => "hidden",
        }
    }

    /// Target status of an admin hide, `None` when already hidden.
    pub fn hide(self) -> AppResult<Option<Self>> {
        match self {
            JobPostStatus::Active => Ok(Some(JobPostStatus::Hidden)),
            JobPostStatus::Hidden => Ok(None),
            JobPostStatus::Expired => Err(AppError::InvalidTransition {
                entity: "JobPost".to_string(),
                from: self.as_str().to_string(),
                action: "hide".to_string(),
            }),
        }
    }
}

impl std::fmt::Display for JobPostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct JobPost {
    pub id: Uuid,
    pub software_house_id: Uuid,
    pub title: String,
    pub image_url: String,
    pub youtube_url: Option<String>,
    pub contact_info: String,
    pub status: JobPostStatus,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub expires_at: Timestamp,
}

impl JobPost {
    pub fn is_visible(&self, now: Timestamp) -> bool {
        is_visible(self, now)
    }

    /// Whole days until expiry, truncated and never negative.
    pub fn days_left(&self, now: Timestamp) -> i64 {
        let remaining = self.expires_at.duration_since(now).as_secs();
        (remaining / SECONDS_PER_DAY).max(0)
    }

    /// Picked up by the next sweep: still `active` but already past its deadline.
    pub fn is_overdue(&self, now: Timestamp) -> bool {
        self.status == JobPostStatus::Active && self.expires_at < now
    }
}

/// A post is shown to job seekers iff it is `active` and its deadline is still ahead.
///
/// Status lags behind `expires_at` between sweeps, so both are checked.
pub fn is_visible(post: &JobPost, now: Timestamp) -> bool {
    post.status == JobPostStatus::Active && post.expires_at > now
}

/// `now + days` whole days.
///
/// Fails with `InvalidArgument` for non-positive days or when the result
/// leaves the representable time range.
pub fn expiry_after(now: Timestamp, days: i64) -> AppResult<Timestamp> {
    if days <= 0 {
        return Err(AppError::invalid_argument(
            "days",
            format!("must be greater than 0, got {}", days),
        ));
    }

    days.checked_mul(SECONDS_PER_DAY)
        .map(SignedDuration::from_secs)
        .and_then(|span| now.checked_add(span).ok())
        .ok_or_else(|| {
            AppError::invalid_argument("days", format!("{} days from {} is out of range", days, now))
        })
}

/// Validated job post content; timestamps and status are assigned on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobPost {
    pub software_house_id: Uuid,
    pub title: String,
    pub image_url: String,
    pub youtube_url: Option<String>,
    pub contact_info: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Public filter splitting internships from full-time roles by title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum JobKind {
    Internship,
    FullTime,
}

impl JobKind {
    const INTERN_MARKER: &'static str = "intern";

    pub fn matches(&self, title: &str) -> bool {
        let is_intern = title.to_lowercase().contains(Self::INTERN_MARKER);
        match self {
            JobKind::Internship => is_intern,
            JobKind::FullTime => !is_intern,
        }
    }

    /// `ILIKE` pattern matching internship titles
    pub fn title_pattern() -> String {
        format!("%{}%", Self::INTERN_MARKER)
    }
}

/// Admin listing tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdminView {
    /// Visible to job seekers
    #[default]
    Active,
    /// Not hidden and not visible: swept, or overdue and awaiting the sweep
    Expired,
    Hidden,
}

impl AdminView {
    pub fn includes(&self, post: &JobPost, now: Timestamp) -> bool {
        match self {
            AdminView::Active => post.is_visible(now),
            AdminView::Expired => post.status != JobPostStatus::Hidden && !post.is_visible(now),
            AdminView::Hidden => post.status == JobPostStatus::Hidden,
        }
    }
}

/// A post joined with the public details of its house
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPostWithHouse {
    pub post: JobPost,
    pub house_name: String,
    pub house_display_phone: String,
    pub house_website: String,
}
