//! Service layer for business logic operations.
//!
//! Services encapsulate business rules and coordinate between the store
//! traits and the HTTP handlers, scheduler and CLI.

mod auth_service;
mod job_post_service;
mod listing_lifecycle;
mod listing_policy;
mod software_house_service;

pub use auth_service::{ADMIN_SUBJECT, AuthService, house_id};
pub use job_post_service::{BrowsePage, BrowseQuery, JobPostInput, JobPostService};
pub use listing_lifecycle::{ListingLifecycle, SweepReport};
pub use listing_policy::ListingPolicy;
pub use software_house_service::SoftwareHouseService;

use crate::config::Settings;
use crate::error::AppResult;
use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap; every service only holds `Arc`s.
#[derive(Clone)]
pub struct Services {
    pub software_houses: SoftwareHouseService,
    pub job_posts: JobPostService,
    pub lifecycle: ListingLifecycle,
    pub policy: ListingPolicy,
    pub auth: AuthService,
}

impl Services {
    pub fn new(repos: &Repositories, settings: &Settings) -> AppResult<Self> {
        let policy = ListingPolicy::new(settings.listings.default_display_days)?;

        Ok(Self {
            software_houses: SoftwareHouseService::new(repos.software_houses.clone()),
            job_posts: JobPostService::new(
                repos.job_posts.clone(),
                repos.software_houses.clone(),
                policy.clone(),
            ),
            lifecycle: ListingLifecycle::new(repos.job_posts.clone(), policy.clone()),
            auth: AuthService::new(
                settings.jwt.clone(),
                settings.admin.clone(),
                repos.software_houses.clone(),
            ),
            policy,
        })
    }
}
