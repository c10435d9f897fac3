//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `software_house` - registration and admin review
//! - `job_post` - public board, owner area and admin listing management
//! - `auth` - admin login and token refresh
//! - `settings` - runtime listing settings
//! - `error` / `pagination` / `health` - shared response shapes

mod auth;
mod error;
mod health;
mod job_post;
mod pagination;
mod settings;
mod software_house;

pub use auth::{AdminLoginRequest, RefreshTokenRequest};
pub use error::ErrorResponse;
pub use health::{HealthResponse, HealthStatus, StoreCheck};
pub use job_post::{
    AdminJobsQuery, BrowseJobsQuery, CreateJobPostRequest, ExtendJobRequest, JobListingResponse,
    JobPostResponse, ListingHouse,
};
pub use pagination::{PagedResponse, PaginationMeta};
pub use settings::{ListingSettingsResponse, UpdateListingSettingsRequest};
pub use software_house::{
    RegisterSoftwareHouseRequest, RegisterSoftwareHouseResponse, SoftwareHouseStatusQuery,
};
