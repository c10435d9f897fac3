//! Job post DTOs for the public board, the owner area and the admin area.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::pagination::{default_page, default_page_size};
use crate::models::{AdminView, JobKind, JobPost, JobPostStatus, JobPostWithHouse};
use crate::services::{BrowseQuery, JobPostInput};

/// New job post submitted by an approved software house
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateJobPostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    #[schema(example = "Backend Engineering Intern", min_length = 1, max_length = 200)]
    pub title: String,
    #[validate(url(message = "Image URL must be a valid URL"), length(max = 2048))]
    #[schema(example = "https://cdn.example/poster.png", format = "uri")]
    pub image_url: String,
    #[validate(url(message = "YouTube URL must be a valid URL"), length(max = 2048))]
    #[schema(example = "https://www.youtube.com/watch?v=dQw4w9WgXcQ", format = "uri")]
    pub youtube_url: Option<String>,
    #[validate(length(min = 1, max = 500, message = "Contact info must be between 1 and 500 characters"))]
    #[schema(example = "hr@acme.example")]
    pub contact_info: String,
}

impl From<CreateJobPostRequest> for JobPostInput {
    fn from(req: CreateJobPostRequest) -> Self {
        Self {
            title: req.title,
            image_url: req.image_url,
            // an empty field in the form means "no video"
            youtube_url: req.youtube_url.filter(|url| !url.is_empty()),
            contact_info: req.contact_info,
        }
    }
}

/// Public board query
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct BrowseJobsQuery {
    /// Matched against job title and software house name, case-insensitive
    #[validate(length(max = 100, message = "Search term must be at most 100 characters"))]
    pub search: Option<String>,

    #[param(inline)]
    pub kind: Option<JobKind>,

    /// Page number (1-based)
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    #[param(minimum = 1, example = 1)]
    pub page: i64,

    /// Number of items per page (max 100)
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100, example = 20)]
    pub page_size: i64,
}

impl From<BrowseJobsQuery> for BrowseQuery {
    fn from(query: BrowseJobsQuery) -> Self {
        Self {
            search: query
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            kind: query.kind,
            page: query.page,
            page_size: query.page_size,
        }
    }
}

/// Owning software house as shown next to a listing
#[derive(Debug, Serialize, ToSchema)]
pub struct ListingHouse {
    pub id: Uuid,
    #[schema(example = "Acme Software")]
    pub name: String,
    #[schema(example = "+62 21 555 0100")]
    pub display_phone: String,
    #[schema(example = "https://acme.example")]
    pub website: String,
}

/// A job post joined with its house, as listed on the board and in the admin area
#[derive(Debug, Serialize, ToSchema)]
pub struct JobListingResponse {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    pub youtube_url: Option<String>,
    pub contact_info: String,
    pub status: JobPostStatus,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub expires_at: Timestamp,
    /// Whole days until expiry, never negative
    #[schema(example = 4)]
    pub days_left: i64,
    pub software_house: ListingHouse,
}

impl JobListingResponse {
    pub fn from_listing(listing: JobPostWithHouse, now: Timestamp) -> Self {
        let days_left = listing.post.days_left(now);
        let JobPostWithHouse {
            post,
            house_name,
            house_display_phone,
            house_website,
        } = listing;

        Self {
            id: post.id,
            title: post.title,
            image_url: post.image_url,
            youtube_url: post.youtube_url,
            contact_info: post.contact_info,
            status: post.status,
            created_at: post.created_at,
            expires_at: post.expires_at,
            days_left,
            software_house: ListingHouse {
                id: post.software_house_id,
                name: house_name,
                display_phone: house_display_phone,
                website: house_website,
            },
        }
    }
}

/// A post as its owner or the admin sees it after a change
#[derive(Debug, Serialize, ToSchema)]
pub struct JobPostResponse {
    #[serde(flatten)]
    pub post: JobPost,
    /// Derived display predicate at response time
    pub visible: bool,
    #[schema(example = 5)]
    pub days_left: i64,
}

impl JobPostResponse {
    pub fn new(post: JobPost, now: Timestamp) -> Self {
        Self {
            visible: post.is_visible(now),
            days_left: post.days_left(now),
            post,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct AdminJobsQuery {
    /// Defaults to `active`
    #[serde(default)]
    #[param(inline)]
    pub view: AdminView,
}

/// Extend/relist request; `days` falls back to the default display days.
///
/// Any positive length is accepted; a deadline past the representable time
/// range is rejected when the new expiry is computed.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct ExtendJobRequest {
    #[validate(range(min = 1, message = "Days must be greater than 0"))]
    #[schema(example = 5, minimum = 1)]
    pub days: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateJobPostRequest {
        CreateJobPostRequest {
            title: "Backend Intern".to_string(),
            image_url: "https://cdn.example/poster.png".to_string(),
            youtube_url: None,
            contact_info: "hr@acme.example".to_string(),
        }
    }

    #[test]
    fn test_create_request_validation() {
        assert!(create_request().validate().is_ok());

        let bad = CreateJobPostRequest {
            title: String::new(),
            image_url: "poster.png".to_string(),
            youtube_url: Some("not a url".to_string()),
            ..create_request()
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("image_url"));
        assert!(fields.contains_key("youtube_url"));
    }

    #[test]
    fn test_empty_youtube_url_becomes_none() {
        let req = CreateJobPostRequest {
            youtube_url: Some(String::new()),
            ..create_request()
        };
        let input: JobPostInput = req.into();
        assert_eq!(input.youtube_url, None);
    }

    #[test]
    fn test_browse_query_defaults_and_blank_search() {
        let query: BrowseJobsQuery = serde_json::from_str(r#"{"search": "   "}"#).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 20);
        let browse: BrowseQuery = query.into();
        assert_eq!(browse.search, None);
    }

    #[test]
    fn test_browse_query_page_size_bounds() {
        let query = BrowseJobsQuery {
            search: None,
            kind: Some(JobKind::FullTime),
            page: 1,
            page_size: 101,
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_extend_request_days_range() {
        assert!(ExtendJobRequest::default().validate().is_ok());
        assert!(ExtendJobRequest { days: Some(0) }.validate().is_err());
        assert!(ExtendJobRequest { days: Some(-3) }.validate().is_err());
        assert!(ExtendJobRequest { days: Some(400) }.validate().is_ok());
        assert!(ExtendJobRequest { days: Some(30) }.validate().is_ok());
    }

    #[test]
    fn test_listing_response_carries_house_and_days_left() {
        let now = Timestamp::from_second(1_700_000_000).unwrap();
        let post = JobPost {
            id: Uuid::new_v4(),
            software_house_id: Uuid::new_v4(),
            title: "Backend Intern".to_string(),
            image_url: "https://cdn.example/poster.png".to_string(),
            youtube_url: None,
            contact_info: "hr@acme.example".to_string(),
            status: JobPostStatus::Active,
            created_at: now,
            expires_at: crate::models::expiry_after(now, 5).unwrap(),
        };
        let house_id = post.software_house_id;
        let listing = JobPostWithHouse {
            post,
            house_name: "Acme".to_string(),
            house_display_phone: "0215550100".to_string(),
            house_website: "https://acme.example".to_string(),
        };

        let response = JobListingResponse::from_listing(listing, now);
        assert_eq!(response.days_left, 5);
        assert_eq!(response.software_house.id, house_id);
        assert_eq!(response.software_house.name, "Acme");
    }
}
