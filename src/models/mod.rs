mod job_post;
mod software_house;

pub use job_post::{
    AdminView, JobKind, JobPost, JobPostStatus, JobPostWithHouse, NewJobPost, expiry_after,
    is_visible,
};
pub use software_house::{NewSoftwareHouse, SoftwareHouse, SoftwareHouseStatus};
