//! Software houses: employers that register and wait for admin approval.

use diesel_derive_enum::DbEnum;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Registration status of a software house
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, DbEnum, ToSchema,
)]
#[db_enum(existing_type_path = "crate::schema::sql_types::SoftwareHouseStatus")]
#[serde(rename_all = "lowercase")]
pub enum SoftwareHouseStatus {
    Pending,
    Approved,
    Rejected,
}

impl SoftwareHouseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoftwareHouseStatus::Pending => "pending",
            SoftwareHouseStatus::Approved => "approved",
            SoftwareHouseStatus::Rejected => "rejected",
        }
    }

    /// Target status of an approval, `None` when the house is already approved.
    ///
    /// Pending and rejected houses may both be approved.
    pub fn approve(self) -> AppResult<Option<Self>> {
        match self {
            SoftwareHouseStatus::Pending | SoftwareHouseStatus::Rejected => {
                Ok(Some(SoftwareHouseStatus::Approved))
            }
            SoftwareHouseStatus::Approved => Ok(None),
        }
    }

    /// Target status of a rejection, `None` when the house is already rejected.
    ///
    /// Approval is never revoked by a rejection.
    pub fn reject(self) -> AppResult<Option<Self>> {
        match self {
            SoftwareHouseStatus::Pending => Ok(Some(SoftwareHouseStatus::Rejected)),
            SoftwareHouseStatus::Rejected => Ok(None),
            SoftwareHouseStatus::Approved => Err(self.refuse("reject")),
        }
    }

    fn refuse(self, action: &str) -> AppError {
        AppError::InvalidTransition {
            entity: "SoftwareHouse".to_string(),
            from: self.as_str().to_string(),
            action: action.to_string(),
        }
    }
}

impl std::fmt::Display for SoftwareHouseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SoftwareHouseStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(SoftwareHouseStatus::Pending),
            "approved" => Ok(SoftwareHouseStatus::Approved),
            "rejected" => Ok(SoftwareHouseStatus::Rejected),
            _ => Err(AppError::invalid_argument(
                "status",
                format!("'{}' is not one of pending, approved, rejected", s),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SoftwareHouse {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    /// Phone number shown to job seekers
    pub display_phone: String,
    pub website: String,
    pub status: SoftwareHouseStatus,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
}

impl SoftwareHouse {
    pub fn is_approved(&self) -> bool {
        self.status == SoftwareHouseStatus::Approved
    }
}

/// Validated registration data. Status is always `pending` on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSoftwareHouse {
    pub name: String,
    pub phone: String,
    pub display_phone: String,
    pub website: String,
}
