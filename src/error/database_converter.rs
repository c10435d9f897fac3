use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Converts Diesel errors into structured [`AppError`] variants.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error, using `operation` as context for unstructured failures.
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info, operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            DieselError::BrokenTransactionManager => AppError::StoreUnavailable {
                source: anyhow::Error::from(error),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: Box<dyn diesel::result::DatabaseErrorInformation + Send + Sync>,
        operation: &str,
    ) -> AppError {
        let message = info.message();
        let constraint_name = info.constraint_name();

        let converted = match kind {
            DatabaseErrorKind::UniqueViolation => {
                ConstraintParser::parse_unique_violation(message, constraint_name).map(
                    |(entity, field, value)| AppError::Duplicate {
                        entity,
                        field,
                        value,
                    },
                )
            }
            DatabaseErrorKind::NotNullViolation => {
                ConstraintParser::parse_not_null_violation(message, constraint_name).map(
                    |(entity, field)| {
                        AppError::invalid_argument(&field, format!("Field is required for {}", entity))
                    },
                )
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                ConstraintParser::parse_foreign_key_violation(message, constraint_name)
                    .map(|(entity, field, value)| AppError::not_found(&entity, &field, value))
            }
            DatabaseErrorKind::CheckViolation => {
                ConstraintParser::parse_check_violation(message, constraint_name).map(
                    |(entity, field)| {
                        AppError::invalid_argument(
                            &field,
                            format!("Check constraint failed for {}", entity),
                        )
                    },
                )
            }
            DatabaseErrorKind::ClosedConnection => {
                return AppError::StoreUnavailable {
                    source: anyhow::Error::msg(format!("Connection closed: {}", message)),
                };
            }
            _ => None,
        };

        converted.unwrap_or_else(|| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(format!("{:?}: {}", kind, message)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockDatabaseErrorInfo {
        message: String,
        constraint_name: Option<String>,
    }

    impl diesel::result::DatabaseErrorInformation for MockDatabaseErrorInfo {
        fn message(&self) -> &str {
            &self.message
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            None
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint_name.as_deref()
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn db_error(kind: DatabaseErrorKind, message: &str, constraint: Option<&str>) -> DieselError {
        DieselError::DatabaseError(
            kind,
            Box::new(MockDatabaseErrorInfo {
                message: message.to_string(),
                constraint_name: constraint.map(str::to_string),
            }),
        )
    }

    #[test]
    fn test_convert_not_found_error() {
        let result = DatabaseErrorConverter::convert_diesel_error(DieselError::NotFound, "find job");
        assert!(matches!(result, AppError::NotFound { .. }));
    }

    #[test]
    fn test_convert_foreign_key_violation_to_not_found() {
        let error = db_error(
            DatabaseErrorKind::ForeignKeyViolation,
            "insert or update on table \"job_posts\" violates foreign key constraint \"job_posts_software_house_id_fkey\"\nDETAIL: Key (software_house_id)=(b1a4) is not present in table \"software_houses\".",
            Some("job_posts_software_house_id_fkey"),
        );

        match DatabaseErrorConverter::convert_diesel_error(error, "insert job post") {
            AppError::NotFound {
                entity,
                field,
                value,
            } => {
                assert_eq!(entity, "software_houses");
                assert_eq!(field, "software_house_id");
                assert_eq!(value, "b1a4");
            }
            other => panic!("Expected NotFound error, got: {:?}", other),
        }
    }

    #[test]
    fn test_convert_unique_violation() {
        let error = db_error(
            DatabaseErrorKind::UniqueViolation,
            "duplicate key value violates unique constraint \"software_houses_name_key\"\nDETAIL: Key (name)=(Acme) already exists.",
            Some("software_houses_name_key"),
        );

        match DatabaseErrorConverter::convert_diesel_error(error, "insert software house") {
            AppError::Duplicate {
                entity,
                field,
                value,
            } => {
                assert_eq!(entity, "software_houses");
                assert_eq!(field, "name");
                assert_eq!(value, "Acme");
            }
            other => panic!("Expected Duplicate error, got: {:?}", other),
        }
    }

    #[test]
    fn test_convert_not_null_violation() {
        let error = db_error(
            DatabaseErrorKind::NotNullViolation,
            "null value in column \"title\" of relation \"job_posts\" violates not-null constraint",
            None,
        );

        match DatabaseErrorConverter::convert_diesel_error(error, "insert job post") {
            AppError::InvalidArgument { field, reason } => {
                assert_eq!(field, "title");
                assert!(reason.contains("required"));
            }
            other => panic!("Expected InvalidArgument error, got: {:?}", other),
        }
    }

    #[test]
    fn test_convert_closed_connection_to_store_unavailable() {
        let error = db_error(DatabaseErrorKind::ClosedConnection, "server closed the connection", None);
        let result = DatabaseErrorConverter::convert_diesel_error(error, "sweep");
        assert!(matches!(result, AppError::StoreUnavailable { .. }));
    }

    #[test]
    fn test_unparseable_violation_keeps_operation() {
        let error = db_error(DatabaseErrorKind::UniqueViolation, "opaque", None);
        match DatabaseErrorConverter::convert_diesel_error(error, "insert job post") {
            AppError::Database { operation, .. } => assert_eq!(operation, "insert job post"),
            other => panic!("Expected Database error, got: {:?}", other),
        }
    }
}
