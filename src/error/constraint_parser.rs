use regex::Regex;
use std::sync::OnceLock;

/// Tables owned by this service, longest first so prefix matching on
/// constraint names picks the most specific table.
const KNOWN_TABLES: &[&str] = &["software_houses", "job_posts"];

/// Suffixes PostgreSQL appends to generated constraint names.
const CONSTRAINT_SUFFIXES: &[&str] = &["_pkey", "_fkey", "_key", "_check", "_not_null"];

/// Extracts entity/field/value triples from PostgreSQL constraint violation messages.
pub struct ConstraintParser;

struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    table_name: Regex,
}

static REGEX_PATTERNS: OnceLock<Option<RegexPatterns>> = OnceLock::new();

impl ConstraintParser {
    fn patterns() -> Option<&'static RegexPatterns> {
        REGEX_PATTERNS
            .get_or_init(|| {
                Some(RegexPatterns {
                    // "Key (field)=(value)"
                    key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").ok()?,
                    column_name: Regex::new(r#"column "([^"]+)""#).ok()?,
                    // "table" in insert/update messages, "relation" in check messages
                    table_name: Regex::new(r#"(?:table|relation) "([^"]+)""#).ok()?,
                })
            })
            .as_ref()
    }

    /// Parses a unique violation into `(entity, field, value)`.
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let from_message = Self::extract_key_value_from_message(message);

        if let Some((entity, field)) = constraint_name.and_then(Self::parse_constraint_name) {
            let value = from_message
                .map(|(_, value)| value)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = from_message?;
        let entity =
            Self::extract_table_from_message(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Parses a not-null violation into `(entity, field)`.
    pub fn parse_not_null_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        let field = Self::extract_column_from_message(message)?;
        let entity = Self::extract_table_from_message(message)
            .or_else(|| constraint_name.and_then(Self::parse_constraint_name).map(|(e, _)| e))
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Parses a foreign key violation into `(referenced_entity, field, value)`.
    ///
    /// The entity is the referenced table when the message names it
    /// (`is not present in table "software_houses"`).
    pub fn parse_foreign_key_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let (field, value) = match Self::extract_key_value_from_message(message) {
            Some(pair) => pair,
            None => {
                let (_, field) = constraint_name.and_then(Self::parse_constraint_name)?;
                (field, "unknown".to_string())
            }
        };

        let referenced = message
            .rsplit_once("present in table \"")
            .and_then(|(_, rest)| rest.split('"').next())
            .map(str::to_string)
            .or_else(|| Self::extract_table_from_message(message))
            .unwrap_or_else(|| "resource".to_string());

        Some((referenced, field, value))
    }

    /// Parses a check violation into `(entity, field)`.
    pub fn parse_check_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(pair) = constraint_name.and_then(Self::parse_constraint_name) {
            return Some(pair);
        }
        let entity = Self::extract_table_from_message(message)?;
        Some((entity, "value".to_string()))
    }

    /// Splits a generated constraint name such as `job_posts_software_house_id_fkey`
    /// into `("job_posts", "software_house_id")`.
    pub fn parse_constraint_name(constraint: &str) -> Option<(String, String)> {
        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint.strip_suffix(suffix))
            .unwrap_or(constraint);

        if KNOWN_TABLES.contains(&stem) {
            return None;
        }

        if let Some((table, field)) = KNOWN_TABLES.iter().find_map(|table| {
            stem.strip_prefix(table)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|field| (*table, field))
        }) {
            if field.is_empty() {
                return None;
            }
            return Some((table.to_string(), field.to_string()));
        }

        let (table, field) = stem.split_once('_')?;
        if table.is_empty() || field.is_empty() {
            return None;
        }
        Some((table.to_string(), field.to_string()))
    }

    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        let captures = Self::patterns()?.key_value.captures(message)?;
        Some((captures[1].to_string(), captures[2].to_string()))
    }

    pub fn extract_column_from_message(message: &str) -> Option<String> {
        let captures = Self::patterns()?.column_name.captures(message)?;
        Some(captures[1].to_string())
    }

    pub fn extract_table_from_message(message: &str) -> Option<String> {
        let captures = Self::patterns()?.table_name.captures(message)?;
        Some(captures[1].to_string())
    }
}
