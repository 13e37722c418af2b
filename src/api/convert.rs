//! Conversions between API string ids and SurrealDB record ids

use surrealdb::RecordId;

use crate::core::ServerError;

/// Parse a "table:id" string from the API into a record id
pub fn parse_record_id(value: &str, what: &str) -> Result<RecordId, ServerError> {
    value
        .parse::<RecordId>()
        .map_err(|_| ServerError::Validation(format!("Invalid {what} id: {value}")))
}
