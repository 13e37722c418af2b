//! Customer address model and the owned snapshot embedded in broadcasts

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Stored customer address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerAddress {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub customer_id: RecordId,
    pub label: Option<String>,
    pub street: String,
    pub city: String,
    pub district: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CustomerAddress {
    /// Copy the address fields into an owned snapshot
    pub fn to_snapshot(&self) -> AddressSnapshot {
        AddressSnapshot {
            label: self.label.clone(),
            street: self.street.clone(),
            city: self.city.clone(),
            district: self.district.clone(),
            phone: self.phone.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Address copy embedded in a broadcast at creation time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddressSnapshot {
    pub label: Option<String>,
    pub street: String,
    pub city: String,
    pub district: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
