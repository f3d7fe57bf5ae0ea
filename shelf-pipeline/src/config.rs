use serde::{Deserialize, Serialize};

/// Days before expiry at which a batch stops being "Good".
pub const DEFAULT_NEAR_EXPIRY_DAYS: i64 = 90;
/// Facility shown when a catalog row has no manufacturing address.
pub const DEFAULT_MANUFACTURING_ADDRESS: &str = "Organic India Facility, Lucknow";

/// Tunables for dataset preparation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub near_expiry_days: i64,
    pub default_manufacturing_address: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            near_expiry_days: DEFAULT_NEAR_EXPIRY_DAYS,
            default_manufacturing_address: DEFAULT_MANUFACTURING_ADDRESS.to_string(),
        }
    }
}
