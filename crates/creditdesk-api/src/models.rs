// Wire-level records for the directory service.
//
// These mirror the service's camelCase JSON exactly and carry no
// behavior. `creditdesk-core` converts them into its domain types.

use serde::{Deserialize, Serialize};

/// A customer account as the directory serves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: String,
    pub name: String,
    /// Billing tier name, e.g. "Basic". Left as a string at this layer;
    /// the core crate owns the closed enum.
    pub plan: String,
    pub monthly_credits: i64,
    pub per_user_limit: Option<u32>,
    pub used_credits: i64,
    pub users: u32,
}

/// Body of a plan change request.
#[derive(Debug, Serialize)]
pub struct SetPlanRequest<'a> {
    pub plan: &'a str,
}

/// Body of a per-user limit change. `limit: null` clears the limit.
#[derive(Debug, Serialize)]
pub struct SetLimitRequest {
    pub limit: Option<u32>,
}

/// Body of a credit top-up.
#[derive(Debug, Serialize)]
pub struct TopUpRequest {
    pub amount: u32,
}
