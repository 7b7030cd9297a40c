//! Region names, one per cached entity view

pub const POLICIES: &str = "policies";
pub const POLICY_PRODUCTS: &str = "policy-products";
pub const CLAIMS: &str = "claims";
pub const CLAIM_STATUS: &str = "claim-status";
pub const PRODUCTS: &str = "products";
pub const PRODUCT_BY_ID: &str = "product-by-id";
