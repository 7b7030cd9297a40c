//! Strongly-typed identifiers for domain entities
//!
//! Every entity is keyed by a storage-assigned positive integer. Wrapping the
//! raw value in a newtype prevents a claim id from being passed where a policy
//! id is expected, and gives every id the same positivity check.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! define_id {
    ($name:ident, $entity:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw value without checking it
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the identifier only if the raw value is positive
            pub fn checked(value: i64) -> Option<Self> {
                (value > 0).then_some(Self(value))
            }

            /// Returns the raw value
            pub const fn value(&self) -> i64 {
                self.0
            }

            /// Storage-assigned ids are always positive
            pub const fn is_valid(&self) -> bool {
                self.0 > 0
            }

            /// Returns the entity name used in error messages
            pub fn entity() -> &'static str {
                $entity
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_id!(ProductId, "Product");
define_id!(PolicyId, "Policy");
define_id!(ClaimId, "Claim");
define_id!(PaymentId, "Payment");
