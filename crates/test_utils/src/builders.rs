//! Test Data Builders
//!
//! Builders for the peer views that stubs hand back. Defaults describe an
//! in-force, paid-up policy so a test only states what it breaks.

use chrono::{DateTime, Utc};
use core_kernel::{PaymentId, PaymentView, PolicyId, PolicyView, ProductId, ProductView};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{AmountFixtures, StringFixtures, TemporalFixtures};

/// Builder for [`ProductView`]
pub struct ProductViewBuilder {
    view: ProductView,
}

impl ProductViewBuilder {
    pub fn new(product_id: ProductId) -> Self {
        Self {
            view: ProductView {
                product_id,
                product_name: "Term Life Secure".to_string(),
                product_type: "LIFE".to_string(),
                coverage_type: "INDIVIDUAL".to_string(),
                min_premium: dec!(500),
                max_coverage: dec!(1000000),
                description: None,
                active: true,
            },
        }
    }

    pub fn inactive(mut self) -> Self {
        self.view.active = false;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.view.product_name = name.into();
        self
    }

    pub fn build(self) -> ProductView {
        self.view
    }
}

/// Builder for [`PolicyView`]
pub struct PolicyViewBuilder {
    view: PolicyView,
}

impl PolicyViewBuilder {
    pub fn new(policy_id: PolicyId) -> Self {
        Self {
            view: PolicyView {
                policy_id,
                policy_number: format!("POL-{:08}", policy_id.value()),
                policy_status: "ACTIVE".to_string(),
                premium_amount: AmountFixtures::premium(),
                coverage_amount: AmountFixtures::coverage(),
                policy_start_date: Some(TemporalFixtures::in_force_start()),
                policy_end_date: Some(TemporalFixtures::in_force_end()),
            },
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.view.policy_status = status.into();
        self
    }

    pub fn with_coverage(mut self, coverage: Decimal) -> Self {
        self.view.coverage_amount = coverage;
        self
    }

    pub fn with_period(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.view.policy_start_date = start;
        self.view.policy_end_date = end;
        self
    }

    pub fn build(self) -> PolicyView {
        self.view
    }
}

/// Builder for [`PaymentView`]
pub struct PaymentViewBuilder {
    view: PaymentView,
}

impl PaymentViewBuilder {
    pub fn new(policy_id: PolicyId) -> Self {
        Self {
            view: PaymentView {
                payment_id: PaymentId::new(policy_id.value()),
                policy_id,
                customer_id: StringFixtures::customer_id().to_string(),
                policy_number: format!("POL-{:08}", policy_id.value()),
                payment_mode: "CREDIT_CARD".to_string(),
                payment_type: "PREMIUM".to_string(),
                reference_number: StringFixtures::reference_number().to_string(),
                transaction_id: "TXN-0A1B2C3D".to_string(),
                amount: AmountFixtures::premium(),
                status: "SUCCESS".to_string(),
                payment_date: TemporalFixtures::in_force_start(),
            },
        }
    }

    pub fn for_customer(mut self, customer_id: impl Into<String>) -> Self {
        self.view.customer_id = customer_id.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.view.status = status.into();
        self
    }

    pub fn build(self) -> PaymentView {
        self.view
    }
}
