//! Product Domain - Insurance product catalog
//!
//! The catalog owns the products policies are issued against. Other services
//! only see [`core_kernel::ProductView`] copies, obtained through the
//! [`core_kernel::ProductClient`] contract that [`ProductCatalog`] also
//! implements for in-process wiring.

pub mod catalog;
pub mod error;
pub mod ports;
pub mod product;
pub mod validation;

pub use catalog::ProductCatalog;
pub use error::ProductError;
pub use ports::ProductRepository;
pub use product::{NewProduct, Product, ProductRequest};
