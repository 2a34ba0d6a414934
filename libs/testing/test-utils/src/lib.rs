//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: PostgreSQL container with migrations applied (feature: "postgres")
//! - `TestNats`: NATS server container (feature: "nats")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let sku = builder.sku("main");
//! }
//! ```
//!
//! For NATS, add `features = ["nats"]` to the dev-dependency.

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "nats")]
mod nats;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

#[cfg(feature = "nats")]
pub use nats::TestNats;

/// Builder for test data with deterministic randomization
///
/// Seeded identifiers keep failures reproducible and avoid collisions when
/// tests share a database.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Stock keeping unit unique to this builder.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.sku("main"), "SKU-7-main");
    /// ```
    pub fn sku(&self, suffix: &str) -> String {
        format!("SKU-{}-{}", self.seed, suffix)
    }

    /// Twelve-digit universal product code derived from the seed.
    pub fn upc(&self) -> String {
        format!("{:012}", self.seed % 1_000_000_000_000)
    }

    /// Generate a unique name for testing, e.g. `test-product-12345-main`.
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that a result is an error whose message contains `needle`.
    pub fn assert_err_contains<T, E: std::fmt::Display>(
        result: Result<T, E>,
        needle: &str,
        context: &str,
    ) {
        match result {
            Ok(_) => panic!("{}: expected an error containing {:?}", context, needle),
            Err(e) => assert!(
                e.to_string().contains(needle),
                "{}: error {:?} does not contain {:?}",
                context,
                e.to_string(),
                needle
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.sku("a"), builder2.sku("a"));
        assert_eq!(builder1.upc(), builder2.upc());
        assert_eq!(builder1.upc().len(), 12);
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.sku("main"), builder2.sku("main"));
    }

    #[test]
    fn test_assert_err_contains() {
        assertions::assert_err_contains(Err::<(), _>("sku is required"), "sku", "validation");
        assert_eq!(assertions::assert_some(Some(3), "value"), 3);
    }
}
