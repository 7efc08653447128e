//! Test fixtures and data generators.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::pricing::PriceFormat;
use crate::provider::{
    CustomerInfo, EntitlementInfo, PackageType, ProviderOffering, ProviderOfferings,
    ProviderPackage, StoreProduct,
};

/// Collection of commonly used identifiers.
pub struct TestFixtures;

impl TestFixtures {
    pub const ENTITLEMENT: &'static str = "premium";
    pub const MONTHLY: &'static str = "pkg_monthly";
    pub const ANNUAL: &'static str = "pkg_annual";
    pub const LIFETIME: &'static str = "pkg_lifetime";
    pub const OFFERING: &'static str = "default";
    pub const API_KEY: &'static str = "appl_test_key";
}

/// An entitlement record.
pub fn entitlement(
    identifier: &str,
    product_identifier: &str,
    is_active: bool,
    expiration_date: Option<DateTime<Utc>>,
) -> EntitlementInfo {
    EntitlementInfo {
        identifier: identifier.to_string(),
        is_active,
        product_identifier: product_identifier.to_string(),
        expiration_date,
        will_renew: is_active && expiration_date.is_some(),
    }
}

/// Customer info holding one active entitlement.
pub fn customer_with_entitlement(
    identifier: &str,
    product_identifier: &str,
    expiration_date: Option<DateTime<Utc>>,
) -> CustomerInfo {
    customer_with(vec![entitlement(
        identifier,
        product_identifier,
        true,
        expiration_date,
    )])
}

/// Customer info holding the given entitlements.
pub fn customer_with(entitlements: Vec<EntitlementInfo>) -> CustomerInfo {
    CustomerInfo {
        app_user_id: "$anonymous".to_string(),
        entitlements: entitlements
            .into_iter()
            .map(|e| (e.identifier.clone(), e))
            .collect::<HashMap<_, _>>(),
    }
}

/// Customer info with no entitlements at all.
pub fn customer_without_entitlements() -> CustomerInfo {
    customer_with(Vec::new())
}

/// A store product priced in US dollars.
pub fn store_product(id: &str, price: Decimal) -> StoreProduct {
    let format = PriceFormat::en_us();
    StoreProduct {
        product_identifier: id.to_string(),
        localized_title: format!("{id} plan"),
        localized_description: format!("Premium access ({id})"),
        price,
        localized_price_string: format.format(price),
        price_format: Some(format),
    }
}

/// A package of the given type.
pub fn package(id: &str, package_type: PackageType, price: Decimal) -> ProviderPackage {
    ProviderPackage {
        identifier: id.to_string(),
        package_type,
        store_product: store_product(id, price),
    }
}

pub fn monthly_package(id: &str, price: Decimal) -> ProviderPackage {
    package(id, PackageType::Monthly, price)
}

pub fn annual_package(id: &str, price: Decimal) -> ProviderPackage {
    package(id, PackageType::Annual, price)
}

pub fn lifetime_package(id: &str, price: Decimal) -> ProviderPackage {
    package(id, PackageType::Lifetime, price)
}

/// Offerings whose current offering holds `packages`.
pub fn offerings_with(id: &str, packages: Vec<ProviderPackage>) -> ProviderOfferings {
    let offering = ProviderOffering {
        identifier: id.to_string(),
        available_packages: packages,
    };
    ProviderOfferings {
        current: Some(offering.clone()),
        all: HashMap::from([(id.to_string(), offering)]),
    }
}

/// The usual monthly $9.99 / annual $99.00 pair.
pub fn standard_offerings() -> ProviderOfferings {
    offerings_with(
        TestFixtures::OFFERING,
        vec![
            monthly_package(TestFixtures::MONTHLY, Decimal::new(999, 2)),
            annual_package(TestFixtures::ANNUAL, Decimal::new(9900, 2)),
        ],
    )
}
