//! Purchasable plans as presented to the application.

use crate::pricing::monthly_price;
use crate::provider::{PackageType, ProviderOffering, ProviderPackage};
use serde::{Deserialize, Serialize};

/// Billing period of a package.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageDuration {
    Monthly,
    Annual,
    Lifetime,
    /// Any other period the provider reports (weekly, six-month, custom...).
    Unknown,
}

impl PackageDuration {
    /// Short display label; empty for [`PackageDuration::Unknown`].
    pub fn label(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Annual => "annual",
            Self::Lifetime => "lifetime",
            Self::Unknown => "",
        }
    }
}

impl From<PackageType> for PackageDuration {
    fn from(package_type: PackageType) -> Self {
        match package_type {
            PackageType::Monthly => Self::Monthly,
            PackageType::Annual => Self::Annual,
            PackageType::Lifetime => Self::Lifetime,
            _ => Self::Unknown,
        }
    }
}

/// One purchasable plan.
///
/// Built from provider data only; `price_per_month` is present exactly when
/// the duration is [`PackageDuration::Annual`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPackage {
    id: String,
    title: String,
    description: String,
    price: String,
    price_per_month: Option<String>,
    duration: PackageDuration,
}

impl SubscriptionPackage {
    /// Map a provider package.
    pub fn from_provider(package: &ProviderPackage) -> Self {
        let product = &package.store_product;
        let duration = PackageDuration::from(package.package_type);

        let price_per_month = match duration {
            PackageDuration::Annual => {
                let format = product.price_format.clone().unwrap_or_default();
                Some(monthly_price(product.price, &format))
            }
            _ => None,
        };

        Self {
            id: package.identifier.clone(),
            title: product.localized_title.clone(),
            description: product.localized_description.clone(),
            price: product.localized_price_string.clone(),
            price_per_month,
            duration,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Localized price string, e.g. `"$99.00"`.
    pub fn price(&self) -> &str {
        &self.price
    }

    /// Monthly equivalent of an annual price, e.g. `"$8.25"`.
    pub fn price_per_month(&self) -> Option<&str> {
        self.price_per_month.as_deref()
    }

    pub fn duration(&self) -> PackageDuration {
        self.duration
    }
}

/// A group of plans offered together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionOffering {
    id: String,
    packages: Vec<SubscriptionPackage>,
}

impl SubscriptionOffering {
    /// Map a provider offering, keeping package order.
    pub fn from_provider(offering: &ProviderOffering) -> Self {
        Self {
            id: offering.identifier.clone(),
            packages: offering
                .available_packages
                .iter()
                .map(SubscriptionPackage::from_provider)
                .collect(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn packages(&self) -> &[SubscriptionPackage] {
        &self.packages
    }

    /// Find a package by id.
    pub fn package(&self, id: &str) -> Option<&SubscriptionPackage> {
        self.packages.iter().find(|p| p.id == id)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PriceFormat;
    use crate::provider::StoreProduct;
    use rust_decimal_macros::dec;

    fn package(id: &str, package_type: PackageType, price: rust_decimal::Decimal) -> ProviderPackage {
        ProviderPackage {
            identifier: id.to_string(),
            package_type,
            store_product: StoreProduct {
                product_identifier: format!("com.example.{id}"),
                localized_title: id.to_uppercase(),
                localized_description: String::new(),
                price,
                localized_price_string: PriceFormat::en_us().format(price),
                price_format: Some(PriceFormat::en_us()),
            },
        }
    }

    #[test]
    fn test_duration_mapping() {
        assert_eq!(PackageDuration::from(PackageType::Monthly), PackageDuration::Monthly);
        assert_eq!(PackageDuration::from(PackageType::Annual), PackageDuration::Annual);
        assert_eq!(PackageDuration::from(PackageType::Lifetime), PackageDuration::Lifetime);
        assert_eq!(PackageDuration::from(PackageType::Weekly), PackageDuration::Unknown);
        assert_eq!(PackageDuration::from(PackageType::SixMonth), PackageDuration::Unknown);
        assert_eq!(PackageDuration::Unknown.label(), "");
    }

    #[test]
    fn test_offering_mapping_keeps_order() {
        let offering = ProviderOffering {
            identifier: "default".to_string(),
            available_packages: vec![
                package("pkg_monthly", PackageType::Monthly, dec!(9.99)),
                package("pkg_annual", PackageType::Annual, dec!(99.00)),
                package("pkg_lifetime", PackageType::Lifetime, dec!(249.00)),
            ],
        };

        let mapped = SubscriptionOffering::from_provider(&offering);
        let ids: Vec<&str> = mapped.packages().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["pkg_monthly", "pkg_annual", "pkg_lifetime"]);

        let monthly = mapped.package("pkg_monthly").unwrap();
        assert_eq!(monthly.price(), "$9.99");
        assert_eq!(monthly.price_per_month(), None);

        let annual = mapped.package("pkg_annual").unwrap();
        assert_eq!(annual.price(), "$99.00");
        assert_eq!(annual.price_per_month(), Some("$8.25"));

        assert_eq!(mapped.package("pkg_lifetime").unwrap().price_per_month(), None);
        assert!(mapped.package("pkg_weekly").is_none());
    }

    #[test]
    fn test_annual_without_format_uses_default() {
        let mut annual = package("pkg_annual", PackageType::Annual, dec!(48));
        annual.store_product.price_format = None;

        let mapped = SubscriptionPackage::from_provider(&annual);
        assert_eq!(mapped.price_per_month(), Some("$4.00"));
    }
}
