//! Property-based tests for price arithmetic
//!
//! These tests use proptest to verify invariants across a wide range of inputs.

#[cfg(test)]
mod monthly_properties {
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use subkit_lib::pricing::{monthly_amount, monthly_price, PriceFormat, MONTHS_PER_YEAR};

    proptest! {
        /// The monthly amount is within half a unit of the exact twelfth
        #[test]
        fn monthly_within_half_unit(cents in 0i64..100_000_000i64) {
            let annual = Decimal::new(cents, 2);
            let exact = annual / Decimal::from(MONTHS_PER_YEAR);
            let rounded = monthly_amount(annual, 2);

            prop_assert!(rounded.scale() <= 2);
            prop_assert!((rounded - exact).abs() <= Decimal::new(5, 3));
        }

        /// Prices that divide evenly are never rounded
        #[test]
        fn exact_twelfths_are_kept(monthly_cents in 0i64..10_000_000i64) {
            let monthly = Decimal::new(monthly_cents, 2);
            let annual = monthly * Decimal::from(MONTHS_PER_YEAR);

            prop_assert_eq!(monthly_amount(annual, 2), monthly);
        }

        /// Formatted output always carries the symbol and the right precision
        #[test]
        fn formatted_price_shape(cents in 0i64..100_000_000i64) {
            let annual = Decimal::new(cents, 2);

            let usd = monthly_price(annual, &PriceFormat::en_us());
            prop_assert!(usd.starts_with('$'));
            let (_, fraction) = usd.rsplit_once('.').unwrap();
            prop_assert_eq!(fraction.len(), 2);

            let yen = monthly_price(annual, &PriceFormat::ja_jp());
            prop_assert!(yen.starts_with('¥'));
            prop_assert!(!yen.contains('.'));

            let eur = monthly_price(annual, &PriceFormat::de_de());
            prop_assert!(eur.ends_with(" €"));
            prop_assert!(eur.contains(','));
        }
    }
}
