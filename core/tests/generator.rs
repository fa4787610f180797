//! Dataset generation properties.

use chrono::{Days, NaiveDate};
use sales_core::{
    config::GeneratorConfig,
    error::SalesError,
    generator::generate_dataset,
    rng::{RngAlgorithm, SalesRng},
    table::SalesTable,
    types::Region,
};

fn generate(config: &GeneratorConfig) -> SalesTable {
    let mut rng = SalesRng::new(config.rng, config.seed);
    generate_dataset(config, &mut rng).expect("generate")
}

#[test]
fn generates_45_daily_records_from_start_date() {
    let config = GeneratorConfig::default();
    let table = generate(&config);

    assert_eq!(table.len(), 45);
    let dates = table.dates();
    assert_eq!(dates[0], NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    for pair in dates.windows(2) {
        assert_eq!(
            pair[1],
            pair[0].checked_add_days(Days::new(1)).unwrap(),
            "Dates must advance by exactly one day"
        );
    }
    assert_eq!(dates[44], NaiveDate::from_ymd_opt(2025, 4, 14).unwrap());
}

#[test]
fn revenue_is_always_units_times_price() {
    for algorithm in [RngAlgorithm::Mt19937, RngAlgorithm::Pcg64] {
        let table = generate(&GeneratorConfig { rng: algorithm, ..GeneratorConfig::default() });
        for r in table.records() {
            let expected = r.units_sold as f64 * r.unit_price;
            assert!(
                (r.revenue - expected).abs() <= 1e-9 * expected.abs(),
                "{}: revenue {} != {expected}",
                r.date,
                r.revenue
            );
        }
    }
}

#[test]
fn values_stay_in_configured_ranges() {
    for seed in [0u64, 1, 42, 1234, 99_999] {
        let table = generate(&GeneratorConfig { seed, ..GeneratorConfig::default() });
        for r in table.records() {
            assert!(Region::ALL.contains(&r.region));
            assert!((50..300).contains(&r.units_sold), "units {} out of range", r.units_sold);
            assert!(
                (20.0..100.0).contains(&r.unit_price),
                "price {} out of range",
                r.unit_price
            );
        }
    }
}

#[test]
fn custom_ranges_and_lengths_are_respected() {
    let config = GeneratorConfig {
        start_date: NaiveDate::from_ymd_opt(2024, 12, 30).unwrap(),
        days: 400,
        units_min: 1,
        units_max: 2,
        price_min: 5.0,
        price_max: 6.0,
        ..GeneratorConfig::default()
    };
    let table = generate(&config);

    assert_eq!(table.len(), 400);
    assert!(table.records().iter().all(|r| r.units_sold == 1));
    assert!(table.unit_prices().iter().all(|p| (5.0..6.0).contains(p)));
    assert_eq!(table.date_span().unwrap().1, NaiveDate::from_ymd_opt(2026, 2, 2).unwrap());
}

#[test]
fn all_regions_appear_over_a_long_run() {
    let table = generate(&GeneratorConfig { days: 300, ..GeneratorConfig::default() });
    for region in Region::ALL {
        assert!(table.regions().contains(&region), "{region} never drawn");
    }
}

#[test]
fn invalid_config_is_a_typed_error() {
    let config = GeneratorConfig { units_min: 10, units_max: 10, ..GeneratorConfig::default() };
    let mut rng = SalesRng::new(config.rng, config.seed);
    let err = generate_dataset(&config, &mut rng).unwrap_err();
    assert!(matches!(err, SalesError::InvalidConfig { field: "units_max", .. }));
}
