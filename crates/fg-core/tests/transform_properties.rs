//! Property tests for the record-to-vector transform.
//!
//! Validates, over arbitrary records:
//! - The output length always equals the preprocessor's fitted width
//! - The transform is deterministic, bit for bit
//! - Presence or absence of non-schema fields never changes the output

use proptest::prelude::*;

use fg_common::{FieldValue, Record};
use fg_config::{CategoryMap, NumericStats, Preprocessor, PreprocessorParams};
use fg_core::transform::transform;

fn fitted() -> Preprocessor {
    Preprocessor::new(PreprocessorParams {
        numeric: vec![
            NumericStats {
                feature: "income".into(),
                mean: 50000.0,
                stddev: 10000.0,
            },
            NumericStats {
                feature: "customer_age".into(),
                mean: 40.0,
                stddev: 12.0,
            },
        ],
        categorical: vec![CategoryMap {
            feature: "device_os".into(),
            categories: vec!["linux".into(), "windows".into(), "macos".into()],
            reference: "linux".into(),
        }],
    })
    .unwrap()
}

fn build_record(
    income: Option<f64>,
    age: Option<f64>,
    os: Option<String>,
    extra: Option<f64>,
) -> Record {
    let mut record = Record::default();
    if let Some(v) = income {
        record.insert("income", FieldValue::Number(v));
    }
    if let Some(v) = age {
        record.insert("customer_age", FieldValue::Number(v));
    }
    if let Some(v) = os {
        record.insert("device_os", FieldValue::Text(v));
    }
    if let Some(v) = extra {
        record.insert("some_unrelated_field", FieldValue::Number(v));
    }
    record
}

proptest! {
    #[test]
    fn length_and_determinism_hold_for_any_record(
        income in proptest::option::of(-1e12f64..1e12),
        age in proptest::option::of(-1e4f64..1e4),
        os in proptest::option::of("[a-z]{1,10}"),
        extra in proptest::option::of(-1e6f64..1e6),
    ) {
        let preprocessor = fitted();
        let record = build_record(income, age, os, extra);

        let first = transform(&preprocessor, &record).unwrap();
        prop_assert_eq!(first.len(), preprocessor.output_len());

        let second = transform(&preprocessor, &record).unwrap();
        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn non_schema_fields_never_change_the_vector(
        income in proptest::option::of(-1e12f64..1e12),
        extra in -1e6f64..1e6,
    ) {
        let preprocessor = fitted();
        let bare = build_record(income, None, None, None);
        let noisy = build_record(income, None, None, Some(extra));

        let a = transform(&preprocessor, &bare).unwrap();
        let b = transform(&preprocessor, &noisy).unwrap();
        prop_assert_eq!(a, b);
    }
}
