//! Property tests for identifier canonicalization and row summaries.

use chrono::NaiveDate;
use proptest::prelude::*;
use timesheet_engine::{IdResolver, RowSummarizer};
use timesheet_model::{IDENTIFIER_WIDTH, LabelConfig};

fn day_cell() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        (-24i32..=24, 0u32..4).prop_map(|(whole, quarter)| Some(format!(
            "{}",
            f64::from(whole) + f64::from(quarter) * 0.25
        ))),
        Just(Some("OFF".to_string())),
        Just(Some("Paid leave".to_string())),
        Just(Some("Sick leave".to_string())),
        Just(Some("unknown".to_string())),
    ]
}

proptest! {
    #[test]
    fn canonicalize_is_idempotent(natural in "[0-9]{1,14}") {
        let resolver = IdResolver::new(IDENTIFIER_WIDTH);
        let once = resolver.canonicalize(&natural).unwrap();
        let twice = resolver.canonicalize(once.as_str()).unwrap();
        prop_assert_eq!(&once, &twice);
        if natural.len() < IDENTIFIER_WIDTH {
            prop_assert_eq!(once.as_str().len(), IDENTIFIER_WIDTH);
            prop_assert!(once.as_str().ends_with(natural.as_str()));
            prop_assert!(once.as_str()[..IDENTIFIER_WIDTH - natural.len()].bytes().all(|b| b == b'0'));
        } else {
            prop_assert_eq!(once.as_str(), natural.as_str());
        }
    }

    #[test]
    fn float_suffix_does_not_change_identity(natural in "[1-9][0-9]{0,9}") {
        let resolver = IdResolver::new(IDENTIFIER_WIDTH);
        let text = resolver.canonicalize(&format!("{natural}.0")).unwrap();
        let numeric = resolver.canonicalize_numeric(&natural).unwrap();
        prop_assert_eq!(text, numeric);
    }

    #[test]
    fn halves_add_up_to_month(cells in prop::collection::vec(day_cell(), 31)) {
        let labels = LabelConfig::georgian();
        let summarizer = RowSummarizer::new(&labels);
        let row = summarizer.summarize_row(cells.iter().enumerate().map(|(idx, value)| {
            let day = u32::try_from(idx + 1).unwrap();
            (NaiveDate::from_ymd_opt(2024, 3, day).unwrap(), value.as_deref())
        }));

        prop_assert!((row.first_half_hours + row.second_half_hours - row.month_hours).abs() < 1e-9);
        let numeric = cells
            .iter()
            .filter(|cell| cell.as_deref().is_some_and(|v| v.parse::<f64>().is_ok()))
            .count();
        prop_assert_eq!(row.days_worked, i64::try_from(numeric).unwrap());
        prop_assert!(row.total_non_working_days() >= row.off_days);
    }
}
