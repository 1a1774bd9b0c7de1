//! Tests for timesheet-model types.

use timesheet_model::{
    DayValue, IDENTIFIER_MASK, IDENTIFIER_WIDTH, Identifier, LabelConfig, LeaveCode,
    ReconcileError, ReconcileOptions, mask_identifier,
};

#[test]
fn identifier_padding_is_idempotent() {
    let once = Identifier::padded("12345", IDENTIFIER_WIDTH);
    let twice = Identifier::padded(once.as_str(), IDENTIFIER_WIDTH);
    assert_eq!(once, twice);
    assert_eq!(once.as_str(), "00000012345");
}

#[test]
fn identifier_masking_keeps_all_but_last_four() {
    let id = Identifier::padded("01234567890", IDENTIFIER_WIDTH);
    assert_eq!(id.masked(IDENTIFIER_MASK), "0123456****");
    assert_eq!(mask_identifier("00000000005", "****"), "0000000****");
}

#[test]
fn day_value_recognizes_tokens() {
    assert_eq!(DayValue::parse("8"), Some(DayValue::Hours(8.0)));
    assert_eq!(DayValue::parse("-2.5"), Some(DayValue::Hours(-2.5)));
    assert_eq!(DayValue::parse(" off "), Some(DayValue::Off));
    assert_eq!(
        DayValue::parse("PAID LEAVE"),
        Some(DayValue::Leave(LeaveCode::Paid))
    );
    assert_eq!(
        DayValue::parse("Mental Dayoff"),
        Some(DayValue::Leave(LeaveCode::MentalDayOff))
    );
    assert_eq!(DayValue::parse("holiday"), None);
    assert_eq!(DayValue::parse("   "), None);
}

#[test]
fn birthday_off_is_not_a_day_cell_token() {
    // Normalization only applies to the leave source.
    assert_eq!(DayValue::parse("BirthDay off"), None);
    assert_eq!(LeaveCode::from_leave_type("BirthDay off"), Some(LeaveCode::Paid));
}

#[test]
fn short_code_lookup_round_trips() {
    let labels = LabelConfig::georgian();
    for code in LeaveCode::ALL {
        let short = labels.short_code(code);
        assert_eq!(labels.leave_for_short_code(short), Some(code));
    }
    assert_eq!(labels.leave_for_short_code("nope"), None);
}

#[test]
fn label_config_rejects_short_month_table() {
    let mut labels = LabelConfig::english();
    labels.month_names.pop();
    assert!(matches!(
        labels.validate(),
        Err(ReconcileError::Config { .. })
    ));
}

#[test]
fn label_config_rejects_duplicate_summary_labels() {
    let mut labels = LabelConfig::english();
    labels.summary.sick_leave = labels.summary.paid_leave.clone();
    assert!(labels.validate().is_err());
}

#[test]
fn label_config_loads_from_json() {
    let json = serde_json::to_string(&LabelConfig::english()).expect("serialize labels");
    assert!(json.contains("\"mental_day_off\""));
    let round: LabelConfig = serde_json::from_str(&json).expect("deserialize labels");
    assert_eq!(round, LabelConfig::english());
}

#[test]
fn options_fill_missing_fields_from_defaults() {
    let options: ReconcileOptions =
        serde_json::from_str(r#"{"workday_hours": 6}"#).expect("deserialize options");
    assert_eq!(options.workday_hours, 6.0);
    assert!(options.anonymize);
    assert_eq!(options.identifier_width, IDENTIFIER_WIDTH);
    assert_eq!(options.columns.leave_start, "Starts on");
}
