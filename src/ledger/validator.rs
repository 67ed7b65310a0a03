use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use rust_decimal::Decimal;

use crate::error::{LedgerField, ValidationError, ValidationErrorKind};
use crate::ledger::{LedgerRow, RawLedgerRow};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Checks the rows of one sheet in order, remembering the date of the last
/// accepted row.
pub struct Validator<'a> {
    sheet: &'a str,
    previous_date: Option<NaiveDate>,
}

impl<'a> Validator<'a> {
    pub fn new(sheet: &'a str) -> Validator<'a> {
        Validator {
            sheet,
            previous_date: None,
        }
    }

    pub fn validate(&mut self, row: &RawLedgerRow) -> Result<LedgerRow, ValidationError> {
        let fail = |kind: ValidationErrorKind| ValidationError {
            sheet: self.sheet.to_string(),
            order: row.order,
            kind,
        };

        // presence, in column check order
        let date = required(&row.date, LedgerField::Date).map_err(fail)?;
        let transaction_type =
            required(&row.transaction_type, LedgerField::TransactionType).map_err(fail)?;
        let input_currency =
            required(&row.input_currency, LedgerField::InputCurrency).map_err(fail)?;
        let input_amount = required(&row.input_amount, LedgerField::InputAmount).map_err(fail)?;
        let output_currency =
            required(&row.output_currency, LedgerField::OutputCurrency).map_err(fail)?;
        let output_amount =
            required(&row.output_amount, LedgerField::OutputAmount).map_err(fail)?;
        let note = required(&row.note, LedgerField::Note).map_err(fail)?;

        let input_amount = parse_amount(input_amount, LedgerField::InputAmount).map_err(fail)?;
        let output_amount =
            parse_amount(output_amount, LedgerField::OutputAmount).map_err(fail)?;

        non_negative(input_amount, LedgerField::InputAmount).map_err(fail)?;
        non_negative(output_amount, LedgerField::OutputAmount).map_err(fail)?;

        let date = parse_date(date).ok_or_else(|| {
            fail(ValidationErrorKind::InvalidDateFormat {
                value: date.to_string(),
            })
        })?;

        if row.order > 1 {
            if let Some(previous) = self.previous_date {
                if date < previous {
                    return Err(fail(ValidationErrorKind::OutOfOrderDate { date, previous }));
                }
            }
        }
        self.previous_date = Some(date);

        debug!("Sheet '{}': row #{} is valid", self.sheet, row.order);

        Ok(LedgerRow {
            order: row.order,
            date,
            transaction_type: transaction_type.to_string(),
            input_amount,
            input_currency: input_currency.to_string(),
            output_amount,
            output_currency: output_currency.to_string(),
            note: note.to_string(),
        })
    }
}

/// Validates a whole sheet, stopping at the first rejected row.
pub fn validate_sheet(
    sheet: &str,
    rows: &[RawLedgerRow],
) -> Result<Vec<LedgerRow>, ValidationError> {
    let mut validator = Validator::new(sheet);
    rows.iter().map(|row| validator.validate(row)).collect()
}

/// Parses the date formats spreadsheet exports produce; times are dropped.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|datetime| datetime.date())
        })
}

fn required(value: &Option<String>, field: LedgerField) -> Result<&str, ValidationErrorKind> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationErrorKind::MissingField { field }),
    }
}

/// Parses plain and scientific (`1E-8`) decimal notation.
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let value = value.trim();
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

fn parse_amount(value: &str, field: LedgerField) -> Result<Decimal, ValidationErrorKind> {
    parse_decimal(value).ok_or_else(|| ValidationErrorKind::NonNumericAmount {
        field,
        value: value.to_string(),
    })
}

fn non_negative(amount: Decimal, field: LedgerField) -> Result<(), ValidationErrorKind> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationErrorKind::NegativeAmount {
            field,
            value: amount.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(order: u32, date: &str) -> RawLedgerRow {
        RawLedgerRow {
            order,
            date: Some(date.to_string()),
            transaction_type: Some("Trade".to_string()),
            input_currency: Some("BTC".to_string()),
            input_amount: Some("0.5".to_string()),
            output_currency: Some("EUR".to_string()),
            output_amount: Some("10000".to_string()),
            note: Some("buy".to_string()),
        }
    }

    fn kind(result: Result<LedgerRow, ValidationError>) -> ValidationErrorKind {
        result.unwrap_err().kind
    }

    #[test]
    fn accepts_complete_row() {
        let valid = Validator::new("2024").validate(&row(1, "2024-01-03")).unwrap();
        assert_eq!(valid.date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(valid.input_amount, dec!(0.5));
        assert_eq!(valid.output_amount, dec!(10000));
    }

    #[test]
    fn missing_field_wins_over_later_problems() {
        let mut r = row(1, "not a date");
        r.input_amount = Some("-4".to_string());
        r.output_amount = Some("abc".to_string());
        r.note = None;
        assert_eq!(
            kind(Validator::new("s").validate(&r)),
            ValidationErrorKind::MissingField {
                field: LedgerField::Note
            }
        );
    }

    #[test]
    fn first_missing_field_is_reported() {
        let mut r = row(1, "2024-01-01");
        r.transaction_type = Some("   ".to_string());
        r.output_currency = None;
        assert_eq!(
            kind(Validator::new("s").validate(&r)),
            ValidationErrorKind::MissingField {
                field: LedgerField::TransactionType
            }
        );
    }

    #[test]
    fn non_numeric_is_checked_before_negative() {
        let mut r = row(1, "2024-01-01");
        r.input_amount = Some("-1".to_string());
        r.output_amount = Some("ten".to_string());
        assert_eq!(
            kind(Validator::new("s").validate(&r)),
            ValidationErrorKind::NonNumericAmount {
                field: LedgerField::OutputAmount,
                value: "ten".to_string()
            }
        );
    }

    #[test]
    fn negative_amount_is_rejected() {
        let mut r = row(1, "2024-01-01");
        r.output_amount = Some("-0.01".to_string());
        assert!(matches!(
            kind(Validator::new("s").validate(&r)),
            ValidationErrorKind::NegativeAmount {
                field: LedgerField::OutputAmount,
                ..
            }
        ));
    }

    #[test]
    fn negative_zero_is_accepted() {
        let mut r = row(1, "2024-01-01");
        r.input_amount = Some("-0".to_string());
        assert!(Validator::new("s").validate(&r).is_ok());
    }

    #[test]
    fn scientific_amounts_are_numeric() {
        let mut r = row(1, "2024-01-01");
        r.input_amount = Some("1e-8".to_string());
        let valid = Validator::new("s").validate(&r).unwrap();
        assert_eq!(valid.input_amount, dec!(0.00000001));
    }

    #[test]
    fn invalid_date_is_reported_after_amounts() {
        assert_eq!(
            kind(Validator::new("s").validate(&row(1, "2024-13-45"))),
            ValidationErrorKind::InvalidDateFormat {
                value: "2024-13-45".to_string()
            }
        );
    }

    #[test]
    fn spreadsheet_datetimes_are_accepted() {
        assert_eq!(
            parse_date("2024-02-29 00:00:00"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(parse_date("03.01.2024"), NaiveDate::from_ymd_opt(2024, 1, 3));
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn out_of_order_fails_at_first_regression() {
        let rows = vec![row(1, "2024-01-03"), row(2, "2024-01-01"), row(3, "2024-01-02")];
        let err = validate_sheet("2024", &rows).unwrap_err();
        assert_eq!(err.order, 2);
        assert_eq!(err.sheet, "2024");
        assert!(matches!(err.kind, ValidationErrorKind::OutOfOrderDate { .. }));
    }

    #[test]
    fn equal_dates_are_in_order() {
        let rows = vec![row(1, "2024-01-01"), row(2, "2024-01-01"), row(3, "2024-01-05")];
        assert_eq!(validate_sheet("2024", &rows).unwrap().len(), 3);
    }

    #[test]
    fn error_message_names_sheet_and_row() {
        let mut r = row(7, "2024-01-01");
        r.date = None;
        let err = Validator::new("Binance").validate(&r).unwrap_err();
        assert_eq!(
            err.to_string(),
            "sheet 'Binance', row #7: missing value in column 'Date'"
        );
    }
}
