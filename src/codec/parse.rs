use bigdecimal::BigDecimal;
use chrono::NaiveDate;

/// Date format used by the sheet
pub const SHEET_DATE_FORMAT: &str = "%d/%m/%Y";
/// Date format used by the form and query strings
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Column `idx` of a row, trimmed; missing columns read as empty
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.trim()).unwrap_or("")
}

/// Parses a `DD/MM/YYYY` sheet date, `None` if it isn't one
pub fn parse_sheet_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), SHEET_DATE_FORMAT).ok()
}

pub fn format_sheet_date(date: NaiveDate) -> String {
    date.format(SHEET_DATE_FORMAT).to_string()
}

/// Parses an ISO `YYYY-MM-DD` date
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), ISO_DATE_FORMAT).ok()
}

/// Integer parse of a locale-formatted number.
///
/// Thousands separators are stripped first. After that the leading integer
/// is taken the way the sheet's consumers always did: optional sign, then
/// digits, anything after the digits ignored (`"12.50"` is 12). Returns
/// `None` when there are no leading digits.
pub fn parse_locale_int(raw: &str) -> Option<BigDecimal> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();

    let (negative, rest) = match cleaned.as_bytes().first() {
        Some(b'-') => (true, &cleaned[1..]),
        Some(b'+') => (false, &cleaned[1..]),
        _ => (false, cleaned.as_str()),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    let value: BigDecimal = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Option<BigDecimal> {
        Some(BigDecimal::from(v))
    }

    #[test]
    fn locale_int_strips_thousands_separators() {
        assert_eq!(parse_locale_int("1,200"), int(1200));
        assert_eq!(parse_locale_int("-2,000"), int(-2000));
        assert_eq!(parse_locale_int(" 450 "), int(450));
    }

    #[test]
    fn locale_int_takes_leading_integer() {
        assert_eq!(parse_locale_int("12.50"), int(12));
        assert_eq!(parse_locale_int("30abc"), int(30));
        assert_eq!(parse_locale_int("+7"), int(7));
    }

    #[test]
    fn locale_int_rejects_non_numbers() {
        assert_eq!(parse_locale_int(""), None);
        assert_eq!(parse_locale_int("INCOME"), None);
        assert_eq!(parse_locale_int("-"), None);
        assert_eq!(parse_locale_int("₪12"), None);
    }

    #[test]
    fn sheet_dates() {
        assert_eq!(
            parse_sheet_date("01/06/2024"),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert_eq!(parse_sheet_date("31/02/2024"), None);
        assert_eq!(parse_sheet_date("2024-06-01"), None);
        assert_eq!(parse_sheet_date(""), None);
    }

    #[test]
    fn iso_to_sheet_format() {
        let date = parse_iso_date("2024-06-01").unwrap();
        assert_eq!(format_sheet_date(date), "01/06/2024");
    }
}
