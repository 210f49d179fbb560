//! Parsing of user-entered dates.

use chrono::{DateTime, NaiveDate, Utc};

/// Parse a date as entered on the command line or at a prompt.
///
/// Accepts `YYYY-MM-DD` or natural language ("tomorrow", "next friday",
/// "sat", "jun 20"). The result is midnight UTC of that day, since events
/// are scheduled by calendar day.
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("A date is required".to_string());
    }

    let date = match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => fuzzydate::parse(&expand_abbreviations(trimmed))
            .map(|dt| dt.date())
            .map_err(|_| format!("Could not parse date: \"{}\"", trimmed))?,
    };

    Ok(start_of_day(date))
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Expand common abbreviations that fuzzydate doesn't handle.
fn expand_abbreviations(input: &str) -> String {
    let abbrevs = [
        ("mon", "monday"),
        ("tue", "tuesday"),
        ("tues", "tuesday"),
        ("wed", "wednesday"),
        ("thu", "thursday"),
        ("thur", "thursday"),
        ("thurs", "thursday"),
        ("fri", "friday"),
        ("sat", "saturday"),
        ("sun", "sunday"),
        ("jan", "january"),
        ("feb", "february"),
        ("mar", "march"),
        ("apr", "april"),
        ("jun", "june"),
        ("jul", "july"),
        ("aug", "august"),
        ("sep", "september"),
        ("sept", "september"),
        ("oct", "october"),
        ("nov", "november"),
        ("dec", "december"),
    ];

    input
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            abbrevs
                .iter()
                .find(|(abbr, _)| *abbr == word)
                .map(|(_, full)| *full)
                .unwrap_or(word)
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_iso_date_as_midnight_utc() {
        assert_eq!(
            parse_date("2030-06-15").unwrap(),
            Utc.with_ymd_and_hms(2030, 6, 15, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_date("  2030-06-15 ").unwrap(),
            Utc.with_ymd_and_hms(2030, 6, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(parse_date("   "), Err("A date is required".to_string()));
    }

    #[test]
    fn expands_day_and_month_abbreviations() {
        assert_eq!(expand_abbreviations("sat"), "saturday");
        assert_eq!(expand_abbreviations("next Fri"), "next friday");
        assert_eq!(expand_abbreviations("sept 5"), "september 5");
        assert_eq!(expand_abbreviations("may 1"), "may 1");
    }

    #[test]
    fn start_of_day_zeroes_time() {
        let date = NaiveDate::from_ymd_opt(2030, 1, 2).unwrap();
        assert_eq!(start_of_day(date), Utc.with_ymd_and_hms(2030, 1, 2, 0, 0, 0).unwrap());
    }
}
