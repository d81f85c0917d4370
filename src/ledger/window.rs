//! Calendar month windows.

use std::ops::RangeInclusive;

use time::{Date, Month};

use crate::Error;

/// The calendar month containing `as_of`, from the first to the last day inclusive.
///
/// # Errors
/// Returns an [Error::InvalidDate] if the month bounds cannot be represented,
/// which does not happen for dates within the range supported by [time].
pub fn month_window(as_of: Date) -> Result<RangeInclusive<Date>, Error> {
    let year = as_of.year();
    let month = as_of.month();

    let start = Date::from_calendar_date(year, month, 1)?;
    let end = Date::from_calendar_date(year, month, last_day_of_month(year, month))?;

    Ok(start..=end)
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::month_window;

    #[test]
    fn window_spans_whole_month() {
        let window = month_window(date!(2024 - 03 - 15)).unwrap();

        assert_eq!(window, date!(2024 - 03 - 01)..=date!(2024 - 03 - 31));
    }

    #[test]
    fn window_on_boundary_days() {
        assert_eq!(
            month_window(date!(2024 - 04 - 01)).unwrap(),
            date!(2024 - 04 - 01)..=date!(2024 - 04 - 30)
        );
        assert_eq!(
            month_window(date!(2024 - 12 - 31)).unwrap(),
            date!(2024 - 12 - 01)..=date!(2024 - 12 - 31)
        );
    }

    #[test]
    fn window_handles_leap_years() {
        assert_eq!(
            month_window(date!(2024 - 02 - 10)).unwrap(),
            date!(2024 - 02 - 01)..=date!(2024 - 02 - 29)
        );
        assert_eq!(
            month_window(date!(2023 - 02 - 10)).unwrap(),
            date!(2023 - 02 - 01)..=date!(2023 - 02 - 28)
        );
        assert_eq!(
            month_window(date!(1900 - 02 - 10)).unwrap(),
            date!(1900 - 02 - 01)..=date!(1900 - 02 - 28)
        );
        assert_eq!(
            month_window(date!(2000 - 02 - 10)).unwrap(),
            date!(2000 - 02 - 01)..=date!(2000 - 02 - 29)
        );
    }
}
