use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Cadence between two installments of the same plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    Annual,
}

/// Advances `from` by one step of `frequency`, re-clamping the day-of-month
/// to `anchor_day` wherever the target month allows it. Anchoring on the
/// originally requested day keeps a "due on the 31st" plan from drifting
/// earlier after it passes through a short month.
pub fn advance(from: NaiveDate, frequency: Frequency, anchor_day: u32) -> NaiveDate {
    match frequency {
        Frequency::Weekly => from + Duration::days(7),
        Frequency::Biweekly => from + Duration::days(15),
        Frequency::Monthly => shift_months(from, 1, anchor_day),
        Frequency::Annual => shift_years(from, 1, anchor_day),
    }
}

/// Walks a date forward at a fixed cadence while carrying the anchor day.
#[derive(Debug, Clone, Copy)]
pub struct DateCursor {
    current: NaiveDate,
    frequency: Frequency,
    anchor_day: u32,
}

impl DateCursor {
    /// Cursor positioned on `start`, anchored on `start`'s own day-of-month.
    pub fn new(start: NaiveDate, frequency: Frequency) -> Self {
        Self::anchored(start, frequency, start.day())
    }

    /// Cursor positioned on `start` with an explicit anchor day. Used when
    /// continuing a cadence from a clamped date (e.g. resuming after a paid
    /// installment that fell on Feb 28 of a plan anchored on the 31st).
    pub fn anchored(start: NaiveDate, frequency: Frequency, anchor_day: u32) -> Self {
        Self {
            current: start,
            frequency,
            anchor_day: anchor_day.max(1),
        }
    }

    pub fn current(&self) -> NaiveDate {
        self.current
    }

    /// Steps the cursor forward and returns the new date.
    pub fn step(&mut self) -> NaiveDate {
        self.current = advance(self.current, self.frequency, self.anchor_day);
        self.current
    }
}

fn shift_months(date: NaiveDate, months: i32, anchor_day: u32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    let day = anchor_day.min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap_or(date)
}

fn shift_years(date: NaiveDate, years: i32, anchor_day: u32) -> NaiveDate {
    let year = date.year() + years;
    let month = date.month();
    let day = anchor_day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}
