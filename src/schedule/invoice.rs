use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// The billing cycle a card-attached bill belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvoicePeriod {
    pub month: u32,
    pub year: i32,
}

impl InvoicePeriod {
    pub fn label(&self) -> String {
        format!("{}/{}", month_label(self.month), self.year)
    }
}

/// Maps a purchase date and the card's closing day to the invoice period it
/// falls in: purchases after the closing day roll into the following month,
/// December rolling over into January of the next year.
pub fn resolve_invoice_period(purchase_date: NaiveDate, closing_day: u32) -> InvoicePeriod {
    let mut month = purchase_date.month();
    let mut year = purchase_date.year();
    if purchase_date.day() > closing_day {
        if month == 12 {
            month = 1;
            year += 1;
        } else {
            month += 1;
        }
    }
    InvoicePeriod { month, year }
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}
