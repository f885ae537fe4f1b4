//! Minor-unit money arithmetic. Amounts are carried as integer cents so that
//! plan totals reconstruct exactly from installment sums.

/// Amount in the currency's smallest unit.
pub type Cents = i64;

/// Splits `total` into `parts` amounts that sum back to `total` exactly.
/// Every part takes the floored even share; the last part absorbs the
/// residual cents.
pub fn split_even(total: Cents, parts: u32) -> Vec<Cents> {
    assert!(parts > 0, "split_even requires at least one part");
    let parts_i = parts as i64;
    let base = total.div_euclid(parts_i);
    let mut amounts = vec![base; parts as usize];
    if let Some(last) = amounts.last_mut() {
        *last = total - base * (parts_i - 1);
    }
    amounts
}

/// Renders cents as a plain decimal string with thousands grouping,
/// e.g. `123456789` → `"1,234,567.89"`.
pub fn format_cents(cents: Cents) -> String {
    let negative = cents < 0;
    let abs = cents.unsigned_abs();
    let whole = abs / 100;
    let fraction = abs % 100;
    let mut grouped = String::new();
    let digits = whole.to_string();
    let mut count = 0;
    for ch in digits.chars().rev() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, ',');
        }
        grouped.insert(0, ch);
        count += 1;
    }
    let sign = if negative { "-" } else { "" };
    format!("{}{}.{:02}", sign, grouped, fraction)
}
