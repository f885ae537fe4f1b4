use chrono::Datelike;

use super::date_cursor::{DateCursor, Frequency};
use super::generator::label_for;
use super::installment::{Installment, PlanGroup};
use super::intent::{BillIntent, PaymentMode};
use super::money::split_even;
use crate::errors::{ReconciliationConflict, ScheduleError};

/// Merges an existing, possibly partially paid plan with a newly desired
/// shape. Paid installments are kept verbatim; pending ones are regenerated
/// to fit the new count and amounts. The group itself is not mutated here:
/// the caller applies the returned list only after snapshotting prior state.
pub fn reconcile(group: &PlanGroup, intent: &BillIntent) -> Result<Vec<Installment>, ScheduleError> {
    intent.validate()?;

    let paid: Vec<Installment> = group.paid().cloned().collect();
    let paid_count = paid.len() as u32;
    let desired_count = intent.planned_count();

    if desired_count < paid_count {
        return Err(ReconciliationConflict::ShrinkBelowPaid {
            requested: desired_count,
            paid: paid_count,
        }
        .into());
    }
    let remaining = desired_count - paid_count;

    let pending_amounts = pending_amounts(intent, &paid, remaining)?;
    let pending_dates = pending_dates(intent, &paid, remaining);

    // Paid entries form the sequence prefix; payment posting is serialized
    // upstream, so pending numbering continues after the highest paid one.
    let first_pending_seq = paid
        .iter()
        .map(|i| i.sequence)
        .max()
        .map(|seq| seq + 1)
        .unwrap_or(intent.start_index);
    let label_total = label_total(intent, desired_count);

    let mut merged = paid;
    for (offset, (amount, due_date)) in pending_amounts.into_iter().zip(pending_dates).enumerate() {
        let sequence = first_pending_seq + offset as u32;
        merged.push(Installment::pending(
            sequence,
            amount,
            due_date,
            label_for(&intent.description, sequence, label_total),
        ));
    }

    tracing::debug!(
        group = %group.id,
        paid = paid_count,
        pending = remaining,
        "reconciled installment plan"
    );
    Ok(merged)
}

/// Amounts for the regenerated pending entries. `FixedTotal` divides the
/// not-yet-paid share of the new total; every other mode repeats the
/// declared per-installment amount.
fn pending_amounts(
    intent: &BillIntent,
    paid: &[Installment],
    remaining: u32,
) -> Result<Vec<i64>, ScheduleError> {
    if remaining == 0 {
        return Ok(Vec::new());
    }
    match intent.mode {
        PaymentMode::FixedTotal => {
            let paid_cents: i64 = paid.iter().map(|i| i.amount_cents).sum();
            let outstanding = intent.amount_cents - paid_cents;
            if outstanding <= 0 {
                return Err(ReconciliationConflict::TotalExhaustedByPaid {
                    declared_cents: intent.amount_cents,
                    paid_cents,
                }
                .into());
            }
            Ok(split_even(outstanding, remaining))
        }
        _ => Ok(vec![intent.amount_cents; remaining as usize]),
    }
}

/// Due dates for the regenerated pending entries: the cadence continues from
/// the last paid installment's due date, re-anchored on the day-of-month the
/// intent asks for; with nothing paid, it starts at the intent's first due
/// date.
fn pending_dates(intent: &BillIntent, paid: &[Installment], remaining: u32) -> Vec<chrono::NaiveDate> {
    let frequency = match intent.mode {
        PaymentMode::Recurring => intent.frequency.unwrap_or(Frequency::Monthly),
        _ => Frequency::Monthly,
    };
    let anchor_day = intent.first_due_date.day();
    let mut dates = Vec::with_capacity(remaining as usize);
    match paid.iter().map(|i| i.due_date).max() {
        Some(last_paid_due) => {
            let mut cursor = DateCursor::anchored(last_paid_due, frequency, anchor_day);
            for _ in 0..remaining {
                dates.push(cursor.step());
            }
        }
        None => {
            let mut cursor = DateCursor::anchored(intent.first_due_date, frequency, anchor_day);
            let mut due = intent.first_due_date;
            for _ in 0..remaining {
                dates.push(due);
                due = cursor.step();
            }
        }
    }
    dates
}

fn label_total(intent: &BillIntent, desired_count: u32) -> u32 {
    match intent.mode {
        PaymentMode::FixedTotal | PaymentMode::FixedInstallment => {
            intent.count.unwrap_or(desired_count)
        }
        _ => desired_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::generator::generate;
    use crate::schedule::intent::Direction;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn six_monthly_group() -> (PlanGroup, BillIntent) {
        let intent = BillIntent::new(
            Direction::Payable,
            "Service",
            120_000,
            date(2025, 1, 10),
            PaymentMode::FixedTotal,
        )
        .with_count(6);
        let installments = generate(&intent).unwrap();
        (PlanGroup::new(&intent, installments), intent)
    }

    #[test]
    fn reconcile_with_no_paid_regenerates_from_first_due_date() {
        let (group, mut intent) = six_monthly_group();
        intent.amount_cents = 180_000;
        let merged = reconcile(&group, &intent).unwrap();
        assert_eq!(merged.len(), 6);
        assert_eq!(merged[0].due_date, date(2025, 1, 10));
        assert!(merged.iter().all(|i| i.amount_cents == 30_000));
    }

    #[test]
    fn shrink_below_paid_is_a_conflict() {
        let (mut group, mut intent) = six_monthly_group();
        group.installment_mut(1).unwrap().mark_paid(date(2025, 1, 10));
        group.installment_mut(2).unwrap().mark_paid(date(2025, 2, 10));
        group.installment_mut(3).unwrap().mark_paid(date(2025, 3, 10));
        intent.count = Some(2);
        let err = reconcile(&group, &intent).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Conflict(ReconciliationConflict::ShrinkBelowPaid {
                requested: 2,
                paid: 3
            })
        ));
    }

    #[test]
    fn total_not_exceeding_paid_is_a_conflict() {
        let (mut group, mut intent) = six_monthly_group();
        group.installment_mut(1).unwrap().mark_paid(date(2025, 1, 10));
        intent.amount_cents = 20_000;
        let err = reconcile(&group, &intent).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Conflict(ReconciliationConflict::TotalExhaustedByPaid { .. })
        ));
    }
}
