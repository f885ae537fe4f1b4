use chrono::Datelike;

use super::date_cursor::{DateCursor, Frequency};
use super::installment::Installment;
use super::intent::{BillIntent, PaymentMode};
use super::money::split_even;
use crate::errors::ValidationError;

/// Upper bound on generated occurrences, guarding runaway recurring windows.
const MAX_OCCURRENCES: usize = 1024;

/// Turns a validated bill intent into its ordered installment drafts.
/// Nothing is emitted when validation fails.
pub fn generate(intent: &BillIntent) -> Result<Vec<Installment>, ValidationError> {
    intent.validate()?;
    let installments = match intent.mode {
        PaymentMode::Single => generate_single(intent),
        PaymentMode::FixedTotal => generate_fixed_total(intent),
        PaymentMode::FixedInstallment => generate_fixed_installment(intent),
        PaymentMode::Recurring => generate_recurring(intent),
    };
    tracing::debug!(
        mode = intent.mode.label(),
        count = installments.len(),
        "generated installment plan"
    );
    Ok(installments)
}

fn generate_single(intent: &BillIntent) -> Vec<Installment> {
    vec![Installment::pending(
        1,
        intent.amount_cents,
        intent.first_due_date,
        label_for(&intent.description, 1, 1),
    )]
}

fn generate_fixed_total(intent: &BillIntent) -> Vec<Installment> {
    let count = intent.count.unwrap_or(0);
    let amounts = split_even(intent.amount_cents, count);
    let mut cursor = DateCursor::new(intent.first_due_date, Frequency::Monthly);
    let mut due_date = intent.first_due_date;
    let mut installments = Vec::with_capacity(count as usize);
    for (index, amount) in amounts.into_iter().enumerate() {
        let sequence = index as u32 + 1;
        installments.push(Installment::pending(
            sequence,
            amount,
            due_date,
            label_for(&intent.description, sequence, count),
        ));
        due_date = cursor.step();
    }
    installments
}

fn generate_fixed_installment(intent: &BillIntent) -> Vec<Installment> {
    let count = intent.count.unwrap_or(0);
    let mut cursor = DateCursor::new(intent.first_due_date, Frequency::Monthly);
    let mut due_date = intent.first_due_date;
    let mut installments = Vec::new();
    for sequence in intent.start_index..=count {
        installments.push(Installment::pending(
            sequence,
            intent.amount_cents,
            due_date,
            label_for(&intent.description, sequence, count),
        ));
        due_date = cursor.step();
    }
    installments
}

fn generate_recurring(intent: &BillIntent) -> Vec<Installment> {
    let window = intent.window.expect("validated recurring window");
    let frequency = intent.frequency.expect("validated recurring frequency");
    let total = intent.planned_count();
    let mut cursor = DateCursor::anchored(window.start, frequency, intent.first_due_date.day());
    let mut due_date = window.start;
    let mut installments = Vec::new();
    let mut sequence = 1u32;
    while window.contains(due_date) && installments.len() < MAX_OCCURRENCES {
        installments.push(Installment::pending(
            sequence,
            intent.amount_cents,
            due_date,
            label_for(&intent.description, sequence, total),
        ));
        due_date = cursor.step();
        sequence += 1;
    }
    installments
}

pub(crate) fn label_for(description: &str, sequence: u32, total: u32) -> String {
    format!("{} {}/{}", description, sequence, total)
}
