//! Transaction command handlers.

use crate::args::{
    TransactionAddArgs, TransactionDeleteArgs, TransactionListArgs, TransactionUpdateArgs,
};
use crate::commands::{plural, Out};
use crate::dates;
use crate::error::StoreError;
use crate::filter::TransactionQuery;
use crate::model::category::is_known_category;
use crate::model::{
    RecurringFrequency, Transaction, TransactionDraft, TransactionId, TransactionType,
};
use crate::{Config, Result};
use anyhow::bail;
use tracing::warn;

/// Adds a transaction dated today unless a date is given. A recurring transaction is also put on
/// the calendar.
pub fn transaction_add(config: Config, args: TransactionAddArgs) -> Result<Out<Transaction>> {
    warn_unknown_category(args.r#type(), args.category());
    let date = match args.date() {
        Some(date) => date.to_string(),
        None => dates::format_date_key(dates::today()),
    };
    let mut draft = TransactionDraft::new(args.r#type(), args.amount(), args.category(), date);
    if let Some(description) = args.description() {
        draft = draft.description(description);
    }
    if let Some(frequency) = args.recurring() {
        draft = draft.recurring(known_frequency(frequency)?);
    }

    let (mut organizer, load) = config.open()?;
    let transaction = organizer.add_transaction(draft)?;
    let mut message = format!("Added transaction {}: {}", transaction.id(), line(&transaction));
    if transaction.recurring() {
        message.push_str("\nAlso added to the calendar");
    }
    Ok(Out::new(message, transaction).with_warnings(load.warnings()))
}

/// Changes the given fields of a transaction. Its calendar event, if any, is left as it is.
pub fn transaction_update(
    config: Config,
    args: TransactionUpdateArgs,
) -> Result<Out<Transaction>> {
    let id = TransactionId::new(args.id());
    let frequency = args.recurring().map(known_frequency).transpose()?;
    let (mut organizer, load) = config.open()?;
    let existing = organizer
        .transactions()
        .get(id)
        .ok_or(StoreError::NotFound(id))?;

    let mut draft = TransactionDraft::from(existing);
    if let Some(t) = args.r#type() {
        draft.r#type = t;
    }
    if let Some(amount) = args.amount() {
        draft.amount = amount;
    }
    if let Some(category) = args.category() {
        draft.category = category.to_string();
    }
    if let Some(date) = args.date() {
        draft.date = date.to_string();
    }
    if let Some(description) = args.description() {
        draft.description = Some(description.to_string()).filter(|d| !d.is_empty());
    }
    if let Some(frequency) = frequency {
        draft = draft.recurring(frequency);
    }
    if args.not_recurring() {
        draft.recurring = false;
    }
    warn_unknown_category(draft.r#type, &draft.category);

    let updated = organizer.update_transaction(id, draft)?;
    Ok(Out::new(
        format!("Updated transaction {id}: {}", line(&updated)),
        updated,
    )
    .with_warnings(load.warnings()))
}

/// Deletes a transaction and removes its calendar event. The caller must confirm with `--yes`.
pub fn transaction_delete(config: Config, args: TransactionDeleteArgs) -> Result<Out<Transaction>> {
    if !args.yes() {
        bail!(
            "Deleting transaction {} cannot be undone, pass --yes to confirm",
            args.id()
        )
    }
    let (mut organizer, load) = config.open()?;
    let removed = organizer.delete_transaction(TransactionId::new(args.id()))?;
    Ok(Out::new(
        format!("Deleted transaction {}: {}", removed.id(), line(&removed)),
        removed,
    )
    .with_warnings(load.warnings()))
}

/// Lists the transactions passing the filters, newest first.
pub fn transaction_list(
    config: Config,
    args: TransactionListArgs,
) -> Result<Out<Vec<Transaction>>> {
    let (organizer, load) = config.open()?;
    let query = TransactionQuery::new(args.date(), args.category().clone(), args.search());
    let view: Vec<Transaction> = organizer
        .transactions()
        .filtered_view(&query)
        .into_iter()
        .cloned()
        .collect();

    let mut message = format!("Found {}", plural(view.len(), "transaction"));
    for t in &view {
        message.push_str(&format!("\n{:>14}  {}", t.id(), line(t)));
    }
    Ok(Out::new(message, view).with_warnings(load.warnings()))
}

/// `unknown` only exists so that stored records with an unrecognized frequency still load.
fn known_frequency(frequency: RecurringFrequency) -> Result<RecurringFrequency> {
    if frequency == RecurringFrequency::Unknown {
        bail!("Unknown recurring frequency, expected weekly, monthly or yearly")
    }
    Ok(frequency)
}

/// One transaction as a list row: `Mar 15, 2024  Groceries (food)  -$42.50`.
fn line(t: &Transaction) -> String {
    let sign = if t.is_income() { "+" } else { "-" };
    let recurring = match t.recurring_frequency() {
        Some(frequency) if t.recurring() => format!("  ({frequency})"),
        _ if t.recurring() => "  (recurring)".to_string(),
        _ => String::new(),
    };
    format!(
        "{}  {} ({})  {sign}{}{recurring}",
        dates::format_date_for_display(t.date()),
        t.title(),
        t.category(),
        t.amount()
    )
}

fn warn_unknown_category(r#type: TransactionType, category: &str) {
    if !is_known_category(r#type, category) {
        warn!(
            "'{category}' is not one of the usual {} categories, storing it anyway",
            r#type
        );
    }
}
