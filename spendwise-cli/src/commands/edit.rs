//! Edit command - change fields of an existing transaction

use anyhow::{bail, Result};

use super::{currency, get_context, parse_money, parse_user_date};
use crate::output;
use spendwise_core::{Category, Mood, TransactionType};

pub struct EditArgs {
    pub amount: Option<String>,
    pub description: Option<String>,
    pub kind: Option<TransactionType>,
    pub category: Option<Category>,
    pub date: Option<String>,
    pub mood: Option<Mood>,
    pub clear_mood: bool,
    pub impulse: Option<bool>,
}

impl EditArgs {
    fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.description.is_none()
            && self.kind.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.mood.is_none()
            && !self.clear_mood
            && self.impulse.is_none()
    }
}

pub fn run(id: &str, args: EditArgs) -> Result<()> {
    if args.is_empty() {
        bail!("Nothing to change; pass at least one field to edit");
    }

    let ctx = get_context()?;
    let mut tx = ctx.ledger.get(id)?;

    if let Some(amount) = &args.amount {
        tx.amount = parse_money(amount)?;
    }
    if let Some(description) = args.description {
        tx.description = description;
    }
    if let Some(kind) = args.kind {
        tx.kind = kind;
    }
    if let Some(category) = args.category {
        tx.category = category;
    }
    if let Some(date) = &args.date {
        tx.date = parse_user_date(date, &ctx.config)?;
    }
    if args.clear_mood {
        tx.mood = None;
    } else if let Some(mood) = args.mood {
        tx.mood = Some(mood);
    }
    if let Some(impulse) = args.impulse {
        tx.is_impulse = impulse;
    }

    let tx = ctx.ledger.update(tx)?;
    output::success(&format!(
        "Updated {}: {} {} - {}",
        tx.id,
        tx.kind,
        output::money(tx.amount, currency(&ctx.config)),
        tx.description
    ));

    Ok(())
}
