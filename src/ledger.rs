use chrono::Utc;

use crate::error::{Result, SplitError};
use crate::roster::Roster;
use crate::schemas::{new_id, Expense, NewExpense};

/// The expenses of the group, in the order they were added.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ledger {
    expenses: Vec<Expense>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_expenses(expenses: Vec<Expense>) -> Self {
        Self { expenses }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Records an expense whose payer and participants are all on `roster`.
    ///
    /// Duplicate participant ids are collapsed, keeping the first occurrence.
    pub fn add(&mut self, roster: &Roster, new_expense: NewExpense) -> Result<Expense> {
        let NewExpense {
            description,
            amount,
            currency,
            paid_by,
            participants,
        } = new_expense;

        if !amount.is_finite() || amount <= 0.0 {
            return Err(SplitError::invalid_input(format!(
                "amount must be a positive number, got {amount}"
            )));
        }
        if !roster.contains(&paid_by) {
            return Err(SplitError::invalid_input(format!(
                "payer {paid_by} is not a participant"
            )));
        }
        let mut unique = Vec::with_capacity(participants.len());
        for participant in participants {
            if !roster.contains(&participant) {
                return Err(SplitError::invalid_input(format!(
                    "{participant} is not a participant"
                )));
            }
            if !unique.contains(&participant) {
                unique.push(participant);
            }
        }
        if unique.is_empty() {
            return Err(SplitError::invalid_input(
                "an expense needs at least one participant",
            ));
        }

        let expense = Expense {
            id: self.unused_id(),
            description: description.trim().to_string(),
            amount,
            currency,
            paid_by,
            participants: unique,
            created_at: Utc::now(),
        };
        self.expenses.push(expense.clone());
        Ok(expense)
    }

    /// Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        self.expenses.len() != before
    }

    /// Strips a departed participant from every expense.
    ///
    /// Expenses left without participants or without a payer are dropped;
    /// returns how many.
    pub fn forget_participant(&mut self, id: &str) -> usize {
        for expense in &mut self.expenses {
            expense.participants.retain(|p| p != id);
            if expense.paid_by == id {
                expense.paid_by.clear();
            }
        }
        let before = self.expenses.len();
        self.expenses
            .retain(|e| !e.participants.is_empty() && !e.paid_by.is_empty());
        before - self.expenses.len()
    }

    pub fn clear(&mut self) {
        self.expenses.clear();
    }

    fn unused_id(&self) -> String {
        loop {
            let id = new_id();
            if !self.expenses.iter().any(|e| e.id == id) {
                return id;
            }
        }
    }
}
