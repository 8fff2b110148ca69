use std::collections::HashMap;

use crate::schemas::{Expense, Participant, ParticipantId};

pub type Balance = HashMap<ParticipantId, f64>;

/// Net position of every participant: positive means the group owes them.
///
/// Everyone on the roster appears, even without expenses. Ids that only show
/// up inside expenses are still accounted for so the total stays at zero.
pub fn calculate_balances(roster: &[Participant], expenses: &[Expense]) -> Balance {
    let mut balance: Balance = roster.iter().map(|p| (p.id.clone(), 0.0)).collect();
    for expense in expenses {
        if expense.participants.is_empty() {
            continue;
        }
        let amount = expense.amount;
        let amount_per_participant = amount / expense.participants.len() as f64;
        for participant in &expense.participants {
            *balance.entry(participant.clone()).or_insert(0.0) -= amount_per_participant;
        }
        *balance.entry(expense.paid_by.clone()).or_insert(0.0) += amount;
    }
    for value in balance.values_mut() {
        *value = round_to_2_decimals(*value);
    }
    balance
}

/// Rounds half up on the cent.
pub fn round_to_2_decimals(n: f64) -> f64 {
    (n * 100.0 + 0.5).floor() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn participant(id: &str) -> Participant {
        Participant {
            id: id.to_string(),
            name: id.to_uppercase(),
            created_at: Utc::now(),
        }
    }

    fn expense(amount: f64, paid_by: &str, participants: &[&str]) -> Expense {
        Expense {
            id: format!("{paid_by}-{amount}"),
            description: "dinner".to_string(),
            amount,
            currency: "EUR".to_string(),
            paid_by: paid_by.to_string(),
            participants: participants.iter().map(|p| p.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn payer_is_credited_the_full_amount() {
        let roster = vec![participant("a"), participant("b"), participant("c")];
        let expenses = vec![expense(90.0, "a", &["a", "b", "c"])];

        let balance = calculate_balances(&roster, &expenses);

        assert_eq!(balance["a"], 60.0);
        assert_eq!(balance["b"], -30.0);
        assert_eq!(balance["c"], -30.0);
    }

    #[test]
    fn idle_participants_are_listed_at_zero() {
        let roster = vec![participant("a"), participant("b"), participant("d")];
        let expenses = vec![expense(10.0, "a", &["a", "b"])];

        let balance = calculate_balances(&roster, &expenses);

        assert_eq!(balance.len(), 3);
        assert_eq!(balance["d"], 0.0);
    }

    #[test]
    fn thirds_are_rounded_to_cents() {
        let roster = vec![participant("a"), participant("b"), participant("c")];
        let expenses = vec![expense(10.0, "a", &["a", "b", "c"])];

        let balance = calculate_balances(&roster, &expenses);

        assert_eq!(balance["a"], 6.67);
        assert_eq!(balance["b"], -3.33);
        assert_eq!(balance["c"], -3.33);
    }

    #[test]
    fn expense_without_participants_is_ignored() {
        let roster = vec![participant("a")];
        let expenses = vec![expense(10.0, "a", &[])];

        let balance = calculate_balances(&roster, &expenses);

        assert_eq!(balance["a"], 0.0);
    }

    #[test]
    fn rounding_goes_up_on_half_cents() {
        assert_eq!(round_to_2_decimals(1.125), 1.13);
        assert_eq!(round_to_2_decimals(-1.125), -1.12);
        assert_eq!(round_to_2_decimals(-30.0), -30.0);
    }
}
