use std::collections::HashMap;

use crate::balance::round_to_2_decimals;
use crate::schemas::{Expense, Participant, Settlement};

/// Net debts below this are floating point noise.
pub const SETTLEMENT_EPSILON: f64 = 0.01;

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
struct DebtPair<'a> {
    debtor: &'a str,
    creditor: &'a str,
}

// What every participant owes every payer, before any netting
fn get_direct_debts(expenses: &[Expense]) -> HashMap<DebtPair<'_>, f64> {
    let mut owes: HashMap<DebtPair, f64> = HashMap::new();

    for expense in expenses {
        if expense.participants.is_empty() {
            continue;
        }
        let amount_per_participant = expense.amount / expense.participants.len() as f64;
        for participant in &expense.participants {
            if *participant == expense.paid_by {
                continue;
            }
            let pair = DebtPair {
                debtor: participant,
                creditor: &expense.paid_by,
            };
            *owes.entry(pair).or_insert(0.0) += amount_per_participant;
        }
    }

    owes
}

/// Payments that settle the group, netted per pair of participants only.
///
/// Debts are never chained: if A owes B and B owes C, both payments are kept.
/// The result is sorted by amount, largest first; ties keep roster order.
pub fn calculate_settlements(roster: &[Participant], expenses: &[Expense]) -> Vec<Settlement> {
    let owes = get_direct_debts(expenses);

    let mut settlements = Vec::new();
    for from in roster {
        for to in roster {
            if from.id == to.id {
                continue;
            }
            let forward = DebtPair {
                debtor: &from.id,
                creditor: &to.id,
            };
            let backward = DebtPair {
                debtor: &to.id,
                creditor: &from.id,
            };
            let net = owes.get(&forward).copied().unwrap_or(0.0)
                - owes.get(&backward).copied().unwrap_or(0.0);
            if net > SETTLEMENT_EPSILON {
                settlements.push(Settlement {
                    from: from.id.clone(),
                    to: to.id.clone(),
                    amount: round_to_2_decimals(net),
                });
            }
        }
    }

    settlements.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    settlements
}
