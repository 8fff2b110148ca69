use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::balance::{calculate_balances, Balance};
use crate::clipboard::{copy_link, Clipboard};
use crate::error::{Result, SplitError};
use crate::ledger::Ledger;
use crate::roster::Roster;
use crate::schemas::{Expense, NewExpense, Participant, Settlement};
use crate::settlement::calculate_settlements;
use crate::share;
use crate::store::{Store, EXPENSES_KEY, PARTICIPANTS_KEY};

/// The state of one group, mirrored into a [`Store`] after every change.
pub struct Session {
    roster: Roster,
    ledger: Ledger,
    store: Box<dyn Store>,
}

impl Session {
    pub fn new(store: impl Store + 'static) -> Self {
        Self {
            roster: Roster::new(),
            ledger: Ledger::new(),
            store: Box::new(store),
        }
    }

    /// Startup: a share token wins over the stored state if it decodes.
    pub fn initialize(&mut self, token: Option<&str>) {
        if let Some(token) = token {
            match self.load_from_token(token) {
                Ok(()) => return,
                Err(err) => warn!("Ignoring share token: {err}"),
            }
        }
        self.load_from_store();
    }

    /// Replaces the in-memory state with whatever the store holds.
    pub fn load_from_store(&mut self) {
        let mut participants = self.load_list::<Participant>(PARTICIPANTS_KEY);
        let mut expenses = self.load_list::<Expense>(EXPENSES_KEY);
        if let Err(reason) = share::check_state(&participants, &expenses) {
            warn!("Discarding inconsistent stored state: {reason}");
            participants.clear();
            expenses.clear();
        }
        info!(
            participants = participants.len(),
            expenses = expenses.len(),
            "Loaded stored state"
        );
        self.roster = Roster::from_participants(participants);
        self.ledger = Ledger::from_expenses(expenses);
    }

    fn load_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.store.load(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("Could not read {key}: {err}");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!("Discarding malformed {key}: {err}");
            Vec::new()
        })
    }

    /// Mirrors both lists into the store. Failures are logged, the in-memory
    /// state stays authoritative.
    pub fn persist(&mut self) {
        let participants = self.roster.participants();
        let expenses = self.ledger.expenses();
        if let Err(err) = save_list(self.store.as_mut(), PARTICIPANTS_KEY, participants) {
            warn!("{err}");
        }
        if let Err(err) = save_list(self.store.as_mut(), EXPENSES_KEY, expenses) {
            warn!("{err}");
        }
    }

    pub fn participants(&self) -> &[Participant] {
        self.roster.participants()
    }

    pub fn expenses(&self) -> &[Expense] {
        self.ledger.expenses()
    }

    pub fn add_participant(&mut self, name: &str) -> Result<Participant> {
        let participant = self.roster.add(name)?;
        info!(id = %participant.id, name = %participant.name, "Participant added");
        self.persist();
        Ok(participant)
    }

    /// Removes a participant and every expense that can no longer be settled
    /// without them.
    pub fn remove_participant(&mut self, id: &str) {
        if self.roster.remove(id) {
            let dropped = self.ledger.forget_participant(id);
            info!(id, dropped_expenses = dropped, "Participant removed");
        } else {
            debug!(id, "No participant to remove");
        }
        self.persist();
    }

    pub fn get_name(&self, id: &str) -> String {
        self.roster.get_name(id)
    }

    pub fn add_expense(&mut self, new_expense: NewExpense) -> Result<Expense> {
        let expense = self.ledger.add(&self.roster, new_expense)?;
        info!(id = %expense.id, amount = expense.amount, "Expense added");
        self.persist();
        Ok(expense)
    }

    pub fn remove_expense(&mut self, id: &str) {
        if self.ledger.remove(id) {
            info!(id, "Expense removed");
        }
        self.persist();
    }

    pub fn calculate_balances(&self) -> Balance {
        debug!("Calculating balances");
        calculate_balances(self.roster.participants(), self.ledger.expenses())
    }

    pub fn calculate_settlements(&self) -> Vec<Settlement> {
        debug!("Calculating settlements");
        calculate_settlements(self.roster.participants(), self.ledger.expenses())
    }

    pub fn clear_all(&mut self) {
        self.roster.clear();
        self.ledger.clear();
        info!("All data cleared");
        self.persist();
    }

    pub fn generate_shareable_link(&self, base_url: &str) -> Result<String> {
        let token = share::encode(self.roster.participants(), self.ledger.expenses())?;
        share::shareable_link(base_url, &token)
    }

    /// Writes the share link to `clipboard`, reporting only whether it worked.
    pub async fn copy_shareable_link(&self, base_url: &str, clipboard: &dyn Clipboard) -> bool {
        match self.generate_shareable_link(base_url) {
            Ok(link) => copy_link(&link, clipboard).await,
            Err(err) => {
                warn!("Failed to generate shareable link: {err}");
                false
            }
        }
    }

    /// Replaces the whole state with a decoded token. Nothing changes unless
    /// decoding succeeds.
    pub fn load_from_token(&mut self, token: &str) -> Result<()> {
        let state = share::decode(token)?;
        info!(
            participants = state.friends.len(),
            expenses = state.expenses.len(),
            "Loaded shared state"
        );
        self.roster = Roster::from_participants(state.friends);
        self.ledger = Ledger::from_expenses(state.expenses);
        self.persist();
        Ok(())
    }
}

fn save_list<T: Serialize>(store: &mut dyn Store, key: &str, list: &[T]) -> Result<()> {
    serde_json::to_string(list)
        .map_err(SplitError::from)
        .and_then(|json| store.save(key, &json))
        .map_err(|source| SplitError::PersistenceWrite {
            key: key.to_string(),
            source: Box::new(source),
        })
}
