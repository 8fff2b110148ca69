//! Share tokens: the whole session state as base64 over UTF-8 JSON.
//!
//! The payload is `{ "friends": [...], "expenses": [...], "timestamp": ... }`
//! with camelCase fields, the same shape the web client produces, so links
//! created there open here and the other way round.

use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SplitError};
use crate::schemas::{Expense, Participant};

pub const TOKEN_PARAM: &str = "token";

#[derive(Serialize)]
struct SharedStateRef<'a> {
    friends: &'a [Participant],
    expenses: &'a [Expense],
    timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SharedState {
    pub friends: Vec<Participant>,
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

pub fn encode(roster: &[Participant], expenses: &[Expense]) -> Result<String> {
    let data = SharedStateRef {
        friends: roster,
        expenses,
        timestamp: Utc::now(),
    };
    let json = serde_json::to_string(&data)?;
    Ok(STANDARD.encode(json.as_bytes()))
}

pub fn decode(token: &str) -> Result<SharedState> {
    // Form decoding turns '+' into ' '.
    let token: String = token
        .trim()
        .chars()
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();
    let bytes = STANDARD.decode(token.as_bytes()).map_err(SplitError::decode)?;
    let json = String::from_utf8(bytes).map_err(SplitError::decode)?;
    let state: SharedState = serde_json::from_str(&json).map_err(SplitError::decode)?;
    check_state(&state.friends, &state.expenses).map_err(SplitError::decode)?;
    Ok(state)
}

/// Rejects state that could not have come out of a session: repeated ids,
/// expenses without a payer or without participants.
pub(crate) fn check_state(
    friends: &[Participant],
    expenses: &[Expense],
) -> std::result::Result<(), String> {
    let mut seen = HashSet::new();
    if let Some(friend) = friends.iter().find(|f| !seen.insert(f.id.as_str())) {
        return Err(format!("participant id {} appears twice", friend.id));
    }
    let mut seen = HashSet::new();
    if let Some(expense) = expenses.iter().find(|e| !seen.insert(e.id.as_str())) {
        return Err(format!("expense id {} appears twice", expense.id));
    }
    for expense in expenses {
        if expense.paid_by.is_empty() {
            return Err(format!("expense {} has no payer", expense.id));
        }
        if expense.participants.is_empty() {
            return Err(format!("expense {} has no participants", expense.id));
        }
    }
    Ok(())
}

/// `base_url` without query or fragment, carrying `token` as its only parameter.
pub fn shareable_link(base_url: &str, token: &str) -> Result<String> {
    let mut url = Url::parse(base_url)
        .map_err(|err| SplitError::invalid_input(format!("bad base url {base_url}: {err}")))?;
    url.set_fragment(None);
    url.set_query(None);
    url.query_pairs_mut().append_pair(TOKEN_PARAM, token);
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> (Vec<Participant>, Vec<Expense>) {
        let created_at = Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 5).unwrap();
        let friends = vec![
            Participant {
                id: "1".to_string(),
                name: "Zoë".to_string(),
                created_at,
            },
            Participant {
                id: "2".to_string(),
                name: "Ben".to_string(),
                created_at: created_at + chrono::Duration::milliseconds(1234),
            },
        ];
        let expenses = vec![Expense {
            id: "3".to_string(),
            description: "Café ☕".to_string(),
            amount: 12.5,
            currency: "EUR".to_string(),
            paid_by: "1".to_string(),
            participants: vec!["1".to_string(), "2".to_string()],
            created_at,
        }];
        (friends, expenses)
    }

    #[test]
    fn decoding_an_encoded_state_restores_it() {
        let (friends, expenses) = sample();

        let state = decode(&encode(&friends, &expenses).unwrap()).unwrap();

        assert_eq!(state.friends, friends);
        assert_eq!(state.expenses, expenses);
        assert!(state.timestamp.is_some());
    }

    #[test]
    fn reads_tokens_from_the_web_client() {
        let json = r#"{"friends":[{"id":"1710000000000","name":"Ana","createdAt":"2024-03-09T16:00:00.000Z"}],"expenses":[{"id":"1710000000001","description":"Taxi","amount":20,"currency":"USD","paidBy":"1710000000000","participants":["1710000000000"],"createdAt":"2024-03-09T16:05:00.000Z"}],"timestamp":"2024-03-09T17:00:00.000Z"}"#;
        let token = STANDARD.encode(json);

        let state = decode(&token).unwrap();

        assert_eq!(state.friends[0].name, "Ana");
        assert_eq!(
            state.friends[0].created_at,
            Utc.with_ymd_and_hms(2024, 3, 9, 16, 0, 0).unwrap()
        );
        assert_eq!(state.expenses[0].amount, 20.0);
        assert_eq!(state.expenses[0].paid_by, "1710000000000");
    }

    #[test]
    fn spaces_are_read_as_plus() {
        let (friends, expenses) = sample();
        let token = encode(&friends, &expenses).unwrap();
        let mangled = token.replace('+', " ");

        assert_eq!(decode(&mangled).unwrap().friends, friends);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let not_json = STANDARD.encode("hello");
        let wrong_shape = STANDARD.encode(r#"{"friends":[]}"#);
        let bad_date = STANDARD.encode(
            r#"{"friends":[{"id":"1","name":"A","createdAt":"yesterday"}],"expenses":[]}"#,
        );
        let orphan = STANDARD.encode(
            r#"{"friends":[],"expenses":[{"id":"1","description":"","amount":1,"currency":"USD","paidBy":"","participants":["2"],"createdAt":"2024-03-09T16:05:00Z"}]}"#,
        );
        let nobody = STANDARD.encode(
            r#"{"friends":[],"expenses":[{"id":"1","description":"","amount":1,"currency":"USD","paidBy":"2","participants":[],"createdAt":"2024-03-09T16:05:00Z"}]}"#,
        );

        let tokens: [&str; 6] = [
            "%%%not base64%%%",
            &not_json,
            &wrong_shape,
            &bad_date,
            &orphan,
            &nobody,
        ];
        for token in tokens {
            let err = decode(token).unwrap_err();
            assert!(matches!(err, SplitError::Decode { .. }), "{token}: {err}");
        }
    }

    #[test]
    fn repeated_ids_are_rejected() {
        let (mut friends, expenses) = sample();
        friends.push(friends[0].clone());
        let twice_friend = encode(&friends, &expenses).unwrap();

        let (friends, mut expenses) = sample();
        expenses.push(expenses[0].clone());
        let twice_expense = encode(&friends, &expenses).unwrap();

        for token in [twice_friend, twice_expense] {
            let err = decode(&token).unwrap_err();
            assert!(matches!(err, SplitError::Decode { .. }), "{err}");
        }
    }

    #[test]
    fn amounts_survive_to_the_last_bit() {
        let (friends, mut expenses) = sample();
        expenses[0].amount = 1708446.7280011415;

        let state = decode(&encode(&friends, &expenses).unwrap()).unwrap();

        assert_eq!(state.expenses[0].amount.to_bits(), 1708446.7280011415f64.to_bits());
    }

    #[test]
    fn link_replaces_query_and_fragment() {
        let link = shareable_link("https://split.example/app?token=old#top", "a+b/c=").unwrap();

        assert_eq!(link, "https://split.example/app?token=a%2Bb%2Fc%3D");
        let parsed = Url::parse(&link).unwrap();
        let (_, token) = parsed.query_pairs().next().unwrap();
        assert_eq!(token, "a+b/c=");
    }

    #[test]
    fn bad_base_url_is_invalid_input() {
        let err = shareable_link("not a url", "abc").unwrap_err();

        assert!(matches!(err, SplitError::InvalidInput { .. }));
    }
}
