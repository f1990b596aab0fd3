use std::{collections::HashMap, sync::Arc};

use chrono::{Datelike, NaiveDate, Weekday};
use itertools::Itertools;
use tokio::sync::RwLock;
use tracing::info;
use volley_entities::{prelude::Event, EngineError, Uuid};


const ACCEPTED_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d"];

#[derive(Debug, Clone, Copy)]
pub struct EventDatePolicy {
    pub voting_weekday: Weekday,
}

impl EventDatePolicy {
    pub fn new(voting_weekday: Weekday) -> Self {
        EventDatePolicy { voting_weekday }
    }

    pub fn parse_date(&self, value: &str) -> Result<NaiveDate, EngineError> {
        let candidate = value.trim();
        ACCEPTED_DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(candidate, format).ok())
            .ok_or_else(|| EngineError::InvalidEventDate(format!("Unknown date format '{}'", candidate)))
    }

    pub fn check(&self, date: NaiveDate) -> Result<(), EngineError> {
        if date.weekday() != self.voting_weekday {
            return Err(EngineError::InvalidEventDate(
                format!("{} is not a {:?}", date, self.voting_weekday)
            ));
        }
        Ok(())
    }
}

/// Ordered set of user ids taking part in an event. Insertion order is
/// kept since it breaks ties during balancing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    members: Vec<Uuid>,
}

impl Roster {
    pub fn new(user_ids: Vec<Uuid>) -> Self {
        Roster {
            members: user_ids.into_iter().unique().collect(),
        }
    }

    pub fn contains(&self, user_id: &Uuid) -> bool {
        self.members.contains(user_id)
    }

    pub fn members(&self) -> &[Uuid] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug)]
pub struct EventEntry {
    pub event: Event,
    pub roster: RwLock<Roster>,
}

/// All known events and their rosters.
#[derive(Default)]
pub struct EventRegistry {
    events: RwLock<HashMap<Uuid, Arc<EventEntry>>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an event for `date`, or returns the one that already exists
    /// for that date.
    pub async fn create(&self, date: NaiveDate, weekly_recurrence: bool) -> Event {
        let mut events = self.events.write().await;
        if let Some(existing) = events.values().find(|e| e.event.date == date) {
            return existing.event.clone();
        }

        let event = Event::new(date, weekly_recurrence);
        info!("Created event {} on {}", event.id, event.date);
        events.insert(event.id, Arc::new(EventEntry {
            event: event.clone(),
            roster: RwLock::new(Roster::default()),
        }));
        event
    }

    pub async fn get(&self, event_id: Uuid) -> Result<Arc<EventEntry>, EngineError> {
        self.events
            .read()
            .await
            .get(&event_id)
            .cloned()
            .ok_or(EngineError::EventNotFound(event_id))
    }

    pub async fn list(&self) -> Vec<Event> {
        self.events
            .read()
            .await
            .values()
            .map(|e| e.event.clone())
            .sorted_by_key(|e| e.date)
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_parse_accepts_known_formats() {
        let policy = EventDatePolicy::new(Weekday::Thu);
        let expected = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
        for value in ["2025-12-25", "25.12.2025", "25/12/2025", "2025/12/25", " 2025-12-25 "] {
            assert_eq!(policy.parse_date(value).unwrap(), expected);
        }
        assert_matches!(policy.parse_date("next week"), Err(EngineError::InvalidEventDate(_)));
    }

    #[test]
    fn test_check_weekday() {
        let policy = EventDatePolicy::new(Weekday::Thu);
        assert!(policy.check(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap()).is_ok());
        assert_matches!(
            policy.check(NaiveDate::from_ymd_opt(2025, 12, 24).unwrap()),
            Err(EngineError::InvalidEventDate(_))
        );
    }

    #[test]
    fn test_roster_deduplicates_in_order() {
        let roster = Roster::new(vec![Uuid::from_u128(2), Uuid::from_u128(1), Uuid::from_u128(2)]);
        assert_eq!(roster.members(), &[Uuid::from_u128(2), Uuid::from_u128(1)]);
    }

    #[tokio::test]
    async fn test_create_is_idempotent_per_date() {
        let registry = EventRegistry::new();
        let date = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
        let first = registry.create(date, true).await;
        let second = registry.create(date, false).await;

        assert_eq!(first, second);
        assert_eq!(registry.list().await.len(), 1);
        assert_matches!(registry.get(Uuid::from_u128(99)).await, Err(EngineError::EventNotFound(_)));
    }
}
