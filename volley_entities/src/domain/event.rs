use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;


/// A weekly session. The date is validated by whoever creates the event,
/// the engine only stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub date: NaiveDate,
    pub weekly_recurrence: bool,
}

impl Event {
    pub fn new(date: NaiveDate, weekly_recurrence: bool) -> Self {
        Event {
            id: Uuid::new_v4(),
            date,
            weekly_recurrence,
        }
    }
}
