use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkScheduleSlot {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub weekday: i16,
    pub start_hour: i16,
    pub end_hour: i16,
    pub is_active: bool,
}

/// Weekly slot in whole hours: `weekday` 0 = Monday .. 6 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    pub weekday: i16,
    pub start_hour: i16,
    pub end_hour: i16,
}

impl SlotSpec {
    pub fn new(weekday: i16, start_hour: i16, end_hour: i16) -> Result<Self> {
        if !(0..=6).contains(&weekday) {
            return Err(Error::BadRequest(
                "Weekday must be between 0 (Monday) and 6 (Sunday)".to_string(),
            ));
        }
        if !(0..=23).contains(&start_hour) || !(0..=23).contains(&end_hour) {
            return Err(Error::BadRequest(
                "Hours must be whole hours between 0 and 23".to_string(),
            ));
        }
        if end_hour <= start_hour {
            return Err(Error::BadRequest(
                "End hour must be greater than start hour".to_string(),
            ));
        }
        Ok(Self {
            weekday,
            start_hour,
            end_hour,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_slot() {
        let slot = SlotSpec::new(0, 8, 12).unwrap();
        assert_eq!(slot.end_hour, 12);
    }

    #[test]
    fn rejects_out_of_range_and_inverted_slots() {
        assert!(SlotSpec::new(7, 8, 12).is_err());
        assert!(SlotSpec::new(-1, 8, 12).is_err());
        assert!(SlotSpec::new(0, 8, 24).is_err());
        assert!(SlotSpec::new(0, 12, 12).is_err());
        assert!(SlotSpec::new(0, 13, 12).is_err());
    }
}
