use serde::Serialize;
use std::fmt;

/// Lifecycle of a benefit booking.
///
/// `Booked` is the only non-terminal state. Every transition leaves it and
/// none ever comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Booked,
    Attended,
    NoShow,
    Cancelled,
}

impl BookingStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            BookingStatus::Booked => "booked",
            BookingStatus::Attended => "attended",
            BookingStatus::NoShow => "no_show",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "booked" => Some(BookingStatus::Booked),
            "attended" => Some(BookingStatus::Attended),
            "no_show" => Some(BookingStatus::NoShow),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Booked)
    }

    /// Every status except `Cancelled` keeps its seat counted on the slot.
    pub fn holds_seat(&self) -> bool {
        matches!(
            self,
            BookingStatus::Booked | BookingStatus::Attended | BookingStatus::NoShow
        )
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (
                BookingStatus::Booked,
                BookingStatus::Attended | BookingStatus::NoShow | BookingStatus::Cancelled
            )
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::BookingStatus::*;
    use super::*;

    const ALL: [BookingStatus; 4] = [Booked, Attended, NoShow, Cancelled];

    #[test]
    fn booked_moves_to_every_terminal_state() {
        assert!(Booked.can_transition_to(Attended));
        assert!(Booked.can_transition_to(NoShow));
        assert!(Booked.can_transition_to(Cancelled));
        assert!(!Booked.can_transition_to(Booked));
    }

    #[test]
    fn terminal_states_never_move() {
        for from in [Attended, NoShow, Cancelled] {
            assert!(from.is_terminal());
            for to in ALL {
                assert!(
                    !from.can_transition_to(to),
                    "{from} must not move to {to}"
                );
            }
        }
    }

    #[test]
    fn db_strings() {
        for s in ALL {
            assert_eq!(BookingStatus::from_db_str(s.to_db_str()), Some(s));
        }
        assert_eq!(BookingStatus::from_db_str("pending"), None);
    }

    #[test]
    fn cancelled_releases_its_seat() {
        assert!(Booked.holds_seat());
        assert!(NoShow.holds_seat());
        assert!(!Cancelled.holds_seat());
    }
}
