//! Request gate: one in-flight AI request at a time, plus a cooldown
//! after each completed one.
//!
//! The cooldown clock is the persisted "last completed" timestamp, so it
//! holds across separate CLI invocations.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("A styling request is already in progress")]
    RequestInFlight,

    #[error("Please wait {remaining_secs}s before starting another request")]
    CoolingDown { remaining_secs: i64 },
}

#[derive(Debug, Clone)]
pub struct RequestGate {
    cooldown: Duration,
    in_flight: Arc<Mutex<()>>,
}

/// Held for the duration of one request.
#[derive(Debug)]
pub struct Permit {
    _guard: OwnedMutexGuard<()>,
}

impl RequestGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// Time left before a new request may start, if any.
    pub fn remaining(
        &self,
        last_completed: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<Duration> {
        let last = last_completed?;
        match last.checked_add_signed(self.cooldown) {
            Some(ready_at) => (ready_at > now).then(|| ready_at - now),
            // Past the representable range: still cooling down.
            None => Some(self.cooldown),
        }
    }

    /// Admits a request when nothing is in flight and the cooldown has run out.
    pub fn admit(
        &self,
        last_completed: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Permit, GateError> {
        if let Some(left) = self.remaining(last_completed, now) {
            // Round up so "0s" is never reported while still blocked.
            let remaining_secs = left.num_milliseconds().saturating_add(999) / 1000;
            return Err(GateError::CoolingDown { remaining_secs });
        }
        let guard = self
            .in_flight
            .clone()
            .try_lock_owned()
            .map_err(|_| GateError::RequestInFlight)?;
        Ok(Permit { _guard: guard })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_760_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_first_request_is_admitted() {
        let gate = RequestGate::new(Duration::seconds(20));
        assert!(gate.admit(None, at(0)).is_ok());
    }

    #[test]
    fn test_cooldown_blocks_then_admits() {
        let gate = RequestGate::new(Duration::seconds(20));
        assert_eq!(
            gate.admit(Some(at(0)), at(5)).unwrap_err(),
            GateError::CoolingDown { remaining_secs: 15 }
        );
        assert!(gate.admit(Some(at(0)), at(20)).is_ok());
    }

    #[test]
    fn test_partial_second_rounds_up() {
        let gate = RequestGate::new(Duration::seconds(20));
        let now = at(19) + Duration::milliseconds(500);
        assert_eq!(
            gate.admit(Some(at(0)), now).unwrap_err(),
            GateError::CoolingDown { remaining_secs: 1 }
        );
    }

    #[test]
    fn test_second_concurrent_request_is_rejected_until_permit_drops() {
        let gate = RequestGate::new(Duration::zero());
        let permit = gate.admit(None, at(0)).unwrap();
        assert_eq!(
            gate.clone().admit(None, at(0)).unwrap_err(),
            GateError::RequestInFlight
        );
        drop(permit);
        assert!(gate.admit(None, at(0)).is_ok());
    }

    #[test]
    fn test_huge_cooldown_blocks_without_overflow() {
        let gate = RequestGate::new(Duration::seconds(10_000_000_000_000));
        assert_eq!(
            gate.admit(Some(at(0)), at(5)).unwrap_err(),
            GateError::CoolingDown {
                remaining_secs: 10_000_000_000_000
            }
        );
        assert!(gate.admit(None, at(5)).is_ok());
    }
}
