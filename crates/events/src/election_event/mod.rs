// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod election_failure;
mod election_reset;
mod fees_withdrawn;
mod stage_advanced;
mod vote_cast;
mod voter_registered;
mod winner_available;

pub use election_failure::*;
pub use election_reset::*;
pub use fees_withdrawn::*;
pub use stage_advanced::*;
pub use vote_cast::*;
pub use voter_registered::*;
pub use winner_available::*;

use crate::{ErrorEvent, Event, EventId};
use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to help define From traits for ElectionEventData and ElectionEvent
macro_rules! impl_from_event {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for ElectionEventData {
                fn from(data: $variant) -> Self {
                    ElectionEventData::$variant(data)
                }
            }

            impl From<$variant> for ElectionEvent {
                fn from(data: $variant) -> Self {
                    ElectionEvent::new(data.into())
                }
            }
        )*
    };
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElectionEventData {
    VoterRegistered(VoterRegistered),
    StageAdvanced(StageAdvanced),
    VoteCast(VoteCast),
    WinnerAvailable(WinnerAvailable),
    ElectionReset(ElectionReset),
    FeesWithdrawn(FeesWithdrawn),
    ElectionFailure(ElectionFailure),
}

impl ElectionEventData {
    fn describe(&self) -> String {
        match self {
            ElectionEventData::VoterRegistered(data) => format!("{}", data),
            ElectionEventData::StageAdvanced(data) => format!("{}", data),
            ElectionEventData::VoteCast(data) => format!("{}", data),
            ElectionEventData::WinnerAvailable(data) => format!("{}", data),
            ElectionEventData::ElectionReset(data) => format!("{}", data),
            ElectionEventData::FeesWithdrawn(data) => format!("{}", data),
            ElectionEventData::ElectionFailure(data) => format!("{}", data),
        }
    }
}

/// Everything an election announces. The id is derived from the payload, so the bus can drop
/// accidental re-deliveries of the same announcement.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct ElectionEvent {
    id: EventId,
    data: ElectionEventData,
}

impl ElectionEvent {
    pub fn new(data: ElectionEventData) -> Self {
        Self {
            id: EventId::hash(&data),
            data,
        }
    }

    /// Election round the event belongs to, when it is tied to one.
    pub fn round(&self) -> Option<u64> {
        match &self.data {
            ElectionEventData::VoterRegistered(data) => Some(data.round),
            ElectionEventData::StageAdvanced(data) => Some(data.round),
            ElectionEventData::VoteCast(data) => Some(data.round),
            ElectionEventData::WinnerAvailable(data) => Some(data.round),
            ElectionEventData::ElectionReset(data) => Some(data.round),
            _ => None,
        }
    }

    pub fn as_failure(&self) -> Option<&ElectionFailure> {
        match &self.data {
            ElectionEventData::ElectionFailure(data) => Some(data),
            _ => None,
        }
    }
}

impl Event for ElectionEvent {
    type Id = EventId;
    type Data = ElectionEventData;

    fn event_type(&self) -> String {
        let s = format!("{:?}", self.data);
        extract_event_name(&s).to_string()
    }

    fn event_id(&self) -> Self::Id {
        self.id.clone()
    }

    fn get_data(&self) -> &Self::Data {
        &self.data
    }

    fn into_data(self) -> Self::Data {
        self.data
    }
}

impl ErrorEvent for ElectionEvent {
    const ERROR_TYPE: &'static str = "ElectionFailure";
}

impl_from_event!(
    VoterRegistered,
    StageAdvanced,
    VoteCast,
    WinnerAvailable,
    ElectionReset,
    FeesWithdrawn,
    ElectionFailure
);

impl fmt::Display for ElectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.event_type(), self.data.describe())
    }
}

fn extract_event_name(s: &str) -> &str {
    let bytes = s.as_bytes();
    for (i, &item) in bytes.iter().enumerate() {
        if item == b' ' || item == b'(' {
            return &s[..i];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventBus, GetEvents, Stage, Subscribe, TakeEvents};
    use actix::Actor;
    use anyhow::Result;
    use std::time::Duration;
    use veil_acl::{Handle, Principal};

    fn advanced(round: u64) -> ElectionEvent {
        StageAdvanced {
            round,
            previous: Stage::Registration,
            current: Stage::Vote,
        }
        .into()
    }

    #[test]
    fn test_event_type_and_display() {
        let event: ElectionEvent = WinnerAvailable {
            round: 3,
            winner: Handle::new([9; 32]),
        }
        .into();
        assert_eq!(event.event_type(), "WinnerAvailable");
        assert_eq!(event.round(), Some(3));
        assert!(event.to_string().starts_with("WinnerAvailable(round: 3"));
    }

    #[test]
    fn test_id_follows_payload() {
        assert_eq!(advanced(0).event_id(), advanced(0).event_id());
        assert_ne!(advanced(0).event_id(), advanced(1).event_id());
    }

    #[test]
    fn test_failure_is_the_error_type() {
        let event: ElectionEvent = ElectionFailure::new(
            4,
            Principal::new([1; 20]),
            "register",
            "WrongStage",
            "operation not allowed in stage Vote",
        )
        .into();
        assert_eq!(event.event_type(), ElectionEvent::ERROR_TYPE);
        assert!(event.as_failure().is_some());
        assert_eq!(event.round(), None);
    }

    #[actix::test]
    async fn test_bus_deduplicates_and_routes() -> Result<()> {
        let bus = EventBus::<ElectionEvent>::default().start();
        let history = EventBus::history(&bus);
        let errors = EventBus::<ElectionEvent>::error(&bus);

        bus.send(advanced(0)).await?;
        bus.send(advanced(0)).await?;
        bus.send(advanced(1)).await?;
        bus.send(ElectionEvent::from(ElectionFailure::new(
            1,
            Principal::new([2; 20]),
            "vote",
            "NotRegistered",
            "caller is not registered",
        )))
        .await?;

        let all = history.send(TakeEvents::new(3)).await?;
        assert_eq!(all[0], advanced(0));
        assert_eq!(all[1], advanced(1));
        assert!(all[2].as_failure().is_some());

        let failures = errors.send(GetEvents::new()).await?;
        assert_eq!(failures.len(), 1);
        Ok(())
    }

    #[actix::test]
    async fn test_subscription_by_type() -> Result<()> {
        let bus = EventBus::<ElectionEvent>::default().start();
        let collector = crate::HistoryCollector::<ElectionEvent>::new().start();
        bus.send(Subscribe::new("ElectionReset", collector.clone().recipient()))
            .await?;

        bus.send(advanced(0)).await?;
        bus.send(ElectionEvent::from(ElectionReset {
            round: 1,
            num_proposals: 2,
        }))
        .await?;

        tokio::time::sleep(Duration::from_millis(1)).await;
        let events = collector.send(GetEvents::new()).await?;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "ElectionReset");
        Ok(())
    }
}
