// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::traits::{ErrorEvent, Event};
use actix::prelude::*;
use bloom::{BloomFilter, ASMS};
use std::collections::{HashMap, VecDeque};
use std::marker::PhantomData;
use tokio::sync::oneshot;
use tracing::{debug, trace};

/// Subscription key that receives every event.
pub const ALL_EVENTS: &str = "*";

const SEEN_CAPACITY: u32 = 1_000_000;
const SEEN_FP_RATE: f32 = 0.001;

/// Central bus for an election. The sequencer publishes every committed operation's events here;
/// loggers and tests subscribe to a single event type or to [`ALL_EVENTS`].
///
/// Events whose id was already published are dropped when deduplication is on.
pub struct EventBus<E: Event> {
    deduplicate: bool,
    seen: BloomFilter,
    listeners: HashMap<String, Vec<Recipient<E>>>,
}

impl<E: Event> Actor for EventBus<E> {
    type Context = Context<Self>;
}

impl<E: Event> Default for EventBus<E> {
    fn default() -> Self {
        Self::new(true)
    }
}

impl<E: Event> EventBus<E> {
    pub fn new(deduplicate: bool) -> Self {
        Self {
            deduplicate,
            seen: BloomFilter::with_rate(SEEN_FP_RATE, SEEN_CAPACITY),
            listeners: HashMap::new(),
        }
    }

    /// Start a collector that records everything published on `bus`.
    pub fn history(bus: &Addr<EventBus<E>>) -> Addr<HistoryCollector<E>> {
        let addr = HistoryCollector::<E>::new().start();
        bus.do_send(Subscribe::new(ALL_EVENTS, addr.clone().recipient()));
        addr
    }

    /// Start a collector that records only the failures published on `bus`.
    pub fn error<EE: ErrorEvent>(bus: &Addr<EventBus<EE>>) -> Addr<HistoryCollector<EE>> {
        let addr = HistoryCollector::<EE>::new().start();
        bus.do_send(Subscribe::new(EE::ERROR_TYPE, addr.clone().recipient()));
        addr
    }

    fn recipients<'a>(&'a self, event_type: &'a str) -> impl Iterator<Item = &'a Recipient<E>> {
        [ALL_EVENTS, event_type]
            .into_iter()
            .filter_map(|key| self.listeners.get(key))
            .flatten()
    }
}

impl<E: Event> Handler<E> for EventBus<E> {
    type Result = ();

    fn handle(&mut self, event: E, _: &mut Context<Self>) {
        let id = event.event_id();
        if self.deduplicate && self.seen.contains(&id) {
            trace!(event = %event, "dropping duplicate");
            return;
        }
        self.seen.insert(&id);

        let event_type = event.event_type();
        for listener in self.recipients(&event_type) {
            listener.do_send(event.clone());
        }
        debug!(">>> {}", event);
    }
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Subscribe<E: Event> {
    pub event_type: String,
    pub listener: Recipient<E>,
}

impl<E: Event> Subscribe<E> {
    pub fn new(event_type: impl Into<String>, listener: Recipient<E>) -> Self {
        Self {
            event_type: event_type.into(),
            listener,
        }
    }
}

impl<E: Event> Handler<Subscribe<E>> for EventBus<E> {
    type Result = ();

    fn handle(&mut self, msg: Subscribe<E>, _: &mut Context<Self>) {
        self.listeners
            .entry(msg.event_type)
            .or_default()
            .push(msg.listener);
    }
}

/// Copy of everything buffered, without draining it.
#[derive(Message)]
#[rtype(result = "Vec<E>")]
pub struct GetEvents<E: Event>(PhantomData<E>);

impl<E: Event> GetEvents<E> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

/// Drain exactly `amount` events in arrival order, waiting until that many have arrived.
#[derive(Message)]
#[rtype(result = "Vec<E>")]
pub struct TakeEvents<E: Event> {
    amount: usize,
    _d: PhantomData<E>,
}

impl<E: Event> TakeEvents<E> {
    pub fn new(amount: usize) -> Self {
        Self {
            amount,
            _d: PhantomData,
        }
    }
}

/// Forget buffered events. Pending takes resolve empty.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ClearHistory;

/// Buffers what a bus delivers so tests can inspect it.
pub struct HistoryCollector<E: Event> {
    buffer: VecDeque<E>,
    waiting: VecDeque<(usize, oneshot::Sender<Vec<E>>)>,
}

impl<E: Event> Actor for HistoryCollector<E> {
    type Context = Context<Self>;
}

impl<E: Event> Default for HistoryCollector<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> HistoryCollector<E> {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::new(),
            waiting: VecDeque::new(),
        }
    }

    /// Hand out events to waiting takers, first come first served.
    fn serve(&mut self) {
        while let Some((amount, _)) = self.waiting.front() {
            if self.buffer.len() < *amount {
                break;
            }
            let amount = *amount;
            if let Some((_, responder)) = self.waiting.pop_front() {
                let events = self.buffer.drain(..amount).collect();
                let _ = responder.send(events);
            }
        }
    }
}

impl<E: Event> Handler<E> for HistoryCollector<E> {
    type Result = ();

    fn handle(&mut self, event: E, _: &mut Context<Self>) {
        self.buffer.push_back(event);
        self.serve();
    }
}

impl<E: Event> Handler<GetEvents<E>> for HistoryCollector<E> {
    type Result = Vec<E>;

    fn handle(&mut self, _: GetEvents<E>, _: &mut Context<Self>) -> Vec<E> {
        self.buffer.iter().cloned().collect()
    }
}

impl<E: Event> Handler<ClearHistory> for HistoryCollector<E> {
    type Result = ();

    fn handle(&mut self, _: ClearHistory, _: &mut Context<Self>) {
        self.buffer.clear();
        self.waiting.clear();
    }
}

impl<E: Event> Handler<TakeEvents<E>> for HistoryCollector<E> {
    type Result = ResponseFuture<Vec<E>>;

    fn handle(&mut self, msg: TakeEvents<E>, _: &mut Context<Self>) -> Self::Result {
        let (tx, rx) = oneshot::channel();
        self.waiting.push_back((msg.amount, tx));
        if self.buffer.len() < msg.amount {
            debug!(
                wanted = msg.amount,
                buffered = self.buffer.len(),
                "waiting for more events"
            );
        }
        self.serve();
        Box::pin(async move { rx.await.unwrap_or_default() })
    }
}
