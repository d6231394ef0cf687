//! Topic-based event bus implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{DialogueEvent, EffectEvent, SessionEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Prompts waiting on a player
    Dialogue,
    /// Effects applied on behalf of scripts
    Effect,
    /// Session start and end
    Session,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Dialogue(DialogueEvent),
    Effect(EffectEvent),
    Session(SessionEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Dialogue(_) => Topic::Dialogue,
            Event::Effect(_) => Topic::Effect,
            Event::Session(_) => Topic::Session,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing is best effort: events sent while a
/// topic has no subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    dialogue: broadcast::Sender<Event>,
    effect: broadcast::Sender<Event>,
    session: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            dialogue: broadcast::channel(capacity).0,
            effect: broadcast::channel(capacity).0,
            session: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Dialogue => &self.dialogue,
            Topic::Effect => &self.effect,
            Topic::Session => &self.session,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use script_core::{Effect, MapId, NpcId, PlayerId, Trigger};

    use super::*;
    use crate::api::SessionId;

    fn chat_event() -> Event {
        Event::Effect(EffectEvent {
            session: SessionId(1),
            player: PlayerId(1),
            trigger: Trigger::npc(NpcId(1012112), MapId(910010400)),
            effect: Effect::Chat("You have been warped to Henesys Park.".into()),
        })
    }

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut effects = bus.subscribe(Topic::Effect);
        let mut sessions = bus.subscribe(Topic::Session);

        bus.publish(chat_event());

        assert_eq!(effects.recv().await.unwrap(), chat_event());
        assert!(matches!(
            sessions.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        EventBus::new().publish(chat_event());
    }

    #[test]
    fn events_serialize_with_topic_tag() {
        let json = serde_json::to_string(&chat_event()).unwrap();
        assert!(json.starts_with(r#"{"Effect":"#));
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chat_event());
    }
}
