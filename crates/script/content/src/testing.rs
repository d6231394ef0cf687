//! Conversation double that replays canned replies and records a transcript.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use script_core::{
    CancelReason, Conversation, Effect, MapId, MapView, PartyView, PlayerView, Prompt, Reply,
    ScriptContext, ScriptError, ScriptResult, Trigger,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Prompt(Prompt),
    Effect(Effect),
}

pub type Transcript = Arc<Mutex<Vec<Step>>>;

struct Replay {
    replies: VecDeque<Reply>,
    transcript: Transcript,
}

#[async_trait]
impl Conversation for Replay {
    async fn prompt(&mut self, prompt: Prompt) -> ScriptResult<Reply> {
        self.transcript.lock().unwrap().push(Step::Prompt(prompt));
        self.replies
            .pop_front()
            .ok_or(ScriptError::Cancelled(CancelReason::Disconnected))
    }

    fn emit(&mut self, effect: Effect) {
        self.transcript.lock().unwrap().push(Step::Effect(effect));
    }
}

/// Builds a context for `player` on `map`, answering prompts with `replies` in order.
pub fn context(
    trigger: Trigger,
    player: PlayerView,
    party: Option<PartyView>,
    replies: &[Reply],
) -> (ScriptContext, Transcript) {
    let transcript = Transcript::default();
    let conversation = Replay {
        replies: replies.iter().copied().collect(),
        transcript: Arc::clone(&transcript),
    };
    let map = MapView::new(trigger.map);
    let ctx = ScriptContext::new(trigger, player, map, party, Box::new(conversation));
    (ctx, transcript)
}

pub fn steps(transcript: &Transcript) -> Vec<Step> {
    transcript.lock().unwrap().clone()
}

pub fn effects(transcript: &Transcript) -> Vec<Effect> {
    steps(transcript)
        .into_iter()
        .filter_map(|step| match step {
            Step::Effect(effect) => Some(effect),
            Step::Prompt(_) => None,
        })
        .collect()
}

/// Text of the last prompt shown, if any.
pub fn last_prompt(transcript: &Transcript) -> Option<Prompt> {
    steps(transcript).into_iter().rev().find_map(|step| match step {
        Step::Prompt(prompt) => Some(prompt),
        Step::Effect(_) => None,
    })
}

pub fn map_changes(transcript: &Transcript) -> Vec<MapId> {
    effects(transcript)
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::ChangeMap { map, .. } => Some(map),
            _ => None,
        })
        .collect()
}
