//! Script trait, invocation context and id-keyed dispatch.
//!
//! A [`Script`] is bound to one trigger and runs once per trigger event with a
//! fresh [`ScriptContext`]. The context carries snapshots of the player, map and
//! party plus the host's [`Conversation`], so scripts never reach for ambient
//! globals and can be driven by test doubles.
//!
//! # Suspension
//!
//! `say_next`, `say`, `ask_menu` and `ask_yes_no` await the player's answer.
//! The host implements this as a continuation (the script's future is parked
//! until a reply arrives), never as a blocked thread. If the host abandons the
//! conversation the call returns [`ScriptError::Cancelled`] and the script
//! should return it with `?`.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;

use crate::dialogue::{Prompt, Reply, YesNo};
use crate::effect::{DropRequest, Effect};
use crate::error::{ScriptError, ScriptResult};
use crate::ids::{MapId, PortalId};
use crate::trigger::Trigger;
use crate::world::{MapView, PartyView, PlayerView};

/// Host side of one conversation with a player.
#[async_trait]
pub trait Conversation: Send {
    /// Shows `prompt` and waits for the player's reply.
    async fn prompt(&mut self, prompt: Prompt) -> ScriptResult<Reply>;

    /// Delivers an effect without waiting.
    fn emit(&mut self, effect: Effect);
}

/// A reaction procedure bound to a trigger.
#[async_trait]
pub trait Script: Send + Sync {
    /// Stable name used by binding files and logs.
    fn name(&self) -> &'static str;

    /// Runs the reaction to completion or until the conversation is cancelled.
    async fn invoke(&self, ctx: &mut ScriptContext) -> ScriptResult<()>;
}

/// Everything one invocation may read or do.
pub struct ScriptContext {
    trigger: Trigger,
    player: PlayerView,
    map: MapView,
    party: Option<PartyView>,
    conversation: Box<dyn Conversation>,
}

impl ScriptContext {
    pub fn new(
        trigger: Trigger,
        player: PlayerView,
        map: MapView,
        party: Option<PartyView>,
        conversation: Box<dyn Conversation>,
    ) -> Self {
        Self {
            trigger,
            player,
            map,
            party,
            conversation,
        }
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn player(&self) -> &PlayerView {
        &self.player
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    /// The player's party, or `None` when the player has none.
    pub fn party(&self) -> Option<&PartyView> {
        self.party.as_ref()
    }

    pub async fn say_next(&mut self, text: impl Into<String>) -> ScriptResult<()> {
        self.expect_dismiss(Prompt::SayNext(text.into())).await
    }

    pub async fn say(&mut self, text: impl Into<String>) -> ScriptResult<()> {
        self.expect_dismiss(Prompt::Say(text.into())).await
    }

    /// Chat-log line; does not suspend.
    pub fn say_in_chat(&mut self, text: impl Into<String>) {
        self.conversation.emit(Effect::Chat(text.into()));
    }

    /// Shows a menu and returns the 0-based index the player picked.
    pub async fn ask_menu(&mut self, text: impl Into<String>) -> ScriptResult<u32> {
        let prompt = Prompt::AskMenu(text.into());
        let reply = self.conversation.prompt(prompt.clone()).await?;
        match reply {
            Reply::Selection(selection) if prompt.accepts(&reply) => Ok(selection),
            Reply::Selection(selection) => Err(ScriptError::SelectionOutOfRange { selection }),
            other => Err(ScriptError::UnexpectedReply {
                prompt: prompt.name(),
                reply: other,
            }),
        }
    }

    pub async fn ask_yes_no(&mut self, text: impl Into<String>) -> ScriptResult<YesNo> {
        let prompt = Prompt::AskYesNo(text.into());
        match self.conversation.prompt(prompt.clone()).await? {
            Reply::Answer(raw) => Ok(YesNo::from_raw(raw)),
            other => Err(ScriptError::UnexpectedReply {
                prompt: prompt.name(),
                reply: other,
            }),
        }
    }

    /// Warps the player to the map's default spawn point.
    pub fn change_map(&mut self, map: MapId) {
        self.conversation
            .emit(Effect::ChangeMap { map, portal: None });
    }

    pub fn change_map_at(&mut self, map: MapId, portal: PortalId) {
        self.conversation.emit(Effect::ChangeMap {
            map,
            portal: Some(portal),
        });
    }

    pub fn drop_items(&mut self, request: DropRequest) {
        self.conversation.emit(Effect::DropItems(request));
    }

    async fn expect_dismiss(&mut self, prompt: Prompt) -> ScriptResult<()> {
        let name = prompt.name();
        match self.conversation.prompt(prompt).await? {
            Reply::Dismissed => Ok(()),
            other => Err(ScriptError::UnexpectedReply {
                prompt: name,
                reply: other,
            }),
        }
    }
}

/// Integer-keyed dispatch table; a missing key does nothing.
pub struct ScriptTable<K> {
    entries: HashMap<K, Arc<dyn Script>>,
}

impl<K: Eq + Hash> ScriptTable<K> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Adds a branch, replacing any previous one for `key`.
    pub fn with(mut self, key: K, script: impl Script + 'static) -> Self {
        self.entries.insert(key, Arc::new(script));
        self
    }

    pub fn get(&self, key: &K) -> Option<&Arc<dyn Script>> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs the branch for `key`. Returns `false` without side effects if none matches.
    pub async fn dispatch(&self, key: &K, ctx: &mut ScriptContext) -> ScriptResult<bool> {
        match self.entries.get(key) {
            Some(script) => {
                script.invoke(ctx).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl<K: Eq + Hash> Default for ScriptTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::ids::{NpcId, PlayerId};

    #[derive(Default)]
    struct Log {
        prompts: Vec<Prompt>,
        effects: Vec<Effect>,
    }

    struct Scripted {
        replies: VecDeque<Reply>,
        log: Arc<Mutex<Log>>,
    }

    #[async_trait]
    impl Conversation for Scripted {
        async fn prompt(&mut self, prompt: Prompt) -> ScriptResult<Reply> {
            self.log.lock().unwrap().prompts.push(prompt);
            self.replies
                .pop_front()
                .ok_or(ScriptError::Cancelled(crate::CancelReason::Disconnected))
        }

        fn emit(&mut self, effect: Effect) {
            self.log.lock().unwrap().effects.push(effect);
        }
    }

    fn context(replies: &[Reply]) -> (ScriptContext, Arc<Mutex<Log>>) {
        let log = Arc::new(Mutex::new(Log::default()));
        let conversation = Scripted {
            replies: replies.iter().copied().collect(),
            log: Arc::clone(&log),
        };
        let ctx = ScriptContext::new(
            Trigger::npc(NpcId(1), MapId(10)),
            PlayerView::new(PlayerId(1), "tester", 20, MapId(10)),
            MapView::new(MapId(10)),
            None,
            Box::new(conversation),
        );
        (ctx, log)
    }

    struct Greeter;

    #[async_trait]
    impl Script for Greeter {
        fn name(&self) -> &'static str {
            "greeter"
        }

        async fn invoke(&self, ctx: &mut ScriptContext) -> ScriptResult<()> {
            ctx.say("hi").await
        }
    }

    #[tokio::test]
    async fn ask_menu_rejects_undeclared_option() {
        let (mut ctx, _) = context(&[Reply::Selection(3)]);
        let result = ctx.ask_menu("#L0#only#l").await;
        assert_eq!(result, Err(ScriptError::SelectionOutOfRange { selection: 3 }));
    }

    #[tokio::test]
    async fn ask_yes_no_decodes_raw_answer() {
        let (mut ctx, _) = context(&[Reply::Answer(1), Reply::Answer(2)]);
        assert_eq!(ctx.ask_yes_no("?").await, Ok(YesNo::Yes));
        assert_eq!(ctx.ask_yes_no("?").await, Ok(YesNo::No));
    }

    #[tokio::test]
    async fn say_rejects_selection() {
        let (mut ctx, _) = context(&[Reply::Selection(0)]);
        assert!(matches!(
            ctx.say_next("hello").await,
            Err(ScriptError::UnexpectedReply {
                prompt: "say_next",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn cancellation_surfaces_from_prompt() {
        let (mut ctx, _) = context(&[]);
        let err = ctx.say("hello").await.unwrap_err();
        assert!(err.is_cancellation());
    }

    #[tokio::test]
    async fn effects_do_not_prompt() {
        let (mut ctx, log) = context(&[]);
        ctx.say_in_chat("warped");
        ctx.change_map_at(MapId(5), PortalId(0));

        let log = log.lock().unwrap();
        assert!(log.prompts.is_empty());
        assert_eq!(
            log.effects,
            vec![
                Effect::Chat("warped".into()),
                Effect::ChangeMap {
                    map: MapId(5),
                    portal: Some(PortalId(0))
                },
            ]
        );
    }

    #[tokio::test]
    async fn table_dispatch_defaults_to_nothing() {
        let table = ScriptTable::new().with(10u32, Greeter);
        let (mut ctx, log) = context(&[Reply::Dismissed]);

        assert_eq!(table.dispatch(&99, &mut ctx).await, Ok(false));
        assert!(log.lock().unwrap().prompts.is_empty());

        assert_eq!(table.dispatch(&10, &mut ctx).await, Ok(true));
        assert_eq!(log.lock().unwrap().prompts, vec![Prompt::Say("hi".into())]);
    }
}
