//! Tory (NPC 1012112), Henesys Park.
//!
//! Guards the entrance to Primrose Hill and walks players back out of it.
//! What she says depends on which map she is standing on.

use async_trait::async_trait;
use script_core::{
    GateRejection, LevelRange, MapId, NpcId, PartyRequirement, PortalId, Script, ScriptContext,
    ScriptResult, ScriptTable,
};

pub const HENESYS_PARK: MapId = MapId(100000200);
pub const FORCED_RETURN_MAP: MapId = MapId(910010400);
pub const OFFERED_RETURN_MAP: MapId = MapId(910010100);

const PRIMROSE_HILL_PARTY: PartyRequirement = PartyRequirement::new(
    3,
    PartyRequirement::MAX_PARTY_SIZE,
    LevelRange::new(10, 255),
);

const INTRO: &str = "This is the #rPrimrose Hill#k. When there is a full moon the moon bunny comes to make rice cakes. Growlie wants rice cakes so you better go help him or he'll eat you.";
const HELP_MENU: &str = "Would you like to go help Growlie?\r\n#b#L0#Yes, I will go.#l";
const NOT_IN_PARTY: &str = "You are not in a party.";
const NOT_LEADER: &str = "You are not the party leader.";
const WRONG_PARTY_SIZE: &str = "Your party is not a party of three to six. Make sure all your members are present and qualified to participate in this quest.";
const NOT_READY: &str = "#e#b#rPrimrose Hill#k is not yet ready. Sorry!#n#k";
const WARPED_BACK: &str = "You have been warped to Henesys Park.";
const OFFER_RETURN: &str = "Would you like go to #rHenesys Park#k?";

/// Tory's script; branches on the map she is standing on.
pub struct MoonRabbit {
    branches: ScriptTable<MapId>,
}

impl MoonRabbit {
    pub const NPC: NpcId = NpcId(1012112);

    pub fn new() -> Self {
        Self {
            branches: ScriptTable::new()
                .with(HENESYS_PARK, PrimroseHillEntrance)
                .with(FORCED_RETURN_MAP, ForcedReturn)
                .with(OFFERED_RETURN_MAP, OfferedReturn),
        }
    }
}

impl Default for MoonRabbit {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Script for MoonRabbit {
    fn name(&self) -> &'static str {
        "moonrabbit"
    }

    async fn invoke(&self, ctx: &mut ScriptContext) -> ScriptResult<()> {
        let map = ctx.map().id();
        self.branches.dispatch(&map, ctx).await?;
        Ok(())
    }
}

/// Henesys Park: offer the party quest to a qualified party leader.
struct PrimroseHillEntrance;

#[async_trait]
impl Script for PrimroseHillEntrance {
    fn name(&self) -> &'static str {
        "moonrabbit::entrance"
    }

    async fn invoke(&self, ctx: &mut ScriptContext) -> ScriptResult<()> {
        ctx.say_next(INTRO).await?;
        if ctx.ask_menu(HELP_MENU).await? != 0 {
            return Ok(());
        }

        let map = ctx.map().id();
        let gate = PRIMROSE_HILL_PARTY.check(ctx.player(), map, ctx.party());
        let reply = match gate {
            // The event instance does not exist yet; the party still gets an answer.
            Ok(()) => NOT_READY,
            Err(GateRejection::NotInParty) => NOT_IN_PARTY,
            Err(GateRejection::NotLeader) => NOT_LEADER,
            Err(GateRejection::SizeOutOfRange { .. }) => WRONG_PARTY_SIZE,
        };
        ctx.say(reply).await
    }
}

/// Kicked out of the quest map: warp first, then explain in chat.
struct ForcedReturn;

#[async_trait]
impl Script for ForcedReturn {
    fn name(&self) -> &'static str {
        "moonrabbit::forced_return"
    }

    async fn invoke(&self, ctx: &mut ScriptContext) -> ScriptResult<()> {
        ctx.change_map(HENESYS_PARK);
        ctx.say_in_chat(WARPED_BACK);
        Ok(())
    }
}

struct OfferedReturn;

#[async_trait]
impl Script for OfferedReturn {
    fn name(&self) -> &'static str {
        "moonrabbit::offered_return"
    }

    async fn invoke(&self, ctx: &mut ScriptContext) -> ScriptResult<()> {
        if ctx.ask_yes_no(OFFER_RETURN).await?.is_yes() {
            ctx.change_map_at(HENESYS_PARK, PortalId(0));
        }
        Ok(())
    }
}
