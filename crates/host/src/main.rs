//! Console host: drives the script runtime from stdin.
mod config;
mod console;
mod logging;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use script_content::{ContentFactory, ScriptCatalog};
use script_core::{MapId, PlayerId, PlayerView, Trigger};
use script_runtime::{
    InMemoryWorld, Runtime, RuntimeHandle, SessionState, Topic, TriggerOutcome, TriggerRegistry,
};

use config::HostConfig;
use console::{ConsoleCommand, HELP, MAX_CONSOLE_PARTY};

const PLAYER: PlayerId = PlayerId(1);
const START_MAP: MapId = MapId(100000200);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = HostConfig::from_env();
    let _guard = logging::setup_logging(config.log_dir.as_deref())?;

    let registry = load_registry(&config)?;
    info!(triggers = registry.len(), "Loaded trigger bindings");
    for (key, script) in registry.bindings() {
        debug!(%key, script, "Bound trigger");
    }

    let world = Arc::new(InMemoryWorld::new());
    let runtime = Runtime::builder()
        .config(config.runtime.clone())
        .shared_world(world.clone())
        .registry(registry)
        .build()
        .await?;

    let handle = runtime.handle();
    let printer = tokio::spawn(print_events(handle.clone()));

    let mut console = Console {
        handle,
        world,
        level: config.console.player_level,
        map: START_MAP,
        party_size: 0,
    };
    console.spawn_players();
    if let Some(size) = config.console.party_size {
        console.form_party(size);
    }

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match ConsoleCommand::parse(&line) {
            Ok(ConsoleCommand::Quit) => break,
            Ok(command) => {
                if let Err(error) = console.execute(command).await {
                    println!("! {error:#}");
                }
            }
            Err(error) => println!("! {error:#}"),
        }
    }

    runtime.shutdown().await?;
    printer.abort();
    Ok(())
}

fn load_registry(config: &HostConfig) -> Result<TriggerRegistry> {
    let Some(dir) = &config.data_dir else {
        return Ok(TriggerRegistry::builtin()?);
    };
    let bindings = ContentFactory::new(dir)
        .load_bindings()
        .with_context(|| format!("loading bindings from {}", dir.display()))?;
    Ok(TriggerRegistry::from_bindings(
        &bindings,
        &ScriptCatalog::builtin(),
    )?)
}

async fn print_events(handle: RuntimeHandle) {
    let mut receivers =
        handle.subscribe_multiple(&[Topic::Dialogue, Topic::Effect, Topic::Session]);
    drop(handle);
    let (Some(mut dialogue), Some(mut effects), Some(mut sessions)) = (
        receivers.remove(&Topic::Dialogue),
        receivers.remove(&Topic::Effect),
        receivers.remove(&Topic::Session),
    ) else {
        return;
    };

    loop {
        let received = tokio::select! {
            event = dialogue.recv() => event,
            event = effects.recv() => event,
            event = sessions.recv() => event,
        };
        match received {
            Ok(event) => println!("{}", console::render(&event)),
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "Console fell behind on events"),
            Err(RecvError::Closed) => break,
        }
    }
}

/// The console player and the party members that follow them around.
struct Console {
    handle: RuntimeHandle,
    world: Arc<InMemoryWorld>,
    level: u8,
    map: MapId,
    /// Party size including the console player; 0 when not in a party.
    party_size: usize,
}

impl Console {
    async fn execute(&mut self, command: ConsoleCommand) -> Result<()> {
        match command {
            ConsoleCommand::Npc { npc, map } => self.fire(Trigger::npc(npc, map)).await?,
            ConsoleCommand::Reactor { reactor, map } => {
                self.fire(Trigger::reactor(reactor, map)).await?
            }
            ConsoleCommand::Reply(reply) => self.handle.respond(PLAYER, reply).await?,
            ConsoleCommand::Move(map) => self.move_to(map).await?,
            ConsoleCommand::Party(Some(size)) => self.form_party(size),
            ConsoleCommand::Party(None) => {
                for id in self.member_ids() {
                    self.world.remove_player(id);
                }
                self.world.leave_party(PLAYER);
                self.party_size = 0;
                println!("left the party");
            }
            ConsoleCommand::Loot => {
                let picked = self.world.clear_ground(self.map);
                if picked.is_empty() {
                    println!("nothing to pick up");
                }
                for placement in &picked {
                    println!("picked up {}", console::describe_drop(placement));
                }
            }
            ConsoleCommand::Disconnect => {
                if !self.handle.disconnect(PLAYER).await? {
                    println!("no conversation to drop");
                }
            }
            ConsoleCommand::Sessions => {
                let sessions = self.handle.sessions().await?;
                if sessions.is_empty() {
                    println!("no active sessions");
                }
                for info in sessions {
                    let state = match info.state {
                        SessionState::Running => "running",
                        SessionState::Suspended(prompt) => prompt.name(),
                    };
                    println!("{} {} {} [{state}]", info.id, info.player, info.trigger);
                }
            }
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Quit => {}
        }
        Ok(())
    }

    async fn fire(&mut self, trigger: Trigger) -> Result<()> {
        self.move_to(trigger.map).await?;
        match self.handle.trigger(PLAYER, trigger).await? {
            TriggerOutcome::Started(_) => {}
            TriggerOutcome::Queued(session) => println!("-- {session} waits for the previous one"),
            TriggerOutcome::Unbound => println!("nothing happens"),
        }
        Ok(())
    }

    async fn move_to(&mut self, map: MapId) -> Result<()> {
        if let Some(current) = self.world.player_map(PLAYER) {
            self.map = current;
        }
        if self.map == map {
            return Ok(());
        }
        self.map = map;
        self.spawn_players();
        if self.handle.player_moved(PLAYER, map).await? {
            println!("the conversation ends as you walk away");
        }
        Ok(())
    }

    /// Places the console player and party members on the current map.
    fn spawn_players(&self) {
        self.world
            .upsert_player(PlayerView::new(PLAYER, "hero", self.level, self.map));
        for id in self.member_ids() {
            self.world.upsert_player(PlayerView::new(
                id,
                format!("member{}", id.0),
                self.level,
                self.map,
            ));
        }
    }

    fn member_ids(&self) -> Vec<PlayerId> {
        (2..)
            .take(self.party_size.saturating_sub(1))
            .map(PlayerId)
            .collect()
    }

    fn form_party(&mut self, size: usize) {
        for id in self.member_ids() {
            self.world.remove_player(id);
        }
        self.party_size = size.clamp(1, MAX_CONSOLE_PARTY);
        self.spawn_players();
        self.world.form_party(PLAYER, &self.member_ids());
        println!("formed a party of {}", self.party_size);
    }
}
