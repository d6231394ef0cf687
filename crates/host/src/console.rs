//! Console command parsing and event rendering.
use anyhow::{Context, Result, anyhow, bail};

use script_core::{
    DropPlacement, DroppedKind, Effect, MapId, NpcId, PartyRequirement, Position, Prompt,
    ReactorId, Reply, markup,
};
use script_runtime::{DialogueEvent, EffectEvent, Event, SessionEvent, SessionOutcome};

pub const HELP: &str = "\
commands:
  npc <id> <map>        talk to an NPC standing on <map>
  reactor <id> <map>    hit a reactor on <map>
  ok                    dismiss the current dialogue
  pick <n>              choose menu option <n>
  yes | no              answer a yes/no question
  move <map>            walk to another map
  party <size> | none   form a party of <size> (leader included) or leave it
  loot                  pick up everything on the current map
  disconnect            drop the connection
  sessions              list active sessions
  quit                  exit";

/// Largest party the console forms; leaves room to try oversized parties.
pub const MAX_CONSOLE_PARTY: usize = PartyRequirement::MAX_PARTY_SIZE + 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleCommand {
    Npc { npc: NpcId, map: MapId },
    Reactor { reactor: ReactorId, map: MapId },
    Reply(Reply),
    Move(MapId),
    Party(Option<usize>),
    Loot,
    Disconnect,
    Sessions,
    Help,
    Quit,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("empty command");
        };
        let args: Vec<&str> = words.collect();

        let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("npc", [id, map]) => ConsoleCommand::Npc {
                npc: NpcId(number(id)?),
                map: MapId(number(map)?),
            },
            ("reactor", [id, map]) => ConsoleCommand::Reactor {
                reactor: ReactorId(number(id)?),
                map: MapId(number(map)?),
            },
            ("ok" | "next", []) => ConsoleCommand::Reply(Reply::Dismissed),
            ("pick", [n]) => ConsoleCommand::Reply(Reply::Selection(number(n)?)),
            ("yes", []) => ConsoleCommand::Reply(Reply::Answer(1)),
            ("no", []) => ConsoleCommand::Reply(Reply::Answer(0)),
            ("move", [map]) => ConsoleCommand::Move(MapId(number(map)?)),
            ("party", ["none"]) => ConsoleCommand::Party(None),
            ("party", [size]) => {
                let size: usize = number(size)?;
                if size > MAX_CONSOLE_PARTY {
                    bail!("a party holds at most {MAX_CONSOLE_PARTY} players here");
                }
                ConsoleCommand::Party(Some(size))
            }
            ("loot", []) => ConsoleCommand::Loot,
            ("disconnect", []) => ConsoleCommand::Disconnect,
            ("sessions", []) => ConsoleCommand::Sessions,
            ("help" | "?", []) => ConsoleCommand::Help,
            ("quit" | "exit", []) => ConsoleCommand::Quit,
            (verb, _) => return Err(anyhow!("cannot parse '{verb}' with {} argument(s)", args.len())),
        };
        Ok(command)
    }
}

fn number<T: std::str::FromStr>(word: &str) -> Result<T> {
    word.parse()
        .ok()
        .with_context(|| format!("'{word}' is not a valid number"))
}

/// One or more display lines for an event, markup stripped.
pub fn render(event: &Event) -> String {
    match event {
        Event::Dialogue(DialogueEvent::Prompted { prompt, .. }) => render_prompt(prompt),
        Event::Effect(EffectEvent { effect, .. }) => render_effect(effect),
        Event::Session(SessionEvent::Started {
            session, trigger, ..
        }) => format!("-- {session} started by {trigger}"),
        Event::Session(SessionEvent::Ended {
            session, outcome, ..
        }) => match outcome {
            SessionOutcome::Completed => format!("-- {session} completed"),
            SessionOutcome::Cancelled(reason) => format!("-- {session} cancelled ({reason})"),
            SessionOutcome::Failed(error) => format!("-- {session} failed: {error}"),
        },
    }
}

fn render_prompt(prompt: &Prompt) -> String {
    let text = markup::plain(prompt.text());
    match prompt {
        Prompt::SayNext(_) => format!("{text}\n  [next: ok]"),
        Prompt::Say(_) => format!("{text}\n  [ok]"),
        Prompt::AskMenu(_) => {
            let question = text.lines().next().unwrap_or_default().to_owned();
            let options = prompt
                .options()
                .iter()
                .map(|option| format!("  pick {}: {}", option.index, option.label))
                .collect::<Vec<_>>();
            if options.is_empty() {
                format!("{text}\n  [pick <n>]")
            } else {
                format!("{question}\n{}", options.join("\n"))
            }
        }
        Prompt::AskYesNo(_) => format!("{text}\n  [yes / no]"),
    }
}

fn render_effect(effect: &Effect) -> String {
    match effect {
        Effect::Chat(text) => format!("(chat) {}", markup::plain(text)),
        Effect::ChangeMap { map, portal } => match portal {
            Some(portal) => format!("** warped to {map}, {portal}"),
            None => format!("** warped to {map}"),
        },
        Effect::DropItems(request) => {
            let drops = request
                .layout(Position::ORIGIN)
                .iter()
                .map(describe_drop)
                .collect::<Vec<_>>();
            format!("** dropped {}", drops.join(", "))
        }
    }
}

pub fn describe_drop(placement: &DropPlacement) -> String {
    match placement.kind {
        DroppedKind::Item(item) => format!(
            "{} x{} at {:+}",
            item.item, item.quantity, placement.position.x
        ),
        DroppedKind::Mesos(mesos) => format!(
            "{}-{} mesos at {:+}",
            mesos.min, mesos.max, placement.position.x
        ),
    }
}

#[cfg(test)]
mod tests {
    use script_core::{DropRequest, ItemId, PortalId};

    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(
            ConsoleCommand::parse("npc 1012112 910010100").unwrap(),
            ConsoleCommand::Npc {
                npc: NpcId(1012112),
                map: MapId(910010100),
            }
        );
        assert_eq!(
            ConsoleCommand::parse("  PICK 0 ").unwrap(),
            ConsoleCommand::Reply(Reply::Selection(0))
        );
        assert_eq!(
            ConsoleCommand::parse("yes").unwrap(),
            ConsoleCommand::Reply(Reply::Answer(1))
        );
        assert_eq!(
            ConsoleCommand::parse("party none").unwrap(),
            ConsoleCommand::Party(None)
        );
        assert_eq!(
            ConsoleCommand::parse("party 3").unwrap(),
            ConsoleCommand::Party(Some(3))
        );
        assert_eq!(ConsoleCommand::parse("loot").unwrap(), ConsoleCommand::Loot);
    }

    #[test]
    fn party_size_is_bounded() {
        assert_eq!(
            ConsoleCommand::parse("party 8").unwrap(),
            ConsoleCommand::Party(Some(MAX_CONSOLE_PARTY))
        );
        assert!(ConsoleCommand::parse("party 9").is_err());
        assert!(ConsoleCommand::parse("party 4294967297").is_err());
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!(ConsoleCommand::parse("").is_err());
        assert!(ConsoleCommand::parse("npc 1012112").is_err());
        assert!(ConsoleCommand::parse("pick first").is_err());
        assert!(ConsoleCommand::parse("dance").is_err());
    }

    #[test]
    fn menu_renders_options_without_markup() {
        let prompt = Prompt::AskMenu("Would you like to go help Growlie?\r\n#b#L0#Yes, I will go.#l".into());
        assert_eq!(
            render_prompt(&prompt),
            "Would you like to go help Growlie?\n  pick 0: Yes, I will go."
        );
    }

    #[test]
    fn effects_render_plainly() {
        assert_eq!(
            render_effect(&Effect::ChangeMap {
                map: MapId(100000200),
                portal: Some(PortalId(0)),
            }),
            "** warped to map 100000200, portal 0"
        );

        let request = DropRequest::new(0, 0, 0)
            .with_item(ItemId(4031161), 1_000_000)
            .with_item(ItemId(4031162), 1_000_000);
        assert_eq!(
            render_effect(&Effect::DropItems(request)),
            "** dropped item 4031161 x1000000 at +0, item 4031162 x1000000 at +37"
        );
    }
}
