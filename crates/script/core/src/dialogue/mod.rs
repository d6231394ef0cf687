//! Suspending dialogue calls and the replies that resume them.
//!
//! Every [`Prompt`] suspends the calling script until the player answers with a
//! matching [`Reply`]. Dialogue text may carry client style markup; scripts pass
//! it through untouched and only the [`markup`] helpers look inside.

pub mod markup;

pub use markup::MenuOption;

/// A dialogue window shown to the player.
#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Prompt {
    /// Dialogue with a "next" button.
    SayNext(String),
    /// Dialogue with an "ok" button; ends a page sequence.
    Say(String),
    /// Numbered options; answered with a [`Reply::Selection`].
    AskMenu(String),
    /// Yes/no question; answered with a [`Reply::Answer`].
    AskYesNo(String),
}

impl Prompt {
    pub fn text(&self) -> &str {
        match self {
            Prompt::SayNext(text)
            | Prompt::Say(text)
            | Prompt::AskMenu(text)
            | Prompt::AskYesNo(text) => text,
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Menu options offered by an [`Prompt::AskMenu`]; empty for other prompts.
    pub fn options(&self) -> Vec<MenuOption> {
        match self {
            Prompt::AskMenu(text) => markup::menu_options(text),
            _ => Vec::new(),
        }
    }

    /// Returns true if `reply` is a valid answer to this prompt.
    ///
    /// Menus that declare `#L<n>#` options only accept those indices; a menu
    /// without declared options accepts any index.
    pub fn accepts(&self, reply: &Reply) -> bool {
        match (self, reply) {
            (Prompt::SayNext(_) | Prompt::Say(_), Reply::Dismissed) => true,
            (Prompt::AskMenu(_), Reply::Selection(selection)) => {
                let options = self.options();
                options.is_empty() || options.iter().any(|o| o.index == *selection)
            }
            (Prompt::AskYesNo(_), Reply::Answer(_)) => true,
            _ => false,
        }
    }
}

/// Player input that resumes a suspended script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Reply {
    /// The player pressed next/ok.
    Dismissed,
    /// 0-based index of the chosen menu option.
    Selection(u32),
    /// Raw yes/no answer as sent by the client (1 = yes).
    Answer(u8),
}

impl Reply {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// Decoded answer to a yes/no prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    /// Only a raw `1` means yes; every other value is treated as no.
    pub const fn from_raw(value: u8) -> Self {
        if value == 1 { YesNo::Yes } else { YesNo::No }
    }

    pub const fn is_yes(self) -> bool {
        matches!(self, YesNo::Yes)
    }
}
