//! Reaction scripts, one module per bound NPC or reactor.

mod amherst_scrap_box;
mod moon_rabbit;

pub use amherst_scrap_box::AmherstScrapBox;
pub use moon_rabbit::MoonRabbit;
