//! Amherst scrap box (reactor 2000), Rainbow Street: Amherst.
//!
//! Drops the quest items for Pio's "Collecting Recycled Goods": a Rusty Screw
//! and an Old Wooden Board.

use async_trait::async_trait;
use script_core::{DropRequest, ItemId, ReactorId, Script, ScriptContext, ScriptResult};

pub const RUSTY_SCREW: ItemId = ItemId(4031161);
pub const OLD_WOODEN_BOARD: ItemId = ItemId(4031162);

const QUEST_ITEM_QUANTITY: u32 = 1_000_000;

pub struct AmherstScrapBox;

impl AmherstScrapBox {
    pub const REACTOR: ReactorId = ReactorId(2000);

    fn drops() -> DropRequest {
        DropRequest::new(0, 0, 0)
            .with_item(RUSTY_SCREW, QUEST_ITEM_QUANTITY)
            .with_item(OLD_WOODEN_BOARD, QUEST_ITEM_QUANTITY)
    }
}

#[async_trait]
impl Script for AmherstScrapBox {
    fn name(&self) -> &'static str {
        "amherst_scrap_box"
    }

    async fn invoke(&self, ctx: &mut ScriptContext) -> ScriptResult<()> {
        ctx.drop_items(Self::drops());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use script_core::{Effect, ItemDrop, MapId, PlayerId, PlayerView, Trigger};

    use super::*;
    use crate::testing::{context, effects, steps};

    const AMHERST: MapId = MapId(1010000);

    #[tokio::test]
    async fn drops_both_quest_items_once() {
        for player in [PlayerId(1), PlayerId(42)] {
            let (mut ctx, transcript) = context(
                Trigger::reactor(AmherstScrapBox::REACTOR, AMHERST),
                PlayerView::new(player, "anyone", 1, AMHERST),
                None,
                &[],
            );
            AmherstScrapBox.invoke(&mut ctx).await.unwrap();

            let effects = effects(&transcript);
            assert_eq!(effects.len(), 1);
            let Effect::DropItems(request) = &effects[0] else {
                panic!("expected a drop request, got {:?}", effects[0]);
            };
            assert!(!request.mesos.is_enabled());
            assert_eq!(
                request.items,
                vec![
                    ItemDrop {
                        item: RUSTY_SCREW,
                        quantity: 1_000_000
                    },
                    ItemDrop {
                        item: OLD_WOODEN_BOARD,
                        quantity: 1_000_000
                    },
                ]
            );
            assert_eq!(steps(&transcript).len(), 1, "no dialogue");
        }
    }

    #[test]
    fn drops_match_flat_call_shape() {
        let flat = DropRequest::from_args(&[0, 0, 0, 4031161, 1000000, 4031162, 1000000]);
        assert_eq!(flat, Ok(AmherstScrapBox::drops()));
    }
}
