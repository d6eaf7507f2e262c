//! Inventory actions: using, crafting, taking and dropping items.
//!
//! Taking an item out of, or dropping one into, a `weight` or `container`
//! puzzle re-attempts that puzzle with what is now inside it, so scales and
//! boxes solve and unsolve as their contents change.

use tracing::{debug, warn};

use crate::core::{
    Action, ActionError, ActionType, GameState, InventoryItem, ItemContainer, PlayerId, PrefabId, RoomItem,
};
use crate::ports::{LogEntry, LogKind, Narration, Services};
use crate::puzzle::{AttemptOutcome, AttemptRequest, PuzzleResolver, PuzzleType};
use crate::status::{CureOptions, InflictOptions, StatusLifecycle};

/// Use a carried item on `target`, or on the player themselves.
///
/// Every effect of the item is inflicted and every cure cured on the target;
/// a status that can't be inflicted or cured is skipped. Limited items lose
/// one use.
pub fn perform_use(
    state: &mut GameState,
    services: &mut dyn Services,
    action: &mut Action,
    item: &PrefabId,
    target: Option<PlayerId>,
) -> Result<(), ActionError> {
    super::begin(state, action, "use")?;
    let user = action.player;
    let target = target.unwrap_or(user);

    let held = state
        .require_player(user)?
        .find_item(item)
        .ok_or_else(|| not_found(item, "use"))?;
    if held.uses == Some(0) {
        return Err(ActionError::ItemUnusable("That item has no uses left.".to_string()));
    }
    let prefab = state
        .prefab(item)
        .ok_or_else(|| ActionError::UnknownEntity(item.to_string()))?
        .clone();
    if !prefab.usable {
        return Err(ActionError::ItemUnusable(
            "That item has no programmed use on its own, but you may be able to use it some other way.".to_string(),
        ));
    }

    let recipient = state.require_player(target)?;
    let has_effect = prefab.effects.iter().any(|effect| {
        !recipient.has_status(effect) || state.statuses.get(effect).is_some_and(|s| s.duplicated_status.is_some())
    });
    let has_cure = prefab.cures.iter().any(|cure| recipient.has_status(cure));
    if !has_effect && !has_cure {
        return Err(ActionError::ItemUnusable(format!(
            "You attempt to use the {}, but it has no effect.",
            prefab.name
        )));
    }

    services.narrate(
        action,
        Narration::ItemUsed {
            item: item.clone(),
            target,
        },
    );
    services.log(LogEntry::for_action(LogKind::Use, action, &prefab.name));

    for effect in &prefab.effects {
        let options = InflictOptions::default().with_item(item.clone());
        if let Err(err) = StatusLifecycle::inflict(state, services, action, target, effect, options) {
            debug!(%item, status = %effect, %err, "item effect skipped");
        }
    }
    for cure in &prefab.cures {
        let options = CureOptions::default().with_item(item.clone());
        if let Err(err) = StatusLifecycle::cure(state, services, action, target, cure, options) {
            debug!(%item, status = %cure, %err, "item cure skipped");
        }
    }

    let player = state.require_player_mut(user)?;
    if let Some(uses) = player
        .inventory
        .iter_mut()
        .find(|held| &held.prefab == item)
        .and_then(|held| held.uses.as_mut())
    {
        *uses = uses.saturating_sub(1);
    }
    Ok(())
}

/// Combine two carried items into a recipe's products.
pub fn perform_craft(
    state: &mut GameState,
    services: &mut dyn Services,
    action: &mut Action,
    first: &PrefabId,
    second: &PrefabId,
) -> Result<Vec<PrefabId>, ActionError> {
    super::begin(state, action, "craft")?;
    let crafter = action.player;

    let player = state.require_player(crafter)?;
    let needed = if first == second { 2 } else { 1 };
    for ingredient in [first, second] {
        if player.count_item(ingredient) < needed {
            return Err(not_found(ingredient, "craft"));
        }
    }
    let products = state
        .recipe_for(first, second)
        .ok_or_else(|| {
            ActionError::ItemUnusable(format!("Couldn't find a recipe that requires {first} and {second}."))
        })?
        .products
        .clone();

    let made: Vec<InventoryItem> = products.iter().map(|product| fresh_item(state, product)).collect();
    let player = state.require_player_mut(crafter)?;
    player.take_item(first);
    player.take_item(second);
    for item in made {
        player.give_item(item);
    }

    services.narrate(
        action,
        Narration::ItemsCrafted {
            ingredients: [first.clone(), second.clone()],
            products: products.clone(),
        },
    );
    services.log(LogEntry::for_action(LogKind::Craft, action, format!("{first} + {second}")));
    debug!(player = %crafter, %first, %second, ?products, "items crafted");
    Ok(products)
}

/// Take one `item` from `from` in the player's room.
///
/// Returns the outcome of re-attempting the container when it is a weight or
/// container puzzle. Once the item has moved the result is `Ok`; a rejected
/// re-attempt comes back as [`AttemptOutcome::Rejected`].
pub fn perform_take(
    state: &mut GameState,
    services: &mut dyn Services,
    action: &mut Action,
    item: &PrefabId,
    from: &ItemContainer,
) -> Result<Option<AttemptOutcome>, ActionError> {
    super::begin(state, action, "take")?;
    let taker = action.player;
    let room = state.require_player(taker)?.location;

    let items = state.room_items_mut();
    let index = items
        .iter()
        .position(|i| &i.prefab == item && i.room == room && &i.container == from && i.quantity > 0)
        .ok_or_else(|| not_found(item, "take"))?;
    items[index].quantity -= 1;
    if items[index].quantity == 0 {
        items.remove(index);
    }

    let taken = fresh_item(state, item);
    state.require_player_mut(taker)?.give_item(taken);

    let from_name = container_name(state, from);
    services.narrate(
        action,
        Narration::ItemTaken {
            item: item.clone(),
            from: from_name.clone(),
        },
    );
    services.log(LogEntry::for_action(LogKind::Take, action, format!("{item} from {from_name}")));

    reevaluate(state, services, action, from, "take")
}

/// Drop one carried `item` into `into` in the player's room.
///
/// Returns the outcome of re-attempting the container when it is a weight or
/// container puzzle, as for [`perform_take`].
pub fn perform_drop(
    state: &mut GameState,
    services: &mut dyn Services,
    action: &mut Action,
    item: &PrefabId,
    into: &ItemContainer,
) -> Result<Option<AttemptOutcome>, ActionError> {
    super::begin(state, action, "drop")?;
    let dropper = action.player;

    let player = state.require_player_mut(dropper)?;
    let room = player.location;
    player.take_item(item).ok_or_else(|| not_found(item, "drop"))?;

    let items = state.room_items_mut();
    match items
        .iter_mut()
        .find(|i| &i.prefab == item && i.room == room && &i.container == into)
    {
        Some(existing) => existing.quantity += 1,
        None => items.push(RoomItem {
            prefab: item.clone(),
            room,
            container: into.clone(),
            quantity: 1,
        }),
    }

    let into_name = container_name(state, into);
    services.narrate(
        action,
        Narration::ItemDropped {
            item: item.clone(),
            into: into_name.clone(),
        },
    );
    services.log(LogEntry::for_action(LogKind::Drop, action, format!("{item} into {into_name}")));

    reevaluate(state, services, action, into, "drop")
}

fn reevaluate(
    state: &mut GameState,
    services: &mut dyn Services,
    action: &Action,
    container: &ItemContainer,
    command: &str,
) -> Result<Option<AttemptOutcome>, ActionError> {
    let ItemContainer::Puzzle(puzzle) = container else {
        return Ok(None);
    };
    let password = match state.require_puzzle(*puzzle)?.puzzle_type {
        PuzzleType::Weight => state.weight_in_puzzle(*puzzle).to_string(),
        PuzzleType::Container => state
            .prefabs_in_puzzle(*puzzle)
            .iter()
            .map(PrefabId::as_str)
            .collect::<Vec<_>>()
            .join("+"),
        _ => return Ok(None),
    };

    let attempt = Action::new(ActionType::Attempt, action.player, action.location, action.forced);
    let request = AttemptRequest::new(*puzzle, command).with_password(password);
    let outcome = PuzzleResolver::attempt(state, services, &attempt, &request).unwrap_or_else(|err| {
        warn!(%puzzle, %err, command, "re-attempt after item move rejected");
        AttemptOutcome::Rejected(err)
    });
    Ok(Some(outcome))
}

fn fresh_item(state: &GameState, prefab: &PrefabId) -> InventoryItem {
    let mut item = InventoryItem::new(prefab.clone());
    item.uses = state.prefab(prefab).and_then(|p| p.uses);
    item
}

fn container_name(state: &GameState, container: &ItemContainer) -> String {
    match container {
        ItemContainer::Floor => "floor".to_string(),
        ItemContainer::Fixture(name) => name.clone(),
        ItemContainer::Puzzle(id) => state
            .puzzle(*id)
            .map_or_else(|| id.to_string(), |p| p.display_name().to_string()),
    }
}

fn not_found(item: &PrefabId, command: &str) -> ActionError {
    ActionError::NotFound {
        input: item.to_string(),
        command: command.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::{GameRng, GameSettings, Player, Prefab, PuzzleId, Recipe, RoomId, StatusId};
    use crate::ports::Transcript;
    use crate::puzzle::Puzzle;
    use crate::status::Status;

    const ROOM: RoomId = RoomId::new(0);
    const KYRA: PlayerId = PlayerId::new(1);
    const ASH: PlayerId = PlayerId::new(2);
    const SCALE: PuzzleId = PuzzleId::new(6);

    fn id(s: &str) -> PrefabId {
        PrefabId::new(s)
    }

    fn state() -> GameState {
        let mut state = GameState::new(GameSettings::default(), GameRng::new(6));
        state.add_player(
            Player::new(KYRA, "Kyra", ROOM)
                .with_item(InventoryItem::new("PILL").with_uses(1))
                .with_item(InventoryItem::new("ROCK")),
        );
        state.add_player(Player::new(ASH, "Ash", ROOM));
        state.add_status(Status::new("sick").with_duration(Duration::from_secs(60)));
        state.add_status(Status::new("drowsy"));
        state.add_prefab(Prefab::new("PILL", "PILL").usable(&["drowsy"], &["sick"]).with_uses(1));
        state.add_prefab(Prefab::new("ROCK", "ROCK").with_weight(3));
        state.add_prefab(Prefab::new("STICK", "STICK").with_weight(1));
        state.add_prefab(Prefab::new("TORCH", "TORCH").usable(&[], &[]).with_uses(5));
        state.add_recipe(Recipe::new("STICK", "ROCK", &["TORCH"]));
        state.add_puzzle(Puzzle::new(SCALE, "SCALE", ROOM, PuzzleType::Weight).with_solutions(&["4"]));
        state
    }

    fn action(action_type: ActionType, player: PlayerId) -> Action {
        Action::new(action_type, player, ROOM, false)
    }

    #[test]
    fn test_use_applies_effects_and_cures() {
        let mut state = state();
        let mut t = Transcript::new();
        let sicken = Action::new(ActionType::Inflict, ASH, ROOM, true);
        StatusLifecycle::inflict(&mut state, &mut t, &sicken, ASH, &"sick".into(), InflictOptions::default())
            .unwrap();
        t.clear();

        let mut use_pill = action(ActionType::Use, KYRA);
        perform_use(&mut state, &mut t, &mut use_pill, &id("PILL"), Some(ASH)).unwrap();

        let ash = state.player(ASH).unwrap();
        assert!(ash.has_status(&StatusId::new("drowsy")));
        assert!(!ash.has_status(&StatusId::new("sick")));
        assert!(state.timers.is_empty());
        assert_eq!(state.player(KYRA).unwrap().find_item(&id("PILL")).unwrap().uses, Some(0));
        assert_eq!(t.log_kinds(), vec![LogKind::Use, LogKind::Inflict, LogKind::Cure]);

        let mut again = action(ActionType::Use, KYRA);
        assert_eq!(
            perform_use(&mut state, &mut t, &mut again, &id("PILL"), Some(ASH)),
            Err(ActionError::ItemUnusable("That item has no uses left.".into()))
        );
    }

    #[test]
    fn test_use_rejections() {
        let mut state = state();
        let mut t = Transcript::new();

        let mut rock = action(ActionType::Use, KYRA);
        assert!(matches!(
            perform_use(&mut state, &mut t, &mut rock, &id("ROCK"), None),
            Err(ActionError::ItemUnusable(_))
        ));

        let mut missing = action(ActionType::Use, ASH);
        assert!(matches!(
            perform_use(&mut state, &mut t, &mut missing, &id("PILL"), None),
            Err(ActionError::NotFound { .. })
        ));

        // Nothing to cure and already drowsy.
        let drowsy = Action::new(ActionType::Inflict, KYRA, ROOM, true);
        StatusLifecycle::inflict(&mut state, &mut t, &drowsy, KYRA, &"drowsy".into(), InflictOptions::default())
            .unwrap();
        let mut useless = action(ActionType::Use, KYRA);
        assert_eq!(
            perform_use(&mut state, &mut t, &mut useless, &id("PILL"), None),
            Err(ActionError::ItemUnusable("You attempt to use the PILL, but it has no effect.".into()))
        );
    }

    #[test]
    fn test_craft() {
        let mut state = state();
        state.player_mut(KYRA).unwrap().give_item(InventoryItem::new("STICK"));
        let mut t = Transcript::new();

        let mut craft = action(ActionType::Craft, KYRA);
        let products = perform_craft(&mut state, &mut t, &mut craft, &id("STICK"), &id("ROCK")).unwrap();
        assert_eq!(products, vec![id("TORCH")]);

        let kyra = state.player(KYRA).unwrap();
        assert_eq!(kyra.count_item(&id("STICK")), 0);
        assert_eq!(kyra.count_item(&id("ROCK")), 0);
        assert_eq!(kyra.find_item(&id("TORCH")).unwrap().uses, Some(5));
        assert_eq!(t.log_kinds(), vec![LogKind::Craft]);

        let mut again = action(ActionType::Craft, KYRA);
        assert!(matches!(
            perform_craft(&mut state, &mut t, &mut again, &id("STICK"), &id("ROCK")),
            Err(ActionError::NotFound { .. })
        ));
    }

    #[test]
    fn test_craft_without_recipe() {
        let mut state = state();
        state.player_mut(KYRA).unwrap().give_item(InventoryItem::new("ROCK"));
        let mut t = Transcript::new();
        let mut craft = action(ActionType::Craft, KYRA);
        assert!(matches!(
            perform_craft(&mut state, &mut t, &mut craft, &id("ROCK"), &id("ROCK")),
            Err(ActionError::ItemUnusable(_))
        ));
        assert_eq!(state.player(KYRA).unwrap().count_item(&id("ROCK")), 2);
    }

    #[test]
    fn test_drop_and_take_reweigh_scale() {
        let mut state = state();
        state.add_room_item(RoomItem {
            prefab: id("STICK"),
            room: ROOM,
            container: ItemContainer::Puzzle(SCALE),
            quantity: 1,
        });
        let scale = ItemContainer::Puzzle(SCALE);
        let mut t = Transcript::new();

        let mut drop = action(ActionType::Drop, KYRA);
        let outcome = perform_drop(&mut state, &mut t, &mut drop, &id("ROCK"), &scale).unwrap();
        assert_eq!(outcome, Some(AttemptOutcome::Solved("4".into())));
        assert!(state.puzzle(SCALE).unwrap().solved);
        assert_eq!(state.weight_in_puzzle(SCALE), 4);

        let mut take = action(ActionType::Take, KYRA);
        let outcome = perform_take(&mut state, &mut t, &mut take, &id("ROCK"), &scale).unwrap();
        assert_eq!(outcome, Some(AttemptOutcome::Unsolved));
        assert!(!state.puzzle(SCALE).unwrap().solved);
        assert_eq!(state.player(KYRA).unwrap().count_item(&id("ROCK")), 1);
    }

    #[test]
    fn test_drop_stands_when_reattempt_rejected() {
        let mut state = state();
        state.puzzle_mut(SCALE).unwrap().requires_mod = true;
        let scale = ItemContainer::Puzzle(SCALE);
        let mut t = Transcript::new();

        let mut drop = action(ActionType::Drop, KYRA);
        let outcome = perform_drop(&mut state, &mut t, &mut drop, &id("ROCK"), &scale).unwrap();
        assert_eq!(outcome, Some(AttemptOutcome::Rejected(ActionError::ModeratorRequired)));
        assert_eq!(state.player(KYRA).unwrap().count_item(&id("ROCK")), 0);
        assert_eq!(state.weight_in_puzzle(SCALE), 3);
        assert!(!state.puzzle(SCALE).unwrap().solved);
        assert_eq!(t.log_kinds(), vec![LogKind::Drop]);
    }

    #[test]
    fn test_floor_items() {
        let mut state = state();
        let mut t = Transcript::new();

        let mut drop = action(ActionType::Drop, KYRA);
        assert_eq!(
            perform_drop(&mut state, &mut t, &mut drop, &id("ROCK"), &ItemContainer::Floor),
            Ok(None)
        );
        assert_eq!(state.room_items().len(), 1);

        let mut take = action(ActionType::Take, ASH);
        assert_eq!(
            perform_take(&mut state, &mut t, &mut take, &id("ROCK"), &ItemContainer::Floor),
            Ok(None)
        );
        assert!(state.room_items().is_empty());
        assert_eq!(state.player(ASH).unwrap().count_item(&id("ROCK")), 1);

        let mut take = action(ActionType::Take, ASH);
        assert!(matches!(
            perform_take(&mut state, &mut t, &mut take, &id("ROCK"), &ItemContainer::Floor),
            Err(ActionError::NotFound { .. })
        ));
        assert_eq!(t.log_kinds(), vec![LogKind::Drop, LogKind::Take]);
    }
}
