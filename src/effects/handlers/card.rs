//! Card family: pile movement, generation, per-instance overlays and
//! player selections.
//!
//! A card being played sits in `CombatState::in_play`, outside every pile.
//! Effects that move it (discard, exhaust, banish, put on deck) set its
//! route instead, and [`settle_played_card`] honours the route once the
//! card's effects finish.
//!
//! Cards entering a full hand go to the discard pile instead.

use tracing::debug;

use crate::cards::{CardCost, CardId, CardInstance, CardTheme, CardUid};
use crate::core::{CombatDraft, CombatState, EntityId, InPlay, PendingSelection, PlayRoute, SelectionKind};
use crate::effects::{CardFilter, CardFlag, CardTarget, EffectContext, EffectExecutor, Value, VisualEvent};
use crate::zones::{Pile, PilePosition};

// === Helpers ===

/// Put a card into a pile, diverting to the discard pile if the hand is full.
///
/// Returns the pile the card actually landed in.
fn deliver(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    card: CardInstance,
    pile: Pile,
    position: PilePosition,
) -> Pile {
    let pile = if pile == Pile::Hand && draft.combat.piles.hand.len() >= exec.config().hand_limit {
        Pile::DiscardPile
    } else {
        pile
    };
    draft.combat.piles.put(pile, card, position, draft.rng);
    pile
}

/// Deliver a card and announce it.
fn deliver_new(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    card: CardInstance,
    pile: Pile,
    position: PilePosition,
) {
    let uid = card.uid;
    let card_id = card.definition_id.clone();
    let pile = deliver(exec, draft, card, pile, position);
    draft.combat.emit(VisualEvent::AddCard {
        card: uid,
        card_id,
        pile,
    });
}

fn in_play_mut(combat: &mut CombatState, uid: CardUid) -> Option<&mut InPlay> {
    combat.in_play.iter_mut().rev().find(|p| p.card.uid == uid)
}

/// Mutable access to a card in play or in any pile.
fn card_mut(combat: &mut CombatState, uid: CardUid) -> Option<&mut CardInstance> {
    if let Some(entry) = combat.in_play.iter_mut().rev().find(|p| p.card.uid == uid) {
        return Some(&mut entry.card);
    }
    combat.piles.find_mut(uid)
}

/// Move a card (in play or in a pile) to another pile.
fn relocate(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    uid: CardUid,
    to: Pile,
    position: PilePosition,
) -> Option<Pile> {
    let card = match in_play_mut(draft.combat, uid) {
        Some(entry) => {
            entry.route = Some(PlayRoute::Elsewhere);
            entry.card.clone()
        }
        None => draft.combat.piles.take(uid)?.1,
    };
    Some(deliver(exec, draft, card, to, position))
}

/// Send a card to the discard or exhaust pile, or route it there if it is
/// in play.
fn retire(draft: &mut CombatDraft<'_>, uid: CardUid, route: PlayRoute) -> bool {
    if let Some(entry) = in_play_mut(draft.combat, uid) {
        entry.route = Some(route);
        return true;
    }
    let pile = match route {
        PlayRoute::Discard => Pile::DiscardPile,
        PlayRoute::Exhaust => Pile::ExhaustPile,
        PlayRoute::Banished => return draft.combat.piles.take(uid).is_some(),
        PlayRoute::Elsewhere => return false,
    };
    if draft.combat.piles.contains(pile, uid) {
        return false;
    }
    draft
        .combat
        .piles
        .move_card(uid, pile, PilePosition::Bottom, draft.rng)
        .is_some()
}

fn discard_card(draft: &mut CombatDraft<'_>, uid: CardUid) {
    if retire(draft, uid, PlayRoute::Discard) {
        draft.combat.emit(VisualEvent::Discard { card: uid });
    }
}

fn exhaust_card(draft: &mut CombatDraft<'_>, uid: CardUid) {
    if retire(draft, uid, PlayRoute::Exhaust) {
        draft.combat.emit(VisualEvent::Exhaust { card: uid });
    }
}

fn banish_card(draft: &mut CombatDraft<'_>, uid: CardUid) {
    if retire(draft, uid, PlayRoute::Banished) {
        draft.combat.emit(VisualEvent::Banish { card: uid });
    }
}

/// Suspend for a player choice. Returns false if there is nothing to choose
/// from or another choice is already pending.
fn request(draft: &mut CombatDraft<'_>, kind: SelectionKind, candidates: Vec<CardInstance>, min: usize, max: usize) -> bool {
    if candidates.is_empty() {
        return false;
    }
    if draft.combat.pending_selection.is_some() {
        debug!(?kind, "selection already pending, skipping");
        return false;
    }
    let selection = PendingSelection::new(kind, candidates, min, max);
    let count = selection.max;
    draft.combat.pending_selection = Some(selection);
    draft.combat.emit(VisualEvent::SelectionRequested { kind, count });
    true
}

/// A new instance of a registered card.
fn generate(draft: &mut CombatDraft<'_>, card_id: CardId, upgraded: bool) -> CardInstance {
    let mut card = CardInstance::new(draft.combat.alloc_card_uid(), card_id);
    card.upgraded = upgraded;
    card
}

/// Move the card that just finished resolving to its final pile.
///
/// Without an explicit route, cards with the exhaust keyword exhaust and
/// everything else is discarded.
pub(crate) fn settle_played_card(exec: &EffectExecutor<'_>, draft: &mut CombatDraft<'_>, played: InPlay) {
    let route = played.route.unwrap_or_else(|| {
        let exhausts = exec
            .content()
            .cards
            .get(&played.card.definition_id)
            .is_some_and(|def| def.exhausts_on_play());
        if exhausts {
            PlayRoute::Exhaust
        } else {
            PlayRoute::Discard
        }
    });
    let uid = played.card.uid;
    match route {
        PlayRoute::Discard => draft.combat.piles.discard_pile.push_back(played.card),
        PlayRoute::Exhaust => {
            draft.combat.piles.exhaust_pile.push_back(played.card);
            draft.combat.emit(VisualEvent::Exhaust { card: uid });
        }
        PlayRoute::Banished | PlayRoute::Elsewhere => {}
    }
}

/// Apply a resolved player selection.
///
/// `chosen` has already been validated against the candidates.
pub(crate) fn resolve_selection(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    selection: PendingSelection,
    chosen: &[CardUid],
) {
    let picked = selection
        .candidates
        .into_iter()
        .filter(|c| chosen.contains(&c.uid));
    for card in picked {
        match selection.kind {
            SelectionKind::Banish => banish_card(draft, card.uid),
            SelectionKind::Discard => discard_card(draft, card.uid),
            SelectionKind::Scry => {
                if draft
                    .combat
                    .piles
                    .move_card(card.uid, Pile::DiscardPile, PilePosition::Bottom, draft.rng)
                    .is_some()
                {
                    draft.combat.emit(VisualEvent::Discard { card: card.uid });
                }
            }
            SelectionKind::Discover { destination } => {
                deliver_new(exec, draft, card, destination, PilePosition::Bottom);
            }
            SelectionKind::Tutor { destination } => {
                let card_id = card.definition_id.clone();
                if let Some(pile) = relocate(exec, draft, card.uid, destination, PilePosition::Bottom) {
                    draft.combat.emit(VisualEvent::AddCard {
                        card: card.uid,
                        card_id,
                        pile,
                    });
                }
            }
        }
    }
}

// === Handlers ===

/// Draw up to `count` cards, reshuffling the discard pile into an empty draw
/// pile. Stops early at the hand limit or when both piles are empty.
pub(crate) fn draw(exec: &EffectExecutor<'_>, draft: &mut CombatDraft<'_>, count: usize) -> usize {
    let mut drawn = 0;
    for _ in 0..count {
        if draft.combat.piles.hand.len() >= exec.config().hand_limit {
            break;
        }
        if draft.combat.piles.draw_pile.is_empty() {
            let moved = draft.combat.piles.reshuffle_discard(draft.rng);
            if moved == 0 {
                break;
            }
            draft.combat.emit(VisualEvent::Shuffle { count: moved });
        }
        let Some(card) = draft.combat.piles.pop_draw() else {
            break;
        };
        draft.combat.piles.hand.push_back(card);
        drawn += 1;
    }
    if drawn > 0 {
        draft.combat.emit(VisualEvent::Draw { count: drawn });
    }
    drawn
}

pub(crate) fn discard(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
    target: &CardTarget,
    player_choice: bool,
) {
    let count = exec.count(draft, amount, ctx);
    if count == 0 {
        return;
    }
    if player_choice {
        let hand: Vec<CardInstance> = draft.combat.piles.hand.iter().cloned().collect();
        request(draft, SelectionKind::Discard, hand, count, count);
        return;
    }
    for card in exec.cards(draft, target, Some(count), ctx) {
        discard_card(draft, card.uid);
    }
}

pub(crate) fn exhaust(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
    target: &CardTarget,
) {
    let count = exec.count(draft, amount, ctx);
    if count == 0 {
        return;
    }
    for card in exec.cards(draft, target, Some(count), ctx) {
        exhaust_card(draft, card.uid);
    }
}

pub(crate) fn banish(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
    target: &CardTarget,
    player_choice: bool,
) {
    let count = exec.count(draft, amount, ctx);
    if count == 0 {
        return;
    }
    if player_choice {
        let pool = exec.cards(draft, target, None, ctx);
        request(draft, SelectionKind::Banish, pool, count, count);
        return;
    }
    for card in exec.cards(draft, target, Some(count), ctx) {
        banish_card(draft, card.uid);
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn add_card(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    card_id: &CardId,
    destination: Pile,
    count: &Value,
    upgraded: bool,
    position: PilePosition,
) {
    if !exec.content().cards.contains(card_id) {
        debug!(card = %card_id, "unknown card, skipping");
        return;
    }
    for _ in 0..exec.count(draft, count, ctx) {
        let card = generate(draft, card_id.clone(), upgraded);
        deliver_new(exec, draft, card, destination, position);
    }
}

pub(crate) fn shuffle(draft: &mut CombatDraft<'_>, include_discard: bool) {
    if include_discard {
        draft.combat.piles.reshuffle_discard(draft.rng);
    } else {
        draft.combat.piles.shuffle(Pile::DrawPile, draft.rng);
    }
    let count = draft.combat.piles.len(Pile::DrawPile);
    if count > 0 {
        draft.combat.emit(VisualEvent::Shuffle { count });
    }
}

pub(crate) fn retain(exec: &EffectExecutor<'_>, draft: &mut CombatDraft<'_>, ctx: &EffectContext, target: &CardTarget) {
    for card in exec.cards(draft, target, None, ctx) {
        let Some(instance) = card_mut(draft.combat, card.uid) else {
            continue;
        };
        if !instance.retained {
            instance.retained = true;
            draft.combat.emit(VisualEvent::Retain { card: card.uid });
        }
    }
}

pub(crate) fn copy_card(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    target: &CardTarget,
    destination: Pile,
    count: &Value,
) {
    let copies = exec.count(draft, count, ctx);
    for original in exec.cards(draft, target, None, ctx) {
        for _ in 0..copies {
            let uid = draft.combat.alloc_card_uid();
            deliver_new(exec, draft, original.copy_with_uid(uid), destination, PilePosition::Bottom);
        }
    }
}

pub(crate) fn put_on_deck(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    target: &CardTarget,
    position: PilePosition,
) {
    for card in exec.cards(draft, target, None, ctx) {
        if relocate(exec, draft, card.uid, Pile::DrawPile, position).is_some() {
            draft.combat.emit(VisualEvent::PutOnDeck { card: card.uid });
        }
    }
}

pub(crate) fn modify_cost(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    amount: &Value,
    target: &CardTarget,
) {
    let delta = exec.value(draft, amount, ctx);
    if delta == 0 {
        return;
    }
    for card in exec.cards(draft, target, None, ctx) {
        let Some(instance) = card_mut(draft.combat, card.uid) else {
            continue;
        };
        instance.cost_modifier += delta;
        draft.combat.emit(VisualEvent::CostChange { card: card.uid, delta });
    }
}

pub(crate) fn replay_card(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    target: &CardTarget,
    times: &Value,
) {
    let times = exec.count(draft, times, ctx);
    for card in exec.cards(draft, target, None, ctx) {
        let Some(def) = exec.content().cards.get(&card.definition_id) else {
            debug!(card = %card.definition_id, "unknown card, skipping replay");
            continue;
        };
        for _ in 0..times {
            draft.combat.emit(VisualEvent::Replay { card: card.uid });
            exec.execute_all(draft, def.effects_for(card.upgraded), &ctx.for_replay(card.uid));
        }
    }
}

/// Play cards off the top of the draw pile at a random enemy, without paying
/// energy or counting as played.
pub(crate) fn play_top_card(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    count: &Value,
) {
    for _ in 0..exec.count(draft, count, ctx) {
        if draft.combat.piles.draw_pile.is_empty() && draft.combat.piles.reshuffle_discard(draft.rng) == 0 {
            break;
        }
        let Some(card) = draft.combat.piles.pop_draw() else {
            break;
        };
        let uid = card.uid;
        let def = exec
            .content()
            .cards
            .get(&card.definition_id)
            .filter(|def| !card.is_unplayable(def));
        let Some(def) = def else {
            draft.combat.piles.discard_pile.push_back(card);
            draft.combat.emit(VisualEvent::Discard { card: uid });
            continue;
        };

        let enemies = draft.combat.living_enemy_ids();
        let target: Option<EntityId> = draft.rng.choose(&enemies).copied();
        let effects = def.effects_for(card.upgraded);
        draft.combat.emit(VisualEvent::Replay { card: uid });
        draft.combat.in_play.push(InPlay { card, route: None });
        exec.execute_all(draft, effects, &ctx.for_replay(uid).with_target(target));

        if let Some(index) = draft.combat.in_play.iter().rposition(|p| p.card.uid == uid) {
            let played = draft.combat.in_play.remove(index);
            settle_played_card(exec, draft, played);
        }
    }
}

pub(crate) fn discover(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    theme: Option<CardTheme>,
    choices: Option<usize>,
    destination: Pile,
    upgraded: bool,
) {
    let pool = exec.content().cards.generatable(theme);
    let offered = choices.unwrap_or(exec.config().discover_choices);
    let picks = draft.rng.sample(&pool, offered);
    let mut candidates: Vec<CardInstance> = picks
        .into_iter()
        .map(|id| generate(draft, id, upgraded))
        .collect();

    if candidates.len() == 1 {
        if let Some(card) = candidates.pop() {
            deliver_new(exec, draft, card, destination, PilePosition::Bottom);
        }
        return;
    }
    request(draft, SelectionKind::Discover { destination }, candidates, 1, 1);
}

pub(crate) fn scry(exec: &EffectExecutor<'_>, draft: &mut CombatDraft<'_>, ctx: &EffectContext, amount: &Value) {
    let count = exec.count(draft, amount, ctx);
    let top: Vec<CardInstance> = draft.combat.piles.draw_pile.iter().take(count).cloned().collect();
    let seen = top.len();
    request(draft, SelectionKind::Scry, top, 0, seen);
}

pub(crate) fn tutor(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    filter: Option<&CardFilter>,
    destination: Pile,
    player_choice: bool,
) {
    let target = match filter {
        Some(filter) => CardTarget::Filtered(Box::new(filter.clone())),
        None => CardTarget::DrawPile,
    };
    let candidates = exec.cards(draft, &target, None, ctx);

    if player_choice && candidates.len() > 1 {
        request(draft, SelectionKind::Tutor { destination }, candidates, 1, 1);
        return;
    }
    let Some(card) = candidates.into_iter().next() else {
        return;
    };
    if let Some(pile) = relocate(exec, draft, card.uid, destination, PilePosition::Bottom) {
        draft.combat.emit(VisualEvent::AddCard {
            card: card.uid,
            card_id: card.definition_id,
            pile,
        });
    }
}

pub(crate) fn upgrade(exec: &EffectExecutor<'_>, draft: &mut CombatDraft<'_>, ctx: &EffectContext, target: &CardTarget) {
    for card in exec.cards(draft, target, None, ctx) {
        let Some(instance) = card_mut(draft.combat, card.uid) else {
            continue;
        };
        if !instance.upgraded {
            instance.upgraded = true;
            draft.combat.emit(VisualEvent::Upgrade { card: card.uid });
        }
    }
}

pub(crate) fn transform(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    target: &CardTarget,
    theme: Option<CardTheme>,
) {
    let pool = exec.content().cards.generatable(theme);
    for card in exec.cards(draft, target, None, ctx) {
        let options: Vec<&CardId> = pool.iter().filter(|id| **id != card.definition_id).collect();
        let Some(&into) = draft.rng.choose(&options) else {
            continue;
        };
        let Some(instance) = card_mut(draft.combat, card.uid) else {
            continue;
        };
        instance.definition_id = into.clone();
        instance.upgraded = false;
        instance.cost_modifier = 0;
        draft.combat.emit(VisualEvent::Transform {
            card: card.uid,
            into: into.clone(),
        });
    }
}

pub(crate) fn mill(exec: &EffectExecutor<'_>, draft: &mut CombatDraft<'_>, ctx: &EffectContext, amount: &Value) {
    for _ in 0..exec.count(draft, amount, ctx) {
        let Some(card) = draft.combat.piles.pop_draw() else {
            break;
        };
        let uid = card.uid;
        draft.combat.piles.discard_pile.push_back(card);
        draft.combat.emit(VisualEvent::Mill { card: uid });
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn create_random_card(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    theme: Option<CardTheme>,
    destination: Pile,
    count: &Value,
    free: bool,
    upgraded: bool,
) {
    let pool = exec.content().cards.generatable(theme);
    for _ in 0..exec.count(draft, count, ctx) {
        let Some(id) = draft.rng.choose(&pool).cloned() else {
            return;
        };
        let mut card = generate(draft, id, upgraded);
        if free {
            if let Some(CardCost::Fixed(cost)) = exec
                .content()
                .cards
                .get(&card.definition_id)
                .map(|def| def.cost_for(upgraded))
            {
                card.cost_modifier = -cost;
            }
        }
        deliver_new(exec, draft, card, destination, PilePosition::Bottom);
    }
}

pub(crate) fn set_card_flag(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    target: &CardTarget,
    flag: CardFlag,
    value: bool,
) {
    for card in exec.cards(draft, target, None, ctx) {
        let Some(instance) = card_mut(draft.combat, card.uid) else {
            continue;
        };
        let slot = match flag {
            CardFlag::Innate => &mut instance.innate,
            CardFlag::Ethereal => &mut instance.ethereal,
            CardFlag::Unplayable => &mut instance.unplayable,
            CardFlag::Retained => &mut instance.retained,
        };
        *slot = value;
        draft.combat.emit(VisualEvent::CardFlag {
            card: card.uid,
            flag: flag.name().to_string(),
            value,
        });
    }
}

/// Status cards shuffled into the draw pile land at random positions.
pub(crate) fn add_status_card(
    exec: &EffectExecutor<'_>,
    draft: &mut CombatDraft<'_>,
    ctx: &EffectContext,
    card_id: &CardId,
    destination: Pile,
    count: &Value,
) {
    let position = if destination == Pile::DrawPile {
        PilePosition::Random
    } else {
        PilePosition::Bottom
    };
    add_card(exec, draft, ctx, card_id, destination, count, false, position);
}
