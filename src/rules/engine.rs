//! Combat engine: the turn lifecycle around the effect executor.
//!
//! `CombatEngine` owns the content and rules configuration and drives a
//! `RunState` through one combat:
//! - `start_combat`: spawn enemies, build the draw pile, fire combat start
//! - `play_card` / `use_hero_ability` / `resolve_selection`: player actions
//! - `end_turn`: player turn end, every enemy acts, next player turn
//!
//! ## Rejection
//!
//! Every action returns `Err(ActionError)` when the rules forbid it. A
//! rejected action never touches the state, so callers may ignore the
//! error and treat it as a no-op.
//!
//! ## Phases
//!
//! `PlayerTurn -> EnemyTurn -> (PlayerTurn | Victory | Defeat)`. Victory and
//! defeat are terminal: every later action is rejected with `WrongPhase`.

use tracing::debug;

use crate::cards::{CardCost, CardInstance, CardUid};
use crate::content::{Content, HeroTemplate};
use crate::core::{
    CombatConfig, CombatDraft, CombatPhase, CombatState, Entity, EntityId, InPlay, PlayerResources, RunState,
};
use crate::effects::handlers::card;
use crate::effects::{EffectContext, EffectExecutor, VisualEvent};
use crate::error::{ActionError, ContentError};
use crate::powers::{decay_powers, tick_silence, DecayOn};
use crate::triggers::PowerEvent;
use crate::zones::{Pile, PilePosition};

/// Energy for a run whose hero is not in the content.
const FALLBACK_MAX_ENERGY: i32 = 3;

fn log_rejection(err: &ActionError) {
    debug!(%err, "action rejected");
}

/// Either side has been wiped out.
fn decided(combat: &CombatState) -> bool {
    !combat.player.is_alive() || combat.living_enemies().next().is_none()
}

/// Drives combats for one content bundle.
///
/// ```
/// use deckrun::content::starter;
/// use deckrun::rules::CombatEngine;
///
/// let engine = CombatEngine::new(starter::content().unwrap());
/// let mut run = engine.new_run(starter::KNIGHT, 42).unwrap();
/// engine.start_combat(&mut run, &[starter::SLIME]).unwrap();
///
/// let combat = run.combat.as_ref().unwrap();
/// assert_eq!(combat.piles.hand.len(), 5);
/// assert_eq!(combat.resources.energy, 3);
/// ```
#[derive(Clone, Debug)]
pub struct CombatEngine {
    content: Content,
    config: CombatConfig,
}

impl CombatEngine {
    #[must_use]
    pub fn new(content: Content) -> Self {
        Self {
            content,
            config: CombatConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: CombatConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    #[must_use]
    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// An executor over this engine's content, for running effects
    /// directly against a run.
    #[must_use]
    pub fn executor(&self) -> EffectExecutor<'_> {
        EffectExecutor::new(&self.content, &self.config)
    }

    fn hero(&self, run: &RunState) -> Option<&HeroTemplate> {
        self.content.hero(&run.hero)
    }

    /// Start a run with a hero's deck and relics.
    pub fn new_run(&self, hero: &str, seed: u64) -> Result<RunState, ContentError> {
        let template = self
            .content
            .hero(hero)
            .ok_or_else(|| ContentError::UnknownHero(hero.to_string()))?;
        Ok(template.new_run(seed))
    }

    /// Begin a combat against the given enemy templates.
    ///
    /// Any combat already in progress is discarded. The draw pile is a
    /// shuffled copy of the master deck with innate cards on top.
    pub fn start_combat(&self, run: &mut RunState, enemies: &[&str]) -> Result<(), ContentError> {
        let templates = enemies
            .iter()
            .map(|id| {
                self.content
                    .enemy(id)
                    .ok_or_else(|| ContentError::UnknownEnemy((*id).to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let hero = self.hero(run);
        let resources = PlayerResources {
            max_energy: hero.map_or(FALLBACK_MAX_ENERGY, |h| h.max_energy),
            ability_charge_required: hero
                .and_then(|h| h.ability.as_ref())
                .map_or(0, |a| a.charge_required),
            ..PlayerResources::default()
        };
        let name = hero.map_or_else(|| run.hero.clone(), |h| h.name.clone());
        let player = Entity::player(name, run.player_health, run.player_max_health);

        let mut combat = CombatState::new(player, resources, run.next_card_uid());
        for template in templates {
            let id = combat.alloc_enemy_id();
            combat.enemies.push(template.spawn(id, &self.content.powers));
        }

        let mut deck: Vec<CardInstance> = run.deck.clone();
        run.rng.shuffle(&mut deck);
        let (innate, rest): (Vec<_>, Vec<_>) = deck.into_iter().partition(|card| {
            self.content
                .card(&card.definition_id)
                .is_some_and(|def| card.is_innate(def))
        });
        combat.piles.draw_pile = innate.into_iter().chain(rest).collect();

        if run.combat.is_some() {
            debug!("replacing combat in progress");
        }
        debug!(?enemies, floor = run.floor, "combat start");
        run.combat = Some(combat);

        let exec = self.executor();
        if let Some(mut draft) = run.draft() {
            let ctx = EffectContext::new(EntityId::PLAYER);
            exec.fire(&mut draft, EntityId::PLAYER, PowerEvent::CombatStart, None, &ctx);
            if !decided(draft.combat) {
                self.begin_player_turn(&exec, &mut draft, true);
            }
        }
        self.settle(run);
        Ok(())
    }

    /// Leave the current combat, returning its final phase.
    ///
    /// Generated and exhausted cards go with it; the master deck is
    /// untouched.
    pub fn leave_combat(&self, run: &mut RunState) -> Option<CombatPhase> {
        let combat = run.combat.take()?;
        if !combat.phase.is_terminal() {
            run.player_health = combat.player.current_health;
            run.player_max_health = combat.player.max_health;
        }
        Some(combat.phase)
    }

    /// The terminal phase of the current combat, if it is over.
    #[must_use]
    pub fn outcome(&self, run: &RunState) -> Option<CombatPhase> {
        run.combat
            .as_ref()
            .map(|c| c.phase)
            .filter(|phase| phase.is_terminal())
    }

    /// Cards in hand that could be played right now.
    #[must_use]
    pub fn playable_cards(&self, run: &RunState) -> Vec<CardUid> {
        let Some(combat) = run.combat.as_ref() else {
            return Vec::new();
        };
        if Self::check_actionable(combat).is_err() {
            return Vec::new();
        }
        combat
            .piles
            .hand
            .iter()
            .filter(|card| {
                self.content.card(&card.definition_id).is_some_and(|def| {
                    !card.is_unplayable(def)
                        && card.effective_cost(def, combat.resources.energy) <= combat.resources.energy
                })
            })
            .map(|card| card.uid)
            .collect()
    }

    fn check_actionable(combat: &CombatState) -> Result<(), ActionError> {
        if combat.phase != CombatPhase::PlayerTurn {
            return Err(ActionError::WrongPhase(combat.phase));
        }
        if combat.locked {
            return Err(ActionError::Locked);
        }
        if combat.pending_selection.is_some() {
            return Err(ActionError::SelectionPending);
        }
        Ok(())
    }

    fn actionable(run: &RunState) -> Result<&CombatState, ActionError> {
        let combat = run.combat.as_ref().ok_or(ActionError::NotInCombat)?;
        Self::check_actionable(combat)?;
        Ok(combat)
    }

    /// Play a card from hand against an optional chosen target.
    pub fn play_card(&self, run: &mut RunState, uid: CardUid, target: Option<EntityId>) -> Result<(), ActionError> {
        self.play(run, uid, target).inspect_err(log_rejection)?;
        self.settle(run);
        Ok(())
    }

    fn play(&self, run: &mut RunState, uid: CardUid, target: Option<EntityId>) -> Result<(), ActionError> {
        let combat = Self::actionable(run)?;
        let card = combat
            .piles
            .hand
            .iter()
            .find(|c| c.uid == uid)
            .ok_or(ActionError::CardNotInHand(uid))?;
        let def = self
            .content
            .card(&card.definition_id)
            .ok_or_else(|| ActionError::UnknownCard(card.definition_id.clone()))?;
        if card.is_unplayable(def) {
            return Err(ActionError::Unplayable(uid));
        }

        let available = combat.resources.energy;
        let cost = card.effective_cost(def, available);
        if cost > available {
            return Err(ActionError::InsufficientEnergy {
                needed: cost,
                available,
            });
        }
        let x_cost = match def.cost_for(card.upgraded) {
            CardCost::X => cost,
            CardCost::Fixed(_) => 0,
        };
        let effects = def.effects_for(card.upgraded);

        let exec = self.executor();
        let mut draft = run.draft().ok_or(ActionError::NotInCombat)?;
        let card = draft
            .combat
            .piles
            .take_from(Pile::Hand, uid)
            .ok_or(ActionError::CardNotInHand(uid))?;
        debug!(card = %def.id, %uid, cost, "play card");

        if cost > 0 {
            let resources = &mut draft.combat.resources;
            resources.energy -= cost;
            let value = resources.energy;
            draft.combat.emit(VisualEvent::Energy { delta: -cost, value });
        }
        draft.combat.in_play.push(InPlay {
            card: card.clone(),
            route: None,
        });
        draft.combat.cards_played_this_turn += 1;
        draft.stats.cards_played += 1;

        let ctx = EffectContext::new(EntityId::PLAYER)
            .with_card(uid)
            .with_target(target)
            .with_x_cost(x_cost);
        exec.execute_all(&mut draft, effects, &ctx);
        exec.fire(&mut draft, EntityId::PLAYER, PowerEvent::CardPlayed, None, &ctx);
        if let Some(event) = PowerEvent::for_theme(def.theme) {
            exec.fire(&mut draft, EntityId::PLAYER, event, None, &ctx);
        }

        if let Some(pos) = draft.combat.in_play.iter().rposition(|p| p.card.uid == uid) {
            let played = draft.combat.in_play.remove(pos);
            card::settle_played_card(&exec, &mut draft, played);
        }
        draft.combat.last_played = Some(card);

        let resources = &mut draft.combat.resources;
        resources.ability_charge =
            (resources.ability_charge + self.config.charge_per_card).min(resources.ability_charge_required);
        Ok(())
    }

    /// Use the hero ability. Needs a full charge and is once per turn.
    pub fn use_hero_ability(&self, run: &mut RunState) -> Result<(), ActionError> {
        self.activate(run).inspect_err(log_rejection)?;
        self.settle(run);
        Ok(())
    }

    fn activate(&self, run: &mut RunState) -> Result<(), ActionError> {
        let combat = Self::actionable(run)?;
        let ability = self
            .hero(run)
            .and_then(|h| h.ability.as_ref())
            .ok_or(ActionError::AbilityNotReady)?;
        let resources = &combat.resources;
        if resources.ability_used_this_turn || resources.ability_charge < resources.ability_charge_required {
            return Err(ActionError::AbilityNotReady);
        }

        let exec = self.executor();
        let mut draft = run.draft().ok_or(ActionError::NotInCombat)?;
        debug!(ability = %ability.name, "hero ability");
        draft.combat.resources.ability_charge = 0;
        draft.combat.resources.ability_used_this_turn = true;
        draft.combat.emit(VisualEvent::HeroAbility);
        exec.execute_all(&mut draft, &ability.effects, &EffectContext::new(EntityId::PLAYER));
        Ok(())
    }

    /// Answer the pending card selection.
    ///
    /// The choice must respect the selection's bounds, name only
    /// candidates and contain no duplicates.
    pub fn resolve_selection(&self, run: &mut RunState, chosen: &[CardUid]) -> Result<(), ActionError> {
        self.answer(run, chosen).inspect_err(log_rejection)?;
        self.settle(run);
        Ok(())
    }

    fn answer(&self, run: &mut RunState, chosen: &[CardUid]) -> Result<(), ActionError> {
        let combat = run.combat.as_ref().ok_or(ActionError::NotInCombat)?;
        if combat.phase != CombatPhase::PlayerTurn {
            return Err(ActionError::WrongPhase(combat.phase));
        }
        if combat.locked {
            return Err(ActionError::Locked);
        }
        let pending = combat
            .pending_selection
            .as_ref()
            .ok_or(ActionError::NoPendingSelection)?;

        if chosen.len() < pending.min || chosen.len() > pending.max {
            return Err(ActionError::InvalidSelection(format!(
                "expected {} to {} cards, got {}",
                pending.min,
                pending.max,
                chosen.len()
            )));
        }
        if let Some(uid) = chosen.iter().find(|uid| !pending.is_candidate(**uid)) {
            return Err(ActionError::InvalidSelection(format!("card {uid} is not a candidate")));
        }
        let mut unique = chosen.to_vec();
        unique.sort_unstable();
        unique.dedup();
        if unique.len() != chosen.len() {
            return Err(ActionError::InvalidSelection("duplicate card".to_string()));
        }

        let exec = self.executor();
        let mut draft = run.draft().ok_or(ActionError::NotInCombat)?;
        let selection = draft
            .combat
            .pending_selection
            .take()
            .ok_or(ActionError::NoPendingSelection)?;
        debug!(kind = ?selection.kind, chosen = chosen.len(), "resolve selection");
        card::resolve_selection(&exec, &mut draft, selection, chosen);
        Ok(())
    }

    /// End the player turn, run the enemy turn and start the next player
    /// turn.
    pub fn end_turn(&self, run: &mut RunState) -> Result<(), ActionError> {
        Self::actionable(run).inspect_err(log_rejection)?;

        let exec = self.executor();
        if let Some(mut draft) = run.draft() {
            debug!(turn = draft.combat.turn, "end turn");
            self.end_player_turn(&exec, &mut draft);
            if !decided(draft.combat) {
                self.run_enemy_turn(&exec, &mut draft);
            }
            if !decided(draft.combat) {
                self.begin_player_turn(&exec, &mut draft, false);
            }
        }
        self.settle(run);
        Ok(())
    }

    fn end_player_turn(&self, exec: &EffectExecutor<'_>, draft: &mut CombatDraft<'_>) {
        let ctx = EffectContext::new(EntityId::PLAYER);
        exec.fire(draft, EntityId::PLAYER, PowerEvent::TurnEnd, None, &ctx);
        self.decay(draft, EntityId::PLAYER, DecayOn::TurnEnd);
        tick_silence(&mut draft.combat.player);

        let hand: Vec<CardInstance> = draft.combat.piles.hand.iter().cloned().collect();
        for card in hand {
            let def = self.content.card(&card.definition_id);
            if def.map_or(card.retained, |d| card.keeps_in_hand(d)) {
                if let Some(kept) = draft.combat.piles.find_mut(card.uid) {
                    kept.retained = false;
                }
                continue;
            }
            let (pile, event) = if def.is_some_and(|d| card.is_ethereal(d)) {
                (Pile::ExhaustPile, VisualEvent::Exhaust { card: card.uid })
            } else {
                (Pile::DiscardPile, VisualEvent::Discard { card: card.uid })
            };
            if draft
                .combat
                .piles
                .move_card(card.uid, pile, PilePosition::Bottom, draft.rng)
                .is_some()
            {
                draft.combat.emit(event);
            }
        }
    }

    fn run_enemy_turn(&self, exec: &EffectExecutor<'_>, draft: &mut CombatDraft<'_>) {
        draft.combat.phase = CombatPhase::EnemyTurn;
        for id in draft.combat.living_enemy_ids() {
            if decided(draft.combat) {
                break;
            }
            // Died earlier in the sequence.
            if !draft.combat.is_living_enemy(id) {
                continue;
            }
            self.enemy_act(exec, draft, id);
        }
        draft.combat.reap_dead();
    }

    fn enemy_act(&self, exec: &EffectExecutor<'_>, draft: &mut CombatDraft<'_>, id: EntityId) {
        if let Some(enemy) = draft.combat.entity_mut(id) {
            enemy.block = 0;
        }
        let ctx = EffectContext::new(id);
        exec.fire(draft, id, PowerEvent::TurnStart, None, &ctx);
        self.decay(draft, id, DecayOn::TurnStart);

        if !draft.combat.is_living_enemy(id) || !draft.combat.player.is_alive() {
            return;
        }
        let intent = draft.combat.entity(id).and_then(Entity::intent).cloned();
        if let Some(intent) = intent {
            debug!(enemy = %id, action = %intent.name, "enemy acts");
            draft.combat.emit(VisualEvent::Intent {
                enemy: id,
                name: intent.name.clone(),
            });
            let action = ctx
                .clone()
                .with_target(Some(EntityId::PLAYER))
                .with_damage_penalty(intent.weakened);
            exec.execute_all(draft, &intent.effects, &action);
            if let Some(state) = draft.combat.entity_mut(id).and_then(|e| e.enemy.as_mut()) {
                state.last_move = Some(intent.move_index);
                state.intent = None;
            }
        }

        if !draft.combat.is_living_enemy(id) {
            return;
        }
        exec.fire(draft, id, PowerEvent::TurnEnd, None, &ctx);
        self.decay(draft, id, DecayOn::TurnEnd);
        if let Some(enemy) = draft.combat.entity_mut(id) {
            tick_silence(enemy);
        }
    }

    fn begin_player_turn(&self, exec: &EffectExecutor<'_>, draft: &mut CombatDraft<'_>, first: bool) {
        let combat = &mut *draft.combat;
        if !first {
            combat.turn += 1;
            // Combat-start block survives into the first turn.
            combat.player.block = 0;
        }
        combat.phase = CombatPhase::PlayerTurn;
        combat.cards_played_this_turn = 0;

        let resources = &mut combat.resources;
        resources.energy = resources.max_energy + resources.energy_next_turn;
        resources.energy_next_turn = 0;
        resources.ability_used_this_turn = false;

        let turn = combat.turn;
        combat.emit(VisualEvent::TurnStart { turn });
        debug!(turn, "player turn");

        self.choose_intents(draft);
        card::draw(exec, draft, self.config.draw_per_turn);

        let ctx = EffectContext::new(EntityId::PLAYER);
        exec.fire(draft, EntityId::PLAYER, PowerEvent::TurnStart, None, &ctx);
        self.decay(draft, EntityId::PLAYER, DecayOn::TurnStart);
    }

    fn choose_intents(&self, draft: &mut CombatDraft<'_>) {
        for id in draft.combat.living_enemy_ids() {
            let Some(state) = draft.combat.entity(id).and_then(|e| e.enemy.as_ref()) else {
                continue;
            };
            let last = state.last_move;
            let Some(template) = self.content.enemy(&state.template_id) else {
                debug!(enemy = %id, template = %state.template_id, "unknown enemy template, no intent");
                continue;
            };
            let intent = template
                .choose_move(last, draft.rng)
                .and_then(|index| template.intent(index));
            let name = intent.as_ref().map(|i| i.name.clone());
            if let Some(state) = draft.combat.entity_mut(id).and_then(|e| e.enemy.as_mut()) {
                state.intent = intent;
            }
            if let Some(name) = name {
                draft.combat.emit(VisualEvent::Intent { enemy: id, name });
            }
        }
    }

    fn decay(&self, draft: &mut CombatDraft<'_>, id: EntityId, on: DecayOn) {
        let Some(entity) = draft.combat.entity_mut(id) else {
            return;
        };
        let expired: Vec<_> = decay_powers(entity, &self.content.powers, on)
            .into_iter()
            .filter(|tick| tick.remaining.is_none())
            .collect();
        for tick in expired {
            draft.combat.emit(VisualEvent::PowerRemoved {
                target: id,
                power: tick.power,
            });
        }
    }

    /// Enter a terminal phase if the combat has been decided, copying the
    /// player's health back to the run.
    fn settle(&self, run: &mut RunState) {
        let Some(combat) = run.combat.as_mut() else {
            return;
        };
        if combat.phase.is_terminal() {
            return;
        }
        let Some(phase) = combat.check_outcome() else {
            return;
        };
        run.player_health = combat.player.current_health;
        run.player_max_health = combat.player.max_health;
        if phase == CombatPhase::Victory {
            run.stats.combats_won += 1;
        }
        debug!(?phase, turn = combat.turn, "combat over");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::starter;

    fn engine() -> CombatEngine {
        CombatEngine::new(starter::content().unwrap())
    }

    fn hand_uid(run: &RunState, card_id: &str) -> Option<CardUid> {
        run.combat
            .as_ref()?
            .piles
            .hand
            .iter()
            .find(|c| c.definition_id.as_str() == card_id)
            .map(|c| c.uid)
    }

    #[test]
    fn test_start_combat_deals_hand() {
        let engine = engine();
        let mut run = engine.new_run(starter::KNIGHT, 1).unwrap();
        engine.start_combat(&mut run, &[starter::SLIME, starter::CULTIST]).unwrap();

        let combat = run.combat.as_ref().unwrap();
        assert_eq!(combat.phase, CombatPhase::PlayerTurn);
        assert_eq!(combat.turn, 1);
        assert_eq!(combat.enemies.len(), 2);
        assert_eq!(combat.piles.hand.len(), 5);
        assert_eq!(combat.piles.draw_pile.len(), 5);
        assert!(combat.enemies.iter().all(|e| e.intent().is_some()));
        // Anchor relic.
        assert_eq!(combat.player.block, 10);
    }

    #[test]
    fn test_unknown_enemy_rejected() {
        let engine = engine();
        let mut run = engine.new_run(starter::KNIGHT, 1).unwrap();
        let err = engine.start_combat(&mut run, &["dragon"]).unwrap_err();
        assert!(matches!(err, ContentError::UnknownEnemy(ref id) if id == "dragon"));
        assert!(run.combat.is_none());
    }

    #[test]
    fn test_unknown_hero() {
        assert!(matches!(engine().new_run("bard", 1), Err(ContentError::UnknownHero(_))));
    }

    #[test]
    fn test_actions_outside_combat() {
        let engine = engine();
        let mut run = engine.new_run(starter::KNIGHT, 1).unwrap();
        assert_eq!(engine.end_turn(&mut run), Err(ActionError::NotInCombat));
        assert_eq!(engine.play_card(&mut run, CardUid(1), None), Err(ActionError::NotInCombat));
    }

    #[test]
    fn test_play_strike() {
        let engine = engine();
        let mut run = engine.new_run(starter::KNIGHT, 3).unwrap();
        run.deck.clear();
        for _ in 0..10 {
            run.add_to_deck("strike", false);
        }
        engine.start_combat(&mut run, &[starter::SLIME]).unwrap();
        let strike = hand_uid(&run, "strike").unwrap();
        let slime = run.combat.as_ref().unwrap().enemies[0].id;

        engine.play_card(&mut run, strike, Some(slime)).unwrap();

        let combat = run.combat.as_ref().unwrap();
        assert_eq!(combat.enemies[0].current_health, 14);
        assert_eq!(combat.resources.energy, 2);
        assert!(combat.piles.contains(Pile::DiscardPile, strike));
        assert!(combat.in_play.is_empty());
        assert_eq!(combat.cards_played_this_turn, 1);
        assert_eq!(combat.last_played.as_ref().map(|c| c.uid), Some(strike));
        assert_eq!(run.stats.cards_played, 1);
        assert_eq!(run.stats.damage_dealt, 6);
    }

    #[test]
    fn test_locked_combat_rejects() {
        let engine = engine();
        let mut run = engine.new_run(starter::KNIGHT, 3).unwrap();
        engine.start_combat(&mut run, &[starter::SLIME]).unwrap();
        run.combat.as_mut().unwrap().locked = true;
        let before = run.combat.clone();

        assert_eq!(engine.end_turn(&mut run), Err(ActionError::Locked));
        assert_eq!(run.combat, before);
    }

    #[test]
    fn test_end_turn_cycles_back_to_player() {
        let engine = engine();
        let mut run = engine.new_run(starter::KNIGHT, 5).unwrap();
        engine.start_combat(&mut run, &[starter::SLIME]).unwrap();

        engine.end_turn(&mut run).unwrap();

        let combat = run.combat.as_ref().unwrap();
        assert_eq!(combat.phase, CombatPhase::PlayerTurn);
        assert_eq!(combat.turn, 2);
        assert_eq!(combat.resources.energy, 3);
        assert_eq!(combat.piles.hand.len(), 5);
        assert_eq!(combat.piles.discard_pile.len(), 5);
        assert!(combat.enemies[0].enemy.as_ref().unwrap().last_move.is_some());
    }

    #[test]
    fn test_hero_ability_needs_charge() {
        let engine = engine().with_config(CombatConfig::new().with_charge_per_card(5));
        let mut run = engine.new_run(starter::KNIGHT, 9).unwrap();
        engine.start_combat(&mut run, &[starter::CULTIST]).unwrap();

        assert_eq!(engine.use_hero_ability(&mut run), Err(ActionError::AbilityNotReady));

        let defend = hand_uid(&run, "defend")
            .or_else(|| hand_uid(&run, "strike"))
            .unwrap();
        let cultist = run.combat.as_ref().unwrap().enemies[0].id;
        engine.play_card(&mut run, defend, Some(cultist)).unwrap();
        assert_eq!(run.combat.as_ref().unwrap().resources.ability_charge, 5);

        engine.use_hero_ability(&mut run).unwrap();
        let combat = run.combat.as_ref().unwrap();
        assert_eq!(combat.resources.ability_charge, 0);
        assert!(combat.resources.ability_used_this_turn);
        assert_eq!(engine.use_hero_ability(&mut run), Err(ActionError::AbilityNotReady));
    }
}
