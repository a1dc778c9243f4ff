//! Combat and run state.
//!
//! ## Entity
//!
//! A combatant: the player or an enemy. Health, block, barrier and powers
//! are shared; enemies additionally carry elemental affinities and an intent.
//!
//! ## CombatState
//!
//! Everything scoped to one fight: phase, turn counter, combatants, card
//! piles, pending player selection and the visual queue.
//!
//! ## RunState
//!
//! Persistent-across-combats data (gold, master deck, relics, floor, stats)
//! wrapping an optional `CombatState`.
//!
//! ## CombatDraft
//!
//! The effect executor mutates a run through a `CombatDraft`, a set of
//! disjoint mutable borrows into `RunState`, so handlers can touch gold and
//! stats without re-borrowing the whole run.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::EntityId;
use super::rng::GameRng;
use crate::cards::{CardInstance, CardUid};
use crate::content::RelicId;
use crate::effects::{Effect, VisualEvent};
use crate::elements::Element;
use crate::powers::PowerSet;
use crate::zones::{Pile, Piles};

/// Outcome of applying damage to an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Damage absorbed by block and barrier.
    pub blocked: i32,
    /// Health actually lost.
    pub health_lost: i32,
    /// The hit reduced health to zero.
    pub killed: bool,
}

/// Enemy-only data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyState {
    /// Template this enemy was spawned from.
    pub template_id: String,
    /// Elements dealing 150% damage to this enemy.
    pub vulnerabilities: SmallVec<[Element; 2]>,
    /// Elements dealing 50% damage to this enemy.
    pub resistances: SmallVec<[Element; 2]>,
    /// Declared next action.
    pub intent: Option<Intent>,
    /// Index of the last executed move, used to avoid repeats.
    pub last_move: Option<usize>,
}

/// What kind of action an intent telegraphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntentKind {
    Attack,
    Defend,
    Buff,
    Debuff,
    Unknown,
}

/// An enemy's declared next action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    /// Index into the template's move list.
    pub move_index: usize,
    /// Move name, for display.
    pub name: String,
    pub kind: IntentKind,
    /// Effects executed with the enemy as source.
    pub effects: Vec<Effect>,
    /// Per-hit damage reduction applied by `weakenIntent`.
    pub weakened: i32,
}

/// A combatant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub current_health: i32,
    pub max_health: i32,
    /// Temporary block, cleared at the start of the owner's turn.
    pub block: i32,
    /// Persistent block, never decays.
    pub barrier: i32,
    pub powers: PowerSet,
    /// `None` for the player.
    pub enemy: Option<EnemyState>,
}

impl Entity {
    /// Create the player entity.
    #[must_use]
    pub fn player(name: impl Into<String>, current_health: i32, max_health: i32) -> Self {
        let max_health = max_health.max(1);
        Self {
            id: EntityId::PLAYER,
            name: name.into(),
            current_health: current_health.clamp(0, max_health),
            max_health,
            block: 0,
            barrier: 0,
            powers: PowerSet::new(),
            enemy: None,
        }
    }

    /// Create an enemy entity at full health.
    #[must_use]
    pub fn enemy(id: EntityId, name: impl Into<String>, max_health: i32, state: EnemyState) -> Self {
        let max_health = max_health.max(1);
        Self {
            id,
            name: name.into(),
            current_health: max_health,
            max_health,
            block: 0,
            barrier: 0,
            powers: PowerSet::new(),
            enemy: Some(state),
        }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    #[must_use]
    pub fn is_enemy(&self) -> bool {
        self.enemy.is_some()
    }

    #[must_use]
    pub fn missing_health(&self) -> i32 {
        (self.max_health - self.current_health).max(0)
    }

    /// Health as a fraction in `0.0..=1.0` (may exceed 1.0 when overhealed).
    #[must_use]
    pub fn health_fraction(&self) -> f64 {
        if self.max_health <= 0 {
            0.0
        } else {
            f64::from(self.current_health) / f64::from(self.max_health)
        }
    }

    /// Health percentage on a 0-100 integer scale (floored).
    #[must_use]
    pub fn health_percent(&self) -> i32 {
        if self.max_health <= 0 {
            0
        } else {
            self.current_health * 100 / self.max_health
        }
    }

    /// Absorb damage with block, then barrier, then health.
    ///
    /// Health never drops below zero. `piercing` skips block and barrier.
    pub fn take_damage(&mut self, amount: i32, piercing: bool) -> DamageOutcome {
        let mut remaining = amount.max(0);
        let mut blocked = 0;

        if !piercing {
            let from_block = remaining.min(self.block);
            self.block -= from_block;
            remaining -= from_block;

            let from_barrier = remaining.min(self.barrier);
            self.barrier -= from_barrier;
            remaining -= from_barrier;

            blocked = from_block + from_barrier;
        }

        let was_alive = self.is_alive();
        let health_lost = remaining.min(self.current_health.max(0));
        self.current_health = (self.current_health - remaining).max(0);

        DamageOutcome {
            blocked,
            health_lost,
            killed: was_alive && !self.is_alive(),
        }
    }

    /// Lose health directly, bypassing block. Returns health lost.
    pub fn lose_health(&mut self, amount: i32) -> i32 {
        self.take_damage(amount, true).health_lost
    }

    /// Restore health. Capped at max unless `overheal`. Returns health gained.
    pub fn heal(&mut self, amount: i32, overheal: bool) -> i32 {
        if amount <= 0 || !self.is_alive() {
            return 0;
        }
        let before = self.current_health;
        let raised = self.current_health.saturating_add(amount);
        self.current_health = if overheal {
            raised
        } else {
            raised.min(self.max_health.max(before))
        };
        self.current_health - before
    }

    /// Change max health by `delta`, keeping `0 < max` and `current <= max`.
    ///
    /// Raising max health also raises current health by the same amount.
    pub fn change_max_health(&mut self, delta: i32) {
        self.max_health = (self.max_health + delta).max(1);
        if delta > 0 && self.is_alive() {
            self.current_health += delta;
        }
        self.current_health = self.current_health.clamp(0, self.max_health);
    }

    /// Set current health, clamped to `0..=max`.
    pub fn set_health(&mut self, value: i32) {
        self.current_health = value.clamp(0, self.max_health);
    }

    #[must_use]
    pub fn intent(&self) -> Option<&Intent> {
        self.enemy.as_ref().and_then(|e| e.intent.as_ref())
    }

    #[must_use]
    pub fn is_vulnerable_to(&self, element: Element) -> bool {
        self.enemy
            .as_ref()
            .is_some_and(|e| e.vulnerabilities.contains(&element))
    }

    #[must_use]
    pub fn resists(&self, element: Element) -> bool {
        self.enemy
            .as_ref()
            .is_some_and(|e| e.resistances.contains(&element))
    }
}

/// Player-only combat resources.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResources {
    pub energy: i32,
    pub max_energy: i32,
    /// Bonus energy banked for the next turn refill.
    pub energy_next_turn: i32,
    /// Hero ability charge.
    pub ability_charge: u32,
    /// Charge required before the hero ability can be used.
    pub ability_charge_required: u32,
    pub ability_used_this_turn: bool,
}

/// Combat state machine phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CombatPhase {
    PlayerTurn,
    EnemyTurn,
    Victory,
    Defeat,
}

impl CombatPhase {
    /// Terminal phases freeze all further action processing.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, CombatPhase::Victory | CombatPhase::Defeat)
    }
}

/// What a pending selection will do with the chosen cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SelectionKind {
    /// Remove chosen cards from every pile permanently.
    Banish,
    /// Add copies of chosen (generated) cards to a pile.
    Discover { destination: Pile },
    /// Chosen cards move from the draw pile to the discard pile.
    Scry,
    /// Chosen cards move from the draw pile to a pile.
    Tutor { destination: Pile },
    /// Chosen cards move from hand to the discard pile.
    Discard,
}

/// Execution suspended awaiting an external choice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSelection {
    pub kind: SelectionKind,
    /// Snapshot of the selectable cards.
    pub candidates: Vec<CardInstance>,
    pub min: usize,
    pub max: usize,
}

impl PendingSelection {
    #[must_use]
    pub fn new(kind: SelectionKind, candidates: Vec<CardInstance>, min: usize, max: usize) -> Self {
        let max = max.min(candidates.len());
        Self {
            kind,
            candidates,
            min: min.min(max),
            max,
        }
    }

    #[must_use]
    pub fn is_candidate(&self, uid: CardUid) -> bool {
        self.candidates.iter().any(|c| c.uid == uid)
    }
}

/// Where a card being played goes once its effects finish.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayRoute {
    Discard,
    Exhaust,
    Banished,
    /// Moved elsewhere by its own effects (e.g. put on deck).
    Elsewhere,
}

/// A card currently resolving, removed from every pile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InPlay {
    pub card: CardInstance,
    /// Overrides the default discard/exhaust routing when set.
    pub route: Option<PlayRoute>,
}

/// State for a single combat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatState {
    pub phase: CombatPhase,
    /// Turn number (starts at 1).
    pub turn: u32,
    pub player: Entity,
    pub resources: PlayerResources,
    /// Living enemies in positional order (front first).
    pub enemies: Vec<Entity>,
    pub piles: Piles,
    pub cards_played_this_turn: u32,
    pub last_played: Option<CardInstance>,
    /// Stack of cards currently resolving (innermost last).
    pub in_play: Vec<InPlay>,
    pub pending_selection: Option<PendingSelection>,
    /// Set by the presentation layer while animating; actions are rejected.
    pub locked: bool,
    /// Append-only; drained by the presentation layer.
    pub visual_queue: Vec<VisualEvent>,
    next_enemy_id: u32,
    next_card_uid: u64,
}

impl CombatState {
    /// Create an empty combat for the given player.
    ///
    /// `first_card_uid` must exceed every uid already in use by the deck.
    #[must_use]
    pub fn new(player: Entity, resources: PlayerResources, first_card_uid: u64) -> Self {
        Self {
            phase: CombatPhase::PlayerTurn,
            turn: 1,
            player,
            resources,
            enemies: Vec::new(),
            piles: Piles::new(),
            cards_played_this_turn: 0,
            last_played: None,
            in_play: Vec::new(),
            pending_selection: None,
            locked: false,
            visual_queue: Vec::new(),
            next_enemy_id: EntityId::first_enemy().raw(),
            next_card_uid: first_card_uid,
        }
    }

    /// Allocate an ID for a new enemy.
    pub fn alloc_enemy_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_enemy_id);
        self.next_enemy_id += 1;
        id
    }

    /// Allocate a uid for a newly generated card.
    pub fn alloc_card_uid(&mut self) -> CardUid {
        let uid = CardUid(self.next_card_uid);
        self.next_card_uid += 1;
        uid
    }

    /// Append a visual notification.
    pub fn emit(&mut self, event: VisualEvent) {
        tracing::trace!(?event, "visual");
        self.visual_queue.push(event);
    }

    /// Drain all pending visual events.
    pub fn drain_visuals(&mut self) -> Vec<VisualEvent> {
        std::mem::take(&mut self.visual_queue)
    }

    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        if id.is_player() {
            Some(&self.player)
        } else {
            self.enemies.iter().find(|e| e.id == id)
        }
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if id.is_player() {
            Some(&mut self.player)
        } else {
            self.enemies.iter_mut().find(|e| e.id == id)
        }
    }

    /// Living enemies in positional order.
    pub fn living_enemies(&self) -> impl Iterator<Item = &Entity> {
        self.enemies.iter().filter(|e| e.is_alive())
    }

    #[must_use]
    pub fn living_enemy_ids(&self) -> Vec<EntityId> {
        self.living_enemies().map(|e| e.id).collect()
    }

    #[must_use]
    pub fn is_living_enemy(&self, id: EntityId) -> bool {
        !id.is_player() && self.entity(id).is_some_and(Entity::is_alive)
    }

    /// Remove dead enemies, returning their IDs in positional order.
    pub fn reap_dead(&mut self) -> Vec<EntityId> {
        let dead: Vec<EntityId> = self
            .enemies
            .iter()
            .filter(|e| !e.is_alive())
            .map(|e| e.id)
            .collect();
        self.enemies.retain(Entity::is_alive);
        dead
    }

    /// The innermost card currently resolving.
    #[must_use]
    pub fn card_in_play(&self) -> Option<&CardInstance> {
        self.in_play.last().map(|p| &p.card)
    }

    /// Update the phase if either side has been wiped out.
    ///
    /// Returns the new terminal phase, if any.
    pub fn check_outcome(&mut self) -> Option<CombatPhase> {
        if self.phase.is_terminal() {
            return Some(self.phase);
        }
        if !self.player.is_alive() {
            self.phase = CombatPhase::Defeat;
        } else if self.living_enemies().next().is_none() {
            self.phase = CombatPhase::Victory;
        } else {
            return None;
        }
        Some(self.phase)
    }
}

/// Aggregate statistics for a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub cards_played: u64,
    pub enemies_killed: u64,
    pub gold_earned: u64,
    pub combats_won: u64,
}

/// Persistent state for a whole run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunState {
    /// Hero template id.
    pub hero: String,
    pub player_health: i32,
    pub player_max_health: i32,
    pub gold: i32,
    /// Master deck. In-combat effects never modify it.
    pub deck: Vec<CardInstance>,
    pub relics: Vec<RelicId>,
    pub floor: u32,
    pub stats: RunStats,
    /// `None` outside of combat.
    pub combat: Option<CombatState>,
    #[serde(skip)]
    pub rng: GameRng,
}

impl RunState {
    /// Create a run with an empty deck.
    #[must_use]
    pub fn new(hero: impl Into<String>, max_health: i32, seed: u64) -> Self {
        Self {
            hero: hero.into(),
            player_health: max_health,
            player_max_health: max_health,
            gold: 0,
            deck: Vec::new(),
            relics: Vec::new(),
            floor: 0,
            stats: RunStats::default(),
            combat: None,
            rng: GameRng::new(seed),
        }
    }

    /// First uid not used by any master deck card.
    #[must_use]
    pub fn next_card_uid(&self) -> u64 {
        self.deck.iter().map(|c| c.uid.0 + 1).max().unwrap_or(1)
    }

    /// Add a card to the master deck with a fresh uid.
    pub fn add_to_deck(&mut self, card_id: impl Into<crate::cards::CardId>, upgraded: bool) -> CardUid {
        let uid = CardUid(self.next_card_uid());
        let mut card = CardInstance::new(uid, card_id);
        card.upgraded = upgraded;
        self.deck.push(card);
        uid
    }

    /// Borrow the run as a mutable draft for effect execution.
    ///
    /// Returns `None` outside of combat.
    pub fn draft(&mut self) -> Option<CombatDraft<'_>> {
        let combat = self.combat.as_mut()?;
        Some(CombatDraft {
            combat,
            gold: &mut self.gold,
            stats: &mut self.stats,
            relics: &self.relics,
            rng: &mut self.rng,
        })
    }
}

/// Disjoint mutable view over a run in combat.
pub struct CombatDraft<'a> {
    pub combat: &'a mut CombatState,
    pub gold: &'a mut i32,
    pub stats: &'a mut RunStats,
    pub relics: &'a [RelicId],
    pub rng: &'a mut GameRng,
}
