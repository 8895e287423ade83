//! Initiative tracking for a single encounter.
//!
//! An [`Encounter`] is scratch state: an ordered participant list, a turn
//! pointer, and a round counter. It is never persisted. Every operation
//! that takes a position fails with [`MechError::IndexOutOfRange`] when the
//! position is invalid and leaves the encounter unchanged.
//!
//! Removing or reordering participants shifts positions; indices held from
//! before the call refer to different participants afterwards.

pub mod participant;

pub use participant::{Participant, ParticipantKind, ParticipantTemplate, Status};

use rand::rngs::StdRng;

use crate::dice::DiceRequest;
use crate::error::{MechError, MechResult};
use crate::resolution::{Resolution, resolve};

/// Most copies of one template a single `add_creatures` call adds.
pub const MAX_COPIES: u32 = 20;

/// How a new participant's initiative is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitiativeSource {
    /// Roll 1d20 plus the template's initiative bonus.
    Roll,
    /// Use this value as is.
    Fixed(i32),
}

/// Result of adding a participant.
#[derive(Debug, Clone)]
pub struct Joined {
    /// Position of the new participant.
    pub index: usize,
    /// The initiative roll, when initiative was rolled.
    pub roll: Option<Resolution>,
}

/// The state of an ongoing encounter.
#[derive(Debug, Clone)]
pub struct Encounter {
    participants: Vec<Participant>,
    round: u32,
    active_index: usize,
    notes: String,
}

impl Default for Encounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Encounter {
    /// An empty encounter in round 1.
    pub fn new() -> Self {
        Self {
            participants: Vec::new(),
            round: 1,
            active_index: 0,
            notes: String::new(),
        }
    }

    /// Participants in turn order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Current round, starting at 1.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Position of the participant whose turn it is.
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// The participant whose turn it is, if any.
    pub fn active(&self) -> Option<&Participant> {
        self.participants.get(self.active_index)
    }

    /// Participant at a position.
    pub fn get(&self, index: usize) -> MechResult<&Participant> {
        let len = self.participants.len();
        self.participants
            .get(index)
            .ok_or(MechError::IndexOutOfRange { index, len })
    }

    fn get_mut(&mut self, index: usize) -> MechResult<&mut Participant> {
        let len = self.participants.len();
        self.participants
            .get_mut(index)
            .ok_or(MechError::IndexOutOfRange { index, len })
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Whether there are no participants.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Free-text notes.
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Replace the notes.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Append a participant at the end of the list.
    ///
    /// Names need not be unique. The turn order is not re-sorted.
    pub fn add_participant(
        &mut self,
        template: ParticipantTemplate,
        initiative: InitiativeSource,
        rng: &mut StdRng,
    ) -> Joined {
        let (value, roll) = match initiative {
            InitiativeSource::Fixed(value) => (value, None),
            InitiativeSource::Roll => {
                let roll = resolve(&DiceRequest::d20(template.initiative_bonus), rng);
                (i32::try_from(roll.total).unwrap_or(i32::MAX), Some(roll))
            }
        };
        self.participants.push(Participant::new(template, value));
        Joined {
            index: self.participants.len() - 1,
            roll,
        }
    }

    /// Add `count` copies of a template, each rolling its own initiative.
    ///
    /// With more than one copy the names are numbered ("Goblin 1",
    /// "Goblin 2", ...). At most [`MAX_COPIES`] are added.
    pub fn add_creatures(
        &mut self,
        template: &ParticipantTemplate,
        count: u32,
        rng: &mut StdRng,
    ) -> Vec<Joined> {
        let count = count.min(MAX_COPIES);
        (1..=count)
            .map(|n| {
                let mut copy = template.clone();
                if count > 1 {
                    copy.name = format!("{} {n}", template.name);
                }
                self.add_participant(copy, InitiativeSource::Roll, rng)
            })
            .collect()
    }

    /// Remove and return the participant at `index`.
    ///
    /// The turn stays with the same participant when someone before them
    /// is removed; removing the active participant passes the turn to
    /// whoever followed them.
    pub fn remove_participant(&mut self, index: usize) -> MechResult<Participant> {
        self.get(index)?;
        let removed = self.participants.remove(index);
        if index < self.active_index {
            self.active_index -= 1;
        }
        if self.active_index >= self.participants.len() {
            self.active_index = 0;
        }
        Ok(removed)
    }

    /// Stable sort by initiative, highest first, and give the turn to the
    /// new first participant.
    pub fn sort_by_initiative(&mut self) {
        self.participants.sort_by(|a, b| b.initiative.cmp(&a.initiative));
        self.active_index = 0;
    }

    /// Pass the turn to the next participant. Returns true if a new round
    /// started. Does nothing on an empty encounter.
    pub fn advance_turn(&mut self) -> bool {
        if self.participants.is_empty() {
            return false;
        }
        self.active_index = (self.active_index + 1) % self.participants.len();
        if self.active_index == 0 {
            self.round += 1;
            true
        } else {
            false
        }
    }

    /// Damage (negative `delta`) or heal (positive `delta`) a participant.
    pub fn apply_damage(&mut self, index: usize, delta: i32) -> MechResult<&Participant> {
        let participant = self.get_mut(index)?;
        participant.apply_hp_delta(delta);
        Ok(participant)
    }

    /// Set a participant's status by hand. Any transition is allowed.
    pub fn set_status(&mut self, index: usize, status: Status) -> MechResult<()> {
        self.get_mut(index)?.status = status;
        Ok(())
    }

    /// Overwrite a participant's initiative. The order is not re-sorted.
    pub fn set_initiative(&mut self, index: usize, initiative: i32) -> MechResult<()> {
        self.get_mut(index)?.initiative = initiative;
        Ok(())
    }

    /// Move a participant from one position to another.
    pub fn move_participant(&mut self, from: usize, to: usize) -> MechResult<()> {
        self.get(from)?;
        self.get(to)?;
        let participant = self.participants.remove(from);
        self.participants.insert(to, participant);
        Ok(())
    }

    /// Set the round counter back to 1 without touching the turn pointer.
    pub fn reset_round(&mut self) {
        self.round = 1;
    }

    /// Remove everyone and restart at round 1.
    pub fn clear(&mut self) {
        self.participants.clear();
        self.round = 1;
        self.active_index = 0;
    }

    /// Plain-text listing in turn order, marking the active participant.
    pub fn summary(&self) -> String {
        let mut out = format!("Round {}\n", self.round);
        for (i, p) in self.participants.iter().enumerate() {
            let marker = if i == self.active_index { ">" } else { " " };
            out.push_str(&format!("{marker} {}. {p}\n", i + 1));
        }
        if !self.notes.trim().is_empty() {
            out.push_str(&format!("Notes: {}\n", self.notes.trim()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn names(enc: &Encounter) -> Vec<String> {
        enc.participants().iter().map(|p| p.name.clone()).collect()
    }

    fn with_initiatives(values: &[i32]) -> Encounter {
        let mut enc = Encounter::new();
        let mut rng = rng();
        for (i, v) in values.iter().enumerate() {
            let t = ParticipantTemplate::custom(format!("P{i}"), 10, 12);
            enc.add_participant(t, InitiativeSource::Fixed(*v), &mut rng);
        }
        enc
    }

    fn initiatives(enc: &Encounter) -> Vec<i32> {
        enc.participants().iter().map(|p| p.initiative).collect()
    }

    #[test]
    fn new_encounter_is_empty_round_one() {
        let enc = Encounter::new();
        assert!(enc.is_empty());
        assert_eq!(enc.round(), 1);
        assert_eq!(enc.active_index(), 0);
        assert!(enc.active().is_none());
    }

    #[test]
    fn sort_then_full_round() {
        let mut enc = with_initiatives(&[12, 18, 5]);
        enc.sort_by_initiative();
        assert_eq!(initiatives(&enc), vec![18, 12, 5]);

        assert!(!enc.advance_turn());
        assert!(!enc.advance_turn());
        assert!(enc.advance_turn());
        assert_eq!(enc.round(), 2);
        assert_eq!(enc.active_index(), 0);
    }

    #[test]
    fn sort_is_stable_and_idempotent() {
        let mut enc = with_initiatives(&[10, 15, 10, 15]);
        enc.sort_by_initiative();
        let order = names(&enc);
        assert_eq!(order, vec!["P1", "P3", "P0", "P2"]);

        enc.advance_turn();
        enc.sort_by_initiative();
        assert_eq!(names(&enc), order);
        assert_eq!(enc.active_index(), 0);
    }

    #[test]
    fn advance_on_empty_is_noop() {
        let mut enc = Encounter::new();
        assert!(!enc.advance_turn());
        assert_eq!(enc.round(), 1);
    }

    #[test]
    fn damage_knocks_out_and_healing_revives() {
        let mut enc = Encounter::new();
        let mut t = ParticipantTemplate::custom("Fighter", 20, 16);
        t.hp_current = 5;
        enc.add_participant(t, InitiativeSource::Fixed(10), &mut rng());

        let p = enc.apply_damage(0, -10).unwrap();
        assert_eq!(p.hp_current, 0);
        assert_eq!(p.status, Status::Unconscious);

        let p = enc.apply_damage(0, 8).unwrap();
        assert_eq!(p.hp_current, 8);
        assert_eq!(p.status, Status::Alive);
    }

    #[test]
    fn healing_caps_at_max() {
        let mut enc = with_initiatives(&[1]);
        assert_eq!(enc.apply_damage(0, 50).unwrap().hp_current, 10);
    }

    #[test]
    fn manual_dead_survives_healing() {
        let mut enc = with_initiatives(&[1]);
        enc.set_status(0, Status::Dead).unwrap();
        enc.apply_damage(0, -3).unwrap();
        assert_eq!(enc.get(0).unwrap().status, Status::Dead);
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let mut enc = with_initiatives(&[3, 4]);
        let err = enc.apply_damage(2, -1).unwrap_err();
        assert!(matches!(err, MechError::IndexOutOfRange { index: 2, len: 2 }));
        assert!(enc.remove_participant(5).is_err());
        assert!(enc.set_status(9, Status::Dead).is_err());
        assert!(enc.move_participant(0, 2).is_err());
        assert_eq!(enc.len(), 2);
    }

    #[test]
    fn remove_keeps_turn_with_same_participant() {
        let mut enc = with_initiatives(&[20, 15, 10]);
        enc.advance_turn();
        enc.advance_turn();
        assert_eq!(enc.active().unwrap().name, "P2");
        let removed = enc.remove_participant(0).unwrap();
        assert_eq!(removed.name, "P0");
        assert_eq!(enc.active().unwrap().name, "P2");
    }

    #[test]
    fn removing_last_active_wraps_pointer() {
        let mut enc = with_initiatives(&[20, 15]);
        enc.advance_turn();
        enc.remove_participant(1).unwrap();
        assert_eq!(enc.active_index(), 0);
        enc.remove_participant(0).unwrap();
        assert!(enc.is_empty());
        assert_eq!(enc.active_index(), 0);
    }

    #[test]
    fn move_and_set_initiative() {
        let mut enc = with_initiatives(&[1, 2, 3]);
        enc.move_participant(2, 0).unwrap();
        assert_eq!(initiatives(&enc), vec![3, 1, 2]);
        enc.set_initiative(1, 30).unwrap();
        enc.sort_by_initiative();
        assert_eq!(initiatives(&enc), vec![30, 3, 2]);
    }

    #[test]
    fn rolled_initiative_includes_bonus() {
        let mut enc = Encounter::new();
        let t = ParticipantTemplate::custom("Rogue", 9, 14).with_initiative_bonus(4);
        let joined = enc.add_participant(t, InitiativeSource::Roll, &mut rng());
        let roll = joined.roll.unwrap();
        let p = enc.get(joined.index).unwrap();
        assert_eq!(i64::from(p.initiative), roll.total);
        assert!((5..=24).contains(&p.initiative));
        assert_eq!(p.initiative_bonus, 4);
    }

    #[test]
    fn numbered_creatures() {
        let mut enc = Encounter::new();
        let mut goblin = tk_core::Creature::named("Goblin");
        goblin.hit_points = "7 (2d6)".into();
        let t = ParticipantTemplate::from_creature(&goblin);
        let joined = enc.add_creatures(&t, 3, &mut rng());
        assert_eq!(joined.len(), 3);
        let names: Vec<&str> = enc.participants().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Goblin 1", "Goblin 2", "Goblin 3"]);

        enc.add_creatures(&t, 1, &mut rng());
        assert_eq!(enc.participants()[3].name, "Goblin");
    }

    #[test]
    fn creature_copies_are_capped() {
        let mut enc = Encounter::new();
        let t = ParticipantTemplate::custom("Kobold", 5, 12);
        let joined = enc.add_creatures(&t, 4_000_000_000, &mut rng());
        assert_eq!(joined.len(), MAX_COPIES as usize);
        assert_eq!(enc.participants()[19].name, "Kobold 20");
    }

    #[test]
    fn clear_and_reset_round() {
        let mut enc = with_initiatives(&[1, 2]);
        enc.advance_turn();
        enc.advance_turn();
        assert_eq!(enc.round(), 2);
        enc.reset_round();
        assert_eq!(enc.round(), 1);
        enc.advance_turn();
        enc.set_notes("bridge collapses on round 3");
        enc.clear();
        assert!(enc.is_empty());
        assert_eq!((enc.round(), enc.active_index()), (1, 0));
    }

    #[test]
    fn summary_marks_active() {
        let mut enc = with_initiatives(&[12, 18]);
        enc.sort_by_initiative();
        enc.set_notes("ambush");
        let text = enc.summary();
        assert!(text.starts_with("Round 1\n> 1. P1 (custom) HP 10/10 AC 12 Init 18 [alive]"));
        assert!(text.contains("  2. P0"));
        assert!(text.ends_with("Notes: ambush\n"));
    }

    proptest! {
        #[test]
        fn hp_stays_in_bounds(
            hp_max in 0..200i32,
            deltas in proptest::collection::vec(-300..300i32, 0..40),
        ) {
            let mut enc = Encounter::new();
            let t = ParticipantTemplate::custom("Target", hp_max, 10);
            enc.add_participant(t, InitiativeSource::Fixed(0), &mut rng());
            for delta in deltas {
                let p = enc.apply_damage(0, delta).unwrap();
                prop_assert!(0 <= p.hp_current && p.hp_current <= p.hp_max);
                prop_assert_eq!(p.status == Status::Unconscious, p.hp_current == 0);
            }
        }

        #[test]
        fn full_cycle_returns_to_start(
            count in 1..12usize,
            start in 0..12usize,
        ) {
            let mut enc = with_initiatives(&vec![10; count]);
            for _ in 0..(start % count) {
                enc.advance_turn();
            }
            let before_index = enc.active_index();
            let before_round = enc.round();
            for _ in 0..count {
                enc.advance_turn();
            }
            prop_assert_eq!(enc.active_index(), before_index);
            prop_assert_eq!(enc.round(), before_round + 1);
        }
    }
}
