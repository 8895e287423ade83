//! Table session state.
//!
//! A [`Session`] owns everything that lives only as long as one sitting at
//! the table: the current encounter, the roll history, the RNG, and a
//! reference record fetched from an external source that is waiting for
//! the user to confirm it.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tk_core::{Character, ReferenceRecord};
use tracing::debug;

use crate::checks::CheckKind;
use crate::config::SessionConfig;
use crate::dice::{DiceRequest, RollMode};
use crate::encounter::{Encounter, InitiativeSource, Joined, ParticipantTemplate};
use crate::error::{MechError, MechResult};
use crate::history::{HistoryEntry, RollHistory};
use crate::resolution::{Resolution, resolve};

/// One sitting at the table.
pub struct Session {
    encounter: Encounter,
    history: RollHistory,
    draft: Option<ReferenceRecord>,
    rng: StdRng,
}

impl Session {
    /// Start a session with an empty encounter and history.
    pub fn new(config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            encounter: Encounter::new(),
            history: RollHistory::new(config.history_capacity),
            draft: None,
            rng,
        }
    }

    /// The current encounter.
    pub fn encounter(&self) -> &Encounter {
        &self.encounter
    }

    /// Mutable access to the encounter for operations that need no dice.
    pub fn encounter_mut(&mut self) -> &mut Encounter {
        &mut self.encounter
    }

    /// Rolls made this session, newest first.
    pub fn history(&self) -> &RollHistory {
        &self.history
    }

    /// Resolve a request and log it.
    pub fn roll(&mut self, label: &str, request: &DiceRequest) -> Resolution {
        let resolution = resolve(request, &mut self.rng);
        self.record(label, &resolution);
        resolution
    }

    /// Roll a check for a character and log it.
    pub fn check(&mut self, character: &Character, kind: CheckKind, mode: RollMode) -> Resolution {
        let label = kind.label(character);
        let request = kind.request(character, mode);
        self.roll(&label, &request)
    }

    /// Add a participant, logging the initiative roll if one was made.
    pub fn add_participant(
        &mut self,
        template: ParticipantTemplate,
        initiative: InitiativeSource,
    ) -> Joined {
        let joined = self
            .encounter
            .add_participant(template, initiative, &mut self.rng);
        self.record_initiative(&joined);
        joined
    }

    /// Add numbered copies of a creature, logging each initiative roll.
    pub fn add_creatures(&mut self, template: &ParticipantTemplate, count: u32) -> Vec<Joined> {
        let joined = self
            .encounter
            .add_creatures(template, count, &mut self.rng);
        for j in &joined {
            self.record_initiative(j);
        }
        joined
    }

    fn record_initiative(&mut self, joined: &Joined) {
        if let Some(roll) = &joined.roll {
            let name = self
                .encounter
                .participants()
                .get(joined.index)
                .map(|p| p.name.clone())
                .unwrap_or_default();
            self.record(&format!("{name} initiative"), roll);
        }
    }

    fn record(&mut self, label: &str, resolution: &Resolution) {
        let entry = HistoryEntry::from_resolution(label, resolution);
        debug!(trace = %entry.trace, "roll");
        self.history.push(entry);
    }

    /// Hold a fetched record until the user confirms or discards it.
    /// Replaces any earlier draft.
    pub fn stage_draft(&mut self, record: ReferenceRecord) {
        debug!(kind = %record.kind(), name = record.name(), "draft staged");
        self.draft = Some(record);
    }

    /// The pending draft, if any.
    pub fn draft(&self) -> Option<&ReferenceRecord> {
        self.draft.as_ref()
    }

    /// Take the pending draft so the caller can persist it.
    pub fn confirm_draft(&mut self) -> MechResult<ReferenceRecord> {
        self.draft.take().ok_or(MechError::NoDraft)
    }

    /// Drop the pending draft without saving it.
    pub fn discard_draft(&mut self) -> Option<ReferenceRecord> {
        self.draft.take()
    }

    /// Clear the encounter, the history, and any draft.
    pub fn reset(&mut self) {
        self.encounter.clear();
        self.encounter.set_notes("");
        self.history.clear();
        self.draft = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::Die;
    use crate::encounter::ParticipantKind;
    use tk_core::{Creature, ReferenceKind, Skill};

    fn session() -> Session {
        Session::new(SessionConfig::default().with_seed(42))
    }

    #[test]
    fn rolls_are_logged_newest_first() {
        let mut s = session();
        s.roll("first", &DiceRequest::d20(0));
        let r = s.roll("second", &DiceRequest::new(2, Die::D6, 1));
        assert_eq!(s.history().len(), 2);
        let latest = s.history().latest().unwrap();
        assert_eq!(latest.label, "second");
        assert_eq!(latest.total, r.total);
        assert!(latest.trace.starts_with("second -> "));
    }

    #[test]
    fn same_seed_same_rolls() {
        let mut a = session();
        let mut b = session();
        let req = DiceRequest::new(4, Die::D6, 0);
        assert_eq!(a.roll("x", &req).total, b.roll("x", &req).total);
    }

    #[test]
    fn history_capacity_from_config() {
        let mut s = Session::new(SessionConfig::default().with_seed(1).with_history_capacity(2));
        for _ in 0..5 {
            s.roll("d20", &DiceRequest::d20(0));
        }
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn creature_initiative_is_logged() {
        let mut s = session();
        let t = ParticipantTemplate::from_creature(&Creature::named("Orc"));
        s.add_creatures(&t, 2);
        s.add_participant(
            ParticipantTemplate::custom("Guard", 11, 16),
            InitiativeSource::Fixed(12),
        );
        assert_eq!(s.encounter().len(), 3);
        assert_eq!(s.encounter().participants()[0].kind, ParticipantKind::Creature);
        let labels: Vec<&str> = s.history().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Orc 2 initiative", "Orc 1 initiative"]);
    }

    #[test]
    fn check_rolls_with_label() {
        let mut s = session();
        let mut c = Character::new("Aria");
        c.skill_proficiencies = vec![Skill::Stealth];
        let r = s.check(&c, CheckKind::Skill(Skill::Stealth), RollMode::Normal);
        assert_eq!(r.request.modifier, 2);
        assert_eq!(s.history().latest().unwrap().label, "Aria Stealth");
    }

    #[test]
    fn draft_lifecycle() {
        let mut s = session();
        assert!(matches!(s.confirm_draft(), Err(MechError::NoDraft)));

        let record = ReferenceRecord::Creature(Creature::named("Owlbear"));
        s.stage_draft(record.clone());
        assert_eq!(s.draft().map(|d| d.kind()), Some(ReferenceKind::Creature));
        assert_eq!(s.confirm_draft().unwrap(), record);
        assert!(s.draft().is_none());

        s.stage_draft(record);
        assert!(s.discard_draft().is_some());
        assert!(s.draft().is_none());
    }

    #[test]
    fn reset_clears_everything() {
        let mut s = session();
        s.roll("x", &DiceRequest::d20(0));
        s.add_participant(
            ParticipantTemplate::custom("Guard", 11, 16),
            InitiativeSource::Fixed(12),
        );
        s.encounter_mut().set_notes("ambush");
        s.stage_draft(ReferenceRecord::Creature(Creature::named("Owlbear")));
        s.reset();
        assert!(s.encounter().is_empty());
        assert!(s.encounter().notes().is_empty());
        assert!(s.history().is_empty());
        assert!(s.draft().is_none());
    }
}
