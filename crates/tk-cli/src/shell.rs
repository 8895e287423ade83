//! The interactive encounter tracker behind `tk encounter`.
//!
//! [`EncounterShell::process`] takes one line of input and returns the text
//! to print, so the whole command language can be driven from tests.
//! Positions typed by the user are 1-based, matching the listing.

use tk_core::ReferenceKind;
use tk_lookup::ContentSource;
use tk_mechanics::{
    DiceRequest, InitiativeSource, Joined, MAX_COPIES, MechError, ParticipantTemplate, RollMode,
    Session, Status,
};
use tk_store::Store;

use crate::commands::reference::render_record;

const HELP: &str = "\
Participants
  add character <id> [init]           add a stored character (rolls initiative unless given)
  add creature <name> [xN]            add N copies of a stored creature
  add custom <name> <hp> <ac> [init]  add a hand-made participant
  remove <pos>                        remove a participant
  move <from> <to>                    change someone's place in the order
  init <pos> <value>                  overwrite initiative
  sort                                order by initiative, highest first
Turns
  next                                pass the turn (starts a new round after the last)
  list                                show the turn order
  reset-round                         set the round counter back to 1
HP and status
  damage <pos> <amount>               subtract hit points
  heal <pos> <amount>                 restore hit points
  status <pos> alive|unconscious|dead set a condition by hand
Dice
  roll <expr> [adv|dis]               roll dice, e.g. roll 2d6+3
  history [n]                         recent rolls, newest first
Notes and lookups
  notes [text]                        show or replace encounter notes
  suggest                             ask for tactical suggestions
  lookup <kind> <name>                fetch a creature, spell, or item as a draft
  draft | confirm | discard           review, save, or drop the draft
Session
  clear                               remove everyone and restart at round 1
  reset                               clear the encounter, notes, history, and draft
  help | quit";

/// Whether `input` ends the shell.
pub fn is_quit(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "quit" | "q" | "exit")
}

/// Parse a 1-based position typed by the user into an index.
fn parse_position(token: Option<&str>) -> Result<usize, String> {
    let token = token.ok_or("missing position (see `list`)")?;
    match token.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("\"{token}\" is not a position (positions start at 1)")),
        Ok(n) => Ok(n - 1),
    }
}

fn parse_number(token: Option<&str>, what: &str) -> Result<i32, String> {
    let token = token.ok_or_else(|| format!("missing {what}"))?;
    token
        .parse()
        .map_err(|_| format!("{what} must be a number, got \"{token}\""))
}

fn parse_amount(token: Option<&str>) -> Result<i32, String> {
    let amount = parse_number(token, "amount")?;
    if amount < 0 {
        return Err("amount must not be negative".into());
    }
    Ok(amount)
}

/// Split a trailing `xN` (or `*N`) count off a creature name.
fn split_count(words: &[&str]) -> Result<(String, u32), String> {
    let (name_words, count) = match words.split_last() {
        Some((last, rest)) if !rest.is_empty() => {
            let digits = last
                .strip_prefix(['x', 'X', '*'])
                .filter(|d| !d.is_empty() && d.chars().all(|c| c.is_ascii_digit()));
            match digits {
                Some(d) => (rest, d.parse::<u32>().map_err(|e| e.to_string())?),
                None => (words, 1),
            }
        }
        _ => (words, 1),
    };
    if !(1..=MAX_COPIES).contains(&count) {
        return Err(format!("count must be between 1 and {MAX_COPIES}"));
    }
    let name = name_words.join(" ");
    if name.is_empty() {
        return Err("missing creature name".into());
    }
    Ok((name, count))
}

/// Split trailing integers off a `custom` line: name, then hp, ac, and an
/// optional initiative.
fn split_custom(words: &[&str]) -> Result<(String, i32, i32, Option<i32>), String> {
    let numeric = words
        .iter()
        .rev()
        .take(3)
        .take_while(|w| w.parse::<i32>().is_ok())
        .count();
    let usage = || "usage: add custom <name> <hp> <ac> [init]".to_string();
    if numeric < 2 || words.len() <= numeric {
        return Err(usage());
    }
    let (name, numbers) = words.split_at(words.len() - numeric);
    let numbers: Vec<i32> = numbers.iter().filter_map(|w| w.parse().ok()).collect();
    let init = numbers.get(2).copied();
    Ok((name.join(" "), numbers[0], numbers[1], init))
}

/// One encounter session with access to the database and, optionally, a
/// content source for suggestions and lookups.
pub struct EncounterShell {
    session: Session,
    store: Store,
    source: Option<Box<dyn ContentSource>>,
}

impl EncounterShell {
    /// Start a shell over a fresh session.
    pub fn new(session: Session, store: Store, source: Option<Box<dyn ContentSource>>) -> Self {
        Self {
            session,
            store,
            source,
        }
    }

    /// The underlying session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run one line of input. Errors are user-facing messages; the
    /// encounter is unchanged when one is returned.
    pub async fn process(&mut self, input: &str) -> Result<String, String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(String::new());
        }
        let words: Vec<&str> = trimmed.split_whitespace().collect();
        let cmd = words[0].to_lowercase();
        let args = &words[1..];
        let rest = trimmed[words[0].len()..].trim();

        match cmd.as_str() {
            "help" | "?" => Ok(HELP.to_string()),
            "quit" | "q" | "exit" => Ok("Goodbye!".to_string()),
            "list" | "ls" => Ok(self.listing()),
            "add" => self.do_add(args).await,
            "remove" | "rm" => {
                let index = parse_position(args.first().copied())?;
                let removed = self
                    .session
                    .encounter_mut()
                    .remove_participant(index)
                    .map_err(|e| e.to_string())?;
                Ok(format!("Removed {}.", removed.name))
            }
            "sort" => {
                self.session.encounter_mut().sort_by_initiative();
                Ok(self.listing())
            }
            "next" | "n" => Ok(self.do_next()),
            "damage" | "dmg" | "heal" => {
                let index = parse_position(args.first().copied())?;
                let amount = parse_amount(args.get(1).copied())?;
                let delta = if cmd == "heal" { amount } else { -amount };
                let participant = self
                    .session
                    .encounter_mut()
                    .apply_damage(index, delta)
                    .map_err(|e| e.to_string())?;
                Ok(participant.to_string())
            }
            "status" => {
                let index = parse_position(args.first().copied())?;
                let status: Status = args
                    .get(1)
                    .ok_or("missing status")?
                    .parse()
                    .map_err(|e: MechError| e.to_string())?;
                let encounter = self.session.encounter_mut();
                encounter
                    .set_status(index, status)
                    .map_err(|e| e.to_string())?;
                Ok(encounter.get(index).map_err(|e| e.to_string())?.to_string())
            }
            "init" => {
                let index = parse_position(args.first().copied())?;
                let value = parse_number(args.get(1).copied(), "initiative")?;
                let encounter = self.session.encounter_mut();
                encounter
                    .set_initiative(index, value)
                    .map_err(|e| e.to_string())?;
                Ok(encounter.get(index).map_err(|e| e.to_string())?.to_string())
            }
            "move" | "mv" => {
                let from = parse_position(args.first().copied())?;
                let to = parse_position(args.get(1).copied())?;
                self.session
                    .encounter_mut()
                    .move_participant(from, to)
                    .map_err(|e| e.to_string())?;
                Ok(self.listing())
            }
            "notes" => {
                if rest.is_empty() {
                    let notes = self.session.encounter().notes();
                    Ok(if notes.is_empty() {
                        "No notes.".to_string()
                    } else {
                        notes.to_string()
                    })
                } else {
                    self.session.encounter_mut().set_notes(rest);
                    Ok("Notes updated.".to_string())
                }
            }
            "roll" | "r" => self.do_roll(args),
            "history" | "h" => self.do_history(args),
            "suggest" => self.do_suggest().await,
            "lookup" => self.do_lookup(args).await,
            "draft" => Ok(match self.session.draft() {
                Some(record) => render_record(record),
                None => "No draft.".to_string(),
            }),
            "confirm" => {
                let record = self
                    .session
                    .draft()
                    .cloned()
                    .ok_or_else(|| MechError::NoDraft.to_string())?;
                let id = self
                    .store
                    .upsert_reference(&record)
                    .await
                    .map_err(|e| format!("{e} (the draft is kept; `discard` to drop it)"))?;
                self.session.discard_draft();
                Ok(format!("Saved {} {id}: {}", record.kind(), record.name()))
            }
            "discard" => Ok(match self.session.discard_draft() {
                Some(record) => format!("Discarded {}.", record.name()),
                None => "No draft.".to_string(),
            }),
            "clear" => {
                self.session.encounter_mut().clear();
                Ok("Encounter cleared.".to_string())
            }
            "reset-round" => {
                self.session.encounter_mut().reset_round();
                Ok("Round reset to 1.".to_string())
            }
            "reset" => {
                self.session.reset();
                Ok("Session reset.".to_string())
            }
            other => Err(format!("unknown command \"{other}\" (type `help`)")),
        }
    }

    fn listing(&self) -> String {
        let encounter = self.session.encounter();
        if encounter.is_empty() {
            return "No participants. Add some with `add`.".to_string();
        }
        encounter.summary().trim_end().to_string()
    }

    fn joined_lines(&self, joined: &[Joined]) -> String {
        let participants = self.session.encounter().participants();
        joined
            .iter()
            .filter_map(|j| {
                let p = participants.get(j.index)?;
                Some(match &j.roll {
                    Some(roll) => format!(
                        "Added {} at {} ({})",
                        p.name,
                        j.index + 1,
                        roll.trace(&format!("{} initiative", p.name))
                    ),
                    None => format!("Added {} at {} (initiative {})", p.name, j.index + 1, p.initiative),
                })
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn do_add(&mut self, args: &[&str]) -> Result<String, String> {
        let (kind, rest) = args
            .split_first()
            .ok_or("usage: add character|creature|custom ...")?;
        match kind.to_lowercase().as_str() {
            "character" | "char" | "pc" => {
                let id: i64 = rest
                    .first()
                    .ok_or("usage: add character <id> [init]")?
                    .parse()
                    .map_err(|_| "character id must be a number".to_string())?;
                let initiative = match rest.get(1) {
                    Some(v) => InitiativeSource::Fixed(parse_number(Some(*v), "initiative")?),
                    None => InitiativeSource::Roll,
                };
                let character = self
                    .store
                    .get_character(id)
                    .await
                    .map_err(|e| e.to_string())?;
                let joined = self
                    .session
                    .add_participant(ParticipantTemplate::from_character(&character), initiative);
                Ok(self.joined_lines(&[joined]))
            }
            "creature" | "monster" => {
                let (name, count) = split_count(rest)?;
                let creature = self
                    .store
                    .get_creature(&name)
                    .await
                    .map_err(|e| e.to_string())?
                    .ok_or_else(|| format!("creature not found: \"{name}\" (try `tk ref search creature`)"))?;
                let joined = self
                    .session
                    .add_creatures(&ParticipantTemplate::from_creature(&creature), count);
                Ok(self.joined_lines(&joined))
            }
            "custom" => {
                let (name, hp, ac, init) = split_custom(rest)?;
                let source = init.map_or(InitiativeSource::Roll, InitiativeSource::Fixed);
                let joined = self
                    .session
                    .add_participant(ParticipantTemplate::custom(name, hp, ac), source);
                Ok(self.joined_lines(&[joined]))
            }
            other => Err(format!(
                "cannot add \"{other}\" (expected character, creature, or custom)"
            )),
        }
    }

    fn do_next(&mut self) -> String {
        let encounter = self.session.encounter_mut();
        if encounter.is_empty() {
            return "No participants.".to_string();
        }
        let new_round = encounter.advance_turn();
        let active = encounter
            .active()
            .map(ToString::to_string)
            .unwrap_or_default();
        if new_round {
            format!("Round {} begins.\nNow acting: {active}", encounter.round())
        } else {
            format!("Now acting: {active}")
        }
    }

    fn do_roll(&mut self, args: &[&str]) -> Result<String, String> {
        let (mode, expr_words): (RollMode, &[&str]) = match args.split_last() {
            Some((last, rest)) if last.eq_ignore_ascii_case("adv") => (RollMode::Advantage, rest),
            Some((last, rest)) if last.eq_ignore_ascii_case("dis") => {
                (RollMode::Disadvantage, rest)
            }
            _ => (RollMode::Normal, args),
        };
        let expr = expr_words.join("");
        if expr.is_empty() {
            return Err("usage: roll <expr> [adv|dis]".into());
        }
        let request: DiceRequest = expr
            .parse()
            .map_err(|e: MechError| e.to_string())?;
        let request = request.with_mode(mode);
        let label = request.to_string();
        Ok(self.session.roll(&label, &request).trace(&label))
    }

    fn do_history(&self, args: &[&str]) -> Result<String, String> {
        let limit = match args.first() {
            Some(n) => n
                .parse::<usize>()
                .map_err(|_| format!("\"{n}\" is not a count"))?,
            None => 10,
        };
        let history = self.session.history();
        if history.is_empty() {
            return Ok("No rolls yet.".to_string());
        }
        Ok(history
            .iter()
            .take(limit)
            .map(|entry| entry.trace.clone())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    async fn do_suggest(&self) -> Result<String, String> {
        let source = self
            .source
            .as_ref()
            .ok_or("suggestions need a lookup API key (lookup.api_key)")?;
        let encounter = self.session.encounter();
        if encounter.is_empty() {
            return Err("add participants before asking for suggestions".into());
        }
        source
            .suggest(&encounter.summary(), encounter.notes())
            .await
            .map_err(|e| e.to_string())
    }

    async fn do_lookup(&mut self, args: &[&str]) -> Result<String, String> {
        let usage = "usage: lookup creature|spell|item <name>";
        let (kind, subject) = args.split_first().ok_or(usage)?;
        let kind: ReferenceKind = kind.parse().map_err(|e: tk_core::CoreError| e.to_string())?;
        let subject = subject.join(" ");
        if subject.is_empty() {
            return Err(usage.into());
        }
        let source = self
            .source
            .as_ref()
            .ok_or("lookups need an API key (lookup.api_key)")?;
        let record = source
            .lookup(kind, &subject)
            .await
            .map_err(|e| e.to_string())?;
        record.validate().map_err(|e| e.to_string())?;
        let rendered = render_record(&record);
        self.session.stage_draft(record);
        Ok(format!(
            "{}\nType `confirm` to save this {kind} or `discard` to drop it.",
            rendered.trim_end()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tk_core::{Character, Creature, Item, ReferenceRecord, Spell};
    use tk_lookup::LookupResult;
    use tk_mechanics::SessionConfig;

    struct FakeSource;

    #[async_trait]
    impl ContentSource for FakeSource {
        async fn lookup(&self, kind: ReferenceKind, subject: &str) -> LookupResult<ReferenceRecord> {
            if kind == ReferenceKind::Item {
                return Ok(unsaveable_item(subject));
            }
            Ok(ReferenceRecord::Spell(Spell {
                name: subject.to_string(),
                level: 3,
                school: "Evocation".into(),
                source: "lookup".into(),
                ..Spell::default()
            }))
        }

        async fn suggest(&self, summary: &str, notes: &str) -> LookupResult<String> {
            Ok(format!("{} in the fight; notes: {notes}", summary.matches(" HP ").count()))
        }
    }

    fn unsaveable_item(name: &str) -> ReferenceRecord {
        ReferenceRecord::Item(Item {
            name: name.to_string(),
            item_type: "Wondrous Item".into(),
            rarity: "very rare (requires attunement)".into(),
            ..Item::default()
        })
    }

    async fn shell(source: Option<Box<dyn ContentSource>>) -> EncounterShell {
        let store = Store::in_memory().await.unwrap();
        let session = Session::new(SessionConfig::default().with_seed(42));
        EncounterShell::new(session, store, source)
    }

    async fn run(shell: &mut EncounterShell, line: &str) -> String {
        shell.process(line).await.unwrap()
    }

    #[test]
    fn count_and_custom_parsing() {
        assert_eq!(split_count(&["Goblin", "x3"]).unwrap(), ("Goblin".into(), 3));
        assert_eq!(split_count(&["Young", "Red", "Dragon"]).unwrap(), ("Young Red Dragon".into(), 1));
        assert_eq!(split_count(&["x3"]).unwrap(), ("x3".into(), 1));
        assert!(split_count(&["Goblin", "x0"]).is_err());
        assert_eq!(split_count(&["Goblin", "x20"]).unwrap().1, 20);
        assert!(split_count(&["Goblin", "x21"]).is_err());
        assert!(split_count(&["Goblin", "x4000000000"]).is_err());
        assert_eq!(
            split_custom(&["Town", "Guard", "11", "16"]).unwrap(),
            ("Town Guard".into(), 11, 16, None)
        );
        assert_eq!(split_custom(&["Guard", "11", "16", "12"]).unwrap().3, Some(12));
        assert!(split_custom(&["11", "16"]).is_err());
        assert!(split_custom(&["Guard", "11"]).is_err());
        assert_eq!(parse_position(Some("2")).unwrap(), 1);
        assert!(parse_position(Some("0")).is_err());
        assert!(parse_position(None).is_err());
    }

    #[tokio::test]
    async fn custom_participants_turn_order_and_rounds() {
        let mut sh = shell(None).await;
        run(&mut sh, "add custom Guard 11 16 12").await;
        run(&mut sh, "add custom Bandit Captain 65 15 18").await;
        let sorted = run(&mut sh, "sort").await;
        assert!(sorted.starts_with("Round 1\n> 1. Bandit Captain"));

        assert_eq!(run(&mut sh, "next").await, "Now acting: Guard (custom) HP 11/11 AC 16 Init 12 [alive]");
        let wrapped = run(&mut sh, "next").await;
        assert!(wrapped.starts_with("Round 2 begins."));
        assert_eq!(sh.session().encounter().round(), 2);

        run(&mut sh, "reset-round").await;
        assert_eq!(sh.session().encounter().round(), 1);
    }

    #[tokio::test]
    async fn damage_heal_and_status() {
        let mut sh = shell(None).await;
        run(&mut sh, "add custom Ogre 59 11 8").await;
        assert!(run(&mut sh, "damage 1 70").await.contains("HP 0/59 AC 11 Init 8 [unconscious]"));
        assert!(run(&mut sh, "heal 1 10").await.contains("HP 10/59 AC 11 Init 8 [alive]"));
        assert!(run(&mut sh, "status 1 dead").await.ends_with("[dead]"));
        assert!(sh.process("damage 2 5").await.is_err());
        assert!(sh.process("damage 1 -5").await.is_err());
        assert!(sh.process("status 1 sleepy").await.is_err());
    }

    #[tokio::test]
    async fn stored_creatures_and_characters_join() {
        let mut sh = shell(None).await;
        let mut goblin = Creature::named("Goblin");
        goblin.hit_points = "7 (2d6)".into();
        goblin.armor_class = "15 (leather armor, shield)".into();
        goblin.dex_score = 14;
        sh.store.upsert_creature(&goblin).await.unwrap();
        let mut aria = Character::new("Aria");
        aria.hp_max = 20;
        aria.hp_current = 15;
        let id = sh.store.save_character(&aria).await.unwrap();

        let added = run(&mut sh, "add creature goblin x2").await;
        assert!(added.contains("Added Goblin 1 at 1"));
        assert!(added.contains("Goblin 2 initiative"));
        run(&mut sh, &format!("add character {id} 15")).await;

        let participants = sh.session().encounter().participants();
        assert_eq!(participants.len(), 3);
        assert_eq!((participants[0].hp_max, participants[0].armor_class), (7, 15));
        assert_eq!(participants[0].initiative_bonus, 2);
        assert_eq!((participants[2].hp_current, participants[2].initiative), (15, 15));
        assert_eq!(sh.session().history().len(), 2);

        assert!(sh.process("add creature Beholder").await.is_err());
        assert!(sh.process("add character 99").await.is_err());
    }

    #[tokio::test]
    async fn remove_move_and_clear() {
        let mut sh = shell(None).await;
        for line in ["add custom A 1 10 3", "add custom B 1 10 2", "add custom C 1 10 1"] {
            run(&mut sh, line).await;
        }
        assert_eq!(run(&mut sh, "remove 2").await, "Removed B.");
        run(&mut sh, "move 2 1").await;
        let names: Vec<_> = sh.session().encounter().participants().iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["C", "A"]);
        assert!(sh.process("remove 5").await.is_err());
        run(&mut sh, "clear").await;
        assert_eq!(run(&mut sh, "list").await, "No participants. Add some with `add`.");
    }

    #[tokio::test]
    async fn rolls_and_history() {
        let mut sh = shell(None).await;
        assert_eq!(run(&mut sh, "history").await, "No rolls yet.");
        assert!(run(&mut sh, "roll 2d6 + 3").await.starts_with("2d6+3 -> "));
        assert!(run(&mut sh, "roll d20 adv").await.starts_with("1d20 [Adv] -> "));
        let history = run(&mut sh, "history").await;
        assert_eq!(history.lines().count(), 2);
        assert!(history.lines().next().unwrap().contains("[Adv]"));
        assert!(sh.process("roll banana").await.is_err());
    }

    #[tokio::test]
    async fn notes_and_reset() {
        let mut sh = shell(None).await;
        run(&mut sh, "notes The bridge is collapsing").await;
        assert_eq!(run(&mut sh, "notes").await, "The bridge is collapsing");
        run(&mut sh, "roll d20").await;
        run(&mut sh, "reset").await;
        assert_eq!(run(&mut sh, "notes").await, "No notes.");
        assert!(sh.session().history().is_empty());
    }

    #[tokio::test]
    async fn suggestions_and_lookups_need_a_source() {
        let mut sh = shell(None).await;
        run(&mut sh, "add custom Guard 11 16 12").await;
        assert!(sh.process("suggest").await.unwrap_err().contains("API key"));
        assert!(sh.process("lookup spell Fireball").await.is_err());
    }

    #[tokio::test]
    async fn lookup_draft_is_saved_only_on_confirm() {
        let mut sh = shell(Some(Box::new(FakeSource))).await;
        let shown = run(&mut sh, "lookup spell Fireball").await;
        assert!(shown.contains("Type `confirm`"));
        assert_eq!(sh.store.count_references(ReferenceKind::Spell).await.unwrap(), 0);

        assert_eq!(run(&mut sh, "discard").await, "Discarded Fireball.");
        assert!(sh.process("confirm").await.is_err());

        run(&mut sh, "lookup spell Fireball").await;
        assert!(run(&mut sh, "confirm").await.starts_with("Saved spell"));
        assert_eq!(sh.store.count_references(ReferenceKind::Spell).await.unwrap(), 1);

        run(&mut sh, "add custom Guard 11 16 12").await;
        run(&mut sh, "notes hold the gate").await;
        assert_eq!(run(&mut sh, "suggest").await, "1 in the fight; notes: hold the gate");
    }

    #[tokio::test]
    async fn invalid_lookups_are_never_staged() {
        let mut sh = shell(Some(Box::new(FakeSource))).await;
        let err = sh.process("lookup item Cloak of Elvenkind").await.unwrap_err();
        assert!(err.contains("unknown rarity"));
        assert_eq!(run(&mut sh, "draft").await, "No draft.");
    }

    #[tokio::test]
    async fn failed_confirm_keeps_the_draft() {
        let mut sh = shell(None).await;
        sh.session.stage_draft(unsaveable_item("Cloak of Elvenkind"));

        let err = sh.process("confirm").await.unwrap_err();
        assert!(err.contains("draft is kept"));
        assert!(run(&mut sh, "draft").await.contains("Cloak of Elvenkind"));
        assert_eq!(sh.store.count_references(ReferenceKind::Item).await.unwrap(), 0);

        assert_eq!(run(&mut sh, "discard").await, "Discarded Cloak of Elvenkind.");
        assert_eq!(run(&mut sh, "draft").await, "No draft.");
    }

    #[tokio::test]
    async fn oversized_rolls_are_refused() {
        let mut sh = shell(None).await;
        let err = sh.process("roll 10000000d1000").await.unwrap_err();
        assert!(err.contains("between 1 and 20 dice"));
        assert!(sh.process("roll 20d100+20").await.is_ok());
    }

    #[tokio::test]
    async fn unknown_commands_and_quit() {
        let mut sh = shell(None).await;
        assert!(sh.process("dance").await.is_err());
        assert_eq!(run(&mut sh, "").await, "");
        assert!(is_quit(" QUIT "));
        assert!(!is_quit("quiet"));
        assert!(run(&mut sh, "help").await.contains("add custom"));
    }
}
