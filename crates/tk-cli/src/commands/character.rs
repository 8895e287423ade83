use clap::Subcommand;
use colored::Colorize;
use tk_core::{Ability, AbilityScores, Character, Skill, SpellSlots};
use tk_store::Store;

#[derive(Subcommand)]
pub enum CharacterAction {
    /// Create a character sheet
    New {
        /// Character name
        name: String,

        /// Campaign id to attach the character to
        #[arg(long)]
        campaign: Option<i64>,

        /// Player running the character
        #[arg(long, default_value = "")]
        player: String,

        /// Race or species
        #[arg(long, default_value = "")]
        race: String,

        /// Class
        #[arg(long, default_value = "")]
        class: String,

        /// Subclass
        #[arg(long, default_value = "")]
        subclass: String,

        /// Level (1-20)
        #[arg(long, default_value = "1")]
        level: i32,

        /// Background
        #[arg(long, default_value = "")]
        background: String,

        /// Alignment
        #[arg(long, default_value = "")]
        alignment: String,

        /// Maximum hit points (current starts full)
        #[arg(long, default_value = "0")]
        hp: i32,

        /// Armor class
        #[arg(long, default_value = "10")]
        ac: i32,

        /// Walking speed in feet
        #[arg(long, default_value = "30")]
        speed: i32,

        /// Ability scores, e.g. "STR=15,DEX=14,CON=13"; unlisted scores are 10
        #[arg(long, default_value = "")]
        scores: String,

        /// Saving throw proficiency (repeatable)
        #[arg(long = "save")]
        saves: Vec<Ability>,

        /// Skill proficiency (repeatable)
        #[arg(long = "skill")]
        skills: Vec<Skill>,

        /// Feature or trait (repeatable)
        #[arg(long = "feature")]
        features: Vec<String>,

        /// Equipment entry (repeatable)
        #[arg(long = "item")]
        equipment: Vec<String>,

        /// Fill spell slots from the full-caster table for this level
        #[arg(long)]
        caster: bool,

        /// Free-text notes
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// List characters
    List {
        /// Only characters in this campaign
        #[arg(long)]
        campaign: Option<i64>,
    },

    /// Show a full character sheet
    Show {
        /// Character id
        id: i64,
    },

    /// Delete a character
    Delete {
        /// Character id
        id: i64,
    },

    /// Damage (negative) or heal (positive) a character
    Hp {
        /// Character id
        id: i64,

        /// Hit point change, e.g. -7 or 5
        #[arg(allow_negative_numbers = true)]
        delta: i32,
    },
}

pub async fn run(store: &Store, action: CharacterAction) -> Result<(), String> {
    match action {
        CharacterAction::New {
            name,
            campaign,
            player,
            race,
            class,
            subclass,
            level,
            background,
            alignment,
            hp,
            ac,
            speed,
            scores,
            saves,
            skills,
            features,
            equipment,
            caster,
            notes,
        } => {
            let mut character = Character::new(name.trim());
            character.campaign_id = campaign;
            character.player_name = player;
            character.race = race;
            character.class = class;
            character.subclass = subclass;
            character.level = level;
            character.background = background;
            character.alignment = alignment;
            character.hp_max = hp;
            character.hp_current = hp;
            character.armor_class = ac;
            character.speed = speed;
            character.ability_scores = AbilityScores::default()
                .with_assignments(&scores)
                .map_err(|e| e.to_string())?;
            character.save_proficiencies = saves;
            character.skill_proficiencies = skills;
            character.features = features;
            character.equipment = equipment;
            if caster {
                character.spell_slots = SpellSlots::full_caster(level);
            }
            character.notes = notes;

            let id = store
                .save_character(&character)
                .await
                .map_err(|e| e.to_string())?;
            println!("  {} character {id}: {}", "Created".green().bold(), character.name);
        }
        CharacterAction::List { campaign } => list(store, campaign).await?,
        CharacterAction::Show { id } => {
            let character = store.get_character(id).await.map_err(|e| e.to_string())?;
            print_sheet(&character);
        }
        CharacterAction::Delete { id } => {
            store.delete_character(id).await.map_err(|e| e.to_string())?;
            println!("  {} character {id}", "Deleted".red().bold());
        }
        CharacterAction::Hp { id, delta } => {
            let hp = store.adjust_hp(id, delta).await.map_err(|e| e.to_string())?;
            let character = store.get_character(id).await.map_err(|e| e.to_string())?;
            let verb = if delta < 0 { "takes" } else { "heals" };
            println!(
                "  {} {verb} {}: HP {hp}/{}",
                character.name,
                delta.abs(),
                character.hp_max
            );
        }
    }
    Ok(())
}

async fn list(store: &Store, campaign: Option<i64>) -> Result<(), String> {
    let characters = store
        .list_characters(campaign)
        .await
        .map_err(|e| e.to_string())?;
    if characters.is_empty() {
        println!("  No characters found.");
        return Ok(());
    }

    let mut table = super::table(&["ID", "Name", "Player", "Race", "Class", "Lvl", "HP", "AC"]);
    for c in &characters {
        table.add_row(vec![
            c.id.unwrap_or_default().to_string(),
            c.name.clone(),
            super::cell(&c.player_name, 20),
            super::cell(&c.race, 20),
            super::cell(&c.class, 20),
            c.level.to_string(),
            format!("{}/{}", c.hp_current, c.hp_max),
            c.armor_class.to_string(),
        ]);
    }
    println!("{table}");
    super::footer(characters.len(), "character");
    Ok(())
}

fn signed(n: i32) -> String {
    format!("{n:+}")
}

fn print_sheet(c: &Character) {
    let class = [c.class.as_str(), c.subclass.as_str()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" / ");
    println!(
        "  {} [level {} {} {}]",
        c.name.bold(),
        c.level,
        c.race,
        class
    );
    if !c.player_name.is_empty() {
        println!("  player:     {}", c.player_name);
    }
    if !c.background.is_empty() {
        println!("  background: {}", c.background);
    }
    if !c.alignment.is_empty() {
        println!("  alignment:  {}", c.alignment);
    }
    println!();
    println!(
        "  HP {}/{} (+{} temp)   AC {}   Speed {} ft.   Init {}   Prof {}",
        c.hp_current,
        c.hp_max,
        c.hp_temp,
        c.armor_class,
        c.speed,
        signed(c.initiative_modifier()),
        signed(c.proficiency_bonus())
    );
    println!();

    let mut scores = super::table(&["", "Score", "Mod", "Save"]);
    for ability in Ability::ALL {
        let proficient = c.save_proficiencies.contains(&ability);
        let save = c.ability_scores.modifier(ability)
            + if proficient { c.proficiency_bonus() } else { 0 };
        scores.add_row(vec![
            ability.code().to_string(),
            c.ability_scores.get(ability).to_string(),
            signed(c.ability_scores.modifier(ability)),
            format!("{}{}", signed(save), if proficient { " *" } else { "" }),
        ]);
    }
    println!("{scores}");

    if !c.skill_proficiencies.is_empty() {
        let skills: Vec<String> = c
            .skill_proficiencies
            .iter()
            .map(|s| {
                let bonus = c.ability_scores.modifier(s.ability()) + c.proficiency_bonus();
                format!("{} {}", s.name(), signed(bonus))
            })
            .collect();
        println!("  skills:     {}", skills.join(", "));
    }
    if !c.features.is_empty() {
        println!("  features:   {}", c.features.join(", "));
    }
    if !c.equipment.is_empty() {
        println!("  equipment:  {}", c.equipment.join(", "));
    }
    println!("  currency:   {}", c.currency);

    if !c.spell_slots.0.is_empty() {
        let slots: Vec<String> = c
            .spell_slots
            .0
            .iter()
            .map(|(level, count)| format!("{level}: {count}"))
            .collect();
        println!("  slots:      {}", slots.join("  "));
    }
    for (level, spells) in &c.spells.0 {
        let label = if *level == 0 {
            "cantrips".to_string()
        } else {
            format!("level {level}")
        };
        println!("  {label:<11} {}", spells.join(", "));
    }
    if !c.notes.trim().is_empty() {
        println!();
        for line in c.notes.lines() {
            println!("  {}", line.trim());
        }
    }
}
