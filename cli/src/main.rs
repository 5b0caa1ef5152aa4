use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chronicle_engine::api::{self, SkillRequest};
use chronicle_cli::{load_store, read_text_auto};
use chronicle_engine::config::{RulesConfig, is_yaml};
use chronicle_engine::dread::DreadLadder;
use chronicle_engine::session::reroll_lines;
use chronicle_engine::store::{DataStore, MemoryStore, UpdateIntent};
use chronicle_engine::vehicle::{VehicleLocation, VehicleTrack};
use chronicle_engine::view::CharacterView;
use chronicle_engine::wounds::TrackKind;
use chronicle_engine::{DamageFormula, Dice, DieType, HitLocation, RerollSelection, RollSession};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, ValueEnum)]
enum Track {
    Head,
    Torso,
    RightArm,
    LeftArm,
    RightLeg,
    LeftLeg,
    Serious,
    Critical,
    Mental,
}

impl From<Track> for TrackKind {
    fn from(t: Track) -> Self {
        match t {
            Track::Head => TrackKind::Location(HitLocation::Head),
            Track::Torso => TrackKind::Location(HitLocation::Torso),
            Track::RightArm => TrackKind::Location(HitLocation::RightArm),
            Track::LeftArm => TrackKind::Location(HitLocation::LeftArm),
            Track::RightLeg => TrackKind::Location(HitLocation::RightLeg),
            Track::LeftLeg => TrackKind::Location(HitLocation::LeftLeg),
            Track::Serious => TrackKind::Serious,
            Track::Critical => TrackKind::Critical,
            Track::Mental => TrackKind::Mental,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum VLoc {
    Hull,
    Motive,
}

#[derive(Copy, Clone, ValueEnum)]
enum VTrack {
    Surface,
    System,
    Structural,
}

#[derive(Subcommand)]
enum Mark {
    /// Toggle one wound box
    Wound {
        #[arg(long)]
        character: String,
        #[arg(long, value_enum)]
        track: Track,
        /// Box number, counting from 1
        #[arg(long = "box", value_parser = clap::value_parser!(u32).range(1..))]
        index: u32,
    },
    /// Click a Dread box (numbered across tiers from 1)
    Dread {
        #[arg(long)]
        character: String,
        #[arg(long = "box", value_parser = clap::value_parser!(u32).range(1..))]
        index: u32,
    },
    /// Click a reload dot on a weapon
    Reload {
        #[arg(long)]
        character: String,
        #[arg(long)]
        weapon: String,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=5))]
        dot: u32,
    },
    /// Equip or unequip a weapon or armor piece
    Equip {
        #[arg(long)]
        character: String,
        #[arg(long)]
        item: String,
    },
    /// Click a vehicle damage box
    Vehicle {
        #[arg(long)]
        name: String,
        #[arg(long, value_enum)]
        location: VLoc,
        #[arg(long, value_enum)]
        track: VTrack,
        #[arg(long = "box", value_parser = clap::value_parser!(u32).range(1..))]
        index: u32,
    },
}

#[derive(Subcommand)]
enum Cmd {
    /// Validate a damage formula such as 3+2DSY
    Formula { text: String },
    /// Show a character sheet with derived tracks and bonuses
    Sheet {
        #[arg(long)]
        character: String,
        /// Print JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show a vehicle's damage tracks
    Vehicle {
        #[arg(long)]
        name: String,
    },
    /// Show the Dread ladder for a total
    Dread { total: u32 },
    /// Roll a player skill test
    Skill {
        #[arg(long)]
        character: String,
        #[arg(long)]
        skill: String,
        /// Number of d20 (clamped to the configured range)
        #[arg(long)]
        dice: Option<usize>,
        /// Spend a Chronicle Point for an auto-success die
        #[arg(long, default_value_t = false)]
        chronicle_point: bool,
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Write the session to this JSON file for later rerolls
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Roll a weapon attack with hit location
    Attack {
        #[arg(long)]
        character: String,
        #[arg(long)]
        weapon: String,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Roll damage from a formula, a weapon, or a vehicle's impact
    Damage {
        #[arg(long, conflicts_with_all = ["character", "vehicle"])]
        formula: Option<String>,
        #[arg(long, requires = "weapon")]
        character: Option<String>,
        #[arg(long)]
        weapon: Option<String>,
        #[arg(long, conflicts_with = "character")]
        vehicle: Option<String>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Roll an NPC skill test
    Npc {
        #[arg(long)]
        tn: i32,
        #[arg(long, default_value_t = 0)]
        focus: i32,
        #[arg(long, default_value_t = 2)]
        dice: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Reroll dice in a saved session; die numbers count from 1
    Reroll {
        #[arg(long)]
        session: PathBuf,
        #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(u32).range(1..))]
        d20: Vec<u32>,
        #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(u32).range(1..))]
        d6: Vec<u32>,
        /// Mixed with the session's dice, so repeated rerolls differ
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Apply a sheet update and write the content file back
    #[command(subcommand)]
    Mark(Mark),
}

#[derive(Parser)]
#[command(name = "chronicle")]
#[command(about = "Mutant Chronicles dice and combat sheet tools")]
struct Cli {
    /// Content file (YAML or JSON); defaults to the bundled sample sheets
    #[arg(long, global = true)]
    content: Option<PathBuf>,
    /// Rules overrides (YAML or JSON)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,
    /// Raise log verbosity (RUST_LOG takes precedence)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_rules(path: Option<&Path>) -> anyhow::Result<RulesConfig> {
    match path {
        Some(p) => RulesConfig::load(p),
        None => Ok(RulesConfig::default()),
    }
}

fn save_store(store: MemoryStore, path: &Path) -> anyhow::Result<()> {
    let bundle = store.into_bundle();
    let text = if is_yaml(path) {
        serde_yaml::to_string(&bundle)?
    } else {
        serde_json::to_string_pretty(&bundle)?
    };
    fs::write(path, text).with_context(|| format!("failed to write content: {}", path.display()))
}

fn save_session(session: &RollSession, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(session)?;
    fs::write(path, json).with_context(|| format!("failed to write session: {}", path.display()))
}

fn load_session(path: &Path) -> anyhow::Result<RollSession> {
    let text = read_text_auto(path)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse session: {}", path.display()))
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn print_sheet(v: &CharacterView) {
    println!("{}", v.name);
    println!(
        "MELEE BONUS {}  RANGED BONUS {}  CP {}/{}",
        v.melee_bonus, v.ranged_bonus, v.chronicle_points.value, v.chronicle_points.max
    );
    println!(
        "DREAD {} (effect {}, complications {}+)",
        v.dread.total,
        v.dread.active_effect,
        v.dread.complication_threshold()
    );
    for s in &v.skills {
        println!("  {:<16} TN {:>2}  focus {}", s.name, s.target_number, s.focus);
    }
    for loc in &v.locations {
        println!(
            "  {:<10} soak {}  {}",
            loc.label,
            loc.soak,
            boxes(&loc.track.filled)
        );
    }
    println!("  {:<10}         {}", "SERIOUS", boxes(&v.serious.filled));
    println!("  {:<10}         {}", "CRITICAL", boxes(&v.critical.filled));
    println!("  {:<10}         {}", "MENTAL", boxes(&v.mental.filled));
    for w in &v.weapons {
        let names: Vec<_> = w.qualities.iter().map(|q| q.name.as_str()).collect();
        println!(
            "  {} [{}] +{} DSY  {}",
            w.name,
            w.damage.as_deref().unwrap_or("-"),
            w.bonus,
            names.join(", ")
        );
    }
    if !v.armor.is_empty() {
        println!("  armor: {}", v.armor.join(", "));
    }
    if !v.traits.is_empty() {
        let names: Vec<_> = v.traits.iter().map(|q| q.name.as_str()).collect();
        println!("  traits: {}", names.join(", "));
    }
}

fn boxes(filled: &[bool]) -> String {
    filled.iter().map(|&b| if b { '■' } else { '□' }).collect()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let rules = load_rules(cli.rules.as_deref())?;

    match cli.cmd {
        Cmd::Formula { text } => {
            let f = DamageFormula::parse(&text)?;
            println!("{} => base={} dice={}", f, f.base, f.die_count);
        }
        Cmd::Sheet { character, json } => {
            let store = load_store(cli.content.as_deref())?;
            let view = api::character_view(&store, &character)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_sheet(&view);
            }
        }
        Cmd::Vehicle { name } => {
            let store = load_store(cli.content.as_deref())?;
            let view = api::vehicle_view(&store, &name)?;
            println!("{}", view.name);
            for loc in &view.locations {
                println!("  {} (soak {})", loc.label, loc.soak);
                for (label, t) in [
                    ("surface", &loc.surface),
                    ("system", &loc.system),
                    ("structural", &loc.structural),
                ] {
                    let checked: Vec<bool> = t.boxes.iter().map(|b| b.checked).collect();
                    println!("    {:<10} {}/{} {}", label, t.cur, t.max, boxes(&checked));
                }
            }
            if let Some(p) = &view.pilot {
                println!("  pilot: {}", p);
            }
        }
        Cmd::Dread { total } => {
            let ladder = DreadLadder::compute(total);
            for t in &ladder.tiers {
                let checked: Vec<bool> = t.boxes.iter().map(|b| b.checked).collect();
                println!(
                    "{:<6} {:<3} {} {}",
                    t.label,
                    t.code,
                    boxes(&checked),
                    if t.complete { "complete" } else { "" }
                );
            }
            println!(
                "effect {} => complications on {}+",
                ladder.active_effect,
                ladder.complication_threshold()
            );
        }
        Cmd::Skill {
            character,
            skill,
            dice,
            chronicle_point,
            seed,
            save,
        } => {
            let mut store = load_store(cli.content.as_deref())?;
            let cp_before = store
                .character(&character)
                .map(|c| c.chronicle_points.normalized().value);
            let req = SkillRequest {
                character: character.clone(),
                skill,
                d20_count: dice,
                use_chronicle_point: chronicle_point,
            };
            let mut rng = Dice::from_seed(seed);
            let session = api::roll_skill_test(&mut store, &req, &rules, &mut rng).await?;
            print_lines(&session.log_lines());

            let cp_after = store
                .character(&character)
                .map(|c| c.chronicle_points.normalized().value);
            if let (Some(before), Some(after)) = (cp_before, cp_after) {
                if before != after {
                    println!("[CP] {} → {}", before, after);
                    if let Some(path) = cli.content.as_deref() {
                        save_store(store, path)?;
                    }
                }
            }
            if let Some(path) = save {
                save_session(&session, &path)?;
            }
        }
        Cmd::Attack {
            character,
            weapon,
            seed,
            save,
        } => {
            let store = load_store(cli.content.as_deref())?;
            let mut rng = Dice::from_seed(seed);
            let session = api::roll_attack(&store, &character, &weapon, &rules, &mut rng).await?;
            print_lines(&session.log_lines());
            if let Some(path) = save {
                save_session(&session, &path)?;
            }
        }
        Cmd::Damage {
            formula,
            character,
            weapon,
            vehicle,
            seed,
        } => {
            let mut rng = Dice::from_seed(seed);
            let roll = match (formula, character, weapon, vehicle) {
                (Some(f), _, _, _) => {
                    let parsed = DamageFormula::parse(&f)?;
                    api::roll_damage("formula", parsed, &mut rng).await?
                }
                (None, Some(c), Some(w), _) => {
                    let store = load_store(cli.content.as_deref())?;
                    api::roll_weapon_damage(&store, &c, &w, &rules, &mut rng).await?
                }
                (None, None, _, Some(v)) => {
                    let store = load_store(cli.content.as_deref())?;
                    api::roll_vehicle_impact(&store, &v, &rules, &mut rng).await?
                }
                _ => bail!("pass --formula, --character with --weapon, or --vehicle"),
            };
            print_lines(&roll.log_lines());
        }
        Cmd::Npc {
            tn,
            focus,
            dice,
            seed,
        } => {
            let mut rng = Dice::from_seed(seed);
            let npc = api::roll_npc_skill(tn, focus, dice, &rules, &mut rng).await?;
            let faces: Vec<String> = npc.dice.iter().map(|d| d.to_string()).collect();
            println!("[NPC] TN={} focus={}", npc.target_number, npc.focus);
            println!("[D20] {}", faces.join(" | "));
            println!("[RESULT] successes={}", npc.successes);
        }
        Cmd::Reroll {
            session,
            d20,
            d6,
            seed,
        } => {
            let mut current = load_session(&session)?;
            let picks = d20
                .iter()
                .map(|&n| (DieType::D20, n as usize - 1))
                .chain(d6.iter().map(|&n| (DieType::D6, n as usize - 1)));
            let selection = RerollSelection::from_pairs(picks);
            let mut rng = Dice::from_seed(current.reroll_seed(seed.unwrap_or_default()));
            match current.apply_reroll(&selection, &mut rng).await? {
                Some(replaced) => {
                    print_lines(&reroll_lines(&replaced));
                    save_session(&current, &session)?;
                }
                None => println!("[REROLL] nothing to reroll"),
            }
            print_lines(&current.log_lines());
        }
        Cmd::Mark(mark) => {
            let Some(path) = cli.content.as_deref() else {
                bail!("mark needs --content so the change can be written back");
            };
            let mut store = load_store(Some(path))?;
            let (target, intent) = mark_intent(&store, mark)?;
            store.apply(&target, &intent)?;
            println!("{}", serde_json::to_string(&intent)?);
            save_store(store, path)?;
        }
    }
    Ok(())
}

fn mark_intent(store: &MemoryStore, mark: Mark) -> anyhow::Result<(String, UpdateIntent)> {
    let character = |name: &str| {
        store
            .character(name)
            .ok_or_else(|| anyhow::anyhow!("character '{}' not found", name))
    };
    Ok(match mark {
        Mark::Wound {
            character: name,
            track,
            index,
        } => {
            let c = character(&name)?;
            let intent = c.toggle_wound(track.into(), index as usize - 1);
            (c.name, intent)
        }
        Mark::Dread {
            character: name,
            index,
        } => {
            let c = character(&name)?;
            let intent = c.click_dread(index - 1);
            (c.name, intent)
        }
        Mark::Reload {
            character: name,
            weapon,
            dot,
        } => {
            let c = character(&name)?;
            let intent = c.click_reload(&weapon, dot - 1)?;
            (c.name, intent)
        }
        Mark::Equip {
            character: name,
            item,
        } => {
            let c = character(&name)?;
            let intent = c.toggle_equipped(&item)?;
            (c.name, intent)
        }
        Mark::Vehicle {
            name,
            location,
            track,
            index,
        } => {
            let v = store
                .vehicle(&name)
                .ok_or_else(|| anyhow::anyhow!("vehicle '{}' not found", name))?;
            let location = match location {
                VLoc::Hull => VehicleLocation::Hull,
                VLoc::Motive => VehicleLocation::Motive,
            };
            let track = match track {
                VTrack::Surface => VehicleTrack::Surface,
                VTrack::System => VehicleTrack::System,
                VTrack::Structural => VehicleTrack::Structural,
            };
            let intent = v.click_damage(location, track, index - 1);
            (v.name, intent)
        }
    })
}
