use clap::Parser;
use chronicle_cli::load_store;
use chronicle_engine::config::DEFAULT_DAMAGE_FORMULA;
use chronicle_engine::store::DataStore;
use chronicle_engine::symmetry::{SymmetryTally, attack_dice};
use chronicle_engine::{DamageFormula, Dice, DieType, HitLocation};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "damage-stats")]
#[command(about = "Monte Carlo sim: damage spread of a DSY formula or a character's weapon")]
struct Args {
    /// Damage formula (e.g. 2+3DSY); overrides --weapon
    #[arg(long)]
    formula: Option<String>,

    /// Character whose weapon and attribute bonus to use
    #[arg(long)]
    character: Option<String>,

    /// Weapon name on that character
    #[arg(long)]
    weapon: Option<String>,

    /// Extra DSY on top of the formula (added to the attribute bonus)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    bonus: i64,

    /// Soak subtracted from each hit
    #[arg(long, default_value_t = 0)]
    soak: u32,

    /// Number of trials
    #[arg(long, default_value_t = 1000)]
    trials: u32,

    /// RNG seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Optional content file (YAML or JSON); defaults to the bundled sample sheets
    #[arg(long)]
    content: Option<PathBuf>,
}

fn percentile(sorted: &[u32], p: f64) -> u32 {
    if sorted.is_empty() {
        return 0;
    }
    let idx = ((sorted.len() - 1) as f64 * p).round() as usize;
    sorted[idx]
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Resolve formula and bonus
    let (label, formula, attr_bonus) = match (&args.formula, &args.character, &args.weapon) {
        (Some(f), _, _) => (f.clone(), DamageFormula::parse(f)?, 0u32),
        (None, Some(c), Some(w)) => {
            let store = load_store(args.content.as_deref())?;
            let ch = store
                .character(c)
                .ok_or_else(|| anyhow::anyhow!("character '{}' not found", c))?;
            let weapon = ch.weapon(w)?;
            let raw = weapon.damage.clone().unwrap_or_else(|| DEFAULT_DAMAGE_FORMULA.to_string());
            (
                format!("{} ({})", weapon.name, raw),
                DamageFormula::parse(&raw)?,
                ch.bonus_for(weapon),
            )
        }
        _ => anyhow::bail!("pass --formula, or --character with --weapon"),
    };
    let dsy = attack_dice(formula, i64::from(attr_bonus) + args.bonus) as usize;

    // Stats
    let mut damages: Vec<u32> = Vec::with_capacity(args.trials as usize);
    let mut effect_total = 0u64;
    let mut with_effect = 0u32;
    let mut zero_after_soak = 0u32;
    let mut locations = [0u32; 6];

    for i in 0..args.trials {
        let mut rng = Dice::from_seed(args.seed.wrapping_add(i as u64));
        let faces = rng.roll_many(DieType::D6, dsy)?;
        let tally = SymmetryTally::from_faces(&faces);
        let dealt = tally.total_damage(formula.base).saturating_sub(args.soak);
        if dealt == 0 {
            zero_after_soak += 1;
        }
        if tally.total_effect > 0 {
            with_effect += 1;
        }
        effect_total += tally.total_effect as u64;
        damages.push(dealt);

        let loc = HitLocation::from_d20(Some(rng.d20()?));
        if let Some(pos) = HitLocation::ALL.iter().position(|&l| l == loc) {
            locations[pos] += 1;
        }
    }

    damages.sort_unstable();
    let trials_f = args.trials.max(1) as f64;
    let avg_damage = damages.iter().map(|&d| d as u64).sum::<u64>() as f64 / trials_f;
    let avg_effects = effect_total as f64 / trials_f;

    println!("damage-stats results");
    println!("--------------------");
    println!("trials:             {}", args.trials);
    println!("damage:             {}", label);
    println!("dsy rolled:         {} (base {})", dsy, formula.base);
    println!("soak:               {}", args.soak);
    println!();
    println!("avg damage:         {:.2}", avg_damage);
    println!("median damage:      {}", percentile(&damages, 0.5));
    println!("90th percentile:    {}", percentile(&damages, 0.9));
    println!("max damage:         {}", damages.last().copied().unwrap_or(0));
    println!("fully soaked:       {:.1}%", zero_after_soak as f64 / trials_f * 100.0);
    println!("avg effects:        {:.2}", avg_effects);
    println!("any effect:         {:.1}%", with_effect as f64 / trials_f * 100.0);
    println!();
    for (loc, count) in HitLocation::ALL.iter().zip(locations) {
        println!("{:<20}{:.1}%", format!("{}:", loc), count as f64 / trials_f * 100.0);
    }

    Ok(())
}
