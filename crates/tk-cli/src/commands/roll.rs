use colored::Colorize;
use tk_mechanics::{CheckKind, DiceRequest, Resolution, RollMode, Session};
use tk_store::Store;

use crate::config::AppConfig;

fn print_resolution(label: &str, resolution: &Resolution) {
    println!("  {}", resolution.trace(label));
    println!("  Total: {}", resolution.total.to_string().bold());
}

pub fn run(
    config: &AppConfig,
    expr: &str,
    adv: bool,
    dis: bool,
    seed: Option<u64>,
) -> Result<(), String> {
    let request: DiceRequest = expr.parse().map_err(|e: tk_mechanics::MechError| e.to_string())?;
    let request = request.with_mode(RollMode::from_flags(adv, dis));

    let mut session = Session::new(config.session(seed));
    let label = request.to_string();
    let resolution = session.roll(&label, &request);
    print_resolution(&label, &resolution);
    Ok(())
}

pub async fn check(
    store: &Store,
    config: &AppConfig,
    character_id: i64,
    check: &str,
    adv: bool,
    dis: bool,
    seed: Option<u64>,
) -> Result<(), String> {
    let kind: CheckKind = check.parse().map_err(|e: tk_mechanics::MechError| e.to_string())?;
    let character = store
        .get_character(character_id)
        .await
        .map_err(|e| e.to_string())?;

    let mut session = Session::new(config.session(seed));
    let resolution = session.check(&character, kind, RollMode::from_flags(adv, dis));
    print_resolution(&kind.label(&character), &resolution);
    Ok(())
}
