use chronicle_engine::api::{self, SkillRequest};
use chronicle_engine::config::RulesConfig;
use chronicle_engine::dread::DreadLadder;
use chronicle_engine::session::reroll_lines;
use chronicle_engine::store::{ContentBundle, DataStore, MemoryStore};
use chronicle_engine::{DamageFormula, Dice, DieType, HitLocation, RerollSelection, RollSession};
use jni::objects::{JClass, JString};
use jni::sys::{jint, jstring};
use jni::JNIEnv;
use serde::Deserialize;
use serde_json::{json, Value};

fn envelope(env: &JNIEnv, payload: Value) -> jstring {
    match env.new_string(payload.to_string()) {
        Ok(s) => s.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

fn ok(env: &JNIEnv, value: Value) -> jstring {
    envelope(env, json!({ "ok": true, "result": value }))
}

fn err(env: &JNIEnv, e: impl std::fmt::Display) -> jstring {
    envelope(env, json!({ "ok": false, "error": e.to_string() }))
}

fn respond(env: &JNIEnv, result: Result<Value, String>) -> jstring {
    match result {
        Ok(v) => ok(env, v),
        Err(e) => err(env, e),
    }
}

fn read_input(env: &mut JNIEnv, json: &JString) -> Result<String, String> {
    env.get_string(json)
        .map(Into::into)
        .map_err(|e| format!("invalid_input: {}", e))
}

fn to_value(v: impl serde::Serialize) -> Result<Value, String> {
    serde_json::to_value(v).map_err(|e| e.to_string())
}

fn block_on<F: std::future::Future>(fut: F) -> Result<F::Output, String> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(|e| format!("runtime: {}", e))?;
    Ok(rt.block_on(fut))
}

#[derive(Deserialize)]
struct SheetInput {
    #[serde(default)]
    content: ContentBundle,
    character: String,
}

#[derive(Deserialize)]
struct SkillInput {
    #[serde(default)]
    content: ContentBundle,
    #[serde(flatten)]
    request: SkillRequest,
    #[serde(default)]
    seed: u64,
}

#[derive(Deserialize)]
struct AttackInput {
    #[serde(default)]
    content: ContentBundle,
    character: String,
    weapon: String,
    #[serde(default)]
    seed: u64,
}

#[derive(Deserialize)]
struct RerollInput {
    session: RollSession,
    #[serde(default)]
    d20: Vec<usize>,
    #[serde(default)]
    d6: Vec<usize>,
    #[serde(default)]
    seed: Option<u64>,
}

fn session_value(session: &RollSession) -> Result<Value, String> {
    Ok(json!({
        "session": to_value(session)?,
        "outcome": to_value(session.outcome())?,
        "lines": session.log_lines(),
    }))
}

pub fn parse_formula_internal(input: &str) -> Result<Value, String> {
    let f = DamageFormula::parse(input).map_err(|e| e.to_string())?;
    Ok(json!({ "base": f.base, "die_count": f.die_count, "display": f.to_string() }))
}

pub fn hit_location_internal(roll: i32) -> Value {
    let roll = u8::try_from(roll.clamp(0, 255)).ok();
    let loc = HitLocation::from_d20(roll);
    json!({ "location": loc, "label": loc.label() })
}

pub fn dread_internal(total: i32) -> Result<Value, String> {
    to_value(DreadLadder::compute(total.max(0) as u32))
}

pub fn character_view_internal(input: &str) -> Result<Value, String> {
    let req: SheetInput = serde_json::from_str(input).map_err(|e| format!("invalid_config: {}", e))?;
    let store = MemoryStore::from_bundle(req.content);
    let view = api::character_view(&store, &req.character).map_err(|e| e.to_string())?;
    to_value(view)
}

/// Returns the session plus the sheet as it stands after any Chronicle Point spend.
pub fn skill_test_internal(input: &str) -> Result<Value, String> {
    let req: SkillInput = serde_json::from_str(input).map_err(|e| format!("invalid_config: {}", e))?;
    let mut store = MemoryStore::from_bundle(req.content);
    let mut dice = Dice::from_seed(req.seed);
    let session = block_on(api::roll_skill_test(
        &mut store,
        &req.request,
        &RulesConfig::default(),
        &mut dice,
    ))?
    .map_err(|e| e.to_string())?;
    let mut out = session_value(&session)?;
    out["character"] = to_value(store.character(&req.request.character))?;
    Ok(out)
}

pub fn attack_internal(input: &str) -> Result<Value, String> {
    let req: AttackInput = serde_json::from_str(input).map_err(|e| format!("invalid_config: {}", e))?;
    let store = MemoryStore::from_bundle(req.content);
    let mut dice = Dice::from_seed(req.seed);
    let session = block_on(api::roll_attack(
        &store,
        &req.character,
        &req.weapon,
        &RulesConfig::default(),
        &mut dice,
    ))?
    .map_err(|e| e.to_string())?;
    session_value(&session)
}

/// Indices are zero-based here; the JVM side owns presentation numbering.
pub fn reroll_internal(input: &str) -> Result<Value, String> {
    let req: RerollInput = serde_json::from_str(input).map_err(|e| format!("invalid_config: {}", e))?;
    let mut session = req.session;
    let selection = RerollSelection::from_pairs(
        req.d20
            .iter()
            .map(|&i| (DieType::D20, i))
            .chain(req.d6.iter().map(|&i| (DieType::D6, i))),
    );
    let mut dice = Dice::from_seed(session.reroll_seed(req.seed.unwrap_or_default()));
    let replaced = block_on(session.apply_reroll(&selection, &mut dice))?.map_err(|e| e.to_string())?;
    let mut out = session_value(&session)?;
    out["rerolled"] = json!(replaced.as_deref().map(reroll_lines).unwrap_or_default());
    Ok(out)
}

#[no_mangle]
pub extern "system" fn Java_com_chronicle_Ffi_version<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jstring {
    match env.new_string(concat!("chronicle-ffi ", env!("CARGO_PKG_VERSION"))) {
        Ok(s) => s.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

#[no_mangle]
pub extern "system" fn Java_com_chronicle_Ffi_parseFormulaJson(
    mut env: JNIEnv,
    _class: JClass,
    text: JString,
) -> jstring {
    let result = read_input(&mut env, &text).and_then(|s| parse_formula_internal(&s));
    respond(&env, result)
}

#[no_mangle]
pub extern "system" fn Java_com_chronicle_Ffi_hitLocationJson(
    env: JNIEnv,
    _class: JClass,
    roll: jint,
) -> jstring {
    ok(&env, hit_location_internal(roll))
}

#[no_mangle]
pub extern "system" fn Java_com_chronicle_Ffi_dreadJson(
    env: JNIEnv,
    _class: JClass,
    total: jint,
) -> jstring {
    respond(&env, dread_internal(total))
}

#[no_mangle]
pub extern "system" fn Java_com_chronicle_Ffi_characterViewJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    let result = read_input(&mut env, &json).and_then(|s| character_view_internal(&s));
    respond(&env, result)
}

#[no_mangle]
pub extern "system" fn Java_com_chronicle_Ffi_skillTestJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    let result = read_input(&mut env, &json).and_then(|s| skill_test_internal(&s));
    respond(&env, result)
}

#[no_mangle]
pub extern "system" fn Java_com_chronicle_Ffi_attackJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    let result = read_input(&mut env, &json).and_then(|s| attack_internal(&s));
    respond(&env, result)
}

#[no_mangle]
pub extern "system" fn Java_com_chronicle_Ffi_rerollJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    let result = read_input(&mut env, &json).and_then(|s| reroll_internal(&s));
    respond(&env, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = r#"{
        "content": {
            "characters": [{
                "name": "Kira",
                "attributes": { "coordination": 10, "awareness": 12, "physique": 9, "strength": 9 },
                "skills": { "Ranged Weapons": { "attribute": "coordination", "expertise": 2, "focus": 1 } },
                "chronicle_points": { "value": 1, "max": 3 },
                "weapons": [{ "name": "Pistol", "range": "close", "damage": "1+2DSY", "equipped": true }]
            }]
        },
        "character": "Kira"
    }"#;

    #[test]
    fn formula_errors_are_strings() {
        assert_eq!(parse_formula_internal("0+DSY").unwrap()["die_count"], 1);
        assert!(parse_formula_internal("1d6").unwrap_err().contains("X+DSY"));
    }

    #[test]
    fn hit_location_clamps_input() {
        assert_eq!(hit_location_internal(9)["label"], "RIGHT ARM");
        assert_eq!(hit_location_internal(-4)["label"], "HEAD");
        assert_eq!(hit_location_internal(400)["label"], "LEFT LEG");
    }

    #[test]
    fn view_from_inline_content() {
        let view = character_view_internal(SHEET).unwrap();
        assert_eq!(view["ranged_bonus"], 3);
        assert_eq!(view["skills"][0]["target_number"], 12);
    }

    #[test]
    fn skill_test_spends_the_point() {
        let input = SHEET.replacen(
            r#""character": "Kira""#,
            r#""character": "Kira", "skill": "Ranged Weapons", "use_chronicle_point": true, "seed": 5"#,
            1,
        );
        let out = skill_test_internal(&input).unwrap();
        assert_eq!(out["character"]["chronicle_points"]["value"], 0);
        assert_eq!(out["outcome"]["dice"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn attack_then_reroll_keeps_history() {
        let input = SHEET.replacen(
            r#""character": "Kira""#,
            r#""character": "Kira", "weapon": "pistol", "seed": 3"#,
            1,
        );
        let attack = attack_internal(&input).unwrap();
        // 2 formula dice + 3 bonus from Awareness 12.
        assert_eq!(attack["session"]["d6"].as_array().unwrap().len(), 5);

        let reroll = json!({ "session": attack["session"], "d6": [0, 4], "seed": 8 });
        let out = reroll_internal(&reroll.to_string()).unwrap();
        assert_eq!(out["session"]["history"].as_array().unwrap().len(), 1);
        assert_eq!(out["rerolled"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn repeated_rerolls_without_a_seed_draw_new_faces() {
        let input = SHEET.replacen(
            r#""character": "Kira""#,
            r#""character": "Kira", "weapon": "pistol", "seed": 3"#,
            1,
        );
        let mut session = attack_internal(&input).unwrap()["session"].clone();
        let mut locations = vec![session["d20"][0].as_u64().unwrap()];
        for _ in 0..5 {
            let reroll = json!({ "session": session, "d20": [0] });
            session = reroll_internal(&reroll.to_string()).unwrap()["session"].clone();
            locations.push(session["d20"][0].as_u64().unwrap());
        }
        assert!(locations.iter().any(|&l| l != locations[0]), "{:?}", locations);
    }

    #[test]
    fn bad_json_is_reported() {
        assert!(reroll_internal("{").unwrap_err().starts_with("invalid_config"));
    }
}
