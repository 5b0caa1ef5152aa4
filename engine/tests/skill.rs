use chronicle_engine::skill::{SkillTestParams, evaluate, evaluate_npc, target_number};

fn params(tn: i32, focus: i32, comp: i32) -> SkillTestParams {
    SkillTestParams {
        target_number: tn,
        focus,
        complication_threshold: comp,
    }
}

#[test]
fn scores_each_die_against_tn_focus_and_complication() {
    let out = evaluate(&params(10, 5, 18), &[3, 12, 18], false);
    let per_die: Vec<_> = out.dice.iter().map(|d| (d.successes, d.complication)).collect();
    assert_eq!(per_die, vec![(2, false), (0, false), (0, true)]);
    assert_eq!(out.total_successes, 2);
    assert_eq!(out.total_complications, 1);
}

#[test]
fn auto_success_die_is_appended_as_a_one() {
    let out = evaluate(&params(10, 5, 18), &[15], true);
    assert_eq!(out.dice.len(), 2);
    let auto = out.dice[1];
    assert!(auto.auto);
    assert_eq!(auto.value, 1);
    assert_eq!(auto.successes, 2);
    assert_eq!(out.total_successes, 2);
}

#[test]
fn threshold_of_one_complicates_every_rolled_die() {
    let out = evaluate(&params(10, 0, 1), &[1, 7, 20], true);
    assert_eq!(out.total_complications, 3);
}

#[test]
fn dread_lowers_the_threshold() {
    let p = SkillTestParams::new(12, 2, 2);
    assert_eq!(p.complication_threshold, 18);
    assert_eq!(evaluate(&p, &[18], false).total_complications, 1);
    assert_eq!(evaluate(&p, &[17], false).total_complications, 0);
}

#[test]
fn npc_bands() {
    assert_eq!(evaluate_npc(10, 3, &[2, 9, 14]), 3);
    assert_eq!(evaluate_npc(10, 3, &[20, 20]), 0);
}

#[test]
fn tn_is_attribute_plus_expertise() {
    assert_eq!(target_number(10, 2), 12);
    assert_eq!(target_number(7, 0), 7);
    assert_eq!(target_number(i32::MAX, 3), i32::MAX);
}
