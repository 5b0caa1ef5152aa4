use chronicle_engine::HitLocation;

#[test]
fn band_edges() {
    let cases = [
        (1, HitLocation::Head),
        (2, HitLocation::Head),
        (3, HitLocation::Torso),
        (8, HitLocation::Torso),
        (9, HitLocation::RightArm),
        (11, HitLocation::RightArm),
        (12, HitLocation::LeftArm),
        (14, HitLocation::LeftArm),
        (15, HitLocation::RightLeg),
        (17, HitLocation::RightLeg),
        (18, HitLocation::LeftLeg),
        (20, HitLocation::LeftLeg),
    ];
    for (roll, want) in cases {
        assert_eq!(HitLocation::from_d20(Some(roll)), want, "d20={roll}");
    }
}

#[test]
fn missing_or_out_of_range_rolls_still_map() {
    assert_eq!(HitLocation::from_d20(None), HitLocation::Head);
    assert_eq!(HitLocation::from_d20(Some(0)), HitLocation::Head);
    assert_eq!(HitLocation::from_d20(Some(25)), HitLocation::LeftLeg);
}

#[test]
fn labels_are_uppercase_words() {
    assert_eq!(HitLocation::RightArm.to_string(), "RIGHT ARM");
    assert_eq!(HitLocation::LeftLeg.label(), "LEFT LEG");
}
