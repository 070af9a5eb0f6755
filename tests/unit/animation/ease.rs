use super::*;

#[test]
fn endpoints_are_fixed() {
    for ease in Ease::ALL {
        assert!(ease.apply(0.0).abs() < 1e-9, "{ease:?} at 0");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-9, "{ease:?} at 1");
    }
}

#[test]
fn polynomial_kinds_match_closed_forms() {
    assert_eq!(Ease::Linear.apply(0.3), 0.3);
    assert!((Ease::Quad.apply(0.5) - 0.25).abs() < 1e-12);
    assert!((Ease::Cubic.apply(0.5) - 0.125).abs() < 1e-12);
    assert!((Ease::InOutQuad.apply(0.5) - 0.5).abs() < 1e-12);
    assert!((Ease::InOutCubic.apply(0.5) - 0.5).abs() < 1e-12);
}

#[test]
fn back_overshoots_then_settles() {
    let peak = (1..100)
        .map(|i| Ease::Back.apply(i as f64 / 100.0))
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.0);
    assert!(peak < 1.2);
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::Quad.apply(-3.0), 0.0);
    assert_eq!(Ease::Quad.apply(7.0), 1.0);
}

#[test]
fn parse_aliases() {
    assert_eq!("QUAD".parse::<Ease>().unwrap(), Ease::Quad);
    assert_eq!("out_back".parse::<Ease>().unwrap(), Ease::Back);
    assert_eq!("in-out-cubic".parse::<Ease>().unwrap(), Ease::InOutCubic);
    assert!("bouncy".parse::<Ease>().is_err());
    for ease in Ease::ALL {
        assert_eq!(ease.name().parse::<Ease>().unwrap(), ease);
    }
}

#[test]
fn serde_uses_kebab_names() {
    let s = serde_json::to_string(&Ease::InOutQuad).unwrap();
    assert_eq!(s, "\"in-out-quad\"");
    let e: Ease = serde_json::from_str("\"back\"").unwrap();
    assert_eq!(e, Ease::Back);
}
