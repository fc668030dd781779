use super::*;

#[test]
fn start_end_margins_override_left_right_in_ltr() {
    let margins = Margins::new(1, 2, 3, 4).with_start(10).with_end(20);
    let resolved = margins.resolve(LayoutDirection::Ltr);
    assert_eq!(resolved.left, 10);
    assert_eq!(resolved.right, 20);
    assert_eq!(resolved.top, 2);
    assert_eq!(resolved.bottom, 4);
}

#[test]
fn start_end_margins_swap_sides_in_rtl() {
    let margins = Margins::new(1, 0, 3, 0).with_start(10);
    let resolved = margins.resolve(LayoutDirection::Rtl);
    assert_eq!(resolved.right, 10);
    assert_eq!(resolved.left, 1);
}

#[test]
fn basic_intent_has_no_margins() {
    let intent = LayoutIntent::fixed(40, 20);
    assert!(intent.margins().is_none());
    assert_eq!(
        intent.resolved_margins(LayoutDirection::Ltr),
        ResolvedMargins::ZERO
    );
    assert_eq!(intent.width(), Dimension::Fixed(40));
    assert_eq!(intent.dimension(Orientation::Vertical), Dimension::Fixed(20));
}

#[test]
fn linear_intent_exposes_margins_and_weight() {
    let intent: LayoutIntent = LinearIntent::new(Dimension::MatchParent, Dimension::Fixed(0))
        .with_weight(2.0)
        .with_margins(Margins::uniform(4))
        .into();

    assert_eq!(intent.kind(), IntentKind::Linear);
    assert_eq!(intent.resolved_margins(LayoutDirection::Ltr).horizontal(), 8);
    assert_eq!(intent.as_linear().map(|linear| linear.weight), Some(2.0));
    assert!(intent.as_relative().is_none());
}

#[test]
fn negative_weights_are_clamped() {
    let intent = LinearIntent::new(Dimension::WrapContent, Dimension::WrapContent).with_weight(-3.0);
    assert_eq!(intent.weight, 0.0);
    let nan = LinearIntent::default().with_weight(f32::NAN);
    assert_eq!(nan.weight, 0.0);
}

#[test]
fn with_size_keeps_variant_specific_fields() {
    let original: LayoutIntent = LinearIntent::new(Dimension::WrapContent, Dimension::Fixed(0))
        .with_weight(1.0)
        .into();
    let resized = original.with_size(Dimension::Fixed(12), Dimension::WrapContent);

    assert_eq!(resized.width(), Dimension::Fixed(12));
    assert_eq!(resized.height(), Dimension::WrapContent);
    assert_eq!(resized.as_linear().map(|linear| linear.weight), Some(1.0));
    assert_eq!(original.height(), Dimension::Fixed(0));
}
