use super::*;

#[test]
fn verb_indices_match_slot_order() {
    for (index, verb) in RelativeVerb::ALL.iter().enumerate() {
        assert_eq!(verb.index(), index);
    }
    assert_eq!(RelativeVerb::AlignParentEnd.index(), VERB_COUNT - 1);
}

#[test]
fn builder_sets_sibling_and_parent_rules() {
    let rules = RuleSet::new()
        .sibling(RelativeVerb::Below, "header")
        .parent(RelativeVerb::CenterHorizontal);

    assert_eq!(
        rules.sibling_of(RelativeVerb::Below),
        Some(&AnchorId::new("header"))
    );
    assert_eq!(
        rules.get(RelativeVerb::CenterHorizontal),
        Some(&Anchor::Parent)
    );
    assert!(rules.sibling_of(RelativeVerb::CenterHorizontal).is_none());
    assert_eq!(rules.iter().count(), 2);
}

#[test]
fn start_rules_resolve_to_left_in_ltr() {
    let rules = RuleSet::new()
        .sibling(RelativeVerb::StartOf, "icon")
        .parent(RelativeVerb::AlignParentEnd);

    let resolved = rules.resolve(LayoutDirection::Ltr);
    assert_eq!(
        resolved.sibling_of(RelativeVerb::LeftOf),
        Some(&AnchorId::new("icon"))
    );
    assert!(resolved.is_set(RelativeVerb::AlignParentRight));
    assert!(!resolved.has_direction_relative_rules());
}

#[test]
fn start_rules_resolve_to_right_in_rtl() {
    let rules = RuleSet::new()
        .sibling(RelativeVerb::StartOf, "icon")
        .sibling(RelativeVerb::AlignEnd, "title");

    let resolved = rules.resolve(LayoutDirection::Rtl);
    assert_eq!(
        resolved.sibling_of(RelativeVerb::RightOf),
        Some(&AnchorId::new("icon"))
    );
    assert_eq!(
        resolved.sibling_of(RelativeVerb::AlignLeft),
        Some(&AnchorId::new("title"))
    );
}

#[test]
fn relative_rules_override_absolute_ones_on_the_same_edges() {
    let rules = RuleSet::new()
        .sibling(RelativeVerb::RightOf, "stale")
        .sibling(RelativeVerb::EndOf, "fresh");

    let resolved = rules.resolve(LayoutDirection::Ltr);
    assert_eq!(
        resolved.sibling_of(RelativeVerb::RightOf),
        Some(&AnchorId::new("fresh"))
    );
    assert!(!resolved.is_set(RelativeVerb::LeftOf));
}

#[test]
fn resolution_leaves_the_source_untouched() {
    let rules = RuleSet::new().parent(RelativeVerb::AlignParentStart);
    let _ = rules.resolve(LayoutDirection::Rtl);
    assert!(rules.is_set(RelativeVerb::AlignParentStart));
}
