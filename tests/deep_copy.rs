//! End-to-end assertions over the public API: composites, containers,
//! identity policing, and the exact failure renderings.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use deepmatch::{deep_copy_matches, reflect_enum, reflect_struct, Matcher, MatcherConfig};

#[derive(Debug)]
struct ExampleOne {
    first_field: i64,
}
reflect_struct!(ExampleOne { first_field });

#[derive(Debug)]
struct Inner {
    value: i64,
}
reflect_struct!(Inner { value });

#[derive(Debug)]
struct Outer {
    inner: Inner,
}
reflect_struct!(Outer { inner });

fn description(outcome: deepmatch::MatchOutcome) -> String {
    assert!(!outcome.is_deep_copy, "expected a failed match");
    outcome.failure_description.expect("failure description")
}

#[test]
fn distinct_instances_with_equal_fields_match() {
    let a = ExampleOne { first_field: 4563 };
    let b = ExampleOne { first_field: 4563 };
    assert!(deep_copy_matches(&a, &b).is_deep_copy);
}

#[test]
fn an_instance_is_not_a_copy_of_itself() {
    let x = ExampleOne { first_field: 4563 };
    assert_eq!(
        description(deep_copy_matches(&x, &x)),
        "root: The same instance cannot be a deep copy of itself"
    );
}

#[test]
fn differing_field_reports_its_path() {
    let a = ExampleOne { first_field: 4563 };
    let b = ExampleOne { first_field: 4564 };
    assert_eq!(
        description(deep_copy_matches(&a, &b)),
        "root->first_field: 4563 != 4564"
    );
}

#[test]
fn first_differing_field_wins_in_declaration_order() {
    #[derive(Debug)]
    struct Two {
        first: i64,
        second: i64,
    }
    reflect_struct!(Two { first, second });

    let a = Two { first: 1, second: 2 };
    let b = Two { first: 9, second: 8 };
    assert_eq!(description(deep_copy_matches(&a, &b)), "root->first: 1 != 9");
}

#[test]
fn nested_composites_accumulate_path_segments() {
    let a = Outer { inner: Inner { value: 1 } };
    let b = Outer { inner: Inner { value: 2 } };
    assert_eq!(
        description(deep_copy_matches(&a, &b)),
        "root->inner->value: 1 != 2"
    );
}

#[test]
fn different_runtime_types_never_match() {
    let a = String::from("foo");
    let b = ExampleOne { first_field: 4535 };
    let expected = format!(
        "root: objects are not the same type ({} versus {})",
        std::any::type_name::<String>(),
        std::any::type_name::<ExampleOne>(),
    );
    assert_eq!(description(deep_copy_matches(&a, &b)), expected);
}

// ── value types ─────────────────────────────────────────────────────────

#[test]
fn equal_scalars_match_regardless_of_sharing() {
    assert!(deep_copy_matches(&5i64, &5i64).is_deep_copy);
    let shared = Rc::new(String::from("immutable text"));
    assert!(deep_copy_matches(&shared, &Rc::clone(&shared)).is_deep_copy);
}

#[test]
fn unequal_scalars_report_both_renderings() {
    assert_eq!(description(deep_copy_matches(&5i64, &6i64)), "root: 5 != 6");
    assert_eq!(
        description(deep_copy_matches(&String::from("a"), &String::from("b"))),
        "root: \"a\" != \"b\""
    );
}

#[test]
fn copied_nan_still_matches() {
    assert!(deep_copy_matches(&f64::NAN, &f64::NAN).is_deep_copy);
    assert_eq!(
        description(deep_copy_matches(&0.0f64, &-0.0f64)),
        "root: 0.0 != -0.0"
    );
}

#[derive(Debug)]
enum Color {
    Red,
    Green,
}
reflect_enum!(Color { Red, Green });

#[test]
fn equal_enum_variants_are_value_equality() {
    assert!(deep_copy_matches(&Color::Red, &Color::Red).is_deep_copy);
    assert_eq!(
        description(deep_copy_matches(&Color::Red, &Color::Green)),
        "root: Red != Green"
    );
}

#[derive(Debug, PartialEq)]
struct Timestamp(u64);
reflect_struct!(Timestamp { 0 });

#[test]
fn registered_value_types_tolerate_sharing() {
    let shared = Rc::new(Timestamp(1_700_000_000));

    // Unregistered, a shared composite is an identity violation.
    assert_eq!(
        description(deep_copy_matches(&shared, &Rc::clone(&shared))),
        "root: The same instance cannot be a deep copy of itself"
    );

    // Registered as an immutable value type, sharing is harmless.
    let config = MatcherConfig::default().with_value_type::<Timestamp>();
    let mut matcher = Matcher::with_config(config).expect("valid config");
    assert!(matcher.matches(&shared, &Rc::clone(&shared)).is_deep_copy);
    assert_eq!(
        description(matcher.matches(&Timestamp(5), &Timestamp(6))),
        "root: Timestamp(5) != Timestamp(6)"
    );
}

// ── null handling ───────────────────────────────────────────────────────

#[test]
fn both_absent_is_a_match() {
    let a: Option<i64> = None;
    let b: Option<i64> = None;
    assert!(deep_copy_matches(&a, &b).is_deep_copy);
}

#[test]
fn one_sided_absence_fails_with_null_rendering() {
    let a: Option<i64> = None;
    let b: Option<i64> = Some(5);
    assert_eq!(description(deep_copy_matches(&a, &b)), "root: None != 5");
}

#[test]
fn optional_field_mismatch_renders_at_the_field_path() {
    #[derive(Debug)]
    struct MaybeName {
        name: Option<String>,
    }
    reflect_struct!(MaybeName { name });

    let a = MaybeName {
        name: Some("ann".into()),
    };
    let b = MaybeName { name: None };
    assert_eq!(
        description(deep_copy_matches(&a, &b)),
        "root->name: \"ann\" != None"
    );
}

// ── arrays ──────────────────────────────────────────────────────────────

#[test]
fn primitive_long_arrays_report_the_divergent_index() {
    let a = [13i64, 5];
    let b = [13i64, 6];
    assert_eq!(description(deep_copy_matches(&a, &b)), "root->[1]: 5 != 6");
}

#[test]
fn primitive_array_kinds_are_each_covered() {
    assert!(deep_copy_matches(&[1i32, 2], &[1i32, 2]).is_deep_copy);
    assert!(deep_copy_matches(&[1.5f64], &[1.5f64]).is_deep_copy);
    assert!(deep_copy_matches(&[1.5f32], &[1.5f32]).is_deep_copy);
    assert!(deep_copy_matches(&[true, false], &[true, false]).is_deep_copy);
    assert!(deep_copy_matches(&[7u8, 8], &[7u8, 8]).is_deep_copy);
    assert_eq!(
        description(deep_copy_matches(&[7u8, 8], &[7u8, 9])),
        "root->[1]: 8 != 9"
    );
}

#[test]
fn object_array_length_mismatch_uses_the_absent_sentinel() {
    let a: Box<[i64]> = vec![10, 20, 30].into_boxed_slice();
    let b: Box<[i64]> = vec![10, 20].into_boxed_slice();
    assert_eq!(
        description(deep_copy_matches(&a, &b)),
        "root->[2]: 30 != <absent>"
    );
    assert_eq!(
        description(deep_copy_matches(&b, &a)),
        "root->[2]: <absent> != 30"
    );
}

#[test]
fn object_arrays_recurse_into_elements() {
    let a: Box<[ExampleOne]> = vec![ExampleOne { first_field: 1 }].into_boxed_slice();
    let b: Box<[ExampleOne]> = vec![ExampleOne { first_field: 2 }].into_boxed_slice();
    assert_eq!(
        description(deep_copy_matches(&a, &b)),
        "root->[0]->first_field: 1 != 2"
    );
}

// ── maps ────────────────────────────────────────────────────────────────

#[test]
fn disjoint_keys_fail_naming_the_offending_key() {
    let shared = Rc::new(ExampleOne { first_field: 24232 });
    let mut a: HashMap<String, Rc<ExampleOne>> = HashMap::new();
    a.insert("one".into(), Rc::clone(&shared));
    let mut b: HashMap<String, Rc<ExampleOne>> = HashMap::new();
    b.insert("two".into(), Rc::clone(&shared));

    assert_eq!(
        description(deep_copy_matches(&a, &b)),
        "root->get(one): ExampleOne { first_field: 24232 } != None"
    );
}

#[test]
fn map_value_mismatch_reports_the_key_path() {
    let a: BTreeMap<String, i64> = [("a".to_string(), 1), ("b".to_string(), 2)].into();
    let b: BTreeMap<String, i64> = [("a".to_string(), 1), ("b".to_string(), 3)].into();
    assert_eq!(
        description(deep_copy_matches(&a, &b)),
        "root->get(b): 2 != 3"
    );
}

#[test]
fn key_unique_to_the_copy_is_caught_by_the_second_pass() {
    let a: BTreeMap<String, i64> = [("a".to_string(), 1)].into();
    let b: BTreeMap<String, i64> = [("a".to_string(), 1), ("z".to_string(), 9)].into();
    assert_eq!(
        description(deep_copy_matches(&a, &b)),
        "root->get(z): None != 9"
    );
}

#[test]
fn equal_maps_with_distinct_values_match() {
    let a: BTreeMap<i64, Vec<String>> = [(1, vec!["x".to_string()])].into();
    let b: BTreeMap<i64, Vec<String>> = [(1, vec!["x".to_string()])].into();
    assert!(deep_copy_matches(&a, &b).is_deep_copy);
}

#[test]
fn shared_map_value_is_an_identity_violation() {
    let shared = Rc::new(ExampleOne { first_field: 8 });
    let a: BTreeMap<String, Rc<ExampleOne>> = [("k".to_string(), Rc::clone(&shared))].into();
    let b: BTreeMap<String, Rc<ExampleOne>> = [("k".to_string(), Rc::clone(&shared))].into();
    assert_eq!(
        description(deep_copy_matches(&a, &b)),
        "root->get(k): The same instance cannot be a deep copy of itself"
    );
}

#[test]
fn map_lookup_keys_on_the_rendered_key() {
    #[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
    struct Code(u8, u8);

    impl fmt::Display for Code {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}{}", self.0, self.1)
        }
    }

    // Code(1, 23) and Code(12, 3) both render "123"; the rendering is the
    // lookup identity, so the entries pair up.
    let a: BTreeMap<Code, i64> = [(Code(1, 23), 5)].into();
    let b: BTreeMap<Code, i64> = [(Code(12, 3), 5)].into();
    assert!(deep_copy_matches(&a, &b).is_deep_copy);
}

// ── collections ─────────────────────────────────────────────────────────

#[test]
fn ordered_collections_compare_positionally() {
    let a = vec![10i64, 20];
    let b = vec![10i64, 21];
    assert_eq!(
        description(deep_copy_matches(&a, &b)),
        "root->at(1): 20 != 21"
    );
}

#[test]
fn collection_length_mismatch_uses_the_absent_sentinel() {
    let a = vec![1i64, 2, 3];
    let b = vec![1i64, 2];
    assert_eq!(
        description(deep_copy_matches(&a, &b)),
        "root->at(2): 3 != <absent>"
    );
    assert_eq!(
        description(deep_copy_matches(&b, &a)),
        "root->at(2): <absent> != 3"
    );
}

#[test]
fn collections_of_composites_recurse_per_element() {
    let a = vec![ExampleOne { first_field: 1 }, ExampleOne { first_field: 2 }];
    let b = vec![ExampleOne { first_field: 1 }, ExampleOne { first_field: 3 }];
    assert_eq!(
        description(deep_copy_matches(&a, &b)),
        "root->at(1)->first_field: 2 != 3"
    );
}

#[test]
fn shared_element_inside_a_collection_is_caught() {
    let shared = Rc::new(ExampleOne { first_field: 4 });
    let a = vec![Rc::clone(&shared)];
    let b = vec![Rc::clone(&shared)];
    assert_eq!(
        description(deep_copy_matches(&a, &b)),
        "root->at(0): The same instance cannot be a deep copy of itself"
    );
}

#[test]
fn identical_collection_instance_fails_at_root() {
    let v = vec![1i64, 2];
    assert_eq!(
        description(deep_copy_matches(&v, &v)),
        "root: The same instance cannot be a deep copy of itself"
    );
}
