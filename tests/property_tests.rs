//! Property-based tests for casebench
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use casebench::backend::{DriverGenerator, Runtime};
use casebench::compare::compare;
use casebench::model::ProblemSignature;
use casebench_core::canonical::{self, Tree, Value};
use casebench_core::{OpaqueTypePolicy, TypeDescriptor};
use proptest::prelude::*;

/// Level-order slots whose first slot is present.
fn tree_slots() -> impl Strategy<Value = Vec<Option<i64>>> {
    (
        -1000i64..1000,
        prop::collection::vec(prop::option::weighted(0.7, -1000i64..1000), 0..24),
    )
        .prop_map(|(root, rest)| {
            let mut slots = vec![Some(root)];
            slots.extend(rest);
            slots
        })
}

fn slots_literal(slots: &[Option<i64>]) -> String {
    let items: Vec<String> = slots
        .iter()
        .map(|s| s.map_or_else(|| "null".to_string(), |n| n.to_string()))
        .collect();
    format!("[{}]", items.join(","))
}

/// Insert a space after every comma and inside the brackets.
fn spaced(literal: &str) -> String {
    literal.replace(',', ", ").replace('[', "[ ").replace(']', " ]")
}

// =============================================================================
// Canonical encoding
// =============================================================================

proptest! {
    /// Property: a canonical tree literal decodes to the same tree
    #[test]
    fn tree_canonical_form_is_stable(slots in tree_slots()) {
        let tree = Tree::from_level_order(&slots);
        let once = canonical::encode(&Value::BinaryTree(tree.clone()));
        let decoded = canonical::decode(&once, &TypeDescriptor::BinaryTree).unwrap();
        prop_assert_eq!(&decoded, &Value::BinaryTree(tree));
        prop_assert_eq!(canonical::encode(&decoded), once);
    }

    /// Property: canonical tree output never ends with a null slot
    #[test]
    fn tree_encoding_drops_trailing_nulls(slots in tree_slots()) {
        let encoded = canonical::canonicalize(&slots_literal(&slots), &TypeDescriptor::BinaryTree).unwrap();
        prop_assert!(!encoded.ends_with(",null]"));
    }

    /// Property: linked lists keep element order
    #[test]
    fn linked_list_round_trip(items in prop::collection::vec(-10_000i64..10_000, 0..32)) {
        let value = Value::LinkedList(items.clone());
        let literal = canonical::encode(&value);
        prop_assert_eq!(canonical::decode(&literal, &TypeDescriptor::LinkedList).unwrap(), value);
    }
}

// =============================================================================
// Comparator
// =============================================================================

proptest! {
    /// Property: whitespace never affects an array comparison
    #[test]
    fn comparison_ignores_whitespace(items in prop::collection::vec(-500i64..500, 0..16)) {
        let expected = canonical::encode(&Value::IntegerArray(items));
        prop_assert!(compare(&spaced(&expected), &expected, &TypeDescriptor::IntegerArray));
        let padded = format!("  {}\n", expected);
        prop_assert!(compare(&padded, &expected, &TypeDescriptor::IntegerArray));
    }

    /// Property: arrays compare in order
    #[test]
    fn comparison_is_order_sensitive(items in prop::collection::vec(-500i64..500, 2..16)) {
        let mut reversed = items.clone();
        reversed.reverse();
        prop_assume!(reversed != items);
        let expected = canonical::encode(&Value::IntegerArray(items));
        let actual = canonical::encode(&Value::IntegerArray(reversed));
        prop_assert!(!compare(&actual, &expected, &TypeDescriptor::IntegerArray));
    }

    /// Property: scalars compare exactly after whitespace removal
    #[test]
    fn scalar_comparison(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
        let same = compare(&format!(" {} ", a), &b.to_string(), &TypeDescriptor::Integer);
        prop_assert_eq!(same, a == b);
    }
}

// =============================================================================
// Driver generation
// =============================================================================

const TYPE_TOKENS: &[&str] = &[
    "integer", "double", "boolean", "string", "integer[]", "string[]", "ListNode", "TreeNode",
];

fn signature() -> impl Strategy<Value = ProblemSignature> {
    (
        "solve[A-Z][a-z]{0,6}",
        prop::collection::btree_map("p[a-z]{1,6}", prop::sample::select(TYPE_TOKENS), 0..5),
        prop::sample::select(TYPE_TOKENS),
    )
        .prop_map(|(name, params, ret)| {
            let params: Vec<(&str, &str)> = params.iter().map(|(n, t)| (n.as_str(), *t)).collect();
            ProblemSignature::from_tokens(&name, &params, ret, OpaqueTypePolicy::Reject).unwrap()
        })
}

fn runtime() -> impl Strategy<Value = Runtime> {
    prop::sample::select(Runtime::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: generation is a pure function of its inputs
    #[test]
    fn generation_is_deterministic(sig in signature(), runtime in runtime()) {
        let generator = DriverGenerator::new();
        let first = generator.generate(&sig, "// solution\n", runtime).unwrap();
        let second = generator.generate(&sig, "// solution\n", runtime).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: every parameter gets its own decoded local
    #[test]
    fn generation_declares_every_parameter(sig in signature(), runtime in runtime()) {
        let program = DriverGenerator::new().generate(&sig, "// solution\n", runtime).unwrap();
        for param in sig.params() {
            let local = format!("arg_{}", param.name);
            prop_assert!(program.source.contains(&local), "missing {}", local);
        }
    }
}
