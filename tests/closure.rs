//! Closure integration tests over synthetic in-memory class sets.
//!
//! These exercise the full sweep behavior observable through the public API: root
//! visibility, dependency chasing through descriptors, signatures and exceptions,
//! exclusion prefixes, and the warn-and-drop handling of unresolvable names.

use std::collections::{HashMap, HashSet};

use stubjar::{prelude::*, Result};

#[path = "../src/test/classbuilder.rs"]
#[allow(dead_code)]
mod classbuilder;

use classbuilder::{ClassBuilder, ACC_ABSTRACT, ACC_PRIVATE, ACC_PROTECTED, ACC_PUBLIC};

fn names<S: ClassSource>(engine: &ClosureEngine<S>) -> HashSet<String> {
    engine.type_names().map(str::to_string).collect()
}

/// A public root `pkg/A` whose visible members reach `pkg/B` and `pkg/C`; a private
/// member referencing `pkg/Hidden` contributes nothing, and the `plat/` prefix is
/// excluded. Mirrors the smallest realistic API-surface shape.
fn abc_source() -> HashMap<String, Vec<u8>> {
    let a = ClassBuilder::new(ACC_PUBLIC, "pkg/A")
        .field(ACC_PUBLIC, "c", "Lpkg/C;")
        .field(ACC_PRIVATE, "secret", "Lpkg/Hidden;")
        .method(ACC_PUBLIC, "b", "()Lpkg/B;")
        .method(ACC_PROTECTED, "helper", "(Lplat/Util;)V")
        .build();
    let b = ClassBuilder::new(0, "pkg/B")
        .field(ACC_PUBLIC, "flag", "Z")
        .field(ACC_PRIVATE, "hidden", "Lpkg/Hidden;")
        .build();
    let c = ClassBuilder::new(ACC_PUBLIC, "pkg/C").build();
    let hidden = ClassBuilder::new(0, "pkg/Hidden").build();
    let util = ClassBuilder::new(ACC_PUBLIC, "plat/Util")
        .method(ACC_PUBLIC, "leak", "()Lpkg/D;")
        .build();
    let d = ClassBuilder::new(ACC_PUBLIC, "pkg/D").build();

    let mut source = HashMap::new();
    source.insert("pkg/A".to_string(), a);
    source.insert("pkg/B".to_string(), b);
    source.insert("pkg/C".to_string(), c);
    source.insert("pkg/Hidden".to_string(), hidden);
    source.insert("plat/Util".to_string(), util);
    source.insert("pkg/D".to_string(), d);
    source
}

fn plat_excluded() -> ExclusionPrefixes {
    let mut exclusions = ExclusionPrefixes::default();
    exclusions.add("plat/");
    exclusions
}

#[test]
fn closure_reaches_exactly_the_visible_surface() -> Result<()> {
    let mut engine = ClosureEngine::new(abc_source(), plat_excluded());
    engine.fill(["pkg/A".to_string()])?;

    let expected: HashSet<String> = ["pkg/A", "pkg/B", "pkg/C"]
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(names(&engine), expected);
    Ok(())
}

#[test]
fn invisible_root_yields_empty_closure() -> Result<()> {
    let mut engine = ClosureEngine::new(abc_source(), plat_excluded());
    engine.fill(["pkg/Hidden".to_string()])?;

    assert_eq!(engine.type_names().count(), 0);
    Ok(())
}

#[test]
fn excluded_class_is_neither_stubbed_nor_scanned() -> Result<()> {
    // Without the exclusion, plat/Util would be retained and would drag pkg/D in.
    let mut engine = ClosureEngine::new(abc_source(), ExclusionPrefixes::empty());
    engine.fill(["pkg/A".to_string()])?;
    assert!(names(&engine).contains("plat/Util"));
    assert!(names(&engine).contains("pkg/D"));

    let mut engine = ClosureEngine::new(abc_source(), plat_excluded());
    engine.fill(["pkg/A".to_string()])?;
    assert!(!names(&engine).contains("plat/Util"));
    assert!(!names(&engine).contains("pkg/D"));
    Ok(())
}

#[test]
fn generic_signatures_and_exceptions_are_chased() -> Result<()> {
    let service = ClassBuilder::new(ACC_PUBLIC, "api/Service")
        .field_with_signature(
            ACC_PUBLIC,
            "items",
            "Ljava/util/List;",
            "Ljava/util/List<Lapi/Item;>;",
        )
        .method_full(
            ACC_PUBLIC | ACC_ABSTRACT,
            "run",
            "()V",
            None,
            &["api/ServiceException"],
        )
        .build();
    let item = ClassBuilder::new(ACC_PUBLIC, "api/Item").build();
    let exception = ClassBuilder::new(ACC_PUBLIC, "api/ServiceException").build();

    let mut source = HashMap::new();
    source.insert("api/Service".to_string(), service);
    source.insert("api/Item".to_string(), item);
    source.insert("api/ServiceException".to_string(), exception);

    let mut engine = ClosureEngine::new(source, ExclusionPrefixes::default());
    engine.fill(["api/Service".to_string()])?;

    let expected: HashSet<String> = ["api/Service", "api/Item", "api/ServiceException"]
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(names(&engine), expected);
    Ok(())
}

#[test]
fn unresolvable_dependency_is_dropped_not_fatal() -> Result<()> {
    let root = ClassBuilder::new(ACC_PUBLIC, "pkg/Root")
        .method(ACC_PUBLIC, "gone", "()Lpkg/Vanished;")
        .build();

    let mut source = HashMap::new();
    source.insert("pkg/Root".to_string(), root);

    let mut engine = ClosureEngine::new(source, ExclusionPrefixes::default());
    engine.fill(["pkg/Root".to_string()])?;

    let expected: HashSet<String> = ["pkg/Root"].into_iter().map(str::to_string).collect();
    assert_eq!(names(&engine), expected);
    Ok(())
}

#[test]
fn refilling_with_stabilized_roots_adds_nothing() -> Result<()> {
    let mut engine = ClosureEngine::new(abc_source(), plat_excluded());
    engine.fill(["pkg/A".to_string()])?;
    let first = names(&engine);

    let roots: Vec<String> = first.iter().cloned().collect();
    engine.fill(roots)?;
    assert_eq!(names(&engine), first);
    Ok(())
}
