// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end compositor scenarios across several ticks.

use kurbo::{Point, Rect};
use vitreous_core::compositor::{Compositor, TickInput, TickReport};
use vitreous_core::config::CompositorConfig;
use vitreous_core::error::TickError;
use vitreous_core::policy::AccessibilityPolicy;
use vitreous_core::region::{
    ContainerId, EffectVariant, EffectiveVariant, IdentityKey, Namespace, RegionDeclaration,
    RegionId, ShapeDescriptor, TransitionStyle,
};
use vitreous_core::time::{HostTime, ManualClock};
use vitreous_core::trace::Tracer;
use vitreous_core::transition::TransitionKind;

const MS: u64 = 1_000_000;
const REDUCE_MOTION: AccessibilityPolicy = AccessibilityPolicy {
    reduce_transparency: false,
    reduce_motion: true,
};

fn compositor() -> Compositor<ManualClock> {
    Compositor::new(CompositorConfig::standard(), ManualClock::new(HostTime(0)))
}

fn capsule_at(id: u64, x: f64, y: f64) -> RegionDeclaration {
    RegionDeclaration::new(
        Namespace(0),
        RegionId(id),
        ShapeDescriptor::capsule(Rect::new(x, y, x + 60.0, y + 30.0)),
    )
}

fn key(id: u64) -> IdentityKey {
    IdentityKey::new(0, id)
}

fn run(
    c: &mut Compositor<ManualClock>,
    ms: u64,
    regions: Vec<RegionDeclaration>,
    policy: AccessibilityPolicy,
) -> Result<TickReport, TickError> {
    c.submit(TickInput::new(regions, policy));
    c.tick(HostTime(ms * MS), &mut Tracer::none())
}

fn close(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

#[test]
fn identical_input_is_idempotent_once_settled() {
    let mut c = compositor();
    let regions = vec![capsule_at(1, 0.0, 0.0), capsule_at(2, 300.0, 0.0)];
    run(&mut c, 0, regions.clone(), AccessibilityPolicy::default()).unwrap();
    run(&mut c, 1_000, regions.clone(), AccessibilityPolicy::default()).unwrap();
    let settled = c.draw_list().commands.clone();

    let report = run(&mut c, 1_016, regions, AccessibilityPolicy::default()).unwrap();
    assert!(report.superseded.is_empty());
    assert_eq!(c.draw_list().commands, settled);
    for id in [1, 2] {
        let plan = c.planner().get(key(id)).unwrap();
        assert_eq!(plan.kind, TransitionKind::Appear);
        assert_eq!(plan.progress(), 1.0);
    }
    assert!(!c.is_animating());
}

#[test]
fn redeclared_region_keeps_its_running_appear() {
    let mut c = compositor();
    let regions = vec![capsule_at(1, 0.0, 0.0)];
    run(&mut c, 0, regions.clone(), AccessibilityPolicy::default()).unwrap();

    // Same declaration half way through the 350ms appear.
    let report = run(&mut c, 175, regions.clone(), AccessibilityPolicy::default()).unwrap();
    assert!(report.superseded.is_empty());
    let plan = c.planner().get(key(1)).unwrap();
    assert_eq!(plan.kind, TransitionKind::Appear);
    assert_eq!(plan.start, HostTime(0));
    assert_eq!(plan.progress(), 0.5);
    let cmd = c.draw_list().find(key(1)).unwrap();
    assert_eq!(cmd.transition, TransitionKind::Appear);
    assert!(cmd.opacity > 0.0 && cmd.opacity < 1.0);
    assert!(c.is_animating());

    run(&mut c, 350, regions, AccessibilityPolicy::default()).unwrap();
    assert_eq!(c.planner().get(key(1)).unwrap().progress(), 1.0);
    assert_eq!(c.draw_list().find(key(1)).unwrap().opacity, 1.0);
    assert!(!c.is_animating());
}

#[test]
fn instant_regions_are_settled_from_the_first_tick() {
    let mut c = compositor();
    let regions = vec![capsule_at(1, 0.0, 0.0).with_transition(TransitionStyle::Instant)];
    run(&mut c, 0, regions.clone(), AccessibilityPolicy::default()).unwrap();
    let first = c.draw_list().commands.clone();
    assert_eq!(first[0].opacity, 1.0);
    assert_eq!(first[0].progress, 1.0);
    assert_eq!(first[0].transition, TransitionKind::Instant);

    for ms in [16, 32] {
        run(&mut c, ms, regions.clone(), AccessibilityPolicy::default()).unwrap();
        assert_eq!(c.draw_list().commands, first);
    }
}

#[test]
fn reduce_motion_collapses_a_running_plan() {
    let mut c = compositor();
    run(&mut c, 0, vec![capsule_at(1, 0.0, 0.0)], AccessibilityPolicy::default()).unwrap();
    run(&mut c, 1_000, vec![capsule_at(1, 0.0, 0.0)], AccessibilityPolicy::default()).unwrap();

    // Start a move and let it run part way.
    run(&mut c, 2_000, vec![capsule_at(1, 100.0, 0.0)], AccessibilityPolicy::default()).unwrap();
    c.tick(HostTime(2_100 * MS), &mut Tracer::none()).unwrap();
    let plan = c.planner().get(key(1)).unwrap();
    assert_eq!(plan.kind, TransitionKind::Morph);
    assert!(plan.progress() > 0.0 && plan.progress() < 1.0);

    run(&mut c, 2_116, vec![capsule_at(1, 100.0, 0.0)], REDUCE_MOTION).unwrap();
    assert_eq!(c.planner().get(key(1)).unwrap().progress(), 1.0);
    let cmd = c.draw_list().find(key(1)).unwrap();
    assert_eq!(cmd.geometry.rect(), Rect::new(100.0, 0.0, 160.0, 30.0));
    assert_eq!(cmd.opacity, 1.0);
    assert!(!c.is_animating());
    assert_eq!(c.policy(), REDUCE_MOTION);
}

#[test]
fn reduce_motion_skips_appear_and_disappear() {
    let mut c = compositor();
    run(&mut c, 0, vec![capsule_at(1, 0.0, 0.0)], REDUCE_MOTION).unwrap();
    assert_eq!(c.draw_list().commands[0].opacity, 1.0);

    run(&mut c, 16, Vec::new(), REDUCE_MOTION).unwrap();
    assert!(c.draw_list().is_empty());
    assert!(c.planner().is_empty());
}

#[test]
fn first_declared_variant_wins_reproducibly() {
    let decls = || {
        vec![
            capsule_at(1, 0.0, 0.0),
            capsule_at(2, 70.0, 0.0).with_variant(EffectVariant::HighTransparency),
            capsule_at(3, 140.0, 0.0),
        ]
    };
    let resolve = || {
        let mut c = compositor();
        let report = run(&mut c, 0, decls(), AccessibilityPolicy::default()).unwrap();
        let variants: Vec<EffectiveVariant> =
            c.draw_list().commands.iter().map(|cmd| cmd.variant).collect();
        (report.diagnostics, variants)
    };

    let (diagnostics, variants) = resolve();
    assert_eq!(variants, vec![EffectiveVariant::Standard; 3]);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].winner, RegionId(1));
    assert_eq!(diagnostics[0].losers, vec![RegionId(2)]);
    assert_eq!(resolve(), (diagnostics, variants));
}

#[test]
fn removed_and_added_identities_never_morph_into_each_other() {
    let mut c = compositor();
    let x = capsule_at(1, 0.0, 0.0);
    let y = capsule_at(2, 10.0, 0.0);
    let z = capsule_at(3, 200.0, 0.0);

    run(&mut c, 0, vec![x.clone(), y], AccessibilityPolicy::default()).unwrap();
    assert_eq!(c.grouping().len(), 1);
    assert!(c.grouping().groups()[0].blend);
    assert!(c.draw_list().commands.iter().all(|cmd| cmd.blend));

    let report = run(&mut c, 500, vec![x, z], AccessibilityPolicy::default()).unwrap();
    assert!(report.superseded.is_empty());

    // X and Z are separate singletons.
    assert_eq!(c.grouping().len(), 2);
    assert!(c.grouping().groups().iter().all(|g| !g.blend));

    let y_plan = c.planner().get(key(2)).unwrap();
    assert_eq!(y_plan.kind, TransitionKind::Disappear);
    assert_eq!(y_plan.from.geometry.rect(), Rect::new(10.0, 0.0, 70.0, 30.0));

    let z_plan = c.planner().get(key(3)).unwrap();
    assert_eq!(z_plan.kind, TransitionKind::Appear);
    assert_eq!(z_plan.from.opacity, 0.0);
    assert!(close(z_plan.from.geometry.rect().center(), Point::new(230.0, 15.0)));

    let x_plan = c.planner().get(key(1)).unwrap();
    assert_eq!(x_plan.kind, TransitionKind::Appear);
    assert_eq!(x_plan.progress(), 1.0);

    // Y is still drawn while it fades, above the live regions.
    let keys: Vec<IdentityKey> = c.draw_list().commands.iter().map(|cmd| cmd.key).collect();
    assert_eq!(keys, vec![key(1), key(3), key(2)]);
}

#[test]
fn departing_identity_is_retained_for_one_extra_tick() {
    let mut c = compositor();
    run(&mut c, 0, vec![capsule_at(1, 0.0, 0.0)], AccessibilityPolicy::default()).unwrap();
    run(&mut c, 16, Vec::new(), AccessibilityPolicy::default()).unwrap();
    assert!(c.tracker().get(key(1)).is_some_and(|t| t.departing));

    c.tick(HostTime(32 * MS), &mut Tracer::none()).unwrap();
    assert!(c.tracker().get(key(1)).is_none());
    // The exit animation outlives the snapshot entry.
    assert!(c.draw_list().find(key(1)).is_some());

    c.tick(HostTime(1_000 * MS), &mut Tracer::none()).unwrap();
    assert!(c.draw_list().is_empty());
    assert!(!c.is_animating());
}

#[test]
fn overlapping_containers_keep_the_previous_draw_list() {
    let mut c = compositor();
    run(
        &mut c,
        0,
        vec![
            capsule_at(1, 0.0, 0.0).in_container(ContainerId(1)),
            capsule_at(2, 0.0, 100.0).in_container(ContainerId(2)),
        ],
        AccessibilityPolicy::default(),
    )
    .unwrap();
    // Mid-animation, so the retained transitions matter too.
    c.tick(HostTime(100 * MS), &mut Tracer::none()).unwrap();
    assert!(c.is_animating());
    let before = c.draw_list().clone();
    let planner_len = c.planner().len();

    let err = run(
        &mut c,
        216,
        vec![
            capsule_at(1, 0.0, 0.0).in_container(ContainerId(1)),
            capsule_at(2, 0.0, 100.0).in_container(ContainerId(2)),
            capsule_at(3, 20.0, 10.0).in_container(ContainerId(2)),
        ],
        AccessibilityPolicy::default(),
    )
    .unwrap_err();

    let TickError::ContainerOverlap(overlap) = &err else {
        panic!("expected a container overlap, got {err:?}");
    };
    assert_eq!(overlap.first, ContainerId(1));
    assert_eq!(overlap.second, ContainerId(2));
    assert_eq!(c.draw_list(), &before);
    assert_eq!(c.planner().len(), planner_len);
    assert_eq!(c.registry().len(), 2);
}

#[test]
fn stale_input_is_replaced_before_the_tick() {
    let mut c = compositor();
    c.submit(TickInput::new(
        vec![capsule_at(1, 0.0, 0.0)],
        AccessibilityPolicy::default(),
    ));
    let report = run(&mut c, 0, vec![capsule_at(2, 0.0, 0.0)], AccessibilityPolicy::default())
        .unwrap();
    assert!(report.fresh_input);
    assert!(c.draw_list().find(key(1)).is_none());
    assert!(c.draw_list().find(key(2)).is_some());
}
