// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compositor core for translucent effect regions.
//!
//! `vitreous_core` turns a flat list of declared "effect regions" (rounded
//! shapes rendered with a shared translucent material) into an ordered draw
//! list. Regions that sit close together blend into one surface, regions that
//! appear or change shape animate continuously, and accessibility preferences
//! override both. It is `no_std` compatible (with `alloc`) and stores the
//! declared regions as struct-of-arrays with index handles.
//!
//! # Architecture
//!
//! Every [`Compositor::tick`](compositor::Compositor::tick) runs one pass.
//! Phases run in a fixed order and a pass commits all of its results or none
//! of them:
//!
//! ```text
//!   TickInput (latest submitted wins)
//!       │
//!       ▼
//!   PolicyEngine::evaluate() ──► RegionRegistry (effective variants)
//!       │
//!       ▼
//!   ProximityGrouper::group() ──► Grouping ──► resolve_variants()
//!       │
//!       ▼
//!   IdentityTracker::diff() ──► IdentityDiff
//!       │
//!       ▼
//!   TransitionPlanner::plan() ──► PlannedTransitions
//!       │
//!       ▼
//!   DrawList::build() ──► commit ──► PassSummary
//! ```
//!
//! **[`region`]**: Identifiers, shapes, declarations, and the per-pass
//! [`RegionRegistry`](region::RegionRegistry).
//!
//! **[`group`]**: Proximity grouping with union-find, scoped by container.
//!
//! **[`validate`]**: Reconciles member variants within a group.
//!
//! **[`identity`]**: Classifies identity keys against the previous pass.
//!
//! **[`transition`]**: Interpolation plans between visual states.
//!
//! **[`policy`]**: Reduce-transparency and reduce-motion preferences.
//!
//! **[`draw`]**: The committed draw list.
//!
//! **[`compositor`]**: The pass scheduler tying the phases together.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! pass instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-command
//!   draw list events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod compositor;
pub mod config;
pub mod draw;
pub mod error;
pub mod group;
pub mod identity;
pub mod policy;
pub mod region;
pub mod time;
pub mod trace;
pub mod transition;
pub mod validate;
