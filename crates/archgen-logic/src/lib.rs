//! Pure floor-plan generation logic for archgen.
//!
//! This crate contains every algorithm of the design engine and no I/O.
//! Functions take plain data and return results, so the whole pipeline is
//! unit-testable and can be driven from the headless simtest harness, a
//! web service, or a desktop front-end alike.
//!
//! Plot + requirements go into [`solver::solve`], which produces a
//! [`layout::Layout`]. Layouts are values: scoring, policy checks, edits
//! and the optimizer all borrow them and return new data.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Solver strategies, zone preference tables, priority order |
//! | [`constants`] | Grid size, tolerances, the `RoomType` enum |
//! | [`editor`] | Copy-on-write move/resize and the layout change audit |
//! | [`error`] | Structural error enums |
//! | [`estimate`] | Concept-stage construction cost estimate |
//! | [`explain`] | Plain-language design report |
//! | [`geometry`] | Post-hoc layout validation (bounds, overlaps, stacking) |
//! | [`grid`] | Occupancy grid and front/central/rear zone bands |
//! | [`guard`] | Interactive single-room validation |
//! | [`layout`] | Placed rooms, floor results, the layout record |
//! | [`optimizer`] | Seeded parallel variant search and leaderboard |
//! | [`plot`] | Plot normalization and buildable envelope |
//! | [`policy`] | Building-policy findings, confidence, second pass, repairs |
//! | [`quality`] | Cost / comfort / energy / aesthetic scoring |
//! | [`requirements`] | Requirement parsing and feasibility pre-check |
//! | [`solar`] | Orientation-based solar exposure score |
//! | [`solver`] | Deterministic first-fit multi-floor placement |
//! | [`stack`] | Vertical alignment of stairs and lifts |
//! | [`stairs`] | Staircase footprint model |

pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod estimate;
pub mod explain;
pub mod geometry;
pub mod grid;
pub mod guard;
pub mod layout;
pub mod optimizer;
pub mod plot;
pub mod policy;
pub mod quality;
pub mod requirements;
pub mod solar;
pub mod solver;
pub mod stack;
pub mod stairs;
