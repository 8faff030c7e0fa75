// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Zone carving, ordering and output naming under generated inputs.

mod topology_properties;
