// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # engine
//!
//! The seam between the inference runtime and an on-device inference
//! engine. An engine is split into three handles that mirror how mobile
//! engines are driven:
//!
//! - a **model** built from an in-memory buffer,
//! - an optional **accelerator delegate** that offloads execution,
//! - an **interpreter** that owns tensors and executes the graph.
//!
//! [`Backend`] ties the three together. The runtime crate is generic over
//! it, so any engine that can express these handles can be plugged in.
//!
//! [`reference::ReferenceBackend`] is a small pure-Rust engine that
//! evaluates JSON-described elementwise graphs. It is used by the CLI and
//! the test suites and implements the same contract a native engine would,
//! including serialized delegate caches.

pub mod backend;
pub mod error;
pub mod model;
pub mod options;
pub mod reference;

pub use backend::{Backend, Interpreter};
pub use error::ModelError;
pub use model::ModelBytes;
pub use options::{DelegateOptions, ErrorReporter, InferencePreference, InterpreterOptions};
