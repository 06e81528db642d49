// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Ordered operator lists.

use std::fmt;

use crate::{Operator, OperatorError};

/// An operator backed by a closure.
pub struct FnOperator<F> {
    name: String,
    f: F,
}

impl<F> FnOperator<F>
where
    F: Fn(&mut [f32]) -> Result<(), OperatorError> + Send,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> Operator for FnOperator<F>
where
    F: Fn(&mut [f32]) -> Result<(), OperatorError> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, values: &mut [f32]) -> Result<(), OperatorError> {
        (self.f)(values)
    }
}

impl<F> fmt::Debug for FnOperator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOperator").field("name", &self.name).finish()
    }
}

/// An operator in a pipeline failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("operator #{index} ({operator}) failed: {source}")]
pub struct PipelineError {
    /// Position of the failing operator.
    pub index: usize,
    /// Name of the failing operator.
    pub operator: String,
    #[source]
    pub source: OperatorError,
}

/// Operators applied first to last.
///
/// The first failure stops the run. Changes made to the buffer by earlier
/// operators (and by the failing one, if it wrote before failing) stay in
/// place.
#[derive(Default)]
pub struct OperatorPipeline {
    operators: Vec<Box<dyn Operator>>,
}

impl OperatorPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an operator, builder style.
    pub fn with(mut self, operator: impl Operator + 'static) -> Self {
        self.push(operator);
        self
    }

    /// Appends an operator.
    pub fn push(&mut self, operator: impl Operator + 'static) {
        self.operators.push(Box::new(operator));
    }

    /// Appends an already boxed operator.
    pub fn push_boxed(&mut self, operator: Box<dyn Operator>) {
        self.operators.push(operator);
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Operator names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.operators.iter().map(|op| op.name()).collect()
    }

    /// Runs every operator over `values`.
    pub fn run(&self, values: &mut [f32]) -> Result<(), PipelineError> {
        for (index, op) in self.operators.iter().enumerate() {
            op.execute(values).map_err(|source| {
                tracing::debug!(index, operator = op.name(), error = %source, "operator failed");
                PipelineError {
                    index,
                    operator: op.name().to_string(),
                    source,
                }
            })?;
        }
        Ok(())
    }
}

impl From<Vec<Box<dyn Operator>>> for OperatorPipeline {
    fn from(operators: Vec<Box<dyn Operator>>) -> Self {
        Self { operators }
    }
}

impl fmt::Debug for OperatorPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Operators run before loading the input tensor and after reading the
/// output tensor.
#[derive(Debug, Default)]
pub struct PipelineConfig {
    pub input: OperatorPipeline,
    pub output: OperatorPipeline,
}

impl PipelineConfig {
    pub fn new(input: OperatorPipeline, output: OperatorPipeline) -> Self {
        Self { input, output }
    }
}
