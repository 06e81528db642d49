// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Operator stage sets for common model variants.

use std::fmt;
use std::str::FromStr;

use operators::{MinMaxOperator, OperatorPipeline, PipelineConfig, RgbNormalizeOperator};

/// Named operator configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelPreset {
    /// Relative depth: ImageNet-normalized RGB in, min-max rescaled depth out.
    DepthEstimation,
    /// Metric depth: ImageNet-normalized RGB in, output left as produced.
    DepthEstimationRaw,
    /// No operators.
    #[default]
    Passthrough,
}

impl ModelPreset {
    pub const ALL: [ModelPreset; 3] = [
        ModelPreset::DepthEstimation,
        ModelPreset::DepthEstimationRaw,
        ModelPreset::Passthrough,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelPreset::DepthEstimation => "depth-estimation",
            ModelPreset::DepthEstimationRaw => "depth-estimation-raw",
            ModelPreset::Passthrough => "passthrough",
        }
    }

    /// Builds fresh operator pipelines for this preset.
    pub fn pipelines(self) -> PipelineConfig {
        match self {
            ModelPreset::DepthEstimation => PipelineConfig::new(
                OperatorPipeline::new().with(RgbNormalizeOperator::default()),
                OperatorPipeline::new().with(MinMaxOperator),
            ),
            ModelPreset::DepthEstimationRaw => PipelineConfig::new(
                OperatorPipeline::new().with(RgbNormalizeOperator::default()),
                OperatorPipeline::new(),
            ),
            ModelPreset::Passthrough => PipelineConfig::default(),
        }
    }
}

impl fmt::Display for ModelPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelPreset::ALL
            .into_iter()
            .find(|p| p.as_str() == s.to_lowercase())
            .ok_or_else(|| {
                format!(
                    "unknown preset '{s}'; expected 'depth-estimation', 'depth-estimation-raw', or 'passthrough'"
                )
            })
    }
}
