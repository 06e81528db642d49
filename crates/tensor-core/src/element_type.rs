// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Native tensor element types.

use std::fmt;

/// Enumerates the element types an engine tensor can be declared with.
///
/// The list mirrors what mobile inference engines expose, including types
/// this workspace never converts (strings, resources, complex numbers).
/// Keeping them representable lets the codec report *which* unsupported type
/// a model uses instead of failing to describe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// No type information (uninitialised tensor).
    #[serde(rename = "notype")]
    NoType,
    /// 32-bit IEEE 754 floating point.
    Float32,
    /// 32-bit signed integer.
    Int32,
    /// 8-bit unsigned integer (the quantized storage type).
    UInt8,
    /// 64-bit signed integer.
    Int64,
    /// Variable-length string.
    String,
    /// Boolean.
    Bool,
    /// 16-bit signed integer.
    Int16,
    /// Pair of 32-bit floats.
    Complex64,
    /// 8-bit signed integer.
    Int8,
    /// 16-bit IEEE 754 floating point.
    Float16,
    /// 64-bit IEEE 754 floating point.
    Float64,
    /// Pair of 64-bit floats.
    Complex128,
    /// 64-bit unsigned integer.
    UInt64,
    /// Engine resource handle.
    Resource,
    /// Engine variant handle.
    Variant,
    /// 32-bit unsigned integer.
    UInt32,
    /// 16-bit unsigned integer.
    UInt16,
    /// Packed 4-bit signed integer.
    Int4,
    /// 16-bit brain floating point.
    BFloat16,
}

impl ElementType {
    /// Returns the size of a single element in bytes.
    ///
    /// Returns `None` for types without a fixed per-element size
    /// (strings, resources, variants, packed 4-bit values, complex numbers).
    pub fn size_bytes(self) -> Option<usize> {
        match self {
            ElementType::Float32 | ElementType::Int32 | ElementType::UInt32 => Some(4),
            ElementType::UInt8 | ElementType::Int8 | ElementType::Bool => Some(1),
            ElementType::Int64 | ElementType::UInt64 | ElementType::Float64 => Some(8),
            ElementType::Int16
            | ElementType::UInt16
            | ElementType::Float16
            | ElementType::BFloat16 => Some(2),
            ElementType::NoType
            | ElementType::String
            | ElementType::Complex64
            | ElementType::Complex128
            | ElementType::Resource
            | ElementType::Variant
            | ElementType::Int4 => None,
        }
    }

    /// Returns a human-readable label for this element type.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::NoType => "no type",
            ElementType::Float32 => "float32",
            ElementType::Int32 => "int32",
            ElementType::UInt8 => "uint8",
            ElementType::Int64 => "int64",
            ElementType::String => "string",
            ElementType::Bool => "bool",
            ElementType::Int16 => "int16",
            ElementType::Complex64 => "complex64",
            ElementType::Int8 => "int8",
            ElementType::Float16 => "float16",
            ElementType::Float64 => "float64",
            ElementType::Complex128 => "complex128",
            ElementType::UInt64 => "uint64",
            ElementType::Resource => "resource",
            ElementType::Variant => "variant",
            ElementType::UInt32 => "uint32",
            ElementType::UInt16 => "uint16",
            ElementType::Int4 => "int4",
            ElementType::BFloat16 => "bfloat16",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
