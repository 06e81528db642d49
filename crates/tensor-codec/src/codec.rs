// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Loading input tensors and reading output tensors.

use tensor_core::{AffineQuantization, ElementType, TensorMut, TensorRef};

use crate::quantize::{dequantize_u8, quantize_u8};
use crate::{
    ElementCountMismatch, ElementTypeMismatch, InvalidQuantizedType, LoadInputError,
    ReadOutputError, TensorCopyError, TensorNotCreated, TensorRole,
};

/// A plain element type that can be copied byte for byte into a tensor
/// declared with [`Element::TYPE`].
pub trait Element: bytemuck::Pod {
    /// The matching engine element type.
    const TYPE: ElementType;
}

macro_rules! impl_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl Element for $ty {
            const TYPE: ElementType = ElementType::$variant;
        })*
    };
}

impl_element! {
    f32 => Float32,
    f64 => Float64,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
}

/// Loads `values` into an input tensor.
///
/// Unquantized tensors must be `float32`. Affine-quantized tensors must be
/// `uint8` with a single scale / zero-point pair and receive the quantized
/// values.
pub fn load_input_tensor(tensor: &mut TensorMut<'_>, values: &[f32]) -> Result<(), LoadInputError> {
    match tensor.quantization().as_affine() {
        None => load_raw(tensor, values),
        Some(params) => load_quantized(tensor, values, params),
    }
}

/// Copies `values` into an input tensor without conversion.
///
/// The tensor's element type must be `T::TYPE`. Quantized tensors receive
/// the values as stored integers.
pub fn load_raw<T: Element>(tensor: &mut TensorMut<'_>, values: &[T]) -> Result<(), LoadInputError> {
    let role = TensorRole::Input;
    if tensor.element_type() != T::TYPE {
        return Err(ElementTypeMismatch {
            role,
            expected: T::TYPE,
            actual: tensor.element_type(),
        }
        .into());
    }
    if !tensor.is_allocated() {
        return Err(TensorNotCreated { role }.into());
    }
    check_count(role, values.len(), tensor.info().num_elements())?;

    let status = tensor.copy_from_bytes(bytemuck::cast_slice(values));
    if !status.is_ok() {
        return Err(TensorCopyError { role, status }.into());
    }
    Ok(())
}

fn load_quantized(
    tensor: &mut TensorMut<'_>,
    values: &[f32],
    params: &AffineQuantization,
) -> Result<(), LoadInputError> {
    let role = TensorRole::Input;
    if tensor.element_type() != ElementType::UInt8 {
        return Err(InvalidQuantizedType {
            role,
            element_type: tensor.element_type(),
        }
        .into());
    }
    let expected = tensor.info().num_elements();
    let Some(storage) = tensor.data_mut() else {
        return Err(TensorNotCreated { role }.into());
    };
    check_count(role, values.len(), expected)?;

    quantize_u8(values, params, storage)?;
    Ok(())
}

/// Reads an output tensor into `out`.
///
/// Unquantized tensors must be `float32`. Affine-quantized tensors must be
/// `uint8` with a single scale / zero-point pair and are dequantized.
pub fn read_output_tensor(tensor: &TensorRef<'_>, out: &mut [f32]) -> Result<(), ReadOutputError> {
    match tensor.quantization().as_affine() {
        None => read_raw(tensor, out),
        Some(params) => read_quantized(tensor, out, params),
    }
}

/// Copies an output tensor into `out` without conversion.
///
/// The tensor's element type must be `T::TYPE`.
pub fn read_raw<T: Element>(tensor: &TensorRef<'_>, out: &mut [T]) -> Result<(), ReadOutputError> {
    let role = TensorRole::Output;
    if tensor.element_type() != T::TYPE {
        return Err(ElementTypeMismatch {
            role,
            expected: T::TYPE,
            actual: tensor.element_type(),
        }
        .into());
    }
    if tensor.data().is_none() {
        return Err(TensorNotCreated { role }.into());
    }
    check_count(role, out.len(), tensor.info().num_elements())?;

    let status = tensor.copy_to_bytes(bytemuck::cast_slice_mut(out));
    if !status.is_ok() {
        return Err(TensorCopyError { role, status }.into());
    }
    Ok(())
}

fn read_quantized(
    tensor: &TensorRef<'_>,
    out: &mut [f32],
    params: &AffineQuantization,
) -> Result<(), ReadOutputError> {
    let role = TensorRole::Output;
    if tensor.element_type() != ElementType::UInt8 {
        return Err(InvalidQuantizedType {
            role,
            element_type: tensor.element_type(),
        }
        .into());
    }
    let Some(storage) = tensor.data() else {
        return Err(TensorNotCreated { role }.into());
    };
    check_count(role, out.len(), tensor.info().num_elements())?;

    dequantize_u8(storage, params, out)?;
    Ok(())
}

fn check_count(role: TensorRole, provided: usize, expected: usize) -> Result<(), ElementCountMismatch> {
    if provided != expected {
        tracing::debug!(%role, provided, expected, "buffer length does not match tensor");
        return Err(ElementCountMismatch {
            role,
            provided,
            expected,
        });
    }
    Ok(())
}
