// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Engine tensor storage and the borrowed views handed out by interpreters.

use crate::{ElementType, Quantization, Shape, Status, TensorError};

/// Static description of an engine tensor.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TensorInfo {
    /// Tensor name as declared by the model.
    pub name: String,
    /// Element type of the stored values.
    #[serde(rename = "dtype")]
    pub element_type: ElementType,
    /// Fixed dimensions.
    pub shape: Shape,
    /// Quantization parameters (if any).
    #[serde(default)]
    pub quantization: Quantization,
}

impl TensorInfo {
    /// Creates an unquantized tensor description.
    pub fn new(name: impl Into<String>, element_type: ElementType, shape: Shape) -> Self {
        Self {
            name: name.into(),
            element_type,
            shape,
            quantization: Quantization::None,
        }
    }

    /// Attaches quantization parameters.
    pub fn with_quantization(mut self, quantization: Quantization) -> Self {
        self.quantization = quantization;
        self
    }

    /// Number of elements declared by the shape.
    pub fn num_elements(&self) -> usize {
        self.shape.num_elements()
    }

    /// Declared storage size in bytes, or `None` for unsized element types.
    pub fn size_bytes(&self) -> Option<usize> {
        self.shape.size_bytes(self.element_type)
    }

    /// One-line description, e.g. `image: float32 [1, 256, 256, 3]`.
    pub fn summary(&self) -> String {
        let mut s = format!("{}: {} {}", self.name, self.element_type, self.shape);
        if let Some(params) = self.quantization.as_affine() {
            s.push_str(&format!(
                " (affine, scale={:?}, zero_point={:?})",
                params.scale, params.zero_point
            ));
        }
        s
    }
}

/// An engine-owned tensor: its description plus storage once allocated.
///
/// Storage is absent until [`allocate`](Tensor::allocate) runs, which models
/// engines that only materialise tensor memory during an explicit
/// allocation step.
#[derive(Debug, Clone)]
pub struct Tensor {
    info: TensorInfo,
    data: Option<Vec<u8>>,
}

impl Tensor {
    /// Creates an unallocated tensor.
    pub fn new(info: TensorInfo) -> Self {
        Self { info, data: None }
    }

    /// Allocates zero-filled storage for the declared shape and type.
    ///
    /// Calling this on an already allocated tensor keeps the existing data.
    pub fn allocate(&mut self) -> Result<(), TensorError> {
        if self.data.is_some() {
            return Ok(());
        }
        let size = self.declared_size()?;
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| TensorError::AllocationFailed { bytes: size })?;
        data.resize(size, 0u8);
        self.data = Some(data);
        Ok(())
    }

    /// Replaces the storage with `data`, which must match the declared size.
    pub fn set_data(&mut self, data: Vec<u8>) -> Result<(), TensorError> {
        let expected = self.declared_size()?;
        if data.len() != expected {
            return Err(TensorError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        self.data = Some(data);
        Ok(())
    }

    fn declared_size(&self) -> Result<usize, TensorError> {
        let element_type = self.info.element_type;
        if element_type.size_bytes().is_none() {
            return Err(TensorError::UnsizedElementType { element_type });
        }
        self.info.size_bytes().ok_or_else(|| TensorError::SizeOverflow {
            shape: self.info.shape.to_string(),
            element_type,
        })
    }

    /// Returns `true` once storage exists.
    pub fn is_allocated(&self) -> bool {
        self.data.is_some()
    }

    /// Returns the tensor description.
    pub fn info(&self) -> &TensorInfo {
        &self.info
    }

    /// Returns the raw storage, if allocated.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Returns the raw storage mutably, if allocated.
    pub fn data_mut(&mut self) -> Option<&mut [u8]> {
        self.data.as_deref_mut()
    }

    /// Borrows a read-only view.
    pub fn view(&self) -> TensorRef<'_> {
        TensorRef::from_parts(&self.info, self.data.as_deref())
    }

    /// Borrows a writable view.
    pub fn view_mut(&mut self) -> TensorMut<'_> {
        TensorMut::from_parts(&self.info, self.data.as_deref_mut())
    }
}

/// A borrowed, read-only view of an engine tensor.
#[derive(Debug, Clone, Copy)]
pub struct TensorRef<'a> {
    info: &'a TensorInfo,
    data: Option<&'a [u8]>,
}

impl<'a> TensorRef<'a> {
    /// Creates a view from raw parts (used by engine backends).
    pub fn from_parts(info: &'a TensorInfo, data: Option<&'a [u8]>) -> Self {
        Self { info, data }
    }

    /// Returns the tensor description.
    pub fn info(&self) -> &'a TensorInfo {
        self.info
    }

    /// Returns the element type.
    pub fn element_type(&self) -> ElementType {
        self.info.element_type
    }

    /// Returns the quantization parameters.
    pub fn quantization(&self) -> &'a Quantization {
        &self.info.quantization
    }

    /// Returns the storage, or `None` if the engine has not allocated it yet.
    pub fn data(&self) -> Option<&'a [u8]> {
        self.data
    }

    /// Size of the tensor storage in bytes.
    ///
    /// Falls back to the declared size while the tensor is unallocated.
    pub fn byte_size(&self) -> usize {
        match self.data {
            Some(data) => data.len(),
            None => self.info.size_bytes().unwrap_or(0),
        }
    }

    /// Copies the whole tensor into `dst`.
    ///
    /// Fails with [`Status::Error`] if the tensor is unallocated or `dst`
    /// does not have exactly the tensor's byte size.
    pub fn copy_to_bytes(&self, dst: &mut [u8]) -> Status {
        match self.data {
            Some(data) if data.len() == dst.len() => {
                dst.copy_from_slice(data);
                Status::Ok
            }
            _ => Status::Error,
        }
    }
}

/// A borrowed, writable view of an engine tensor.
#[derive(Debug)]
pub struct TensorMut<'a> {
    info: &'a TensorInfo,
    data: Option<&'a mut [u8]>,
}

impl<'a> TensorMut<'a> {
    /// Creates a view from raw parts (used by engine backends).
    pub fn from_parts(info: &'a TensorInfo, data: Option<&'a mut [u8]>) -> Self {
        Self { info, data }
    }

    /// Returns the tensor description.
    pub fn info(&self) -> &'a TensorInfo {
        self.info
    }

    /// Returns the element type.
    pub fn element_type(&self) -> ElementType {
        self.info.element_type
    }

    /// Returns the quantization parameters.
    pub fn quantization(&self) -> &'a Quantization {
        &self.info.quantization
    }

    /// Returns `true` if the engine has allocated storage for this tensor.
    pub fn is_allocated(&self) -> bool {
        self.data.is_some()
    }

    /// Returns the storage mutably, or `None` if unallocated.
    pub fn data_mut(&mut self) -> Option<&mut [u8]> {
        self.data.as_deref_mut()
    }

    /// Size of the tensor storage in bytes.
    pub fn byte_size(&self) -> usize {
        match &self.data {
            Some(data) => data.len(),
            None => self.info.size_bytes().unwrap_or(0),
        }
    }

    /// Overwrites the whole tensor with `src`.
    ///
    /// Fails with [`Status::Error`] if the tensor is unallocated or `src`
    /// does not have exactly the tensor's byte size.
    pub fn copy_from_bytes(&mut self, src: &[u8]) -> Status {
        match self.data.as_deref_mut() {
            Some(data) if data.len() == src.len() => {
                data.copy_from_slice(src);
                Status::Ok
            }
            _ => Status::Error,
        }
    }

    /// Reborrows as a read-only view.
    pub fn as_view(&self) -> TensorRef<'_> {
        TensorRef::from_parts(self.info, self.data.as_deref())
    }
}
