// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Length-prefixed byte buffers used at every wire boundary.
//!
//! A buffer with no data is distinct from a buffer holding zero bytes:
//! the former signals "no data" (and, on the wire, may carry a sentinel
//! code in its length), the latter an empty result.

/// Owned, length-prefixed byte buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrBuf {
    len: u32,
    data: Option<Box<[u8]>>,
}

impl StrBuf {
    /// Copy `bytes` into a new buffer.
    ///
    /// Inputs longer than `u32::MAX` are truncated to fit the length prefix.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let bytes = &bytes[..bytes.len().min(u32::MAX as usize)];
        Self {
            len: bytes.len() as u32,
            data: Some(bytes.into()),
        }
    }

    /// Take ownership of `bytes` without copying.
    pub fn from_vec(mut bytes: Vec<u8>) -> Self {
        bytes.truncate(u32::MAX as usize);
        Self {
            len: bytes.len() as u32,
            data: Some(bytes.into_boxed_slice()),
        }
    }

    /// A buffer with no data, ready to be populated as an out-parameter.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A data-less buffer whose length carries a wire sentinel code.
    pub(crate) fn sentinel(code: u32) -> Self {
        Self {
            len: code,
            data: None,
        }
    }

    /// Length prefix. For data-less buffers this is the sentinel code.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// True when the buffer carries data of length zero, or no data and code 0.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when the buffer carries no data at all.
    pub fn is_null(&self) -> bool {
        self.data.is_none()
    }

    /// Borrow the bytes, or `None` for a data-less buffer.
    pub fn read(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Consume the buffer, returning its bytes.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        self.data.map(Vec::from)
    }
}

impl From<&str> for StrBuf {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

impl From<String> for StrBuf {
    fn from(s: String) -> Self {
        Self::from_vec(s.into_bytes())
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
