// riff-wave-parser -- Header parsing and sample decoding for RIFF/WAVE files.
// Copyright (c) 2016 the riff-wave-parser project authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Decoding of raw sample payloads.
//!
//! The decoders only look at the bytes they are given. They never read the
//! header and can be called any number of times on the same payload.

use std::mem;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{DecodeError, SampleRangeError};
use crate::header::{FormatTag, WavHeader};

const MIN_FLOAT_SAMPLE: f32 = -1.0;
const MAX_FLOAT_SAMPLE: f32 = 1.0;

/// Decoded samples, in the type the header calls for.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    Int16(Vec<i16>),
    Float32(Vec<f32>),
}

impl Samples {
    /// The number of decoded samples, counting each channel separately.
    pub fn len(&self) -> usize {
        match *self {
            Samples::Int16(ref samples) => samples.len(),
            Samples::Float32(ref samples) => samples.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interprets the payload as signed 16-bit little-endian samples. A trailing
/// odd byte is ignored.
pub fn decode_i16_le(payload: &[u8]) -> Vec<i16> {
    payload.chunks_exact(mem::size_of::<i16>())
        .map(LittleEndian::read_i16)
        .collect()
}

/// Interprets the payload as 32-bit little-endian IEEE floats, each of which
/// must lie within [-1.0, 1.0]. Trailing bytes that don't make up a whole
/// sample are ignored.
pub fn decode_f32_le(payload: &[u8]) -> Result<Vec<f32>, SampleRangeError> {
    let mut samples = Vec::with_capacity(payload.len() / mem::size_of::<f32>());

    for (index, bytes) in payload.chunks_exact(mem::size_of::<f32>()).enumerate() {
        let value = LittleEndian::read_f32(bytes);
        // NaN fails this check too.
        if !(MIN_FLOAT_SAMPLE..=MAX_FLOAT_SAMPLE).contains(&value) {
            return Err(SampleRangeError {
                index: index,
                value: value,
            });
        }
        samples.push(value);
    }

    Ok(samples)
}

/// Decodes the payload using the format and bit depth declared by the header.
///
/// Only 16-bit integer PCM and 32-bit IEEE float PCM are supported.
pub fn decode_samples(header: &WavHeader, payload: &[u8]) -> Result<Samples, DecodeError> {
    let fmt = header.fmt();
    match (fmt.audio_format, fmt.bits_per_sample) {
        (FormatTag::Pcm, 16) => Ok(Samples::Int16(decode_i16_le(payload))),
        (FormatTag::IeeeFloat, 32) => Ok(Samples::Float32(decode_f32_le(payload)?)),
        (format, bits_per_sample) => {
            Err(DecodeError::UnsupportedEncoding {
                format: format,
                bits_per_sample: bits_per_sample,
            })
        }
    }
}

// MARK: Tests
