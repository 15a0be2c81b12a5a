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

//! Field-by-field comparison of two wave headers.
//!
//! Useful when two files play back the same but some tool treats them
//! differently: the difference is often in the container, not the audio.

use std::fmt;

use crate::header::WavHeader;

/// A single field that differs between two headers. The left value always
/// comes from the first header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderDifference {
    IdentByte { index: usize, left: u8, right: u8 },
    ChunkSize(u32, u32),
    FileTypeByte { index: usize, left: u8, right: u8 },
    LengthOfHeader(u32, u32),
    AudioFormat(u16, u16),
    NumChannels(u16, u16),
    SampleRate(u32, u32),
    BytesPerSec(u32, u32),
    BytesPerBlock(u16, u16),
    BitsPerSample(u16, u16),
    FirstSamplePos(u64, u64),
    DataBlockSize(u32, u32),
}

impl fmt::Display for HeaderDifference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            HeaderDifference::IdentByte { index, left, right } => {
                write!(f, "RIFF Ident Byte[{}] differs: [{:x}] != [{:x}]", index, left, right)
            }
            HeaderDifference::ChunkSize(left, right) => {
                write!(f, "ChunkSize: [{}] != [{}]", left, right)
            }
            HeaderDifference::FileTypeByte { index, left, right } => {
                write!(f, "FileType Byte[{}] differs: [{:x}] != [{:x}]", index, left, right)
            }
            HeaderDifference::LengthOfHeader(left, right) => {
                write!(f, "Length Of Header: [{}] != [{}]", left, right)
            }
            HeaderDifference::AudioFormat(left, right) => {
                write!(f, "Audio Format: [{}] != [{}]", left, right)
            }
            HeaderDifference::NumChannels(left, right) => {
                write!(f, "Number Of Channels: [{}] != [{}]", left, right)
            }
            HeaderDifference::SampleRate(left, right) => {
                write!(f, "Samplerate: [{}] != [{}]", left, right)
            }
            HeaderDifference::BytesPerSec(left, right) => {
                write!(f, "Bytes Per Sec: [{}] != [{}]", left, right)
            }
            HeaderDifference::BytesPerBlock(left, right) => {
                write!(f, "Bytes Per Block: [{}] != [{}]", left, right)
            }
            HeaderDifference::BitsPerSample(left, right) => {
                write!(f, "Bits Per Sample: [{}] != [{}]", left, right)
            }
            HeaderDifference::FirstSamplePos(left, right) => {
                write!(f, "First Sample Position: [{}] != [{}]", left, right)
            }
            HeaderDifference::DataBlockSize(left, right) => {
                write!(f, "Data Block Size: [{}] != [{}]", left, right)
            }
        }
    }
}

fn diff_tag<F>(left: &[u8; 4], right: &[u8; 4], make: F, diffs: &mut Vec<HeaderDifference>)
    where F: Fn(usize, u8, u8) -> HeaderDifference
{
    for (index, (&l, &r)) in left.iter().zip(right.iter()).enumerate() {
        if l != r {
            diffs.push(make(index, l, r));
        }
    }
}

macro_rules! diff_field {
    ($diffs:expr, $variant:path, $left:expr, $right:expr) => {
        if $left != $right {
            $diffs.push($variant($left, $right));
        }
    };
}

/// Compares every field of the two headers, in file order. Returns an empty
/// list when the headers are identical.
pub fn diff_headers(left: &WavHeader, right: &WavHeader) -> Vec<HeaderDifference> {
    let mut diffs = Vec::new();

    diff_tag(&left.riff().ident,
             &right.riff().ident,
             |index, left, right| HeaderDifference::IdentByte { index, left, right },
             &mut diffs);
    diff_field!(diffs,
                HeaderDifference::ChunkSize,
                left.riff().chunk_size,
                right.riff().chunk_size);
    diff_tag(&left.riff().file_type,
             &right.riff().file_type,
             |index, left, right| HeaderDifference::FileTypeByte { index, left, right },
             &mut diffs);

    let (lf, rf) = (left.fmt(), right.fmt());
    diff_field!(diffs,
                HeaderDifference::LengthOfHeader,
                lf.length_of_header,
                rf.length_of_header);
    diff_field!(diffs,
                HeaderDifference::AudioFormat,
                u16::from(lf.audio_format),
                u16::from(rf.audio_format));
    diff_field!(diffs, HeaderDifference::NumChannels, lf.num_channels, rf.num_channels);
    diff_field!(diffs, HeaderDifference::SampleRate, lf.sample_rate, rf.sample_rate);
    diff_field!(diffs, HeaderDifference::BytesPerSec, lf.bytes_per_sec, rf.bytes_per_sec);
    diff_field!(diffs, HeaderDifference::BytesPerBlock, lf.bytes_per_block, rf.bytes_per_block);
    diff_field!(diffs, HeaderDifference::BitsPerSample, lf.bits_per_sample, rf.bits_per_sample);

    diff_field!(diffs,
                HeaderDifference::FirstSamplePos,
                left.first_sample_pos(),
                right.first_sample_pos());
    diff_field!(diffs,
                HeaderDifference::DataBlockSize,
                left.data_block_size(),
                right.data_block_size());

    diffs
}
