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

//! Header parsing and sample decoding for RIFF/WAVE files.
//!
//! Opening a file gives back the parsed header together with every byte that
//! follows it. The payload can then be decoded as signed 16-bit integers or
//! as normalized 32-bit floats, either explicitly or by letting the header
//! decide.
//!
//! ```no_run
//! use riff_wave_parser::{Samples, Wav};
//!
//! let wav = Wav::open("speech.wav").unwrap();
//! println!("{}", wav.header);
//! match wav.samples().unwrap() {
//!     Samples::Int16(samples) => println!("{} integer samples", samples.len()),
//!     Samples::Float32(samples) => println!("{} float samples", samples.len()),
//! }
//! ```
//!
//! # The wave file format
//!
//! A wave file starts with the RIFF file header:
//!
//! Offset | Size | Data       |    Description
//! -----: | ---: | ---------- | ----------------------------------------------
//!      0 |    4 | "RIFF"     | Identifies the main chunk.
//!      4 |    4 | chunk size | The size of the rest of the file.
//!      8 |    4 | "WAVE"     | The RIFF file type.
//!
//! It must be followed directly by the "fmt " subchunk:
//!
//! Offset | Size | Data            | Description
//! -----: | ---: | --------------- | -----------------------------------------
//!     12 |    4 | "fmt "          | Identifies this subchunk.
//!     16 |    4 | subchunk size   | 16 for canonical PCM, more for extended formats.
//!     20 |    2 | format          | 1 (PCM), 3 (IEEE float), 6 (A-law), 7 (µ-law) or 0xFFFE (extensible).
//!     22 |    2 | num channels    | Number of interleaved channels.
//!     24 |    4 | sample rate     | Frames per second.
//!     28 |    4 | byte rate       | Average bytes per second.
//!     32 |    2 | block align     | Bytes per frame.
//!     34 |    2 | bits per sample | 16 for 16-bit audio.
//!
//! When the subchunk size isn't 16, a 2-byte "extra params size" follows,
//! and then that many bytes which are skipped.
//!
//! Any number of other subchunks (LIST, cue, fact, ...) may come before the
//! "data" subchunk. They are skipped using their declared sizes. The sample
//! data starts right after the 8-byte header of the "data" subchunk, so a
//! canonical file has its first sample at offset 44.

extern crate byteorder;

#[cfg(test)]
macro_rules! assert_matches {
    ($expected:pat $(if $guard:expr)*, $value:expr) => {
        match $value {
            $expected $(if $guard)* => {},
            ref actual => {
                panic!("assertion failed: `(left matches right)` (left: `{}`, right: `{:?}`",
                    stringify!($expected), actual);
            },
        }
    };
}

pub mod diff;
mod error;
mod header;
mod samples;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use log::{debug, warn};

pub use crate::error::{DecodeError, ParseError, ParseErrorKind, ParseResult, SampleRangeError};
pub use crate::header::{parse_header, FormatChunk, FormatTag, RiffHeader, WavHeader};
pub use crate::samples::{decode_f32_le, decode_i16_le, decode_samples, Samples};

/// A parsed header together with the bytes that follow it.
#[derive(Debug, Clone)]
pub struct Wav {
    pub header: WavHeader,
    /// Everything after the header: the "data" subchunk contents plus any
    /// chunks that trail it.
    pub data: Vec<u8>,
}

impl Wav {
    /// Opens and loads the wave file at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> ParseResult<Wav> {
        let path = path.as_ref();
        debug!("loading {}", path.display());
        let file = File::open(path)?;
        Wav::from_reader(BufReader::new(file))
    }

    /// Parses the header from the given source, then reads the rest of it.
    pub fn from_reader<R>(mut reader: R) -> ParseResult<Wav>
        where R: Read + Seek
    {
        let header = parse_header(&mut reader)?;
        // The declared size can't be trusted for an up-front allocation.
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        if (data.len() as u64) < u64::from(header.data_block_size()) {
            warn!("data chunk declares {} bytes but only {} follow the header",
                  header.data_block_size(),
                  data.len());
        }

        Ok(Wav {
            header: header,
            data: data,
        })
    }

    /// The payload cut down to the declared size of the "data" subchunk. If
    /// the file is shorter than declared, this is the whole payload.
    pub fn data_block(&self) -> &[u8] {
        let declared = self.header.data_block_size() as usize;
        &self.data[..declared.min(self.data.len())]
    }

    /// Decodes the whole payload as signed 16-bit little-endian samples.
    pub fn int16_le_samples(&self) -> Vec<i16> {
        decode_i16_le(&self.data)
    }

    /// Decodes the whole payload as normalized 32-bit little-endian floats.
    pub fn float32_le_samples(&self) -> Result<Vec<f32>, SampleRangeError> {
        decode_f32_le(&self.data)
    }

    /// Decodes the "data" subchunk according to the header's format and bit
    /// depth. Unlike the explicit decoders, trailing chunks are not included.
    pub fn samples(&self) -> Result<Samples, DecodeError> {
        decode_samples(&self.header, self.data_block())
    }
}

/// Opens and loads the wave file at the given path.
pub fn load<P: AsRef<Path>>(path: P) -> ParseResult<Wav> {
    Wav::open(path)
}

// MARK: Tests

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{ParseError, Samples, Wav};

    const PCM_16BIT_MONO: &'static [u8] = b"RIFF\x2C\x00\x00\x00WAVE\
                                            fmt \x10\x00\x00\x00\
                                            \x01\x00\
                                            \x01\x00\
                                            \x44\xAC\x00\x00\
                                            \x88\x58\x01\x00\
                                            \x02\x00\
                                            \x10\x00\
                                            data\x04\x00\x00\x00\
                                            \x00\x01\x01\x01\
                                            LIST\x00\x00\x00\x00";

    #[test]
    fn test_from_reader_keeps_trailing_bytes() {
        let wav = Wav::from_reader(Cursor::new(PCM_16BIT_MONO)).unwrap();
        assert_eq!(44, wav.header.first_sample_pos());
        assert_eq!(4, wav.header.data_block_size());
        assert_eq!(12, wav.data.len());
        assert_eq!(b"\x00\x01\x01\x01", wav.data_block());
    }

    #[test]
    fn test_explicit_decoders_use_whole_payload() {
        let wav = Wav::from_reader(Cursor::new(PCM_16BIT_MONO)).unwrap();
        // "LIST" and its size are decoded as samples too.
        assert_eq!(6, wav.int16_le_samples().len());
        assert_eq!(vec![256, 257], wav.int16_le_samples()[..2].to_vec());
    }

    #[test]
    fn test_samples_use_data_block() {
        let wav = Wav::from_reader(Cursor::new(PCM_16BIT_MONO)).unwrap();
        assert_eq!(Samples::Int16(vec![256, 257]), wav.samples().unwrap());
    }

    #[test]
    fn test_data_block_shorter_than_declared() {
        let mut bytes = PCM_16BIT_MONO[..44].to_vec();
        bytes[40] = 0xFF;
        bytes.extend_from_slice(b"\x00\x01");

        let wav = Wav::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(255, wav.header.data_block_size());
        assert_eq!(b"\x00\x01", wav.data_block());
    }

    #[test]
    fn test_data_block_declared_as_u32_max() {
        let mut bytes = PCM_16BIT_MONO[..44].to_vec();
        bytes[40..44].copy_from_slice(b"\xFF\xFF\xFF\xFF");
        bytes.extend_from_slice(b"\x00\x01");

        let wav = Wav::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(u32::MAX, wav.header.data_block_size());
        assert_eq!(2, wav.data.len());
        assert_eq!(2, wav.data_block().len());
        assert_eq!(Samples::Int16(vec![256]), wav.samples().unwrap());
    }

    #[test]
    fn test_open_missing_file() {
        assert_matches!(Err(ParseError::Io(_)), Wav::open("does/not/exist.wav"));
    }
}
