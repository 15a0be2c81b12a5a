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

use std::error;
use std::fmt;
use std::io;
use std::result;

use crate::header::FormatTag;

// MARK: Header errors

/// Represents an error that occurred while parsing a wave header.
#[derive(Debug)]
pub enum ParseError {
    /// The container is well-formed enough to read, but is not one we accept.
    Format(ParseErrorKind),
    /// A read or seek failed before the "data" chunk was found. This also
    /// covers running out of input.
    TruncatedHeader(io::Error),
    /// An IO error occurred outside of the header walk, e.g. while opening the
    /// file or reading the payload.
    Io(io::Error),
}

/// Represents a result when parsing a wave file.
pub type ParseResult<T> = result::Result<T, ParseError>;

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseError::Format(ref err_kind) => write!(f, "Format error: {}", err_kind),
            ParseError::TruncatedHeader(ref err) => write!(f, "Truncated header: {}", err),
            ParseError::Io(ref err) => write!(f, "IO error: {}", err),
        }
    }
}

impl error::Error for ParseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            ParseError::Format(_) => None,
            ParseError::TruncatedHeader(ref err) => Some(err),
            ParseError::Io(ref err) => Some(err),
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(err: io::Error) -> ParseError {
        ParseError::Io(err)
    }
}

impl From<ParseErrorKind> for ParseError {
    fn from(kind: ParseErrorKind) -> ParseError {
        ParseError::Format(kind)
    }
}

/// Represents a container format error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The file does not start with "RIFF". Holds the bytes that were found.
    InvalidSignature([u8; 4]),
    /// The chunk following the RIFF header is not "fmt ".
    UnexpectedChunk([u8; 4]),
    /// The format tag is not one we recognize.
    UnsupportedFormat(u16),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseErrorKind::InvalidSignature(ident) => {
                write!(f, "invalid RIFF identification: {}", String::from_utf8_lossy(&ident))
            }
            ParseErrorKind::UnexpectedChunk(tag) => {
                write!(f, "unexpected chunk type: {}", String::from_utf8_lossy(&tag))
            }
            ParseErrorKind::UnsupportedFormat(format) => {
                write!(f, "not an audio format: format[{}]", format)
            }
        }
    }
}

// MARK: Sample errors

/// A floating-point sample fell outside of the normalized [-1.0, 1.0] range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRangeError {
    /// Position of the offending sample in the decoded sequence.
    pub index: usize,
    /// The offending value.
    pub value: f32,
}

impl fmt::Display for SampleRangeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "sample[{}] at index {} is outside the valid value range for a PCM float",
               self.value,
               self.index)
    }
}

impl error::Error for SampleRangeError {}

/// Represents an error when decoding samples according to a header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecodeError {
    /// The header describes an encoding we don't decode.
    UnsupportedEncoding {
        format: FormatTag,
        bits_per_sample: u16,
    },
    /// A float sample was out of range.
    SampleRange(SampleRangeError),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DecodeError::UnsupportedEncoding { format, bits_per_sample } => {
                write!(f,
                       "can't decode {}-bit samples for format {}",
                       bits_per_sample,
                       u16::from(format))
            }
            DecodeError::SampleRange(ref err) => write!(f, "{}", err),
        }
    }
}

impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            DecodeError::UnsupportedEncoding { .. } => None,
            DecodeError::SampleRange(ref err) => Some(err),
        }
    }
}

impl From<SampleRangeError> for DecodeError {
    fn from(err: SampleRangeError) -> DecodeError {
        DecodeError::SampleRange(err)
    }
}
