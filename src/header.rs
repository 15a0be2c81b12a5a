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

//! Walks the RIFF container and locates the sample data.

use std::fmt;
use std::io;
use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, trace};

use crate::error::{ParseError, ParseErrorKind, ParseResult};

// MARK: Header types

const FORMAT_PCM: u16 = 0x0001;
const FORMAT_IEEE_FLOAT: u16 = 0x0003;
const FORMAT_ALAW: u16 = 0x0006;
const FORMAT_MULAW: u16 = 0x0007;
const FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// The size of a canonical PCM "fmt " body.
const CANONICAL_FMT_SIZE: u32 = 16;

/// The format codes we recognize. Only `Pcm` and `IeeeFloat` can be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    Pcm,
    IeeeFloat,
    ALaw,
    MuLaw,
    Extensible,
}

impl From<FormatTag> for u16 {
    fn from(tag: FormatTag) -> u16 {
        match tag {
            FormatTag::Pcm => FORMAT_PCM,
            FormatTag::IeeeFloat => FORMAT_IEEE_FLOAT,
            FormatTag::ALaw => FORMAT_ALAW,
            FormatTag::MuLaw => FORMAT_MULAW,
            FormatTag::Extensible => FORMAT_EXTENSIBLE,
        }
    }
}

/// The 12 bytes at the start of every RIFF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiffHeader {
    /// Always "RIFF" once parsed.
    pub ident: [u8; 4],
    /// The size of the rest of the file, as declared. Not validated.
    pub chunk_size: u32,
    /// Usually "WAVE". Not validated.
    pub file_type: [u8; 4],
}

/// The fields of the "fmt " subchunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatChunk {
    /// The declared size of the fmt body: 16 for canonical PCM, more for
    /// extended formats.
    pub length_of_header: u32,
    pub audio_format: FormatTag,
    pub num_channels: u16,
    pub sample_rate: u32,
    /// Average bytes per second.
    pub bytes_per_sec: u32,
    /// Bytes per frame, where a frame is one sample for each channel.
    pub bytes_per_block: u16,
    pub bits_per_sample: u16,
}

/// A parsed wave header. Can only be obtained from [`parse_header`], since
/// the sample position and data size have to be discovered by walking the
/// file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub(crate) riff: RiffHeader,
    pub(crate) fmt: FormatChunk,
    pub(crate) first_sample_pos: u64,
    pub(crate) data_block_size: u32,
}

impl WavHeader {
    pub fn riff(&self) -> &RiffHeader {
        &self.riff
    }

    pub fn fmt(&self) -> &FormatChunk {
        &self.fmt
    }

    /// The absolute offset of the first sample byte in the source.
    pub fn first_sample_pos(&self) -> u64 {
        self.first_sample_pos
    }

    /// The size of the "data" subchunk, as declared in the file.
    pub fn data_block_size(&self) -> u32 {
        self.data_block_size
    }
}

impl fmt::Display for WavHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "=== RIFF Header ===")?;
        writeln!(f, "RIFF Ident: {}", String::from_utf8_lossy(&self.riff.ident))?;
        writeln!(f, "RIFF Size: {} bytes", self.riff.chunk_size)?;
        writeln!(f, "File type: {}", String::from_utf8_lossy(&self.riff.file_type))?;
        writeln!(f, "=== Fmt ===")?;
        writeln!(f, "Audio format: {}", u16::from(self.fmt.audio_format))?;
        writeln!(f, "Number of channels: {}", self.fmt.num_channels)?;
        writeln!(f, "Sample rate: {}", self.fmt.sample_rate)?;
        writeln!(f, "Bytes/seconds: {}", self.fmt.bytes_per_sec)?;
        writeln!(f, "Bytes/block: {}", self.fmt.bytes_per_block)?;
        write!(f, "Bits/sample: {}", self.fmt.bits_per_sample)
    }
}

// MARK: Validation and parsing functions

fn validate_format_tag(format: u16) -> ParseResult<FormatTag> {
    match format {
        FORMAT_PCM => Ok(FormatTag::Pcm),
        FORMAT_IEEE_FLOAT => Ok(FormatTag::IeeeFloat),
        FORMAT_ALAW => Ok(FormatTag::ALaw),
        FORMAT_MULAW => Ok(FormatTag::MuLaw),
        FORMAT_EXTENSIBLE => Ok(FormatTag::Extensible),
        _ => Err(ParseError::Format(ParseErrorKind::UnsupportedFormat(format))),
    }
}

// Every read and seek made while walking the header is reported as a
// truncated header, whatever the underlying IO error was.
fn truncated<T>(result: io::Result<T>) -> ParseResult<T> {
    result.map_err(ParseError::TruncatedHeader)
}

trait ReadWaveExt: Read + Seek {
    fn read_wave_header(&mut self) -> ParseResult<WavHeader> {
        let riff = self.read_riff_header()?;
        self.validate_tag(b"fmt ")?;
        let fmt = self.read_format_chunk()?;

        if fmt.length_of_header != CANONICAL_FMT_SIZE {
            self.skip_extra_format_params()?;
        }

        let data_block_size = self.skip_until_data_subchunk()?;
        let first_sample_pos = truncated(self.stream_position())?;
        debug!("sample data: {} bytes at offset {}", data_block_size, first_sample_pos);

        Ok(WavHeader {
            riff: riff,
            fmt: fmt,
            first_sample_pos: first_sample_pos,
            data_block_size: data_block_size,
        })
    }

    fn read_riff_header(&mut self) -> ParseResult<RiffHeader> {
        let ident = self.read_tag()?;
        let chunk_size = self.read_chunk_size()?;
        let file_type = self.read_tag()?;

        if &ident != b"RIFF" {
            return Err(ParseError::Format(ParseErrorKind::InvalidSignature(ident)));
        }

        Ok(RiffHeader {
            ident: ident,
            chunk_size: chunk_size,
            file_type: file_type,
        })
    }

    fn validate_tag(&mut self, expected_tag: &[u8; 4]) -> ParseResult<()> {
        let tag = self.read_tag()?;
        if &tag != expected_tag {
            return Err(ParseError::Format(ParseErrorKind::UnexpectedChunk(tag)));
        }
        Ok(())
    }

    fn read_format_chunk(&mut self) -> ParseResult<FormatChunk> {
        let length_of_header = self.read_chunk_size()?;
        let format = truncated(self.read_u16::<LittleEndian>())?;
        let num_channels = truncated(self.read_u16::<LittleEndian>())?;
        let sample_rate = truncated(self.read_u32::<LittleEndian>())?;
        let bytes_per_sec = truncated(self.read_u32::<LittleEndian>())?;
        let bytes_per_block = truncated(self.read_u16::<LittleEndian>())?;
        let bits_per_sample = truncated(self.read_u16::<LittleEndian>())?;

        // All fields are read before the format check, so a short fmt chunk
        // is reported as truncated rather than unsupported.
        let audio_format = validate_format_tag(format)?;

        Ok(FormatChunk {
            length_of_header: length_of_header,
            audio_format: audio_format,
            num_channels: num_channels,
            sample_rate: sample_rate,
            bytes_per_sec: bytes_per_sec,
            bytes_per_block: bytes_per_block,
            bits_per_sample: bits_per_sample,
        })
    }

    fn skip_extra_format_params(&mut self) -> ParseResult<()> {
        let extra_params_size = truncated(self.read_u16::<LittleEndian>())?;
        trace!("skipping {} bytes of extra fmt params", extra_params_size);
        truncated(self.seek(SeekFrom::Current(extra_params_size.into())))?;
        Ok(())
    }

    /// Skips every subchunk up to and including the header of the "data"
    /// subchunk, returning its size.
    fn skip_until_data_subchunk(&mut self) -> ParseResult<u32> {
        loop {
            let tag = self.read_tag()?;
            let subchunk_size = self.read_chunk_size()?;

            if &tag == b"data" {
                return Ok(subchunk_size);
            }

            debug!("skipping {:?} chunk of {} bytes",
                   String::from_utf8_lossy(&tag),
                   subchunk_size);
            truncated(self.seek(SeekFrom::Current(subchunk_size.into())))?;
        }
    }

    fn read_tag(&mut self) -> ParseResult<[u8; 4]> {
        let mut tag: [u8; 4] = [0; 4];
        truncated(self.read_exact(&mut tag))?;
        Ok(tag)
    }

    fn read_chunk_size(&mut self) -> ParseResult<u32> {
        truncated(self.read_u32::<LittleEndian>())
    }
}

impl<T> ReadWaveExt for T where T: Read + Seek {}

/// Parses the wave header from the given source.
///
/// On success the source is left positioned at the first sample byte, so the
/// caller can read the sample data straight away.
pub fn parse_header<R>(reader: &mut R) -> ParseResult<WavHeader>
    where R: Read + Seek
{
    reader.read_wave_header()
}

// MARK: Tests

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use super::{parse_header, validate_format_tag, FormatChunk, FormatTag, ReadWaveExt,
                RiffHeader, WavHeader};
    use super::{FORMAT_EXTENSIBLE, FORMAT_IEEE_FLOAT, FORMAT_PCM};
    use crate::error::{ParseError, ParseErrorKind};

    // RIFF header tests

    #[test]
    fn test_read_riff_header_ok() {
        let mut data = Cursor::new(b"RIFF\x24\x00\x00\x00WAVE");
        assert_matches!(Ok(RiffHeader { ident: [b'R', b'I', b'F', b'F'], chunk_size: 36, .. }),
                        data.read_riff_header());
    }

    #[test]
    fn test_read_riff_header_doesnt_validate_file_type() {
        let mut data = Cursor::new(b"RIFF\x00\x00\x00\x00AVI ");
        assert_matches!(Ok(RiffHeader { file_type: [b'A', b'V', b'I', b' '], .. }),
                        data.read_riff_header());
    }

    #[test]
    fn test_read_riff_header_err_rifx() {
        let mut data = Cursor::new(b"RIFX\x00\x00\x00\x00WAVE");
        assert_matches!(Err(ParseError::Format(ParseErrorKind::InvalidSignature(ident)))
                            if &ident == b"RIFX",
                        data.read_riff_header());
    }

    #[test]
    fn test_read_riff_header_is_case_sensitive() {
        let mut data = Cursor::new(b"riff\x00\x00\x00\x00WAVE");
        assert_matches!(Err(ParseError::Format(ParseErrorKind::InvalidSignature(_))),
                        data.read_riff_header());
    }

    #[test]
    fn test_read_riff_header_err_incomplete() {
        let mut data = Cursor::new(b"RIFF\x00\x00");
        assert_matches!(Err(ParseError::TruncatedHeader(_)), data.read_riff_header());
    }

    // Chunk tag tests

    #[test]
    fn test_validate_tag_ok() {
        let mut data = Cursor::new(b"fmt ");
        assert_matches!(Ok(()), data.validate_tag(b"fmt "));
    }

    #[test]
    fn test_validate_tag_err_underscore() {
        let mut data = Cursor::new(b"fmt_");
        assert_matches!(Err(ParseError::Format(ParseErrorKind::UnexpectedChunk(tag)))
                            if &tag == b"fmt_",
                        data.validate_tag(b"fmt "));
    }

    // Format tag validation tests

    #[test]
    fn test_validate_format_tag_ok() {
        assert_matches!(Ok(FormatTag::Pcm), validate_format_tag(FORMAT_PCM));
        assert_matches!(Ok(FormatTag::IeeeFloat), validate_format_tag(FORMAT_IEEE_FLOAT));
        assert_matches!(Ok(FormatTag::ALaw), validate_format_tag(6));
        assert_matches!(Ok(FormatTag::MuLaw), validate_format_tag(7));
        assert_matches!(Ok(FormatTag::Extensible), validate_format_tag(FORMAT_EXTENSIBLE));
    }

    #[test]
    fn test_validate_format_tag_err_adpcm() {
        assert_matches!(Err(ParseError::Format(ParseErrorKind::UnsupportedFormat(2))),
                        validate_format_tag(2));
        assert_matches!(Err(ParseError::Format(ParseErrorKind::UnsupportedFormat(12345))),
                        validate_format_tag(12345));
    }

    #[test]
    fn test_format_tag_to_u16() {
        assert_eq!(1, u16::from(FormatTag::Pcm));
        assert_eq!(3, u16::from(FormatTag::IeeeFloat));
        assert_eq!(0xFFFE, u16::from(FormatTag::Extensible));
    }

    // Format chunk tests

    #[test]
    fn test_read_format_chunk_16bit_stereo() {
        let mut data = Cursor::new(b"\x10\x00\x00\x00\
                                     \x01\x00\
                                     \x02\x00\
                                     \x44\xAC\x00\x00\
                                     \x10\xB1\x02\x00\
                                     \x04\x00\
                                     \x10\x00");
        assert_matches!(Ok(FormatChunk {
                            length_of_header: 16,
                            audio_format: FormatTag::Pcm,
                            num_channels: 2,
                            sample_rate: 44100,
                            bytes_per_sec: 176400,
                            bytes_per_block: 4,
                            bits_per_sample: 16,
                        }),
                        data.read_format_chunk());
    }

    #[test]
    fn test_read_format_chunk_too_short() {
        let mut data = Cursor::new(b"\x10\x00\x00\x00\x01\x00\x02\x00");
        assert_matches!(Err(ParseError::TruncatedHeader(_)), data.read_format_chunk());
    }

    #[test]
    fn test_skip_extra_format_params() {
        let mut data = Cursor::new(b"\x02\x00ABCDEFGH");
        let mut buf = [0u8; 4];

        assert_matches!(Ok(()), data.skip_extra_format_params());
        let _ = data.read(&mut buf);
        assert_eq!(b"CDEF", &buf);
    }

    #[test]
    fn test_skip_extra_format_params_missing_size() {
        let mut data = Cursor::new(b"\x02");
        assert_matches!(Err(ParseError::TruncatedHeader(_)), data.skip_extra_format_params());
    }

    // Skipping to the data subchunk

    #[test]
    fn test_skip_until_data_subchunk_immediate() {
        let mut data = Cursor::new(b"data\x08\x00\x00\x00");
        assert_matches!(Ok(8), data.skip_until_data_subchunk());
        assert_eq!(8, data.position());
    }

    #[test]
    fn test_skip_until_data_subchunk_skips_list_chunk() {
        let mut data = Cursor::new(b"LIST\x04\x00\x00\x00INFO\
                                     data\x02\x00\x00\x00\xAA\xBB");
        assert_matches!(Ok(2), data.skip_until_data_subchunk());
        assert_eq!(20, data.position());
    }

    #[test]
    fn test_skip_until_data_subchunk_missing() {
        let mut data = Cursor::new(b"LIST\x04\x00\x00\x00INFO");
        assert_matches!(Err(ParseError::TruncatedHeader(_)), data.skip_until_data_subchunk());
    }

    #[test]
    fn test_skip_until_data_subchunk_size_past_end() {
        let mut data = Cursor::new(b"LIST\xFF\x00\x00\x00INFOdata\x00\x00\x00\x00");
        assert_matches!(Err(ParseError::TruncatedHeader(_)), data.skip_until_data_subchunk());
    }

    // Full header tests

    #[test]
    fn test_parse_header_canonical() {
        let mut data = Cursor::new(b"RIFF\x28\x00\x00\x00WAVE\
                                     fmt \x10\x00\x00\x00\
                                     \x01\x00\
                                     \x01\x00\
                                     \x44\xAC\x00\x00\
                                     \x88\x58\x01\x00\
                                     \x02\x00\
                                     \x10\x00\
                                     data\x04\x00\x00\x00\
                                     \x00\x01\x02\x03");
        let header = parse_header(&mut data).unwrap();

        assert_eq!(b"RIFF", &header.riff().ident);
        assert_eq!(40, header.riff().chunk_size);
        assert_eq!(b"WAVE", &header.riff().file_type);
        assert_eq!(FormatTag::Pcm, header.fmt().audio_format);
        assert_eq!(1, header.fmt().num_channels);
        assert_eq!(44100, header.fmt().sample_rate);
        assert_eq!(88200, header.fmt().bytes_per_sec);
        assert_eq!(2, header.fmt().bytes_per_block);
        assert_eq!(16, header.fmt().bits_per_sample);
        assert_eq!(44, header.first_sample_pos());
        assert_eq!(4, header.data_block_size());

        // The source is left at the first sample.
        assert_eq!(44, data.position());
    }

    #[test]
    fn test_parse_header_extended_with_cb_size() {
        let mut data = Cursor::new(b"RIFF\x00\x00\x00\x00WAVE\
                                     fmt \x12\x00\x00\x00\
                                     \x03\x00\
                                     \x01\x00\
                                     \x80\xBB\x00\x00\
                                     \x00\xEE\x02\x00\
                                     \x04\x00\
                                     \x20\x00\
                                     \x00\x00\
                                     data\x00\x00\x00\x00");
        let header = parse_header(&mut data).unwrap();
        assert_eq!(FormatTag::IeeeFloat, header.fmt().audio_format);
        assert_eq!(18, header.fmt().length_of_header);
        assert_eq!(46, header.first_sample_pos());
        assert_eq!(0, header.data_block_size());
    }

    #[test]
    fn test_parse_header_unsupported_format() {
        let mut data = Cursor::new(b"RIFF\x00\x00\x00\x00WAVE\
                                     fmt \x10\x00\x00\x00\
                                     \x02\x00\
                                     \x01\x00\
                                     \x44\xAC\x00\x00\
                                     \x00\x00\x00\x00\
                                     \x00\x00\
                                     \x04\x00\
                                     data\x00\x00\x00\x00");
        assert_matches!(Err(ParseError::Format(ParseErrorKind::UnsupportedFormat(2))),
                        parse_header(&mut data));
    }

    #[test]
    fn test_parse_header_missing_fmt_chunk() {
        let mut data = Cursor::new(b"RIFF\x00\x00\x00\x00WAVE");
        assert_matches!(Err(ParseError::TruncatedHeader(_)), parse_header(&mut data));
    }

    #[test]
    fn test_display_header() {
        let header = WavHeader {
            riff: RiffHeader {
                ident: *b"RIFF",
                chunk_size: 36,
                file_type: *b"WAVE",
            },
            fmt: FormatChunk {
                length_of_header: 16,
                audio_format: FormatTag::Pcm,
                num_channels: 2,
                sample_rate: 44100,
                bytes_per_sec: 176400,
                bytes_per_block: 4,
                bits_per_sample: 16,
            },
            first_sample_pos: 44,
            data_block_size: 0,
        };

        let expected = "=== RIFF Header ===\n\
                        RIFF Ident: RIFF\n\
                        RIFF Size: 36 bytes\n\
                        File type: WAVE\n\
                        === Fmt ===\n\
                        Audio format: 1\n\
                        Number of channels: 2\n\
                        Sample rate: 44100\n\
                        Bytes/seconds: 176400\n\
                        Bytes/block: 4\n\
                        Bits/sample: 16";
        assert_eq!(expected, header.to_string());
    }
}
