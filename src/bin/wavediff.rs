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

//! wavediff - compares the headers of two wave files.
//!
//! Prints one line per differing field and exits with status 1 when the
//! headers differ. Prints nothing and exits with status 0 when they match.
//!
//! ```bash
//! wavediff original.wav converted.wav
//! ```

use std::process;

use clap::Parser;
use log::LevelFilter;

use riff_wave_parser::diff::diff_headers;
use riff_wave_parser::Wav;

const EXIT_DIFFERENT: i32 = 1;
const EXIT_LOAD_FAILED: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "wavediff")]
#[command(about = "Compare the RIFF/WAVE headers of two files", long_about = None)]
struct Args {
    /// First wave file; its values are shown on the left
    #[arg(value_name = "WAV")]
    left: String,

    /// Second wave file; its values are shown on the right
    #[arg(value_name = "OTHER_WAV")]
    right: String,

    /// Log each chunk as it is walked
    #[arg(short, long)]
    verbose: bool,
}

fn load_or_exit(path: &str) -> Wav {
    match Wav::open(path) {
        Ok(wav) => wav,
        Err(err) => {
            eprintln!("error: [{}] loading [{}]", err, path);
            process::exit(EXIT_LOAD_FAILED);
        }
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let left = load_or_exit(&args.left);
    let right = load_or_exit(&args.right);

    let diffs = diff_headers(&left.header, &right.header);
    if diffs.is_empty() {
        return;
    }

    println!();
    println!("[{}] header differs from [{}] header", args.left, args.right);
    println!("[{}] values will be on the left, [{}] on the right", args.left, args.right);
    println!();
    for diff in &diffs {
        println!("{}", diff);
    }

    process::exit(EXIT_DIFFERENT);
}
