//! Command-line front end for the arithmetic coder library.
//!
//! `encode`/`decode` operate on a single file pair and report size and
//! timing; `encode-all`/`decode-all` sweep a small built-in list of sample
//! files and print a results table.

use clap::{Parser, Subcommand};
use compress::{decode_file, encode_file};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "compress", about = "Static-model arithmetic coder")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress a single file.
    Encode {
        input: PathBuf,
        output: PathBuf,
    },
    /// Decompress a single codestream.
    Decode {
        input: PathBuf,
        output: PathBuf,
    },
    /// Compress the built-in sample file set.
    EncodeAll,
    /// Decompress the built-in sample codestream set.
    DecodeAll,
}

/// Sample file pairs for the batch subcommands.
const ENCODE_ALL_FILES: &[(&str, &str)] = &[
    ("input/lena_ascii.pgm", "lena_ascii.codestream"),
    ("input/baboon_ascii.pgm", "baboon_ascii.codestream"),
    ("input/quadrado_ascii.pgm", "quadrado_ascii.codestream"),
];

const DECODE_ALL_FILES: &[(&str, &str)] = &[
    ("lena_ascii.codestream", "lena_ascii-rec.pgm"),
    ("baboon_ascii.codestream", "baboon_ascii-rec.pgm"),
    ("quadrado_ascii.codestream", "quadrado_ascii-rec.pgm"),
];

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let ok = match cli.command {
        Command::Encode { input, output } => run_encode(&input, &output),
        Command::Decode { input, output } => run_decode(&input, &output),
        Command::EncodeAll => run_encode_all(),
        Command::DecodeAll => run_decode_all(),
    };

    if !ok {
        std::process::exit(1);
    }
}

fn file_size(path: &Path) -> Option<u64> {
    std::fs::metadata(path).ok().map(|m| m.len())
}

fn compression_ratio(original: Option<u64>, compressed: Option<u64>) -> Option<f64> {
    match (original, compressed) {
        (Some(o), Some(c)) if o > 0 && c > 0 => Some(o as f64 / c as f64),
        _ => None,
    }
}

fn run_encode(input: &Path, output: &Path) -> bool {
    println!("Encoding {} to {}...", input.display(), output.display());
    let start = Instant::now();
    if let Err(e) = encode_file(input, output) {
        eprintln!("Failed to encode file: {e}");
        return false;
    }
    let elapsed = start.elapsed();

    let original_size = file_size(input);
    let compressed_size = file_size(output);
    println!("Successfully encoded file.");
    if let Some(size) = original_size {
        println!("Original size:     {size} bytes");
    }
    if let Some(size) = compressed_size {
        println!("Compressed size:   {size} bytes");
    }
    if let Some(ratio) = compression_ratio(original_size, compressed_size) {
        println!("Compression ratio: {ratio:.2}:1");
    }
    println!("Encoding time:     {:.3} seconds", elapsed.as_secs_f64());
    true
}

fn run_decode(input: &Path, output: &Path) -> bool {
    println!("Decoding {} to {}...", input.display(), output.display());
    let start = Instant::now();
    if let Err(e) = decode_file(input, output) {
        eprintln!("Failed to decode file: {e}");
        return false;
    }
    let elapsed = start.elapsed();

    println!("Successfully decoded file.");
    println!("Output saved to:   {}", output.display());
    if let Some(size) = file_size(output) {
        println!("Decoded size:      {size} bytes");
    }
    println!("Decoding time:     {:.3} seconds", elapsed.as_secs_f64());
    true
}

fn run_encode_all() -> bool {
    println!("Encoding all specified files...");
    println!(
        "{:<25}{:>15}{:>15}{:>12}{:>12}",
        "Input File", "Original Size", "Comp. Size", "Ratio", "Time (s)"
    );

    let mut all_successful = true;
    for &(input, output) in ENCODE_ALL_FILES {
        let input = Path::new(input);
        let output = Path::new(output);
        let name = input.file_name().unwrap_or_default().to_string_lossy();
        let start = Instant::now();
        let original_size = file_size(input);

        let result = if original_size.is_none() {
            eprintln!("Error reading {}", input.display());
            None
        } else {
            match encode_file(input, output) {
                Ok(()) => Some(file_size(output)),
                Err(e) => {
                    eprintln!("Error encoding {}: {e}", input.display());
                    None
                }
            }
        };
        let elapsed = start.elapsed();

        match result {
            Some(compressed_size) => {
                let ratio = compression_ratio(original_size, compressed_size).unwrap_or(0.0);
                println!(
                    "{:<25}{:>15}{:>15}{:>11.2}:1{:>10.3}",
                    name,
                    original_size.unwrap_or(0),
                    compressed_size.unwrap_or(0),
                    ratio,
                    elapsed.as_secs_f64()
                );
            }
            None => {
                all_successful = false;
                let orig = original_size
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "N/A".to_string());
                println!(
                    "{:<25}{:>15}{:>15}{:>12}{:>12.3}",
                    name,
                    orig,
                    "FAIL",
                    "N/A",
                    elapsed.as_secs_f64()
                );
            }
        }
    }
    all_successful
}

fn run_decode_all() -> bool {
    println!("Decoding all specified codestreams...");
    println!(
        "{:<28}{:>15}{:>15}{:>12}",
        "Input Codestream", "Decoded Size", "Output File", "Time (s)"
    );

    let mut all_successful = true;
    for &(input, output) in DECODE_ALL_FILES {
        let input = Path::new(input);
        let output = Path::new(output);
        let input_name = input.file_name().unwrap_or_default().to_string_lossy();
        let output_name = output.file_name().unwrap_or_default().to_string_lossy();
        let start = Instant::now();

        let decoded_size = if file_size(input).is_none() {
            eprintln!("Error: input codestream not found: {}", input.display());
            None
        } else {
            match decode_file(input, output) {
                Ok(()) => Some(file_size(output).unwrap_or(0)),
                Err(e) => {
                    eprintln!("Error decoding {}: {e}", input.display());
                    None
                }
            }
        };
        let elapsed = start.elapsed();

        match decoded_size {
            Some(size) => {
                println!(
                    "{:<28}{:>15}{:>15}{:>10.3}",
                    input_name,
                    size,
                    output_name,
                    elapsed.as_secs_f64()
                );
            }
            None => {
                all_successful = false;
                println!(
                    "{:<28}{:>15}{:>15}{:>10.3}",
                    input_name,
                    "FAIL",
                    output_name,
                    elapsed.as_secs_f64()
                );
            }
        }
    }
    all_successful
}
