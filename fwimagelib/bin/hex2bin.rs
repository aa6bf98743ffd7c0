use clap::{ArgAction, Parser};
use fwimagelib::{
    ConvertOptions, DEFAULT_SIZE_LIMIT, ImageError, hex_to_bin, parse_byte_count,
};
use std::path::PathBuf;
use std::process;

/// Convert an Intel HEX file to a raw binary file.
///
/// The output covers the lowest to the highest address written by data records,
/// gaps are filled with 0xFF.
#[derive(Parser)]
#[command(name = "hex2bin", version)]
struct Args {
    /// Path to the input hex file
    hex_file: PathBuf,
    /// Path to the output binary file
    bin_file: PathBuf,
    /// Skip (and report) records whose checksum does not match
    #[arg(long)]
    verify_checksums: bool,
    /// Refuse to build images larger than this many bytes
    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = DEFAULT_SIZE_LIMIT,
        value_parser = parse_byte_count,
        conflicts_with = "no_size_limit"
    )]
    size_limit: usize,
    /// Build the image whatever its size
    #[arg(long)]
    no_size_limit: bool,
    /// More log output (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    let options = ConvertOptions::new()
        .with_checksum_verification(args.verify_checksums)
        .with_size_limit((!args.no_size_limit).then_some(args.size_limit));

    match hex_to_bin(&args.hex_file, &args.bin_file, &options) {
        Ok(conversion) => {
            if !conversion.skipped.is_empty() {
                println!(
                    "Skipped {} record(s) with a bad checksum",
                    conversion.skipped.len()
                );
            }
            println!(
                "Successfully converted {} to {}",
                args.hex_file.display(),
                args.bin_file.display()
            );
        }
        Err(ImageError::FileNotFound(path)) => {
            eprintln!("Error: Input file {} not found.", path.display());
            process::exit(1);
        }
        Err(e) => {
            eprintln!("An error occurred: {e}");
            process::exit(1);
        }
    }
}
