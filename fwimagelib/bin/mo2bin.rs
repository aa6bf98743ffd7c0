use clap::{ArgAction, Parser};
use fwimagelib::{
    ConvertOptions, DEFAULT_SIZE_LIMIT, ImageError, mot_to_bin, parse_byte_count, parse_pad_byte,
};
use std::path::PathBuf;
use std::process;

/// Convert a Motorola S-record file to a raw binary file.
///
/// Records with a bad checksum are reported and left out; the addresses they
/// would have covered are padded.
#[derive(Parser)]
#[command(name = "mo2bin", version)]
struct Args {
    /// Path to the input Motorola S-record file
    mot_file: PathBuf,
    /// Path to the output binary file
    bin_file: PathBuf,
    /// Padding byte value (0x.., 0o.., 0b.. or decimal)
    #[arg(long, value_name = "BYTE", default_value = "0xFF", value_parser = parse_pad_byte)]
    pad: u8,
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
        .with_pad(args.pad)
        .with_size_limit((!args.no_size_limit).then_some(args.size_limit));

    match mot_to_bin(&args.mot_file, &args.bin_file, &options) {
        Ok(conversion) => {
            if !conversion.skipped.is_empty() {
                println!(
                    "Skipped {} record(s) with a bad checksum",
                    conversion.skipped.len()
                );
            }
            println!(
                "Successfully converted {} to {}",
                args.mot_file.display(),
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
