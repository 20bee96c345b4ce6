use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use huffpack::{decode_file, encode_file, Result, Tokenizer, ARCHIVE_EXTENSION};

/// Dictionary file consulted when no `--keywords` flag is given.
const DEFAULT_DICTIONARY: &str = "huff.config";

#[derive(Parser)]
#[command(version, about = "Dictionary-aware Huffman file compressor")]
struct Opts {
    /// Compress FILE into an archive with a .huff extension
    #[arg(short = 'c', long = "compress", value_name = "FILE")]
    compress: Option<PathBuf>,

    /// Decompress a .huff archive, restoring the original file
    #[arg(
        short = 'd',
        long = "decompress",
        value_name = "FILE",
        conflicts_with = "compress"
    )]
    decompress: Option<PathBuf>,

    /// Keyword dictionary: newline-delimited byte sequences coded as
    /// single symbols
    #[arg(short = 'k', long = "keywords", value_name = "FILE")]
    keywords: Option<PathBuf>,
}

/// Build the tokenizer from a dictionary file.
///
/// An explicitly named dictionary must be readable; the default one is
/// optional and its absence means plain per-byte coding. Blank lines are
/// skipped and CRLF endings tolerated.
fn load_keywords(path: Option<&Path>) -> Result<Tokenizer> {
    let raw = match path {
        Some(path) => fs::read(path)?,
        None => match fs::read(DEFAULT_DICTIONARY) {
            Ok(raw) => raw,
            Err(_) => return Ok(Tokenizer::new()),
        },
    };
    Ok(Tokenizer::with_keywords(
        raw.split(|&byte| byte == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
            .filter(|line| !line.is_empty()),
    ))
}

fn run(opts: &Opts) -> Result<PathBuf> {
    match (&opts.compress, &opts.decompress) {
        (Some(input), None) => {
            let tokenizer = load_keywords(opts.keywords.as_deref())?;
            encode_file(input, &tokenizer).inspect_err(|_| {
                // A failed encode leaves a partial archive behind; it is
                // not decodable, so clean it up.
                let _ = fs::remove_file(input.with_extension(ARCHIVE_EXTENSION));
            })
        }
        (None, Some(archive)) => decode_file(archive),
        _ => unreachable!("clap dispatch checked by caller"),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let opts = Opts::parse();

    if opts.compress.is_none() && opts.decompress.is_none() {
        let _ = Opts::command().print_help();
        return ExitCode::FAILURE;
    }

    match run(&opts) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
