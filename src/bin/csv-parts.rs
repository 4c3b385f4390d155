//! CLI tool to re-emit CSV or fixed-width files as size-limited parts.
//!
//! Usage:
//!   csv-parts split <input.csv> <output.csv> [--max-lines N] [--max-bytes N]
//!   csv-parts fixed <input.dat> <output.csv> --widths 8,10,10 [--byte]
//!   csv-parts check <input.csv>
//!
//! Limits come from `--config <file.properties>` and may be overridden by
//! flags. Set `RUST_LOG` to control diagnostics (default `info`).

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use csvparts_rs::{CodecConfig, CsvReader, CsvWriter, Record, WidthUnit};

#[derive(Parser)]
#[command(name = "csv-parts", version, about = "Split CSV and fixed-width files into parts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read delimited records and write them to rotating parts.
    Split {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        opts: CommonOpts,
        /// Append to the first output file instead of truncating it.
        #[arg(long)]
        append: bool,
    },
    /// Decode fixed-width records and write them as CSV parts.
    Fixed {
        input: PathBuf,
        output: PathBuf,
        /// Column widths, comma separated.
        #[arg(long, value_delimiter = ',', required = true)]
        widths: Vec<usize>,
        /// Measure widths in encoded bytes instead of characters.
        #[arg(long)]
        byte: bool,
        #[command(flatten)]
        opts: CommonOpts,
    },
    /// Report whether an input fits the configured size and line limits.
    Check {
        input: PathBuf,
        #[command(flatten)]
        opts: CommonOpts,
    },
}

#[derive(Args)]
struct CommonOpts {
    /// Properties file with maxLine, maxFileSize, paddingFormat, separateFlg.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Input charset (default windows-31j).
    #[arg(long)]
    charset: Option<String>,
    /// Output charset (defaults to the input charset).
    #[arg(long)]
    out_charset: Option<String>,
    #[arg(long)]
    max_lines: Option<u64>,
    #[arg(long)]
    max_bytes: Option<u64>,
    /// Part index pattern such as 000.
    #[arg(long)]
    padding: Option<String>,
}

impl CommonOpts {
    fn load_config(&self) -> csvparts_rs::Result<CodecConfig> {
        let mut config = match &self.config {
            Some(path) => CodecConfig::load(path)?,
            None => CodecConfig::default(),
        };
        if let Some(n) = self.max_lines {
            config = config.with_max_line_count(n);
        }
        if let Some(n) = self.max_bytes {
            config = config.with_max_file_size(n);
        }
        if let Some(pattern) = &self.padding {
            config = config.with_padding_format(pattern)?;
        }
        Ok(config)
    }

    fn out_charset(&self) -> Option<&str> {
        self.out_charset.as_deref().or(self.charset.as_deref())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(command: Command) -> csvparts_rs::Result<()> {
    match command {
        Command::Split {
            input,
            output,
            opts,
            append,
        } => {
            let config = opts.load_config()?;
            let mut reader = CsvReader::open(&input, opts.charset.as_deref(), &config)?;
            let mut writer = CsvWriter::create(&output, opts.out_charset(), append, &config)?;
            let mut count = 0usize;
            while let Some(record) = reader.read_record()? {
                writer.write_record(&record)?;
                count += 1;
            }
            finish(reader, writer, count)
        }
        Command::Fixed {
            input,
            output,
            widths,
            byte,
            opts,
        } => {
            let mut config = opts.load_config()?;
            if byte {
                config = config.with_width_unit(WidthUnit::Byte);
            }
            let mut reader = CsvReader::open(&input, opts.charset.as_deref(), &config)?;
            let mut writer = CsvWriter::create(&output, opts.out_charset(), false, &config)?;
            let records: Vec<Record> = reader.read_all_fixed(&widths)?;
            for record in &records {
                writer.write_record(record)?;
            }
            finish(reader, writer, records.len())
        }
        Command::Check { input, opts } => {
            let config = opts.load_config()?;
            let mut reader = CsvReader::open(&input, opts.charset.as_deref(), &config)?;
            let size_ok = reader.is_correct_file_size();
            let lines_ok = reader.is_correct_line_count()?;
            reader.close();
            println!("size:  {}", if size_ok { "ok" } else { "too large" });
            println!("lines: {}", if lines_ok { "ok" } else { "too many" });
            Ok(())
        }
    }
}

fn finish(mut reader: CsvReader, mut writer: CsvWriter, count: usize) -> csvparts_rs::Result<()> {
    reader.close();
    writer.close()?;
    eprintln!("Wrote {} records", count);
    for path in writer.output_paths() {
        println!("{}", path.display());
    }
    Ok(())
}
