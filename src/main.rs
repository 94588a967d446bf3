//! codonkit - codon usage analysis and DNA synthesis
//!
//! ## Usage
//!
//! ```bash
//! codonkit analyze -f reference.fasta -o frequencies.csv [-v heatmap.csv]
//! codonkit generate -p MAKL -f frequencies.csv [-n 5] [--method weighted] [--seed 42]
//! codonkit view frequencies.csv
//! ```

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use codonkit::controller::run_viewer;
use codonkit::counter::CodonCounter;
use codonkit::fasta::{parse_fasta_file, write_fasta_record};
use codonkit::frequency::FrequencyAnalyzer;
use codonkit::heatmap::FrequencyMatrix;
use codonkit::synthesis::{SequenceSynthesizer, SynthesisMethod};
use codonkit::table::{read_table_file, write_table_file};

/// Environment variable overriding `--log-level`.
const LOG_ENV: &str = "CODONKIT_LOG";

/// Codon selection method for command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    /// Most frequent codon for every amino acid
    Preferred,
    /// Codons sampled in proportion to their frequency
    Weighted,
}

impl From<MethodArg> for SynthesisMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Preferred => SynthesisMethod::Preferred,
            MethodArg::Weighted => SynthesisMethod::Weighted,
        }
    }
}

/// codonkit - Analyze codon usage and generate DNA sequences from protein sequences
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log filter (e.g. "info", "codonkit=debug"); overridden by CODONKIT_LOG
    #[arg(long = "log-level", global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze codon frequencies from a FASTA file
    Analyze {
        /// Path to input FASTA file
        #[arg(short = 'f', long = "fasta")]
        fasta: PathBuf,

        /// Path to output frequency table (CSV)
        #[arg(short = 'o', long = "output")]
        output: PathBuf,

        /// Path to amino acid × codon heatmap matrix (CSV)
        #[arg(short = 'v', long = "heatmap")]
        heatmap: Option<PathBuf>,
    },

    /// Generate DNA sequence(s) from a protein sequence
    Generate {
        /// Input protein sequence (one-letter amino acid codes)
        #[arg(short = 'p', long = "protein")]
        protein: String,

        /// Path to frequency table CSV file
        #[arg(short = 'f', long = "frequency_table")]
        frequency_table: PathBuf,

        /// Number of variants to generate
        #[arg(short = 'n', long = "num_variants", default_value = "1")]
        num_variants: usize,

        /// Method for codon selection
        #[arg(long = "method", value_enum, default_value = "weighted")]
        method: MethodArg,

        /// Seed for weighted sampling (random if omitted)
        #[arg(short = 's', long = "seed")]
        seed: Option<u64>,

        /// Write sequences as FASTA to this file instead of stdout
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// Line width for FASTA output (0 = no wrapping)
        #[arg(short = 'w', long = "wrap", default_value = "60")]
        wrap: usize,
    },

    /// Browse a frequency table as an interactive heatmap
    View {
        /// Frequency table CSV file
        table: PathBuf,

        /// Use plain ASCII glyphs
        #[arg(long = "ascii")]
        ascii: bool,
    },
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let spec = std::env::var(LOG_ENV).unwrap_or_else(|_| level.to_string());
    let filter = EnvFilter::try_new(&spec)
        .map_err(|e| anyhow::anyhow!("Invalid log level '{}': {}", spec, e))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    Ok(())
}

/// Runs the analyze command: count codons, derive and save the table.
fn run_analyze(fasta: &Path, output: &Path, heatmap: Option<&Path>) -> Result<()> {
    let records = parse_fasta_file(fasta)
        .with_context(|| format!("Cannot read sequences from {}", fasta.display()))?;

    let usage = CodonCounter::default().count(&records);
    if usage.skipped_codons > 0 {
        warn!(skipped = usage.skipped_codons, "codons with ambiguous bases were skipped");
    }

    let table = FrequencyAnalyzer::default().analyze(&usage)?;
    write_table_file(&table, output)?;

    eprintln!(
        "Counted {} codons in {} sequences ({} skipped, {} trailing bases ignored)",
        usage.total_codons(),
        usage.sequences,
        usage.skipped_codons,
        usage.truncated_bases
    );
    println!("Analysis complete.");
    println!("Frequency table saved to {}", output.display());

    if let Some(path) = heatmap {
        FrequencyMatrix::from_table(&table).write_csv_file(path)?;
        println!("Visualization is saved to {}", path.display());
    }

    Ok(())
}

/// Options of the generate command.
struct GenerateOptions {
    protein: String,
    frequency_table: PathBuf,
    num_variants: usize,
    method: SynthesisMethod,
    seed: Option<u64>,
    output: Option<PathBuf>,
    wrap: usize,
}

/// Runs the generate command: load the table and synthesize DNA.
fn run_generate(options: GenerateOptions) -> Result<()> {
    if options.num_variants == 0 {
        anyhow::bail!("Number of variants must be at least 1");
    }

    let protein = options.protein.trim().to_ascii_uppercase();
    let table = read_table_file(&options.frequency_table).with_context(|| {
        format!(
            "Cannot load frequency table {}",
            options.frequency_table.display()
        )
    })?;
    let synthesizer = SequenceSynthesizer::new(&table)?;

    // (id, sequence) pairs in output order
    let sequences: Vec<(String, String)> = match options.method {
        SynthesisMethod::Preferred => {
            if options.num_variants > 1 {
                warn!("preferred codons are deterministic; generating a single sequence");
            }
            vec![("preferred".to_string(), synthesizer.preferred(&protein)?)]
        }
        SynthesisMethod::Weighted => {
            let seed = options.seed.unwrap_or_else(|| rand::rng().random());
            info!(seed, "weighted sampling seed");
            let mut rng = StdRng::seed_from_u64(seed);
            synthesizer
                .variants(&protein, options.num_variants, &mut rng)?
                .into_iter()
                .enumerate()
                .map(|(i, dna)| (format!("variant_{}", i + 1), dna))
                .collect()
        }
    };

    match &options.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            for (id, dna) in &sequences {
                write_fasta_record(&mut writer, id, dna, options.wrap)?;
            }
            writer.flush()?;
            eprintln!("Wrote {} sequence(s) to {}", sequences.len(), path.display());
        }
        None => print_sequences(&sequences, options.method),
    }

    Ok(())
}

/// Prints generated sequences in the plain stdout layout.
fn print_sequences(sequences: &[(String, String)], method: SynthesisMethod) {
    match (method, sequences) {
        (SynthesisMethod::Preferred, [(_, dna), ..]) => {
            println!("Generated DNA sequence (preferred codons):\n{}", dna);
        }
        (SynthesisMethod::Weighted, [(_, dna)]) => {
            println!("Generated DNA sequence (weighted):\n{}", dna);
        }
        _ => {
            println!("Generated {} DNA sequence variants:", sequences.len());
            for (i, (_, dna)) in sequences.iter().enumerate() {
                println!("Variant {}:\n{}", i + 1, dna);
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    match args.command {
        Command::Analyze {
            fasta,
            output,
            heatmap,
        } => run_analyze(&fasta, &output, heatmap.as_deref()),
        Command::Generate {
            protein,
            frequency_table,
            num_variants,
            method,
            seed,
            output,
            wrap,
        } => run_generate(GenerateOptions {
            protein,
            frequency_table,
            num_variants,
            method: method.into(),
            seed,
            output,
            wrap,
        }),
        Command::View { table, ascii } => run_viewer(table, !ascii),
    }
}
