// Passport field extraction from MRZ and page OCR text

use clap::{Parser, Subcommand};
use log::info;
use passport_extract::{
    models::{CheckDigitReport, ExtractedIdentity},
    processing::{collect_documents, run_batch, text_to_lines, CountryCodeTable, MrzDecoder},
    validation::MrzValidator,
    ExtractorConfig, PassportError, PassportExtractor,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "passport_extract", version, about = "Extract identity fields from passport MRZ and page text")]
struct Cli {
    /// Country code table (JSON array of {"code", "name"})
    #[arg(long, global = true, env = "PASSPORT_COUNTRY_CODES")]
    countries: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Tesseract data directory
    #[arg(long, global = true, env = "TESSDATA_PREFIX")]
    tessdata: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Also verify the MRZ check digits
    #[arg(long, global = true)]
    check_digits: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract from OCR output saved as text, one OCR line per line
    Text {
        #[arg(long)]
        mrz: PathBuf,
        #[arg(long)]
        page: Option<PathBuf>,
    },
    /// OCR an MRZ crop and a full page image (needs the `tesseract` feature)
    Scan {
        #[arg(long)]
        mrz_image: PathBuf,
        #[arg(long)]
        page_image: PathBuf,
    },
    /// Extract every <name>.mrz.txt (+ <name>.page.txt) in a directory
    Batch {
        dir: PathBuf,
        #[arg(long, default_value_t = 4)]
        workers: usize,
    },
}

fn print_data(identity: &ExtractedIdentity) {
    for (key, value) in identity.fields() {
        println!("{}\t:\t{}", key, value);
    }
}

fn print_check_digits(report: &CheckDigitReport) {
    let status = |valid: bool| if valid { "PASSED" } else { "FAILED" };
    println!("\nCHECK DIGITS:");
    println!("  Document Number: {}", status(report.document_number_valid));
    println!("  Date of Birth: {}", status(report.date_of_birth_valid));
    println!("  Date of Expiry: {}", status(report.date_of_expiry_valid));
    println!("  Personal Number: {}", status(report.personal_number_valid));
    println!("  Composite: {}", status(report.composite_valid));
}

fn print_result(
    identity: &ExtractedIdentity,
    report: Option<&CheckDigitReport>,
    json: bool,
) -> Result<(), PassportError> {
    if json {
        let value = match report {
            Some(report) => serde_json::json!({ "identity": identity, "check_digits": report }),
            None => serde_json::to_value(identity)?,
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_data(identity);
        if let Some(report) = report {
            print_check_digits(report);
        }
    }
    Ok(())
}

fn read_lines(path: &Path) -> Result<Vec<String>, PassportError> {
    Ok(text_to_lines(&fs::read_to_string(path)?))
}

fn load_config(cli: &Cli) -> Result<ExtractorConfig, PassportError> {
    let mut config = match &cli.config {
        Some(path) => ExtractorConfig::load(path)?,
        None => ExtractorConfig::default(),
    };
    if let Some(countries) = &cli.countries {
        config.country_codes = countries.clone();
    }
    if let Some(tessdata) = &cli.tessdata {
        config.tessdata_prefix = Some(tessdata.clone());
    }
    config.validate()?;
    Ok(config)
}

fn run_text(
    extractor: &PassportExtractor,
    cli: &Cli,
    mrz: &Path,
    page: Option<&Path>,
) -> Result<(), PassportError> {
    let mrz_lines = read_lines(mrz)?;
    let page_lines = match page {
        Some(path) => read_lines(path)?,
        None => Vec::new(),
    };

    let record = MrzDecoder::decode_lines(&mrz_lines)?;
    let identity = extractor.resolve_identity(&record, &page_lines);
    let report = cli.check_digits.then(|| MrzValidator::validate(&record));
    print_result(&identity, report.as_ref(), cli.json)
}

#[cfg(feature = "tesseract")]
fn run_scan(
    extractor: &PassportExtractor,
    cli: &Cli,
    mrz_image: &Path,
    page_image: &Path,
) -> Result<(), PassportError> {
    use passport_extract::processing::TesseractOcr;

    let config = extractor.config();
    let datapath = config
        .tessdata_prefix
        .as_ref()
        .map(|path| path.to_string_lossy().into_owned());
    let mut ocr = TesseractOcr::new(datapath, config.ocr_language.clone());

    if cli.check_digits {
        eprintln!("Check digits are only reported by the text and batch commands");
    }
    let identity = extractor.extract_from_images(&mut ocr, mrz_image, page_image)?;
    print_result(&identity, None, cli.json)
}

#[cfg(not(feature = "tesseract"))]
fn run_scan(
    _extractor: &PassportExtractor,
    _cli: &Cli,
    _mrz_image: &Path,
    _page_image: &Path,
) -> Result<(), PassportError> {
    Err(PassportError::ConfigError(
        "scan requires building with the `tesseract` feature".to_string(),
    ))
}

fn run_batch_dir(
    extractor: &PassportExtractor,
    cli: &Cli,
    dir: &Path,
    workers: usize,
) -> Result<(), PassportError> {
    let documents = collect_documents(dir)?;
    let outcomes = run_batch(extractor, &documents, workers);

    let mut failures = 0;
    for (document, outcome) in documents.iter().zip(&outcomes) {
        println!("\n--- {} ---", outcome.name);
        match &outcome.result {
            Ok(identity) => {
                let report = if cli.check_digits {
                    let mrz_lines = read_lines(&document.mrz_path)?;
                    Some(MrzValidator::validate(&MrzDecoder::decode_lines(&mrz_lines)?))
                } else {
                    None
                };
                print_result(identity, report.as_ref(), cli.json)?;
            }
            Err(e) => {
                failures += 1;
                eprintln!("Error: {}", e);
            }
        }
    }

    println!(
        "\nProcessed {} documents, {} failed",
        outcomes.len(),
        failures
    );
    Ok(())
}

fn main() -> Result<(), PassportError> {
    env_logger::init();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let table = Arc::new(CountryCodeTable::load(&config.country_codes)?);
    info!("Using {} country codes", table.len());
    let extractor = PassportExtractor::with_config(table, config);

    match &cli.command {
        Command::Text { mrz, page } => run_text(&extractor, &cli, mrz, page.as_deref()),
        Command::Scan {
            mrz_image,
            page_image,
        } => run_scan(&extractor, &cli, mrz_image, page_image),
        Command::Batch { dir, workers } => run_batch_dir(&extractor, &cli, dir, *workers),
    }
}
