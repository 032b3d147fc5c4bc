use thiserror::Error;

use crate::constants::SubhaloId;

#[derive(Error, Debug)]
pub enum MondError {
    #[error("Non-constant bin sizes must have same length as bin centers ({radii} radii, {widths} widths)")]
    BinWidthLengthMismatch { radii: usize, widths: usize },

    #[error("At least one radius must be requested")]
    EmptyRadii,

    #[error("Invalid radius at index {index}: {value} (must be finite and non-negative)")]
    InvalidRadius { index: usize, value: f64 },

    #[error("Invalid bin width at index {index}: {value} (must be finite and non-negative)")]
    InvalidBinWidth { index: usize, value: f64 },

    #[error("One or more requested subhalos not found in manifest {0}")]
    SubhaloNotFound(String),

    #[error("Invalid manifest entry: {0}")]
    InvalidManifestEntry(String),

    #[error("Manifest entry {entry} does not share the file base '{expected}'")]
    InconsistentFileBase { entry: String, expected: String },

    #[error("Duplicate subhalo ID in manifest: {0}")]
    DuplicateSubhaloId(SubhaloId),

    #[error("Column '{0}' not found in schema")]
    MissingColumn(String),

    #[error("Column '{column}' must be {expected}")]
    InvalidColumnType {
        column: String,
        expected: &'static str,
    },

    #[error("Particle columns have mismatched lengths: {0}")]
    ParticleColumnLength(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow_schema::ArrowError),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("HTTP ureq error: {0}")]
    UreqHttpError(#[from] ureq::Error),

    #[error("HTTP reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Invalid Illustris simulation: {0}. Please use a valid simulation!")]
    InvalidSimulation(String),

    #[error("At least one of z and snapnum MUST be given")]
    MissingSnapshotSelector,

    #[error("Invalid snapshot number for simulation {simulation}: {snapnum}. Please use a valid snapshot number for this simulation")]
    InvalidSnapshotNumber { simulation: String, snapnum: u32 },

    #[error("Response from {0} has no content-disposition filename")]
    MissingContentDisposition(String),

    #[error("Blocking download of {0} called from inside an async runtime")]
    BlockingDownloadInRuntime(String),

    #[error("Unexpected content type '{content_type}' from {url}")]
    UnexpectedContentType { url: String, content_type: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Unable to decode cutout {path}: {reason}")]
    CutoutDecodeError { path: String, reason: String },

    #[error("UTF-8 Path error: {0}")]
    Utf8PathError(String),
}

impl PartialEq for MondError {
    fn eq(&self, other: &Self) -> bool {
        use MondError::*;
        match (self, other) {
            (
                BinWidthLengthMismatch {
                    radii: a,
                    widths: b,
                },
                BinWidthLengthMismatch {
                    radii: c,
                    widths: d,
                },
            ) => a == c && b == d,
            (EmptyRadii, EmptyRadii) => true,
            (
                InvalidRadius { index: a, value: b },
                InvalidRadius { index: c, value: d },
            ) => a == c && b.to_bits() == d.to_bits(),
            (
                InvalidBinWidth { index: a, value: b },
                InvalidBinWidth { index: c, value: d },
            ) => a == c && b.to_bits() == d.to_bits(),
            (SubhaloNotFound(a), SubhaloNotFound(b)) => a == b,
            (InvalidManifestEntry(a), InvalidManifestEntry(b)) => a == b,
            (
                InconsistentFileBase {
                    entry: a,
                    expected: b,
                },
                InconsistentFileBase {
                    entry: c,
                    expected: d,
                },
            ) => a == c && b == d,
            (DuplicateSubhaloId(a), DuplicateSubhaloId(b)) => a == b,
            (MissingColumn(a), MissingColumn(b)) => a == b,
            (
                InvalidColumnType {
                    column: a,
                    expected: b,
                },
                InvalidColumnType {
                    column: c,
                    expected: d,
                },
            ) => a == c && b == d,
            (ParticleColumnLength(a), ParticleColumnLength(b)) => a == b,

            // Wrapped foreign errors are not comparable: same variant means equal
            (IoError(_), IoError(_)) => true,
            (ParquetError(_), ParquetError(_)) => true,
            (ArrowError(_), ArrowError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (UreqHttpError(_), UreqHttpError(_)) => true,
            (ReqwestError(_), ReqwestError(_)) => true,
            (TomlError(_), TomlError(_)) => true,

            (InvalidSimulation(a), InvalidSimulation(b)) => a == b,
            (MissingSnapshotSelector, MissingSnapshotSelector) => true,
            (
                InvalidSnapshotNumber {
                    simulation: a,
                    snapnum: b,
                },
                InvalidSnapshotNumber {
                    simulation: c,
                    snapnum: d,
                },
            ) => a == c && b == d,
            (MissingContentDisposition(a), MissingContentDisposition(b)) => a == b,
            (BlockingDownloadInRuntime(a), BlockingDownloadInRuntime(b)) => a == b,
            (
                UnexpectedContentType {
                    url: a,
                    content_type: b,
                },
                UnexpectedContentType {
                    url: c,
                    content_type: d,
                },
            ) => a == c && b == d,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,
            (
                CutoutDecodeError { path: a, reason: b },
                CutoutDecodeError { path: c, reason: d },
            ) => a == c && b == d,
            (Utf8PathError(a), Utf8PathError(b)) => a == b,

            _ => false,
        }
    }
}
