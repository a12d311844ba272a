use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing input: {0}")]
    MissingInput(&'static str),
    #[error("Empty geometry for {kind} '{id}'")]
    EmptyGeometry { kind: &'static str, id: String },
    #[error("Non-finite coordinate in {kind} '{id}'")]
    NonFiniteCoordinate { kind: &'static str, id: String },
    #[error("Duplicate target segment id '{0}'")]
    DuplicateTargetId(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("WKT error: {0}")]
    WktError(String),
}

impl From<geojson::Error> for Error {
    fn from(e: geojson::Error) -> Self {
        Error::GeoJsonError(e.to_string())
    }
}
