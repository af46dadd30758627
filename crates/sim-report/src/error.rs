use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("could not open report file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("could not write {kind} row: {source}")]
    Write {
        kind: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("could not flush {kind} writer: {source}")]
    Flush {
        kind: &'static str,
        #[source]
        source: std::io::Error,
    },
}
