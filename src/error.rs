use thiserror::Error;

/// Errors raised while building a [`DataSet`](crate::DataSet) or moving it through a delimited table.
#[derive(Error, Debug)]
pub enum DataSetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input contained no header row naming the attributes.
    #[error("missing header row")]
    MissingHeader,

    /// A header column was blank.
    #[error("attribute name in column {0} is empty")]
    EmptyAttributeName(usize),

    #[error("duplicate attribute name: {0}")]
    DuplicateAttribute(String),

    /// A row's arity did not match the header. `row` is 1-based.
    #[error("row {row}: expected {expected} values, found {found}")]
    SchemaMismatch { row: usize, expected: usize, found: usize },

    #[error("row {row}: cannot parse {value:?} as a number for attribute {attribute}")]
    InvalidValue { row: usize, attribute: String, value: String },

    #[error("row {row}: value for attribute {attribute} is not finite")]
    NonFiniteValue { row: usize, attribute: String },
}

/// Precondition violations of a clustering run. Raised before seeding starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KMeansError {
    #[error("data set contains no records")]
    EmptyDataSet,

    #[error("invalid k value {k}: must be in 1..={records}")]
    InvalidK { k: usize, records: usize },

    #[error("max_iter must be at least 1")]
    InvalidIterationLimit,

    /// The initialization method did not deliver one centroid per cluster.
    #[error("initialization produced {found} centroids, expected {expected}")]
    CentroidCount { expected: usize, found: usize },
}
