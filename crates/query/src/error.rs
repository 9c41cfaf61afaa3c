use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Index(#[from] coderef_index::IndexError),

    #[error(transparent)]
    Graph(#[from] coderef_graph::GraphError),

    #[error("unknown reference: {0}")]
    UnknownReference(String),
}
