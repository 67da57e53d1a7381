use gridpledge_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("verification error: {0}")]
    Verification(#[from] gridpledge_verification::VerificationError),

    #[error("pool error: {0}")]
    Pool(#[from] gridpledge_pool::PoolError),

    #[error("distributor error: {0}")]
    Distributor(#[from] gridpledge_distributor::DistributorError),

    #[error("store error: {0}")]
    Store(#[from] gridpledge_store::StoreError),

    #[error("oracle key error: {0}")]
    Key(#[from] gridpledge_crypto::KeyError),

    #[error("config error: {0}")]
    Config(String),
}

impl NodeError {
    /// The shared error kind, for errors raised by a component operation.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            NodeError::Verification(e) => Some(e.kind()),
            NodeError::Pool(e) => Some(e.kind()),
            NodeError::Distributor(e) => Some(e.kind()),
            NodeError::Store(e) => Some(e.kind()),
            NodeError::Key(_) | NodeError::Config(_) => None,
        }
    }
}
