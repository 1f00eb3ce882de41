use thiserror::Error;

#[derive(Debug, Error)]
pub enum GossipError {
    #[error("peer {peer} unreachable: {detail}")]
    PeerUnreachable { peer: String, detail: String },

    #[error("peer {peer} sent a malformed response: {detail}")]
    PeerMalformed { peer: String, detail: String },
}

impl GossipError {
    pub fn peer(&self) -> &str {
        match self {
            GossipError::PeerUnreachable { peer, .. } => peer,
            GossipError::PeerMalformed { peer, .. } => peer,
        }
    }
}
