pub mod outbound;
pub mod reqwest_transport;

pub use outbound::GossipTransport;
pub use reqwest_transport::ReqwestTransport;

#[cfg(any(test, feature = "test-support"))]
pub use outbound::test_support::InMemoryTransport;
