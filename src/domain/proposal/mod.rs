mod model;
mod repository;

pub use model::{Proposal, ProposalStatus};
pub use repository::ProposalRepository;
