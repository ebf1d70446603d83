pub mod account;
pub mod content;
pub mod course;
pub mod module;
pub mod proposal;

pub use account::{AccountService, RegisterAccount};
pub use content::{ContentDraft, ContentService};
pub use course::{CourseDraft, CourseService};
pub use module::{ModuleDraft, ModuleService};
pub use proposal::{ProposalDraft, ProposalService, ReviewDecision, ReviewProposal};
