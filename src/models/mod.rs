pub mod applicant;
pub mod application;
pub mod job;
pub mod timestamp;

pub use applicant::{Applicant, SocialHandles};
pub use application::{Application, ApplicationStatus};
pub use job::JobPosting;
pub use timestamp::StoreTimestamp;
