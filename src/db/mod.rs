pub mod db;
pub mod enrollmentdb;
pub mod memorydb;
pub mod plandb;
pub mod servicedb;
pub mod userdb;

pub use db::DBClient;

use enrollmentdb::EnrollmentExt;
use plandb::PlanExt;
use servicedb::ServiceExt;
use userdb::UserExt;

/// Everything the domain services need from persistence.
pub trait Store: UserExt + ServiceExt + PlanExt + EnrollmentExt + Send + Sync {}

impl<T> Store for T where T: UserExt + ServiceExt + PlanExt + EnrollmentExt + Send + Sync {}
