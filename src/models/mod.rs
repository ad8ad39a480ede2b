pub mod enrollmentmodel;
pub mod planmodel;
pub mod servicemodel;
pub mod usermodel;
