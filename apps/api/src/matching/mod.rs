pub mod fit_scoring;
pub mod handlers;
pub mod jd_match;
