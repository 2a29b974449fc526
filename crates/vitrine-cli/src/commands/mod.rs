pub mod check;
pub mod config;
pub mod inquiries;
pub mod run;
pub mod submit;
