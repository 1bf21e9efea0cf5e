pub mod edit;
pub mod init;
pub mod run;
pub mod score;
pub mod validate;
