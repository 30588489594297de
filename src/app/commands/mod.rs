pub mod generate;
pub mod serve;
pub mod url;
