pub mod imagediff;
pub mod regression;
