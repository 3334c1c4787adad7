pub mod aadhaar;
pub mod pan;
pub mod verhoeff;
