//! Dast wire format tests

mod decode;
