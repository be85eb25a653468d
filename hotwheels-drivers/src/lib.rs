//! Hardware driver implementations
//!
//! Concrete implementations of the traits defined in hotwheels-core:
//!
//! - Photo-gates on digital input pins

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod sensor;
