#![allow(warnings, unused)]

pub mod decode;
pub(crate) mod download;
pub mod extractors;
