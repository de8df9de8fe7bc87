#![allow(dead_code)]

pub mod config;
pub mod fakes;
pub mod server;
