#![allow(clippy::new_without_default)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub mod acquirer;
pub mod animation;
pub mod app;
pub mod config;
pub mod device;
pub mod direction;
pub mod error;
pub mod geo;
pub mod logs;
pub mod place;
pub mod presentation;
pub mod tracker;
