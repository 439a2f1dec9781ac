//! Dependency injection.
//!
//! A [`Container`] maps service types to shared instances or factories.
//! Handlers receive services through the [`Inject`] extractor (container in
//! router state) or [`InjectGlobal`] (process-wide container).

mod container;
mod extractor;

pub use container::{get_container, inject, Container, Injectable, Resolver};
pub use extractor::{Inject, InjectGlobal};
