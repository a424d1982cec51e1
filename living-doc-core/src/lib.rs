#![doc = "living-doc-core: core pipeline for Living Documentation."]

//! This crate holds the data model and the whole generation pipeline: it joins repository
//! issues with GitHub Projects data, classifies them into documentation groups, derives
//! their output locations and renders pages and index tables through templates.
//!
//! Network clients, configuration loading and the binary live in the `living-doc` crate;
//! this crate only sees them through the traits in [`contract`].
//!
//! # Usage
//! Build a [`config::GeneratorConfig`], provide an [`contract::IssueSource`],
//! [`contract::ProjectSource`], [`contract::TemplateLoader`] and [`contract::DocumentWriter`],
//! then call [`generate::generate`].

pub mod classify;
pub mod config;
pub mod consolidate;
pub mod contract;
pub mod error;
pub mod generate;
pub mod identity;
pub mod index;
pub mod issue;
pub mod layout;
pub mod page;
pub mod project;
pub mod render;
pub mod sanitize;
pub mod templates;
pub mod writer;
