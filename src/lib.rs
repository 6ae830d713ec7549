#![allow(rustdoc::bare_urls)]

//! A CODEC and catalog toolkit for AMP Resource Identifiers (ARI).
//!
//! An ARI either carries a literal value or references a managed object
//! defined by an Application Data Model (ADM). This crate provides:
//!
//! - [`ari`] — the value model shared by every codec.
//! - [`text`] — the human-readable ARI text grammar (`ari:/ns/TYPE.name(...)`).
//! - [`cbor`] — the bit-packed binary wire form.
//! - [`adm`] — an in-memory catalog of ADM JSON documents.
//! - [`nickname`] — substitution between symbolic and numeric namespace/name
//!   pairs, consulting an [`adm::AdmCatalog`].
//! - [`check`] — a registry of catalog constraints producing structured
//!   [`check::Issue`] records.
//! - [`diag`] — CBOR diagnostic notation and identifier normalization.
//!
//! See the `ari-tool` binary for a CLI that wires these together.

pub mod adm;
pub mod ari;
pub mod cbor;
pub mod check;
pub mod diag;
pub mod nickname;
pub mod text;
