//! # gerber-view
//!
//! Parse, serialize and preview Gerber (RS-274X / X2) files.
//!
//! Gerber is the de-facto interchange format for PCB fabrication: a plain
//! ASCII command stream describing apertures, drawing operations and image
//! layers. The [specification is well documented](https://www.ucamco.com/en/guest/downloads/gerber-format),
//! and the format being plaintext makes it easy to work with.
//!
//! This crate parses a Gerber source into an ordered sequence of typed
//! [`Node`]s held by a [`GerberDoc`], serializes the document back to Gerber
//! text with round-trip fidelity, and renders it to an SVG preview with
//! [`render_svg`]. Parsing never fails: commands outside the recognized
//! subset are preserved byte-for-byte as [`Node::Unknown`] so they survive
//! the round trip.

// These modules are not public, instead we re-export the public types from them below
mod ast;
mod document;
mod error;
mod parser;
mod render;
mod tokenizer;

pub use ast::*;
pub use document::*;
pub use error::*;
pub use parser::parse;
pub use render::*;
pub use tokenizer::{tokenize, Token, TokenKind};
