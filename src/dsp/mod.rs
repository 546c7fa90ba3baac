//! DSP — noise synthesis and the real-time mix graph.
//!
//! All DSP runs in Rust so the browser build (AudioWorklet + WASM) and
//! native tests hear exactly the same samples.

pub mod analyser;
pub mod filter;
pub mod graph;
pub mod noise;
pub mod oscillator;
pub mod ramp;
