// ==============================================================================
// lib.rs - SNP Finder Library
// ==============================================================================
// Description: Library interface for SNP detection modules
// Author: Matt Barham
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================

pub mod parsers;
pub mod models;
pub mod scanner;
pub mod report;
pub mod output;
pub mod combiner;
pub mod config;
pub mod processor;
