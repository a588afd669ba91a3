//! Tests for the pipeline stages

mod corpus_tests;
mod crop_tests;
