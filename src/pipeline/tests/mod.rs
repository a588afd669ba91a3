//! Tests for the checkpoint and manifest layer
