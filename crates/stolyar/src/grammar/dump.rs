//! Test-only dump helpers for grammar inspection.
