//! Integration test harness; each module drives the public surface.

mod configure_test;
mod playback_test;
mod stepping_test;
mod trace_test;
