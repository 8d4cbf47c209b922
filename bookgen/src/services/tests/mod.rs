//! Service tests against a local mock HTTP server
