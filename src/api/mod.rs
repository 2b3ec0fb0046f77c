// =============================================================================
// HTTP boundary
// =============================================================================
//
// Thin layer over the analysis core: routing, query-parameter extraction,
// and error-to-status-code mapping. No computation happens here.

pub mod rest;
