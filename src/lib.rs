// keystone: CAPM cost-of-equity estimates with semantic industry suggestions
//
// This is the library root. Each module corresponds to one part of the
// tool: market data sources, the typed catalogs they produce, the CAPM
// computation, and the embedding-based industry ranker.

pub mod capm;
pub mod catalog;
pub mod config;
pub mod output;
pub mod session;
pub mod sources;
pub mod status;
pub mod suggest;
