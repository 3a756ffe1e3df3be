//! Data layer: core types, loading, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!   exportacoes_franca.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → TradeTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  city catalog, selected cities → filtered view
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  five summaries, one per chart
//!   └───────────┘
//! ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
