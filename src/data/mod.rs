/// Data layer: parsing, aggregation, loading and export.
///
/// Architecture:
/// ```text
///  2024_..._00-mysqladmin   2024_..._10-mysqladmin   pt-mysql-summary.out
///        │                        │                        │
///        ▼                        ▼                        │
///   ┌──────────┐                                           │
///   │  parser   │  `| name | value |` rows → Vec<Snapshot> │
///   └──────────┘                                           │
///        │                                                 ▼
///        ▼                                          ┌──────────┐
///   ┌───────────┐                                   │  loader   │  hostname
///   │ aggregate  │  snapshots → group → variable    └──────────┘
///   └───────────┘             → raw / delta series        │
///        │                                                 │
///        └──────────────────────┬──────────────────────────┘
///                               ▼
///                        ┌──────────────┐
///                        │ SourceReport  │ ──▶ export (json / csv)
///                        └──────────────┘
/// ```

pub mod aggregate;
pub mod export;
pub mod loader;
pub mod model;
pub mod parser;
