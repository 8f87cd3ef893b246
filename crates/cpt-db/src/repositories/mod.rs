// All repository functions are generic over `E: Executor<'e, Database = Postgres>`
// so they accept both a `&PgPool` (direct query) and a `&mut PgConnection`
// borrowed from a transaction (atomic operations).

pub mod plan;
pub mod problem;
pub mod progress;
pub mod review;
pub mod stats;
pub mod topic;
pub mod user;
